use snapnet_shared::{ObjectId, PeerId, SnapshotConfig, SnapshotSession, TickReport};

use crate::{test_protocol::TestObject, test_world::TestWorld};

/// One endpoint: a snapshot session plus the objects it replicates
pub struct TestPeer {
    pub id: PeerId,
    pub session: SnapshotSession,
    pub world: TestWorld,
    pub last_report: TickReport,
}

impl TestPeer {
    pub fn new(id: PeerId, config: SnapshotConfig) -> Self {
        Self {
            id,
            session: SnapshotSession::new(config),
            world: TestWorld::new(),
            last_report: TickReport::default(),
        }
    }

    /// Spawn an object and track all of its variables
    pub fn spawn_tracked(&mut self, object_id: ObjectId) -> &mut TestObject {
        for key in TestObject::keys(object_id) {
            self.session.track(key);
        }
        self.world.spawn(object_id)
    }

    pub fn despawn(&mut self, object_id: ObjectId) -> usize {
        self.world.despawn(object_id);
        self.session.despawn_object(object_id)
    }

    pub fn object(&self, object_id: ObjectId) -> &TestObject {
        match self.world.object(object_id) {
            Some(object) => object,
            None => panic!("peer {} has no object {}", self.id, object_id),
        }
    }

    pub fn object_mut(&mut self, object_id: ObjectId) -> &mut TestObject {
        let id = self.id;
        match self.world.object_mut(object_id) {
            Some(object) => object,
            None => panic!("peer {} has no object {}", id, object_id),
        }
    }
}
