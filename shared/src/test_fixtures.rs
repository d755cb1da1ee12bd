//! Objects, transports and messages shared by the unit tests of the
//! snapshot drivers

use snapnet_serde::ByteWriter;

use crate::{
    config::AllocationPolicy,
    registry::{ComponentSet, ObjectRegistry, ReplicatedComponent},
    snapshot::{
        arena::SnapshotArena, directory::VariableDirectory, key::VariableKey,
        message::write_snapshot,
    },
    transport::{error::TransportError, ConnectionManager, SnapshotTransport, TickClock},
    variable::{
        replicated_list::ReplicatedList, replicated_value::ReplicatedValue,
        replicated_variable::ReplicatedVariable,
    },
    ChannelIndex, ComponentIndex, ObjectId, PeerId, Tick, VariableIndex,
};

// TestComponent - a list at variable 0 and a value at variable 1
#[derive(Default)]
pub struct TestComponent {
    pub list: ReplicatedList<u32>,
    pub value: ReplicatedValue<u8>,
}

impl ReplicatedComponent for TestComponent {
    fn variable_at(&mut self, index: VariableIndex) -> Option<&mut dyn ReplicatedVariable> {
        match index {
            0 => Some(&mut self.list),
            1 => Some(&mut self.value),
            _ => None,
        }
    }
}

impl ComponentSet for TestComponent {
    fn component_at(&mut self, index: ComponentIndex) -> Option<&mut dyn ReplicatedComponent> {
        match index {
            0 => Some(self),
            _ => None,
        }
    }
}

pub fn list_key(object_id: ObjectId) -> VariableKey {
    VariableKey::new(object_id, 0, 0)
}

pub fn value_key(object_id: ObjectId) -> VariableKey {
    VariableKey::new(object_id, 0, 1)
}

// TestRegistry - objects with a single TestComponent each
#[derive(Default)]
pub struct TestRegistry {
    objects: Vec<(ObjectId, TestComponent)>,
}

impl TestRegistry {
    pub fn with_objects(object_ids: &[ObjectId]) -> Self {
        let mut registry = Self::default();
        for object_id in object_ids {
            registry.spawn(*object_id);
        }
        registry
    }

    pub fn spawn(&mut self, object_id: ObjectId) -> &mut TestComponent {
        self.objects.push((object_id, TestComponent::default()));
        &mut self.objects.last_mut().unwrap().1
    }

    pub fn component(&self, object_id: ObjectId) -> &TestComponent {
        &self
            .objects
            .iter()
            .find(|(id, _)| *id == object_id)
            .unwrap()
            .1
    }

    pub fn component_mut(&mut self, object_id: ObjectId) -> &mut TestComponent {
        &mut self
            .objects
            .iter_mut()
            .find(|(id, _)| *id == object_id)
            .unwrap()
            .1
    }
}

impl ObjectRegistry for TestRegistry {
    fn lookup_object(&mut self, object_id: ObjectId) -> Option<&mut dyn ComponentSet> {
        self.objects
            .iter_mut()
            .find(|(id, _)| *id == object_id)
            .map(|(_, component)| component as &mut dyn ComponentSet)
    }
}

// RecordingTransport - keeps every send, optionally refusing one peer
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Vec<(PeerId, ChannelIndex, Vec<u8>)>,
    pub refuse: Option<PeerId>,
}

impl RecordingTransport {
    pub fn payloads(self) -> Vec<Vec<u8>> {
        self.sent.into_iter().map(|(_, _, payload)| payload).collect()
    }
}

impl SnapshotTransport for RecordingTransport {
    fn send(
        &mut self,
        peer: PeerId,
        channel: ChannelIndex,
        payload: &[u8],
    ) -> Result<(), TransportError> {
        if self.refuse == Some(peer) {
            return Err(TransportError::PeerNotConnected { peer });
        }
        self.sent.push((peer, channel, payload.to_vec()));
        Ok(())
    }
}

pub struct FixedClock(pub Tick);

impl TickClock for FixedClock {
    fn current_tick(&self) -> Tick {
        self.0
    }
}

pub struct FixedPeers(pub Vec<PeerId>);

impl ConnectionManager for FixedPeers {
    fn connected_peers(&self) -> Vec<PeerId> {
        self.0.clone()
    }
}

/// Build a message the way a sender would. A tick of 0 leaves the entry
/// unwritten.
pub fn message(entries: &[(VariableKey, Tick, Vec<u8>)]) -> Vec<u8> {
    let mut directory = VariableDirectory::new();
    let mut arena = SnapshotArena::new(256, AllocationPolicy::FreeList);
    for (key, tick, payload) in entries {
        let slot = directory.add_entry(*key).unwrap();
        if *tick == 0 {
            continue;
        }
        arena.fit_entry(&mut directory[slot], payload.len()).unwrap();
        directory[slot].tick_written = *tick;
        arena.write(directory[slot].position, payload).unwrap();
    }
    let mut writer = ByteWriter::new();
    write_snapshot(&directory, &arena, &mut writer).unwrap();
    writer.to_bytes()
}

/// Delta of a fresh list after adding `values`
pub fn list_delta(values: &[u32]) -> Vec<u8> {
    let mut source = ReplicatedList::new();
    for value in values {
        source.add(*value);
    }
    source.encode_delta().unwrap()
}
