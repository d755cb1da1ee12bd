/// Simple object registry for end-to-end snapshot tests
use std::collections::HashMap;

use snapnet_shared::{ComponentSet, ObjectId, ObjectRegistry};

use crate::test_protocol::TestObject;

// TestWorld - HashMap-based registry of spawned objects
#[derive(Default)]
pub struct TestWorld {
    objects: HashMap<ObjectId, TestObject>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, object_id: ObjectId) -> &mut TestObject {
        self.objects.entry(object_id).or_default()
    }

    pub fn despawn(&mut self, object_id: ObjectId) -> Option<TestObject> {
        self.objects.remove(&object_id)
    }

    pub fn has_object(&self, object_id: ObjectId) -> bool {
        self.objects.contains_key(&object_id)
    }

    pub fn object(&self, object_id: ObjectId) -> Option<&TestObject> {
        self.objects.get(&object_id)
    }

    pub fn object_mut(&mut self, object_id: ObjectId) -> Option<&mut TestObject> {
        self.objects.get_mut(&object_id)
    }
}

impl ObjectRegistry for TestWorld {
    fn lookup_object(&mut self, object_id: ObjectId) -> Option<&mut dyn ComponentSet> {
        self.objects
            .get_mut(&object_id)
            .map(|object| object as &mut dyn ComponentSet)
    }
}
