use crate::{
    snapshot::key::VariableKey, variable::replicated_variable::ReplicatedVariable,
    ComponentIndex, ObjectId, VariableIndex,
};

/// Gives the snapshot receiver access to the locally spawned objects.
/// Implemented by whatever owns object spawn/despawn.
pub trait ObjectRegistry {
    /// The components of a spawned object, or None if it is not (or no
    /// longer) spawned
    fn lookup_object(&mut self, object_id: ObjectId) -> Option<&mut dyn ComponentSet>;
}

/// The replicated components of one object, addressed by order index
pub trait ComponentSet {
    fn component_at(&mut self, index: ComponentIndex) -> Option<&mut dyn ReplicatedComponent>;
}

/// The replicated variables of one component, addressed by order index
pub trait ReplicatedComponent {
    fn variable_at(&mut self, index: VariableIndex) -> Option<&mut dyn ReplicatedVariable>;
}

/// Walk object, component and variable index down to the variable `key`
/// names. None means the key is stale: the object was despawned, is not yet
/// spawned, or an index is out of range.
pub fn resolve_variable<'r, R: ObjectRegistry + ?Sized>(
    registry: &'r mut R,
    key: &VariableKey,
) -> Option<&'r mut dyn ReplicatedVariable> {
    registry
        .lookup_object(key.object_id)?
        .component_at(key.component_index)?
        .variable_at(key.variable_index)
}
