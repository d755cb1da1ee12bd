use snapnet_serde::{ByteReader, ByteWrite, ConstByteLength, Serde, SerdeErr};

use crate::{ComponentIndex, ObjectId, VariableIndex};

/// Addresses one replicated variable: the owning object, the component
/// within it, and the variable within the component
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableKey {
    pub object_id: ObjectId,
    pub component_index: ComponentIndex,
    pub variable_index: VariableIndex,
}

impl VariableKey {
    pub fn new(
        object_id: ObjectId,
        component_index: ComponentIndex,
        variable_index: VariableIndex,
    ) -> Self {
        Self {
            object_id,
            component_index,
            variable_index,
        }
    }
}

impl Serde for VariableKey {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.object_id.ser(writer);
        self.component_index.ser(writer);
        self.variable_index.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            object_id: ObjectId::de(reader)?,
            component_index: ComponentIndex::de(reader)?,
            variable_index: VariableIndex::de(reader)?,
        })
    }

    fn byte_length(&self) -> usize {
        Self::const_byte_length()
    }
}

impl ConstByteLength for VariableKey {
    fn const_byte_length() -> usize {
        <ObjectId as ConstByteLength>::const_byte_length()
            + <ComponentIndex as ConstByteLength>::const_byte_length()
            + <VariableIndex as ConstByteLength>::const_byte_length()
    }
}
