//! Node Kind Schemas
//!
//! Per-kind structural metadata: the ordered slot list every node of a kind
//! exposes, and the accessor table used to label those slots. Schemas are
//! registered once at startup and looked up by kind string.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::accessor::canonical_accessor;
use crate::domain::ast::{AstNode, SlotRef, SlotValue};

/// Kind of the documentation-comment node. Single-child slots declaring this
/// return type are never rendered.
pub const DOC_COMMENT_KIND: &str = "DocComment";

/// Shape of a structural slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Scalar,
    SingleChild,
    ChildList { element_kind: &'static str },
}

/// Describes one structural slot of a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDescriptor {
    pub id: &'static str,
    pub kind: SlotKind,
}

impl SlotDescriptor {
    pub fn scalar(id: &'static str) -> Self {
        Self { id, kind: SlotKind::Scalar }
    }

    pub fn single_child(id: &'static str) -> Self {
        Self { id, kind: SlotKind::SingleChild }
    }

    pub fn child_list(id: &'static str, element_kind: &'static str) -> Self {
        Self {
            id,
            kind: SlotKind::ChildList { element_kind },
        }
    }
}

/// Slots and accessor signatures of one node kind.
#[derive(Debug, Clone)]
pub struct NodeSchema {
    kind: &'static str,
    slots: Vec<SlotDescriptor>,
    // accessor name -> declared return type name
    accessors: HashMap<String, String>,
}

impl NodeSchema {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            slots: Vec::new(),
            accessors: HashMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn slots(&self) -> &[SlotDescriptor] {
        &self.slots
    }

    /// Scalar slot with a `get…` accessor returning `value_type`.
    pub fn scalar(self, id: &'static str, value_type: &str) -> Self {
        self.slot_with_accessor(SlotDescriptor::scalar(id), canonical_accessor(id, false), value_type)
    }

    /// Boolean scalar slot with an `is…` accessor.
    pub fn flag(self, id: &'static str) -> Self {
        self.slot_with_accessor(SlotDescriptor::scalar(id), canonical_accessor(id, true), "bool")
    }

    pub fn child(self, id: &'static str, return_type: &str) -> Self {
        self.slot_with_accessor(
            SlotDescriptor::single_child(id),
            canonical_accessor(id, false),
            return_type,
        )
    }

    pub fn list(self, id: &'static str, element_kind: &'static str) -> Self {
        let return_type = format!("List<{}>", element_kind);
        self.slot_with_accessor(
            SlotDescriptor::child_list(id, element_kind),
            canonical_accessor(id, false),
            &return_type,
        )
    }

    /// Declares a slot without registering an accessor for it.
    pub fn slot(mut self, descriptor: SlotDescriptor) -> Self {
        self.slots.push(descriptor);
        self
    }

    /// Registers an accessor that does not back any slot.
    pub fn accessor(mut self, name: &str, return_type: &str) -> Self {
        self.accessors.insert(name.to_string(), return_type.to_string());
        self
    }

    pub fn return_type_of(&self, accessor: &str) -> Option<&str> {
        self.accessors.get(accessor).map(String::as_str)
    }

    fn slot_with_accessor(self, descriptor: SlotDescriptor, accessor: String, return_type: &str) -> Self {
        self.slot(descriptor).accessor(&accessor, return_type)
    }
}

/// Registry of every node kind a tree may contain.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, NodeSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema, replacing any earlier one for the same kind.
    pub fn register(&mut self, schema: NodeSchema) {
        self.schemas.insert(schema.kind(), schema);
    }

    pub fn with(mut self, schema: NodeSchema) -> Self {
        self.register(schema);
        self
    }

    pub fn schema(&self, kind: &str) -> Option<&NodeSchema> {
        self.schemas.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.schemas.contains_key(kind)
    }

    /// Ordered slot descriptors for the node's kind.
    ///
    /// # Panics
    ///
    /// Panics if the kind was never registered. Trees are produced by a
    /// lowering that only emits registered kinds.
    pub fn slots_of(&self, node: &AstNode) -> &[SlotDescriptor] {
        match self.schemas.get(node.kind()) {
            Some(schema) => schema.slots(),
            None => panic!("node kind `{}` has no registered schema", node.kind()),
        }
    }

    /// Live value of `descriptor` on `node`.
    pub fn value_of<'n>(&self, node: &'n AstNode, descriptor: &SlotDescriptor) -> SlotRef<'n> {
        let stored = node.slot(descriptor.id);
        match (descriptor.kind, stored) {
            (SlotKind::Scalar, Some(SlotValue::Scalar(value))) => SlotRef::Scalar(Some(value)),
            (SlotKind::SingleChild, Some(SlotValue::Child(child))) => SlotRef::Child(Some(child)),
            (SlotKind::ChildList { .. }, Some(SlotValue::Children(children))) => {
                SlotRef::Children(children)
            }
            (kind, other) => {
                if other.is_some() {
                    warn!(
                        node = node.kind(),
                        slot = descriptor.id,
                        "stored value does not match the declared slot shape; treating as absent"
                    );
                }
                match kind {
                    SlotKind::Scalar => SlotRef::Scalar(None),
                    SlotKind::SingleChild => SlotRef::Child(None),
                    SlotKind::ChildList { .. } => SlotRef::Children(&[]),
                }
            }
        }
    }
}
