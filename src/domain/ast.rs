// Generic syntax tree for AST Viewer.
// Every parsed construct is lowered into an `AstNode` whose shape is described
// by the node kind's schema (see `domain::schema`), not by its Rust type.

use std::fmt;

/// A primitive value held by a scalar slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Char(char),
    Str(String),
}

impl ScalarValue {
    /// Runtime type name shown in front of a scalar leaf.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarValue::Bool(_) => "bool",
            ScalarValue::Int(_) => "i64",
            ScalarValue::Char(_) => "char",
            ScalarValue::Str(_) => "String",
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, ScalarValue::Bool(_))
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Int(i) => write!(f, "{}", i),
            ScalarValue::Char(c) => write!(f, "{}", c),
            ScalarValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<char> for ScalarValue {
    fn from(value: char) -> Self {
        ScalarValue::Char(value)
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Str(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Str(value.to_string())
    }
}

/// A value stored on a node instance.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    Scalar(ScalarValue),
    Child(Box<AstNode>),
    Children(Vec<AstNode>),
}

/// Borrowed view of a slot as seen through its descriptor.
/// Absent values are `None` (scalar, single child) or an empty slice (list).
#[derive(Debug, Clone, Copy)]
pub enum SlotRef<'a> {
    Scalar(Option<&'a ScalarValue>),
    Child(Option<&'a AstNode>),
    Children(&'a [AstNode]),
}

/// A node in the lowered syntax tree.
///
/// Only populated slots are stored; anything the schema declares but the node
/// does not hold reads back as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    kind: &'static str,
    slots: Vec<(&'static str, SlotValue)>,
}

impl AstNode {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            slots: Vec::new(),
        }
    }

    /// The node kind, e.g. `"ItemFn"`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn with_scalar(mut self, id: &'static str, value: impl Into<ScalarValue>) -> Self {
        self.slots.push((id, SlotValue::Scalar(value.into())));
        self
    }

    pub fn with_scalar_opt<V: Into<ScalarValue>>(self, id: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with_scalar(id, v),
            None => self,
        }
    }

    pub fn with_child(mut self, id: &'static str, child: AstNode) -> Self {
        self.slots.push((id, SlotValue::Child(Box::new(child))));
        self
    }

    pub fn with_child_opt(self, id: &'static str, child: Option<AstNode>) -> Self {
        match child {
            Some(c) => self.with_child(id, c),
            None => self,
        }
    }

    pub fn with_children<I>(mut self, id: &'static str, children: I) -> Self
    where
        I: IntoIterator<Item = AstNode>,
    {
        self.slots
            .push((id, SlotValue::Children(children.into_iter().collect())));
        self
    }

    /// Raw stored value for a slot id.
    pub fn slot(&self, id: &str) -> Option<&SlotValue> {
        self.slots
            .iter()
            .find(|(slot_id, _)| *slot_id == id)
            .map(|(_, value)| value)
    }

    /// Ids of the stored slots, in insertion order.
    pub fn slot_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|(id, _)| *id)
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count_nodes(&self) -> usize {
        1 + self
            .slots
            .iter()
            .map(|(_, value)| match value {
                SlotValue::Scalar(_) => 0,
                SlotValue::Child(child) => child.count_nodes(),
                SlotValue::Children(children) => children.iter().map(AstNode::count_nodes).sum(),
            })
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_scalars_are_not_stored() {
        let node = AstNode::new("Field")
            .with_scalar_opt::<String>("ident", None)
            .with_scalar_opt("vis", Some("pub"));

        assert!(node.slot("ident").is_none());
        assert_eq!(
            node.slot("vis"),
            Some(&SlotValue::Scalar(ScalarValue::Str("pub".to_string())))
        );
    }

    #[test]
    fn test_scalar_type_names() {
        assert_eq!(ScalarValue::from(true).type_name(), "bool");
        assert_eq!(ScalarValue::from(3_i64).type_name(), "i64");
        assert_eq!(ScalarValue::from('c').type_name(), "char");
        assert_eq!(ScalarValue::from("x").type_name(), "String");
        assert!(ScalarValue::from(false).is_bool());
        assert!(!ScalarValue::from("false").is_bool());
    }

    #[test]
    fn test_count_nodes() {
        let node = AstNode::new("Block").with_children(
            "stmts",
            vec![
                AstNode::new("StmtExpr").with_child("expr", AstNode::new("ExprPath")),
                AstNode::new("PatWild"),
            ],
        );
        assert_eq!(node.count_nodes(), 4);
    }
}
