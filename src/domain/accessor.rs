// Accessor-name resolution for slot labels.
// Slot ids are snake_case; accessors follow the `getThenBranch` / `isUnsafe` convention.

use tracing::warn;

use crate::domain::ast::{AstNode, ScalarValue};
use crate::domain::schema::{SchemaRegistry, SlotDescriptor};

/// Shown in place of a return type that cannot be resolved.
pub const UNRESOLVED_RETURN_TYPE: &str = "*";

/// Builds the accessor name for a slot id.
pub fn canonical_accessor(id: &str, boolean: bool) -> String {
    let prefix = if boolean { "is" } else { "get" };
    let mut name = String::with_capacity(prefix.len() + id.len());
    name.push_str(prefix);
    for segment in id.split('_').filter(|s| !s.is_empty()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}

/// Display label for a slot. Scalar slots holding a `bool` get an `is…` label.
pub fn accessor_name(descriptor: &SlotDescriptor, value: Option<&ScalarValue>) -> String {
    canonical_accessor(descriptor.id, value.is_some_and(ScalarValue::is_bool))
}

/// Declared return type of `accessor` on the node's kind, or
/// [`UNRESOLVED_RETURN_TYPE`] when the kind declares no such accessor.
pub fn return_type_name<'r>(registry: &'r SchemaRegistry, node: &AstNode, accessor: &str) -> &'r str {
    let resolved = registry
        .schema(node.kind())
        .and_then(|schema| schema.return_type_of(accessor));

    match resolved {
        Some(return_type) => return_type,
        None => {
            warn!(
                node = node.kind(),
                accessor,
                "no accessor declared for this node kind; using placeholder return type"
            );
            UNRESOLVED_RETURN_TYPE
        }
    }
}
