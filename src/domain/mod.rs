// Domain model: the generic tree, node kind schemas and slot labelling.

pub mod accessor;
pub mod ast;
pub mod schema;
