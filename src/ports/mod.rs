use std::path::Path;

use crate::domain::ast::AstNode;
use crate::error::Result;

pub mod html_exporter;
pub mod page_template;

/// Turns source text into a lowered syntax tree.
pub trait AstParser {
    fn parse(&self, src: &str) -> Result<AstNode>;
}

/// Persists a rendered view of a tree.
pub trait OutputExporter {
    fn export(&self, root: &AstNode, path: &Path) -> Result<()>;
}
