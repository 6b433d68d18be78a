// Infrastructure implementations for AST Viewer.

pub mod config;
pub mod file_io;
pub mod logging;
pub mod rust_schema;
pub mod syn_lowering;

pub use syn_lowering::SynAstParser;
