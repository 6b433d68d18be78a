use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::infrastructure::file_io;
use crate::ports::{AstParser, OutputExporter};

pub struct ViewUsecase<'a> {
    pub parser: &'a dyn AstParser,
    pub exporter: &'a dyn OutputExporter,
}

impl<'a> ViewUsecase<'a> {
    /// Read `input`, parse it and write the rendered outline to `output`.
    /// Nothing is written unless reading and parsing succeed.
    pub fn run(&self, input: &Path, output: &Path) -> Result<()> {
        let src = file_io::read_source(input)?;
        info!(path = %input.display(), bytes = src.len(), "Read source");

        let root = self.parser.parse(&src)?;
        info!(nodes = root.count_nodes(), "Parsed syntax tree");

        self.exporter.export(&root, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast::AstNode;
    use crate::error::ViewerError;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use tempfile::tempdir;

    struct FixedParser(Option<AstNode>);

    impl AstParser for FixedParser {
        fn parse(&self, _src: &str) -> Result<AstNode> {
            self.0.clone().ok_or(ViewerError::Parse {
                line: 1,
                column: 1,
                message: "expected item".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingExporter {
        calls: RefCell<Vec<(&'static str, PathBuf)>>,
    }

    impl OutputExporter for RecordingExporter {
        fn export(&self, root: &AstNode, path: &Path) -> Result<()> {
            self.calls.borrow_mut().push((root.kind(), path.to_path_buf()));
            Ok(())
        }
    }

    #[test]
    fn test_run_hands_parsed_tree_to_exporter() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("lib.rs");
        std::fs::write(&input, "fn main() {}").unwrap();
        let output = dir.path().join("out.html");

        let parser = FixedParser(Some(AstNode::new("File")));
        let exporter = RecordingExporter::default();
        let usecase = ViewUsecase {
            parser: &parser,
            exporter: &exporter,
        };
        usecase.run(&input, &output).unwrap();

        assert_eq!(*exporter.calls.borrow(), vec![("File", output)]);
    }

    #[test]
    fn test_parse_failure_skips_export() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("lib.rs");
        std::fs::write(&input, "fn (").unwrap();

        let parser = FixedParser(None);
        let exporter = RecordingExporter::default();
        let usecase = ViewUsecase {
            parser: &parser,
            exporter: &exporter,
        };
        let err = usecase.run(&input, &dir.path().join("out.html")).unwrap_err();

        assert!(matches!(err, ViewerError::Parse { .. }));
        assert!(exporter.calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_input_skips_parse_and_export() {
        let dir = tempdir().unwrap();
        let exporter = RecordingExporter::default();
        let usecase = ViewUsecase {
            parser: &FixedParser(Some(AstNode::new("File"))),
            exporter: &exporter,
        };
        let err = usecase
            .run(&dir.path().join("missing.rs"), &dir.path().join("out.html"))
            .unwrap_err();

        assert!(matches!(err, ViewerError::ReadInput { .. }));
        assert!(exporter.calls.borrow().is_empty());
    }
}
