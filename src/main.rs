// Command-line entry point for AST Viewer.

use std::path::PathBuf;

use anyhow::Context;
use ast_viewer::application::ViewUsecase;
use ast_viewer::domain::schema::SchemaRegistry;
use ast_viewer::infrastructure::config::ViewerConfig;
use ast_viewer::infrastructure::logging::init_tracing;
use ast_viewer::infrastructure::SynAstParser;
use ast_viewer::ports::html_exporter::HtmlExporter;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Rust source file to render
    input: PathBuf,

    /// HTML file to write
    output: PathBuf,

    /// TOML file with page settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = ViewerConfig::load(cli.config.as_deref())?;
    let exporter = HtmlExporter::new(SchemaRegistry::rust(), config.page);

    let usecase = ViewUsecase {
        parser: &SynAstParser,
        exporter: &exporter,
    };
    usecase.run(&cli.input, &cli.output).with_context(|| {
        format!(
            "Failed to render {} into {}",
            cli.input.display(),
            cli.output.display()
        )
    })?;

    info!(output = %cli.output.display(), "Tree view written");
    Ok(())
}
