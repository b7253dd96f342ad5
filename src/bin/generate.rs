//! Avro Protocol Generation CLI
//!
//! Thin orchestration shell: one translation per input model, output written
//! beneath a single generated-resource root. Any failure exits non-zero so a
//! surrounding build breaks.

use std::path::PathBuf;

use clap::Parser;
use ecore_avro::model::loader;
use ecore_avro::{translate, Generator};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ecore-avro")]
#[command(about = "Generate Avro protocol declarations from meta-model files")]
struct Cli {
    /// Meta-model input files (JSON)
    #[arg(required = true)]
    models: Vec<PathBuf>,

    /// Output root for generated .avpr files
    #[arg(short, long, default_value = "generated/avro")]
    out: PathBuf,

    /// Translate and validate without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let generator = Generator::new(cli.out.clone());

    for model_path in &cli.models {
        let model = loader::load_from_file(model_path)?;

        if cli.dry_run {
            let protocol = translate(&model)?;
            println!(
                "🔍 {} → {} ({} types, dry run)",
                model_path.display(),
                generator.protocol_path(&protocol).display(),
                protocol.types.len()
            );
            continue;
        }

        let generated = generator.generate(&model)?;
        println!("📦 {} → {}", model_path.display(), generated.path.display());
    }

    if !cli.dry_run {
        println!("✅ Generated resources rooted at {}", cli.out.display());
    }
    Ok(())
}
