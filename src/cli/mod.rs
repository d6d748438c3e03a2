// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All work is delegated to Layer 2 (application).
//
//   1. `build-index` — scan CLEVR annotations, persist the index
//   2. `inspect`     — open a split and print one decoded item
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{BuildIndexArgs, Commands, InspectArgs};

use vqa_data::application::config::DataConfig;

#[derive(Parser, Debug)]
#[command(
    name = "vqa-data",
    version,
    about = "Build and inspect CLEVR / Sort-of-CLEVR question-answering indexes."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::BuildIndex(args) => run_build_index(args),
            Commands::Inspect(args)    => run_inspect(args),
        }
    }
}

fn run_build_index(args: BuildIndexArgs) -> Result<()> {
    use vqa_data::application::build_index_use_case::BuildIndexUseCase;

    let cfg = DataConfig { data_directory: args.data_directory, ..DataConfig::default() };
    let summary = BuildIndexUseCase::new(cfg.clevr_root(), args.splits).execute()?;

    println!("Index written to {}", cfg.clevr_root().display());
    println!("  question vocabulary: {}", summary.question_vocab_size);
    println!("  answer vocabulary:   {}", summary.answer_vocab_size);
    for (split, count) in &summary.examples_per_split {
        println!("  {split:<7} {count} examples");
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use vqa_data::application::inspect_use_case::InspectUseCase;

    let cfg    = DataConfig::from(&args);
    let report = InspectUseCase::new(cfg, args.split).execute(args.index)?;

    println!("{} / {}: {} examples", report.dataset, report.split, report.len);
    match report.c_size {
        Some(c) => println!("  sizes: q={} a={} c={}", report.q_size, report.a_size, c),
        None    => println!("  sizes: q={} a={}", report.q_size, report.a_size),
    }
    println!("  item {}", report.index);
    println!("    question: {}", report.question);
    println!("    answer:   {}", report.answer);
    println!("    image:    {:?}", report.image_shape);
    Ok(())
}
