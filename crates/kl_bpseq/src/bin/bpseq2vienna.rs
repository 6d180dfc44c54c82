use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use clap::Parser;
use clap::ValueEnum;
use env_logger::Env;
use log::info;

use kl_bpseq::BpseqOptions;
use kl_bpseq::BpseqRecord;
use kl_structure::PseudoknotRule;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Rule {
    /// Keep pairs in order, drop those crossing an earlier pair.
    First,
    /// Drop the pairs with the most crossings first.
    Majority,
    /// Keep pseudoknots (vienna output fails on knotted structures).
    Keep,
}

impl From<Rule> for Option<PseudoknotRule> {
    fn from(rule: Rule) -> Self {
        match rule {
            Rule::First => Some(PseudoknotRule::First),
            Rule::Majority => Some(PseudoknotRule::Majority),
            Rule::Keep => None,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Header, sequence and dot-bracket lines.
    Vienna,
    /// One 0-based `i j` line per pair.
    Pairs,
    /// The full record as JSON.
    Json,
}

/// Convert BPSEQ files to dot-bracket notation.
#[derive(Debug, Parser)]
#[command(name = "bpseq2vienna", version, about)]
struct Cli {
    /// How to remove pseudoknots.
    #[arg(short, long, value_enum, default_value_t = Rule::Majority)]
    rule: Rule,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Vienna)]
    format: Format,

    /// BPSEQ input files.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn convert(path: &Path, options: &BpseqOptions, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let record = BpseqRecord::from_path(path, options)?;
    info!("{}: {} residues, {} pairs.", path.display(), record.len(), record.pairs.len());

    match format {
        Format::Vienna => {
            let vienna = record.to_vienna()?;
            let name = match &record.header.filename {
                Some(name) => name.clone(),
                None => path.display().to_string(),
            };
            println!(">{name}");
            println!("{}", record.sequence);
            println!("{vienna}");
        }
        Format::Pairs => {
            for (i, j) in record.pairs.to_tuples() {
                println!("{i} {j}");
            }
        }
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let options = BpseqOptions { pseudoknots: cli.rule.into() };

    let mut failed = false;
    for path in &cli.files {
        if let Err(e) = convert(path, &options, cli.format) {
            eprintln!("{}: {e}", path.display());
            failed = true;
        }
    }
    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
