// src/main.rs
//
// tagmend - repair whitespace damage in HTML-like markup inside a generated source file
//
// - Reads one UTF-8 file, runs the ordered rule table from `rules`, writes the result.
// - Fixes `< div`, `</ span`, `"x" >`, `class = "foo"`, `${ name }` and a few known
//   hyphenated class fragments (`badge - `, `status - `, ...).
// - Prints exactly one status line on stdout: "File updated successfully." or
//   "Error: <description>". Failures are reported, not propagated; the exit code
//   is 0 either way.
// - Nothing is written unless the read succeeded.
// - Diagnostics (per-rule hit counts) go through `log`; enable with RUST_LOG=debug.
//
// Usage:
//   tagmend <input> [output]
// Default: overwrite input.

mod rules;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use rules::Normalizer;

/// CLI arguments
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// File to normalize
    input: PathBuf,

    /// Output file (default: overwrite input)
    output: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => println!("File updated successfully."),
        Err(err) => println!("Error: {err:#}"),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let normalizer = Normalizer::new().context("failed to compile normalization rules")?;
    log::trace!(
        "rule order: {:?}",
        normalizer.rules().iter().map(|r| r.label()).collect::<Vec<_>>()
    );

    let src = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let (out, report) = normalizer.normalize(&src);
    for (label, hits) in report.changed() {
        log::debug!("rule {:?}: {} substitution(s)", label, hits);
    }
    log::info!(
        "{}: {} substitution(s), {} -> {} bytes",
        cli.input.display(),
        report.total(),
        src.len(),
        out.len()
    );

    let out_path = cli.output.as_ref().unwrap_or(&cli.input);
    fs::write(out_path, out).with_context(|| format!("failed to write {}", out_path.display()))?;
    Ok(())
}
