//! Sheetcalc CLI - run edit scripts against a sheet

mod script;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use script::{Command, Interpreter};

#[derive(Parser)]
#[command(name = "sheetcalc")]
#[command(author, version, about = "Spreadsheet calculation tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an edit script and print the resulting sheet
    ///
    /// Exits with an error status if any command failed.
    Run {
        /// Script file (default: stdin)
        script: Option<PathBuf>,

        /// Stop at the first failing command
        #[arg(long)]
        strict: bool,

        /// Print cell texts instead of values at the end
        #[arg(long)]
        texts: bool,

        /// Skip printing the sheet at the end
        #[arg(short, long)]
        quiet: bool,
    },

    /// Check a script for syntax errors without running it
    Check {
        /// Script file
        script: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            script,
            strict,
            texts,
            quiet,
        } => run(script.as_deref(), strict, texts, quiet),
        Commands::Check { script } => check(&script),
    }
}

fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display())),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read script from stdin")?;
            Ok(source)
        }
    }
}

fn run(path: Option<&Path>, strict: bool, texts: bool, quiet: bool) -> Result<()> {
    let source = read_script(path)?;

    let mut interp = Interpreter::new(io::stdout().lock(), strict);
    interp.run(&source)?;

    if !quiet {
        interp.execute(if texts { Command::Texts } else { Command::Values })?;
    }

    let failures = interp.failures();
    interp.into_output().flush()?;

    if failures > 0 {
        bail!("{} command(s) failed", failures);
    }
    Ok(())
}

fn check(path: &Path) -> Result<()> {
    let source = read_script(Some(path))?;

    let mut errors = 0;
    for (index, line) in source.lines().enumerate() {
        if let Err(err) = script::parse_line(line) {
            eprintln!("line {}: {:#}", index + 1, err);
            errors += 1;
        }
    }

    if errors > 0 {
        bail!("{} invalid line(s) in '{}'", errors, path.display());
    }
    println!("OK");
    Ok(())
}
