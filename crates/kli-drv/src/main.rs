//! kube-interpreter - CLI entry point.
//!
//! Runs the interpretation pipeline over one root `.kl` file. Exit code
//! 0 on success; any failure prints a single diagnostic line to
//! standard error and exits 1.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kli_drv::Interpreter;
use kli_reg::Registry;

/// Interpreter front-end for `.kl` object-description files.
///
/// Lexes and parses the root file and, wave by wave, every file it
/// reaches through imports and class references.
#[derive(Parser, Debug)]
#[command(name = "kube-interpreter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter front-end for .kl object descriptions", long_about = None)]
struct Cli {
    /// The root .kl file
    path: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true, env = "KLI_VERBOSE")]
    verbose: bool,

    /// Number of worker threads (default: one per core)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Print every processed file's token stream after the run
    #[arg(long)]
    dump_tokens: bool,

    /// Print every processed file's syntax tree after the run
    #[arg(long)]
    dump_ast: bool,

    /// Disable color output
    #[arg(long, env = "KLI_NO_COLOR")]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            // -h/-V print to stdout and succeed; anything else is a
            // usage error.
            if matches!(
                error.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) {
                let _ = error.print();
                return ExitCode::SUCCESS;
            }
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = run(cli) {
        eprintln!("{error:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose, cli.no_color)?;

    let mut interpreter = Interpreter::new(cli.jobs)?;
    tracing::info!(path = %cli.path.display(), "interpreter running over root file");
    interpreter.run(&cli.path)?;

    if cli.dump_tokens {
        dump_tokens(interpreter.registry());
    }
    if cli.dump_ast {
        dump_ast(interpreter.registry());
    }
    Ok(())
}

/// Installs the tracing subscriber: quiet by default, `debug` when
/// verbose, always on standard error so diagnostics and dumps do not
/// interleave.
fn init_logging(verbose: bool, no_color: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|error| anyhow::anyhow!("cannot initialize logging: {error}"))?;
    Ok(())
}

fn dump_tokens(registry: &Registry) {
    for file in 0..registry.file_count() as u16 {
        let stack = registry.stack(file);
        if stack.is_empty() {
            continue;
        }
        println!("== {}", registry.file_path(file).display());
        for lexeme in stack.iter() {
            println!(
                "l{}:c{} '{}'",
                lexeme.token.line,
                lexeme.token.column,
                lexeme.literal_lossy()
            );
        }
    }
}

fn dump_ast(registry: &Registry) {
    for file in 0..registry.file_count() as u16 {
        let Some(ast) = registry.ast(file) else {
            continue;
        };
        println!("== {}", registry.file_path(file).display());
        println!("{ast}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_path() {
        let cli = Cli::try_parse_from(["kube-interpreter", "Root.kl"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("Root.kl"));
        assert!(!cli.verbose);
        assert!(cli.jobs.is_none());
    }

    #[test]
    fn test_cli_parses_flags_before_path() {
        let cli =
            Cli::try_parse_from(["kube-interpreter", "--verbose", "--jobs", "2", "Root.kl"])
                .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.jobs, Some(2));
    }

    #[test]
    fn test_cli_requires_a_path() {
        assert!(Cli::try_parse_from(["kube-interpreter"]).is_err());
    }

    #[test]
    fn test_cli_dump_flags() {
        let cli = Cli::try_parse_from([
            "kube-interpreter",
            "--dump-tokens",
            "--dump-ast",
            "Root.kl",
        ])
        .unwrap();
        assert!(cli.dump_tokens);
        assert!(cli.dump_ast);
    }
}
