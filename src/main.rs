//! cmin CLI: read one C file, rename and minify it, write the result.
//!
//! Logging: set `RUST_LOG=cmin=debug` to see per-symbol rename decisions
//! on stderr, `RUST_LOG=cmin=trace` to see individual edits.

use std::io::Write;
use std::path::PathBuf;
use std::process::exit;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cmin::{minify_source, Error, MinifyOptions};

#[derive(Parser)]
#[command(name = "cmin")]
#[command(about = "Minify a single-file C translation unit")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Rewrite the input file in place.
    #[arg(short = 'i')]
    in_place: bool,

    /// Exclude NAME from function renaming (repeatable). The entry point
    /// is always excluded.
    #[arg(short = 'f', value_name = "NAME")]
    ignore: Vec<String>,

    /// Write output to OUTFILE instead of standard output.
    #[arg(short = 'o', value_name = "OUTFILE")]
    output: Option<PathBuf>,

    /// Print the original-to-assigned rename table as JSON to stderr.
    #[arg(long)]
    dump_renames: bool,

    /// Input C source file.
    input: PathBuf,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            // clap routes help to stdout and usage errors to stderr.
            let _ = err.print();
            exit(code);
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cmin=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(err) = run(cli) {
        eprintln!("cmin: {err}");
        exit(err.exit_code());
    }
}

fn run(cli: Cli) -> cmin::Result<()> {
    let source = std::fs::read_to_string(&cli.input).map_err(|e| Error::Input {
        path: cli.input.clone(),
        source: e,
    })?;

    let options = MinifyOptions {
        ignores: cli.ignore.clone(),
    };
    let result = minify_source(&source, &options)?;

    if cli.dump_renames {
        // Diagnostic only; never mixed into the minified output stream.
        let json = serde_json::to_string_pretty(&result.renames).unwrap_or_default();
        eprintln!("{json}");
    }

    let destination = if cli.in_place {
        Some(cli.input.clone())
    } else {
        cli.output.clone()
    };
    match destination {
        Some(path) => std::fs::write(&path, &result.output).map_err(|e| Error::Output {
            path,
            source: e,
        })?,
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(result.output.as_bytes())
                .map_err(|e| Error::Output {
                    path: PathBuf::from("<stdout>"),
                    source: e,
                })?;
        }
    }
    Ok(())
}
