// src/main.rs
//
// chatmarkup — print the segments a chat message would be sent as
//
// - Default: input is markup (b/i/u/a/br, character references, bare URLs).
// - --plain: input is plain text; only line splitting applies.
// - Logs go to stderr; RUST_LOG overrides the -v level.
//
// CLI flags:
//   --plain          : treat input as plain text
//   --no-autolink    : do not turn bare URLs into links
//   --format FORMAT  : text (default) or json
//   -v / -vv         : debug / trace logging
// Input defaults to stdin, output to stdout.

use chatmarkup::render::{render_json, render_text};
use chatmarkup::{text_to_segments, MarkupOptions, MarkupParser, Result, Segment};
use clap::{ArgAction, Parser, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Treat input as plain text (line splitting only)
    #[arg(long, action = ArgAction::SetTrue)]
    plain: bool,

    /// Do not wrap bare http(s) URLs in links
    #[arg(long = "no-autolink", action = ArgAction::SetTrue)]
    no_autolink: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Input file (default: stdin)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl Format {
    fn render(self, segments: &[Segment]) -> Result<String> {
        match self {
            Format::Text => Ok(render_text(segments)),
            Format::Json => render_json(segments),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("chatmarkup: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let src = match &cli.input {
        Some(path) => fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    let text = String::from_utf8(src)?;

    let segments = if cli.plain {
        text_to_segments(&text)
    } else {
        let options = MarkupOptions {
            autolink: !cli.no_autolink,
        };
        MarkupParser::new().options(options).parse(&text)
    };
    tracing::debug!(count = segments.len(), "built segments");

    let out = cli.format.render(&segments)?;
    match &cli.output {
        Some(path) => fs::write(path, out)?,
        None => io::stdout().write_all(out.as_bytes())?,
    }
    Ok(())
}
