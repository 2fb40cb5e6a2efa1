use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use calc_engine::{Interpreter, InterpreterOptions};
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Interpret a calculator, unit, temperature or date query.
#[derive(Parser, Debug)]
#[command(name = "calc", version, about, long_about = None)]
struct Args {
    /// The query, e.g. `3 + 4 * 2`, `5 kg to lb`, `next friday`.
    /// Read from stdin when omitted.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, allow_negative_numbers = true)]
    query: Vec<String>,

    /// IANA time zone that date phrases are resolved in.
    #[arg(long, default_value = "UTC")]
    tz: String,

    /// Resolve dates against this RFC 3339 instant instead of the clock.
    #[arg(long)]
    now: Option<String>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// JSON file with interpreter options.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log resolver decisions to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Returns whether the query was interpreted.
fn run(args: &Args) -> Result<bool> {
    let options = match &args.config {
        Some(path) => load_options(path)?,
        None => InterpreterOptions::default(),
    };
    let tz: Tz = args
        .tz
        .parse()
        .map_err(|e| anyhow!("unknown time zone '{}': {e}", args.tz))?;
    let now = local_now(args.now.as_deref(), tz)?;
    let query = read_query(&args.query)?;
    debug!(%query, %now, %tz, "interpreting");

    let Some(result) = Interpreter::new(options).interpret(&query, now) else {
        eprintln!("no interpretation for '{query}'");
        return Ok(false);
    };

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{json}");
    } else {
        println!("{}", result.title);
        println!("{}", result.subtitle);
    }
    Ok(true)
}

fn load_options(path: &Path) -> Result<InterpreterOptions> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Wall-clock time in `tz`, either pinned by `--now` or from the system clock.
fn local_now(pinned: Option<&str>, tz: Tz) -> Result<NaiveDateTime> {
    let instant = match pinned {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .with_context(|| format!("Invalid --now timestamp: {text}"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    Ok(instant.with_timezone(&tz).naive_local())
}

fn read_query(words: &[String]) -> Result<String> {
    let query = if words.is_empty() {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read query from stdin")?;
        buf
    } else {
        words.join(" ")
    };

    let query = query.trim().to_string();
    if query.is_empty() {
        bail!("empty query");
    }
    Ok(query)
}
