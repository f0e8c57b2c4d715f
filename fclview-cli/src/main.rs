use std::collections::VecDeque;
use std::error::Error;
use std::fs;
use std::io::{self, Write};

use fclview::snapshot::Snapshot;
use fclview::{NamingConvention, PrinterRegistry};
use tracing_subscriber::EnvFilter;

mod env;
mod render;

/// Number of elements printed per array if neither `--limit` nor
/// `FCLVIEW_LIMIT` is given.
const DEFAULT_LIMIT: usize = 200;

#[derive(Debug, PartialEq)]
struct Args {
    /// Snapshot file to load.
    snapshot: String,

    /// Names of values to print. If empty, all values are printed.
    names: Vec<String>,

    /// Maximum number of elements to print per array.
    limit: Option<usize>,

    /// JSON file describing the naming convention of the array library.
    convention: Option<String>,

    /// Enable debug logging.
    verbose: bool,
}

fn parse_args(mut parser: lexopt::Parser) -> Result<Args, lexopt::Error> {
    use lexopt::prelude::*;

    let mut values = VecDeque::new();
    let mut limit = None;
    let mut convention = None;
    let mut verbose = false;

    while let Some(arg) = parser.next()? {
        match arg {
            Value(val) => values.push_back(val.string()?),
            Short('l') | Long("limit") => {
                let value = parser.value()?.string()?;
                limit = Some(
                    env::str_as_limit(&value)
                        .ok_or_else(|| format!("invalid element limit \"{}\"", value))?,
                );
            }
            Short('c') | Long("convention") => convention = Some(parser.value()?.string()?),
            Short('v') | Long("verbose") => verbose = true,
            Short('h') | Long("help") => {
                println!(
                    "Print ObjexxFCL arrays stored in a program snapshot.

Usage: {bin_name} [OPTIONS] <snapshot> [<name>...]

Arguments:
  <snapshot>  JSON snapshot file
  <name>      Names of values to print. Defaults to all values.

Options:
  -l, --limit <N>        Maximum number of elements to print per array
                         (\"unlimited\" or 0 for no limit)
  -c, --convention <F>   JSON file with field names of the array library
  -v, --verbose          Enable verbose logging
  -h, --help             Print help

Environment:
  FCLVIEW_LIMIT  Default for --limit
  FCLVIEW_LOG    Log filter, eg. \"fclview=trace\"
",
                    bin_name = parser.bin_name().unwrap_or("fclview")
                );
                std::process::exit(0);
            }
            _ => return Err(arg.unexpected()),
        }
    }

    let snapshot = values.pop_front().ok_or("missing `<snapshot>` arg")?;

    Ok(Args {
        snapshot,
        names: values.into(),
        limit,
        convention,
        verbose,
    })
}

/// Install the log subscriber. `FCLVIEW_LOG` takes precedence over the
/// `--verbose` flag.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("FCLVIEW_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_convention(path: Option<&str>) -> Result<NamingConvention, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(NamingConvention::default());
    };
    let json = fs::read_to_string(path)
        .map_err(|err| format!("failed to read convention file \"{}\": {}", path, err))?;
    let convention = NamingConvention::from_json(&json)
        .map_err(|err| format!("invalid convention file \"{}\": {}", path, err))?;
    Ok(convention)
}

/// Print ObjexxFCL arrays captured in a JSON snapshot.
///
/// This is the command-line counterpart of the debugger integration: it
/// builds the printer registry once, then renders each selected value with
/// the array printer or, for other values, the generic rendering.
fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args(lexopt::Parser::from_env())?;
    init_logging(args.verbose);

    let convention = load_convention(args.convention.as_deref())?;
    let snapshot = Snapshot::from_file(&args.snapshot)
        .map_err(|err| format!("failed to load snapshot \"{}\": {}", args.snapshot, err))?;
    let registry = PrinterRegistry::with_convention(convention);
    let limit = args
        .limit
        .unwrap_or_else(|| env::env_limit("FCLVIEW_LIMIT", DEFAULT_LIMIT));

    let mut selected = Vec::with_capacity(args.names.len());
    for name in &args.names {
        let value = snapshot
            .root(name)
            .ok_or_else(|| format!("no value named \"{}\" in snapshot", name))?;
        selected.push((name.as_str(), value));
    }

    let mut out = io::stdout().lock();
    if selected.is_empty() {
        render::render_all(&mut out, &registry, &snapshot, snapshot.roots(), limit)?;
    } else {
        render::render_all(&mut out, &registry, &snapshot, selected, limit)?;
    }
    out.flush()?;

    Ok(())
}
