//! Command line interpretation - uses the external CLAP crate.

use std::io::IsTerminal;
use std::process::exit;

use clap::Parser;
use log::warn;

use crate::container::Format;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compress or Extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Extract,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "polypress",
    about = "A family of chunked lossless file compressors",
    disable_version_flag = true
)]
struct Args {
    /// Container format: lzb, lza, rlh, bwlzhd, bwlz3 or mra
    format: Option<String>,

    /// Extract (decompress) the input
    #[arg(short = 'e')]
    extract: bool,

    /// Input file to process
    #[arg(short = 'i')]
    input: Option<String>,

    /// Output file (defaults to the input plus or minus the format extension)
    #[arg(short = 'o')]
    output: Option<String>,

    /// Overwrite an existing output file without asking
    #[arg(short = 'r')]
    overwrite: bool,

    /// Display version information
    #[arg(short = 'v')]
    version: bool,
}

#[derive(Debug)]
pub struct PressOpts {
    pub format: Format,
    pub op_mode: Mode,
    /// Name of the file to read for input
    pub input: String,
    /// Where the result lands
    pub output: String,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
}

/// Parse the command line into our options, exiting with the documented
/// status codes on user errors: 1 for an unknown format, 2 for a missing
/// input file.
pub fn press_opts_init() -> PressOpts {
    let args = Args::parse();

    if args.version {
        println!("polypress {}", VERSION);
        exit(0);
    }

    let format = match args.format.as_deref().and_then(Format::from_name) {
        Some(format) => format,
        None => {
            eprintln!(
                "polypress: unknown format {:?} (expected lzb, lza, rlh, bwlzhd, bwlz3 or mra)",
                args.format.unwrap_or_default()
            );
            exit(1);
        }
    };

    let input = match args.input {
        Some(input) => input,
        None => {
            eprintln!("polypress: no input file given (-i <input>)");
            exit(2);
        }
    };

    let suffix = format!(".{}", format.name());
    let op_mode = if args.extract || input.ends_with(&suffix) {
        Mode::Extract
    } else {
        Mode::Compress
    };

    let output = args.output.unwrap_or_else(|| match op_mode {
        Mode::Compress => format!("{}{}", input, suffix),
        Mode::Extract => match input.strip_suffix(&suffix) {
            Some(stem) => stem.to_string(),
            None => format!("{}.out", input),
        },
    });

    PressOpts {
        format,
        op_mode,
        input,
        output,
        force_overwrite: args.overwrite,
    }
}

/// Refuse to clobber an existing output file unless -r was given or the
/// user approves at a terminal. Exits 17 when the user declines.
pub fn check_overwrite(opts: &PressOpts) {
    if opts.force_overwrite || !std::path::Path::new(&opts.output).exists() {
        return;
    }
    if !std::io::stdin().is_terminal() {
        warn!("{} exists and -r was not given", opts.output);
        exit(17);
    }
    eprint!("polypress: overwrite {}? [y/N] ", opts.output);
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err()
        || !matches!(answer.trim(), "y" | "Y" | "yes")
    {
        eprintln!("polypress: not overwritten");
        exit(17);
    }
}
