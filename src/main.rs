//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::process::exit;

use log::{error, info, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

use polypress::container;
use polypress::tools::cli::{check_overwrite, press_opts_init, Mode, PressOpts};

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
    .unwrap();

    let opts = press_opts_init();

    if let Err(e) = run(&opts) {
        error!("{}: {}", opts.input, e);
        exit(1);
    }
    info!("Done.");
}

fn run(opts: &PressOpts) -> polypress::Result<()> {
    let mut source = BufReader::new(File::open(&opts.input)?);
    check_overwrite(opts);
    let mut sink = BufWriter::new(File::create(&opts.output)?);

    match opts.op_mode {
        Mode::Compress => {
            info!("compressing {} -> {}", opts.input, opts.output);
            container::compress(opts.format, &mut source, &mut sink)
        }
        Mode::Extract => {
            info!("extracting {} -> {}", opts.input, opts.output);
            container::decompress(opts.format, &mut source, &mut sink, &opts.input)
        }
    }
}
