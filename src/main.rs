/*! `uat978dec`: error-correcting decoder for 978 MHz UAT FIS-B Ground
Uplink and ADS-B frames, read as attribute-header-plus-soft-sample
buffers from stdin (or a directory of previously dumped error
buffers), and printed as recovered hex frames on stdout.
*/
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use clap::Parser;

use uat978rs::config::Config;
use uat978rs::dispatcher::{self, Codecs};
use uat978rs::error::Error;

#[derive(clap::Parser, Debug)]
#[command(version, about)]
struct Opt {
    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "Increase verbosity (repeatable)")]
    verbose: u8,

    #[arg(long = "ff", help = "Print #FAILED-FIS-B lines for undecoded frames")]
    show_failed_fisb: bool,

    #[arg(long = "fa", help = "Print #FAILED-ADS-B lines for undecoded frames")]
    show_failed_adsb: bool,

    #[arg(long = "ll", help = "Log new lowest signal levels seen, per frame shape")]
    show_lowest_levels: bool,

    #[arg(long = "nobzfb", help = "Disable the FIS-B block-0 fixed-bit override")]
    no_block_zero_fixed_bits: bool,

    #[arg(long = "noftz", help = "Disable trailing-zero repair")]
    no_fix_trailing_zeros: bool,

    #[arg(
        long = "f6b",
        value_name = "HEX12",
        help = "Known 6-byte FIS-B block-0 prefix to try, as 12 hex digits (repeatable)"
    )]
    first_six_bytes: Vec<String>,

    #[arg(long = "se", value_name = "DIR", help = "Directory to dump undecoded frames to")]
    error_dump_directory: Option<std::path::PathBuf>,

    #[arg(long = "re", value_name = "DIR", help = "Reprocess previously dumped frames from this directory")]
    reprocess_directory: Option<std::path::PathBuf>,
}

fn parse_prefix(s: &str) -> Result<[u8; 6], Error> {
    if s.len() != 12 {
        return Err(Error::InvalidPrefix(s.to_string(), "expected 12 hex digits".to_string()));
    }
    let mut out = [0u8; 6];
    for i in 0..6 {
        out[i] = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
            .map_err(|e| Error::InvalidPrefix(s.to_string(), e.to_string()))?;
    }
    Ok(out)
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    stderrlog::new()
        .module(module_path!())
        .module("uat978rs")
        .quiet(false)
        .verbosity(opt.verbose as usize)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let mut first_six_bytes = Vec::with_capacity(opt.first_six_bytes.len());
    for s in &opt.first_six_bytes {
        first_six_bytes.push(parse_prefix(s)?);
    }

    let reprocessing = opt.reprocess_directory.is_some();
    let config = Config {
        show_failed_fisb: opt.show_failed_fisb || reprocessing,
        show_failed_adsb: opt.show_failed_adsb || reprocessing,
        show_lowest_levels: opt.show_lowest_levels,
        block_zero_fixed_bits: !opt.no_block_zero_fixed_bits,
        fix_trailing_zeros: !opt.no_fix_trailing_zeros,
        first_six_bytes,
        error_dump_directory: opt.error_dump_directory,
        reprocess_directory: opt.reprocess_directory.clone(),
    };

    let codecs = Codecs::default();

    if let Some(dir) = &opt.reprocess_directory {
        return dispatcher::reprocess(dir, &codecs, &config, std::io::stdout().lock()).map_err(Into::into);
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_cancel = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("Received Ctrl+C, finishing current frame and exiting…");
        handler_cancel.store(true, Ordering::Relaxed);
    })?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    dispatcher::run(stdin.lock(), stdout.lock(), &codecs, &config, &cancel)?;
    Ok(())
}
