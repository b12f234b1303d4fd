//! The main frame-read loop: pulls attribute-header-plus-sample-buffer
//! frames off a stream, dispatches each to the FIS-B or ADS-B recovery
//! pipeline, prints successes, and optionally dumps failures for later
//! reprocessing.

use std::io::{Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};

use crate::adsb;
use crate::attributes::{Attributes, FrameKind};
use crate::config::Config;
use crate::error::Result;
use crate::fisb;
use crate::format;
use crate::rs::RsCodec;

/// The three fixed Reed-Solomon instances needed across both frame
/// families.
pub struct Codecs {
    pub fisb: RsCodec,
    pub adsb_short: RsCodec,
    pub adsb_long: RsCodec,
}

impl Default for Codecs {
    fn default() -> Self {
        Self {
            fisb: RsCodec::fisb(),
            adsb_short: RsCodec::adsb_short(),
            adsb_long: RsCodec::adsb_long(),
        }
    }
}

/// Tracks the weakest signal strength seen so far, independently for
/// each of the three message shapes, and logs whenever a new minimum
/// is set. Matches the reference implementation's "lowest levels"
/// diagnostic, which has caught receiver gain regressions in the past.
#[derive(Default)]
struct LevelTracker {
    fisb: Option<f64>,
    adsb_short: Option<f64>,
    adsb_long: Option<f64>,
}

impl LevelTracker {
    fn observe(&mut self, label: &str, ss: f64) {
        let slot = match label {
            "FIS-B" => &mut self.fisb,
            "ADS-B short" => &mut self.adsb_short,
            _ => &mut self.adsb_long,
        };
        if slot.is_none_or(|cur| ss < cur) {
            *slot = Some(ss);
            info!("new lowest {label} signal level: {ss}");
        }
    }
}

/// Read exactly `buf.len()` bytes, unless the stream is at a clean
/// boundary (zero bytes available) before the first byte, in which
/// case this returns `Ok(false)` for "end of stream".
fn read_frame_start<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<bool> {
    let n = input.read(&mut buf[..1])?;
    if n == 0 {
        return Ok(false);
    }
    input.read_exact(&mut buf[1..])?;
    Ok(true)
}

fn bytes_to_i32_le(bytes: &[u8]) -> Vec<i32> {
    bytes
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn dump_error(config: &Config, attrs: &Attributes, payload: &[u8], err_suffix: Option<&str>) -> Result<()> {
    let Some(dir) = &config.error_dump_directory else {
        return Ok(());
    };
    let mut name = attrs.raw_str().replace('/', "_");
    if let Some(suffix) = err_suffix {
        name.push('.');
        name.push_str(suffix);
    }
    name.push_str(".i32");
    std::fs::write(dir.join(name), payload)?;
    Ok(())
}

/// Run the decode loop over `input` until clean end-of-stream or
/// `cancel` is set, writing successful decodes to `output`.
pub fn run<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    codecs: &Codecs,
    config: &Config,
    cancel: &AtomicBool,
) -> Result<()> {
    let mut levels = LevelTracker::default();

    loop {
        if cancel.load(Ordering::Relaxed) {
            info!("cancellation requested, stopping");
            return Ok(());
        }

        let mut header = [0u8; 30];
        if !read_frame_start(&mut input, &mut header)? {
            return Ok(());
        }

        let attrs = match Attributes::parse(header) {
            Ok(a) => a,
            Err(e) => {
                warn!("malformed attribute header, skipping frame: {e}");
                continue;
            }
        };

        let mut payload = vec![0u8; attrs.payload_len()];
        input.read_exact(&mut payload)?;
        let samples = bytes_to_i32_le(&payload);

        match attrs.kind {
            FrameKind::Fisb => {
                let result = fisb::process(&samples, &codecs.fisb, config);
                if config.show_lowest_levels {
                    levels.observe("FIS-B", attrs.signal_strength);
                }
                if result.success() {
                    writeln!(output, "{}", format::fisb_success(&attrs, &result))?;
                    output.flush()?;
                } else {
                    if config.show_failed_fisb {
                        eprintln!("{}", format::fisb_failed(&attrs, &result));
                    }
                    if config.dumps_errors() {
                        dump_error(config, &attrs, &payload, Some(&format::fisb_error_suffix(&result)))?;
                    }
                }
            }
            FrameKind::Adsb => {
                let result = adsb::process(&samples, &codecs.adsb_short, &codecs.adsb_long);
                match result {
                    Some(r) => {
                        if config.show_lowest_levels {
                            let label = if r.bytes.len() == codecs.adsb_short.k() {
                                "ADS-B short"
                            } else {
                                "ADS-B long"
                            };
                            levels.observe(label, attrs.signal_strength);
                        }
                        writeln!(output, "{}", format::adsb_success(&attrs, &r))?;
                        output.flush()?;
                    }
                    None => {
                        if config.show_failed_adsb {
                            eprintln!("{}", format::adsb_failed(&attrs));
                        }
                        if config.dumps_errors() {
                            dump_error(config, &attrs, &payload, None)?;
                        }
                    }
                }
            }
        }
    }
}

/// Replay previously dumped `*.i32` files from `dir`: each filename
/// carries the original attribute header (and, for FIS-B, the
/// per-block error suffix, which is ignored on replay since the
/// decode is re-run from scratch). Used by the `--re` batch mode,
/// which always shows failures and never re-dumps them.
pub fn reprocess(dir: &Path, codecs: &Codecs, config: &Config, mut output: impl Write) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "i32"))
        .collect();
    entries.sort();

    for path in entries {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let header_text = stem.split('.').take(5).collect::<Vec<_>>().join(".");
        let mut header = [0u8; 30];
        let bytes = header_text.as_bytes();
        let len = bytes.len().min(30);
        header[..len].copy_from_slice(&bytes[..len]);

        let attrs = match Attributes::parse(header) {
            Ok(a) => a,
            Err(e) => {
                warn!("skipping unparseable dump file {}: {e}", path.display());
                continue;
            }
        };

        let payload = std::fs::read(&path)?;
        let samples = bytes_to_i32_le(&payload);

        match attrs.kind {
            FrameKind::Fisb => {
                let result = fisb::process(&samples, &codecs.fisb, config);
                if result.success() {
                    writeln!(output, "{}", format::fisb_success(&attrs, &result))?;
                } else {
                    eprintln!("{}", format::fisb_failed(&attrs, &result));
                }
            }
            FrameKind::Adsb => match adsb::process(&samples, &codecs.adsb_short, &codecs.adsb_long) {
                Some(r) => writeln!(output, "{}", format::adsb_success(&attrs, &r))?,
                None => eprintln!("{}", format::adsb_failed(&attrs)),
            },
        }
    }
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_eof_before_any_header_returns_ok() {
        let codecs = Codecs::default();
        let config = Config::default();
        let cancel = AtomicBool::new(false);
        let input: &[u8] = &[];
        let mut output = Vec::new();
        assert!(run(input, &mut output, &codecs, &config, &cancel).is_ok());
        assert!(output.is_empty());
    }

    #[test]
    fn cancellation_stops_the_loop_immediately() {
        let codecs = Codecs::default();
        let config = Config::default();
        let cancel = AtomicBool::new(true);
        // Data that would otherwise hang waiting for a full header.
        let input: &[u8] = b"not a real frame at all";
        let mut output = Vec::new();
        assert!(run(input, &mut output, &codecs, &config, &cancel).is_ok());
        assert!(output.is_empty());
    }
}
