//! Per-frame attribute header: the 30 ASCII bytes that precede every
//! sample buffer on the input stream.

use crate::error::{Error, Result};

/// Which of the two frame families an attribute header declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Fisb,
    Adsb,
}

/// Parsed form of the 30-byte `"<secs>.<usec6>.<K>.<ss>.<syncerr>"` header.
///
/// The `secs`/`usec`/`sync_errors` fields are kept as their original
/// token text rather than parsed integers: output lines echo them
/// verbatim (truncated, in `usec`'s case), and re-parsing then
/// re-formatting them risks silently dropping leading zeros a
/// downstream consumer might depend on.
#[derive(Debug, Clone)]
pub struct Attributes {
    pub secs: String,
    pub usec: String,
    pub kind: FrameKind,
    pub signal_strength: f64,
    pub sync_errors: String,
    /// The header bytes exactly as read, for echoing into `#FAILED-…`
    /// lines and error-dump filenames.
    pub raw: [u8; 30],
}

impl Attributes {
    /// Parse a 30-byte header. The layout splits on `.` into at least
    /// five tokens; anything beyond the fifth is ignored.
    pub fn parse(raw: [u8; 30]) -> Result<Self> {
        let text = String::from_utf8_lossy(&raw);
        let trimmed = text.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
        let fields: Vec<&str> = trimmed.splitn(6, '.').collect();
        if fields.len() < 5 {
            return Err(Error::MalformedAttributes(format!(
                "expected at least 5 dot-separated fields, got {trimmed:?}"
            )));
        }
        let kind = match fields[2] {
            "F" => FrameKind::Fisb,
            "A" => FrameKind::Adsb,
            other => {
                return Err(Error::MalformedAttributes(format!(
                    "unknown frame kind {other:?}"
                )));
            }
        };
        let ss: i64 = fields[3].parse().map_err(|_| {
            Error::MalformedAttributes(format!("bad signal-strength field {:?}", fields[3]))
        })?;

        Ok(Self {
            secs: fields[0].to_string(),
            usec: fields[1].to_string(),
            kind,
            signal_strength: (ss as f64) / 1_000_000.0,
            sync_errors: fields[4].to_string(),
            raw,
        })
    }

    /// Expected sample-buffer length in bytes for this frame's kind.
    pub fn payload_len(&self) -> usize {
        match self.kind {
            FrameKind::Fisb => 35340,
            FrameKind::Adsb => 3084,
        }
    }

    /// `<secs>.<first 3 usec digits>`, matching the reference output's
    /// truncated (not rounded) timestamp display.
    pub fn time_str(&self) -> String {
        let usec_prefix = &self.usec[..self.usec.len().min(3)];
        format!("{}.{usec_prefix}", self.secs)
    }

    /// Signal strength as a float seconds representation matches
    /// Python's `str(round(x, 2))`: round to 2 decimals, then drop any
    /// trailing zero in the fractional part (but keep at least one).
    pub fn signal_strength_str(&self) -> String {
        format_rounded(self.signal_strength)
    }

    pub fn raw_str(&self) -> String {
        String::from_utf8_lossy(&self.raw)
            .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_string()
    }
}

fn format_rounded(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    let mut s = format!("{rounded:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.push('0');
    }
    s
}
