//! Output line formatting: success lines for both frame families and
//! the optional `#FAILED-*` diagnostic lines.

use crate::adsb::AdsbResult;
use crate::attributes::Attributes;
use crate::fisb::FisbResult;
use crate::types::BlockOutcome;

/// `+<hex block 0>...<hex block 5>;rs=<sync errors>/<e0>:<e1>:...:<e5>;ss=<signal>;t=<time>`
pub fn fisb_success(attrs: &Attributes, result: &FisbResult) -> String {
    let hex: String = result
        .blocks
        .iter()
        .map(|b| match b {
            BlockOutcome::Decoded { bytes, .. } => hex::encode(bytes),
            BlockOutcome::Undecoded => String::new(),
        })
        .collect();

    let errs: Vec<String> = result
        .blocks
        .iter()
        .map(|b| match b {
            BlockOutcome::Decoded { errors, .. } => format!("{errors:02}"),
            BlockOutcome::Undecoded => "99".to_string(),
        })
        .collect();

    format!(
        "+{hex};rs={}/{};ss={};t={}",
        attrs.sync_errors,
        errs.join(":"),
        attrs.signal_strength_str(),
        attrs.time_str(),
    )
}

/// `-<hex payload>;rs=<sync errors>/<errors>;ss=<signal>;t=<time>`
pub fn adsb_success(attrs: &Attributes, result: &AdsbResult) -> String {
    format!(
        "-{};rs={}/{};ss={};t={}",
        hex::encode(&result.bytes),
        attrs.sync_errors,
        result.errors,
        attrs.signal_strength_str(),
        attrs.time_str(),
    )
}

/// Per-block error-count string used both in the `#FAILED-FIS-B` line
/// and in error-dump filenames: `98` stands in for a block that never
/// decoded.
pub fn fisb_error_suffix(result: &FisbResult) -> String {
    result
        .blocks
        .iter()
        .map(|b| match b {
            BlockOutcome::Decoded { errors, .. } => format!("{errors:02}"),
            BlockOutcome::Undecoded => "98".to_string(),
        })
        .collect::<Vec<_>>()
        .join(":")
}

/// `#FAILED-FIS-B <sync errors>/<e0>:...:<e5> ss=<signal> t=<time> <raw header>`
pub fn fisb_failed(attrs: &Attributes, result: &FisbResult) -> String {
    format!(
        "#FAILED-FIS-B {}/{} ss={} t={} {}",
        attrs.sync_errors,
        fisb_error_suffix(result),
        attrs.signal_strength_str(),
        attrs.time_str(),
        attrs.raw_str(),
    )
}

/// `#FAILED-ADS-B <sync errors>/98 ss=<signal> t=<time> <raw header>`
pub fn adsb_failed(attrs: &Attributes) -> String {
    format!(
        "#FAILED-ADS-B {}/98 ss={} t={} {}",
        attrs.sync_errors,
        attrs.signal_strength_str(),
        attrs.time_str(),
        attrs.raw_str(),
    )
}

/// Thin byte-slice-to-lowercase-hex encoder, matching the single use
/// the reference implementation makes of Python's `.hex()`.
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        use std::fmt::Write;
        let mut out = String::with_capacity(bytes.len() * 2);
        for b in bytes {
            write!(out, "{b:02x}").expect("writing to a String cannot fail");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::FrameKind;

    fn attrs(kind: FrameKind) -> Attributes {
        Attributes {
            secs: "1690000000".into(),
            usec: "123456".into(),
            kind,
            signal_strength: 1.5,
            sync_errors: "2".into(),
            raw: {
                let mut raw = [0u8; 30];
                raw[..7].copy_from_slice(b"1.2.F.3");
                raw
            },
        }
    }

    #[test]
    fn formats_fisb_success_line() {
        let mut blocks: [BlockOutcome; 6] = Default::default();
        for b in blocks.iter_mut() {
            *b = BlockOutcome::Decoded {
                bytes: vec![0xAB, 0xCD],
                errors: 0,
            };
        }
        let line = fisb_success(&attrs(FrameKind::Fisb), &FisbResult { blocks });
        assert!(line.starts_with("+abcdabcdabcdabcdabcdabcd;rs=2/"));
        assert!(line.contains(":00:00:00:00:00"));
        assert!(line.ends_with(";ss=1.5;t=1690000000.123"));
    }

    #[test]
    fn formats_fisb_failure_with_sentinel_errors() {
        let blocks: [BlockOutcome; 6] = Default::default();
        let line = fisb_failed(&attrs(FrameKind::Fisb), &FisbResult { blocks });
        assert!(line.starts_with("#FAILED-FIS-B 2/98:98:98:98:98:98 "));
    }

    #[test]
    fn formats_adsb_success_line() {
        let result = AdsbResult {
            bytes: vec![0x12, 0x34],
            errors: 1,
        };
        let line = adsb_success(&attrs(FrameKind::Adsb), &result);
        assert_eq!(line, "-1234;rs=2/1;ss=1.5;t=1690000000.123");
    }

    #[test]
    fn formats_adsb_failure_line() {
        let line = adsb_failed(&attrs(FrameKind::Adsb));
        assert!(line.starts_with("#FAILED-ADS-B 2/98 ss=1.5 t=1690000000.123 "));
    }
}
