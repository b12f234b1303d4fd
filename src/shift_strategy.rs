//! Shift-strategy engine: wraps the slicer/shifter/Reed-Solomon loop
//! with the empirical shift-weight table and a per-frame
//! "last-successful-shift" memo.

use log::trace;

use crate::rs::RsCodec;
use crate::slicer;
use crate::types::BlockOutcome;

/// Shift weights, ordered by empirically observed likelihood of
/// producing a successful decode. `0.0` is always tried first (unless
/// overridden by a `try_first` hint) because it matches the overwhelming
/// majority of well-sampled packets.
pub const SHIFT_TABLE: [f64; 37] = [
    0.0, -0.75, 0.75, -0.50, 0.50, -0.25, 0.25, -0.85, 0.40, 0.65, -0.30, 0.80, -0.05, 0.05,
    -0.90, 0.90, -0.10, 0.10, 0.85, -0.15, 0.15, -0.80, -0.65, -0.35, 0.35, -0.70, 0.70, 0.30,
    -0.40, -0.60, 0.60, -0.20, 0.20, -0.45, 0.45, -0.55, 0.55,
];

/// Outcome of a `try_shift` call plus the shift that produced it, for
/// the caller to use as the next block's `try_first` hint.
pub struct ShiftResult {
    pub outcome: BlockOutcome,
    pub shift_used: Option<f64>,
}

/// Try every shift in `SHIFT_TABLE` (preceded by `try_first` if given)
/// against one block/packet's on-time and neighbour samples, packing
/// and Reed-Solomon-decoding each candidate until one succeeds.
///
/// `apply_fixed_bits` forces the FIS-B block-0 fixed-bit override onto
/// each candidate before slicing. `prefixes`, if non-empty, additionally
/// tries overwriting the packed bytes' first 6 bytes with each
/// candidate in turn (FIS-B block 0's known-prefix override) — both
/// tricks may be combined, matching the reference behaviour.
pub fn try_shift(
    rs: &RsCodec,
    on_time: &[i32],
    before: &[i32],
    after: &[i32],
    try_first: Option<f64>,
    apply_fixed_bits: bool,
    prefixes: &[[u8; 6]],
) -> ShiftResult {
    if let Some(w) = try_first {
        if let Some(result) = attempt(rs, on_time, before, after, w, apply_fixed_bits, prefixes) {
            trace!("shift-strategy: try_first {w} succeeded");
            return ShiftResult {
                outcome: result,
                shift_used: Some(w),
            };
        }
    }

    for &w in SHIFT_TABLE.iter() {
        if Some(w) == try_first {
            continue;
        }
        if let Some(result) = attempt(rs, on_time, before, after, w, apply_fixed_bits, prefixes) {
            trace!("shift-strategy: shift {w} succeeded");
            return ShiftResult {
                outcome: result,
                shift_used: Some(w),
            };
        }
    }

    ShiftResult {
        outcome: BlockOutcome::Undecoded,
        shift_used: None,
    }
}

fn attempt(
    rs: &RsCodec,
    on_time: &[i32],
    before: &[i32],
    after: &[i32],
    w: f64,
    apply_fixed_bits: bool,
    prefixes: &[[u8; 6]],
) -> Option<BlockOutcome> {
    let mut shifted = slicer::shift(on_time, before, after, w);
    if apply_fixed_bits {
        slicer::apply_block_zero_fixed_bits(&mut shifted);
    }
    let bytes = slicer::hard_slice(&shifted);

    if prefixes.is_empty() {
        let (corrected, errors) = rs.decode(&bytes)?;
        return Some(BlockOutcome::Decoded {
            bytes: corrected,
            errors: errors as u8,
        });
    }

    for prefix in prefixes {
        let mut candidate = bytes.clone();
        candidate[0..6].copy_from_slice(prefix);
        if let Some((corrected, errors)) = rs.decode(&candidate) {
            return Some(BlockOutcome::Decoded {
                bytes: corrected,
                errors: errors as u8,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rs::RsCodec;

    #[test]
    fn shift_table_has_37_entries_starting_at_zero() {
        assert_eq!(SHIFT_TABLE.len(), 37);
        assert_eq!(SHIFT_TABLE[0], 0.0);
    }

    #[test]
    fn decodes_clean_block_on_first_shift() {
        let rs = RsCodec::fisb();
        let data = vec![0xABu8; rs.k()];
        let word = rs.encode(&data);
        let on_time: Vec<i32> = word
            .iter()
            .flat_map(|&byte| (0..8).map(move |b| if byte & (1 << (7 - b)) != 0 { 1000 } else { -1000 }))
            .collect();
        let before = on_time.clone();
        let after = on_time.clone();
        let result = try_shift(&rs, &on_time, &before, &after, None, false, &[]);
        match result.outcome {
            BlockOutcome::Decoded { bytes, errors } => {
                assert_eq!(bytes, data);
                assert_eq!(errors, 0);
            }
            BlockOutcome::Undecoded => panic!("expected a decode"),
        }
        assert_eq!(result.shift_used, Some(0.0));
    }
}
