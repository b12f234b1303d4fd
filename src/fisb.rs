//! FIS-B Ground Uplink frame recovery: orchestrates the six interleaved
//! blocks, the block-0 early-terminate optimisation, block-zero
//! fixed-bit/known-prefix tricks, and trailing-zero repair.

use log::{debug, warn};

use crate::config::Config;
use crate::rs::RsCodec;
use crate::shift_strategy::try_shift;
use crate::slicer;
use crate::types::{BlockOutcome, FisbSamples};

/// Result of decoding one FIS-B frame: one outcome per block.
pub struct FisbResult {
    pub blocks: [BlockOutcome; 6],
}

impl FisbResult {
    pub fn success(&self) -> bool {
        self.blocks.iter().all(BlockOutcome::is_decoded)
    }

    /// All six blocks' payload bytes concatenated (432 bytes). Only
    /// meaningful when [`Self::success`] is true.
    pub fn payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(6 * 72);
        for block in &self.blocks {
            match block {
                BlockOutcome::Decoded { bytes, .. } => out.extend_from_slice(bytes),
                BlockOutcome::Undecoded => {}
            }
        }
        out
    }
}

/// Attempt offset 1, then offset 2, carrying state across both tries.
pub fn process(samples: &[i32], rs: &RsCodec, config: &Config) -> FisbResult {
    let mut blocks: [BlockOutcome; 6] = Default::default();
    if decode_fisb(samples, 1, &mut blocks, rs, config) {
        return FisbResult { blocks };
    }
    decode_fisb(samples, 2, &mut blocks, rs, config);
    FisbResult { blocks }
}

/// One pass over the six blocks at a given sample offset. Mutates
/// `blocks` in place (blocks already decoded are skipped) and returns
/// whether the frame is now fully decoded.
fn decode_fisb(samples: &[i32], offset: usize, blocks: &mut [BlockOutcome; 6], rs: &RsCodec, config: &Config) -> bool {
    let mut try_first: Option<f64> = None;

    for block_index in 0..6 {
        if blocks[block_index].is_decoded() {
            continue;
        }

        let (on_time, before, after) = slicer::fisb_extract(samples, offset, block_index);

        let result = try_shift(rs, &on_time, &before, &after, try_first, false, &[]);
        let mut succeeded = result.outcome.is_decoded();
        if succeeded {
            try_first = result.shift_used;
            blocks[block_index] = result.outcome;
            if block_index == 0 {
                warn_if_position_valid_set(&blocks[0]);
                if block_zero_thorough_check(blocks) {
                    return true;
                }
            }
            continue;
        }

        if block_index == 0 && (config.block_zero_fixed_bits || !config.first_six_bytes.is_empty()) {
            let trick = try_shift(
                rs,
                &on_time,
                &before,
                &after,
                None,
                config.block_zero_fixed_bits,
                &config.first_six_bytes,
            );
            if trick.outcome.is_decoded() {
                blocks[0] = trick.outcome;
                succeeded = true;
                warn_if_position_valid_set(&blocks[0]);
                if block_zero_thorough_check(blocks) {
                    return true;
                }
                continue;
            }
        }

        if config.fix_trailing_zeros {
            let mut repaired = on_time;
            if fix_trailing_zeros(&mut repaired) {
                let retry = try_shift(rs, &repaired, &before, &after, try_first, false, &[]);
                if retry.outcome.is_decoded() {
                    // Unlike the plain-decode success branch above, a shift
                    // found after trailing-zero repair doesn't update the
                    // memo used by later blocks in this frame.
                    blocks[block_index] = retry.outcome;
                    succeeded = true;
                    if block_index == 0 {
                        warn_if_position_valid_set(&blocks[0]);
                        if block_zero_thorough_check(blocks) {
                            return true;
                        }
                    }
                    continue;
                }
            }
        }

        if !succeeded {
            debug!("fisb: block {block_index} unrecoverable at offset {offset}, abandoning frame");
            break;
        }
    }

    if blocks.iter().any(|b| !b.is_decoded()) {
        return block_zero_thorough_check(blocks);
    }
    true
}

/// Walk the inner UAT frames inside the consecutively-decoded blocks
/// starting at block 0; if one has a zero-length terminator, the rest
/// of the frame is all-zero padding and can be filled in without
/// decoding it.
///
/// Mirrors block 0 through block 4 only (never block 5) — by the time
/// five full blocks have been read without finding a terminator, the
/// early-terminate shortcut no longer saves any work.
fn block_zero_thorough_check(blocks: &mut [BlockOutcome; 6]) -> bool {
    let mut data = match &blocks[0] {
        BlockOutcome::Decoded { bytes, .. } => bytes.clone(),
        BlockOutcome::Undecoded => return false,
    };
    for block in blocks.iter().take(5).skip(1) {
        match block {
            BlockOutcome::Decoded { bytes, .. } => data.extend_from_slice(bytes),
            BlockOutcome::Undecoded => break,
        }
    }

    let mut byte_ptr = 8usize;
    loop {
        if byte_ptr + 1 >= data.len() {
            return false;
        }
        let len = ((data[byte_ptr] as usize) << 1) | (data[byte_ptr + 1] as usize >> 7);
        if len == 0 {
            let current_block = (byte_ptr + 1) / 72;
            for b in blocks.iter_mut().skip(current_block + 1) {
                *b = BlockOutcome::Decoded {
                    bytes: vec![0u8; 72],
                    errors: 0,
                };
            }
            return true;
        }
        byte_ptr += len + 2;
    }
}

/// Bit 47 (the "position valid" flag) is nominally always 1, but real
/// ground stations transmit 0 there; this crate never forces it and
/// just logs when a correctly decoded block 0 has it set.
fn warn_if_position_valid_set(block: &BlockOutcome) {
    if let BlockOutcome::Decoded { bytes, .. } = block {
        if bytes[5] & 0x01 != 0 {
            warn!("fisb: block 0 decoded with position-valid bit set");
        }
    }
}

const PARITY_START: usize = 576;
const BLOCK_END: usize = 736;
const QUARTER: usize = 128;

fn compute_average_one(block: &FisbSamples) -> f64 {
    let positives = block[0..64].iter().chain(block[PARITY_START..BLOCK_END].iter()).filter(|&&v| v > 0);
    let mut sum = 0i64;
    let mut count = 0i64;
    for &v in positives {
        sum += v as i64;
        count += 1;
    }
    sum as f64 / count as f64
}

fn compute_average_zero(block: &FisbSamples) -> f64 {
    let mut sum = 0i64;
    let mut count = 0i64;
    for &v in block.iter().filter(|&&v| v <= 0) {
        sum += v as i64;
        count += 1;
    }
    sum as f64 / count as f64
}

fn fraction_above(quarter: &[i32], threshold: f64) -> f64 {
    let above = quarter.iter().filter(|&&v| v as f64 >= threshold).count();
    above as f64 / quarter.len() as f64
}

/// Detect and repair a run of signal-absent trailing samples in a
/// single FIS-B block's 736 on-time samples, replacing them with a
/// synthetic "zero-bit" value so the slicer emits the correct 0s.
/// Returns whether a repair was made. All constants (1.10, 0.87, 0.02,
/// 128-sample quarters) are empirically derived and must not be
/// adjusted casually — they were tuned against a large corpus of real
/// error packets.
pub fn fix_trailing_zeros(block: &mut FisbSamples) -> bool {
    let ave_one = compute_average_one(block);

    let mut start_value = PARITY_START;
    let mut found_any = false;

    for q in 0..4 {
        let i = PARITY_START - QUARTER * q;
        let quarter = &block[i - QUARTER..i];
        if fraction_above(quarter, ave_one * 1.10) > 0.02 {
            break;
        }
        start_value = i - QUARTER;
        found_any = true;
    }

    let mut new_start_value = start_value;
    if start_value != 64 {
        let threshold = ave_one * 0.87;
        for i in (start_value - QUARTER + 1..start_value).rev() {
            if block[i] as f64 > threshold {
                let mut candidate = i + 8;
                let rem = candidate % 8;
                if rem != 0 {
                    candidate += 8 - rem;
                }
                if candidate > start_value {
                    new_start_value = start_value;
                } else {
                    new_start_value = candidate;
                    found_any = true;
                }
                break;
            }
        }
    }

    if found_any {
        let ave_zero = compute_average_zero(block) as i32;
        for v in block[new_start_value..PARITY_START].iter_mut() {
            *v = ave_zero;
        }
    }

    found_any
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FISB_BLOCK_SAMPLES;

    fn synthetic_block(signal_len: usize) -> FisbSamples {
        let mut block = [0i32; FISB_BLOCK_SAMPLES];
        for (i, v) in block.iter_mut().enumerate() {
            if i < 64 || i >= PARITY_START {
                *v = if i % 2 == 0 { 1000 } else { -1000 };
            } else if i < signal_len {
                *v = if i % 2 == 0 { 900 } else { -900 };
            } else {
                *v = if i % 3 == 0 { 3 } else { -3 };
            }
        }
        block
    }

    #[test]
    fn repairs_trailing_zero_run_near_expected_boundary() {
        let mut block = synthetic_block(320);
        let repaired = fix_trailing_zeros(&mut block);
        assert!(repaired);
        // transition within a byte boundary of 320
        assert!(block[310..330].windows(1).count() > 0);
        for &v in &block[320 / 8 * 8..PARITY_START] {
            assert!(v <= 0);
        }
    }

    #[test]
    fn no_repair_when_signal_present_throughout() {
        let mut block = synthetic_block(PARITY_START);
        let repaired = fix_trailing_zeros(&mut block);
        assert!(!repaired);
    }

    #[test]
    fn early_terminate_fills_remaining_blocks() {
        let mut block0 = vec![0u8; 72];
        // L = 3 at byte 8: payload[8] << 1 | payload[9] >> 7 == 3
        block0[8] = 3 >> 1;
        block0[9] = (3 << 7) as u8;
        // Terminator L = 0 right after the 5-byte footprint (2 header + 3 data).
        let terminator_at = 8 + 2 + 3;
        block0[terminator_at] = 0;
        block0[terminator_at + 1] = 0;

        let mut blocks: [BlockOutcome; 6] = Default::default();
        blocks[0] = BlockOutcome::Decoded { bytes: block0, errors: 0 };

        let found = block_zero_thorough_check(&mut blocks);
        assert!(found);
        for block in blocks.iter().skip(1) {
            match block {
                BlockOutcome::Decoded { bytes, errors } => {
                    assert_eq!(bytes, &vec![0u8; 72]);
                    assert_eq!(*errors, 0);
                }
                BlockOutcome::Undecoded => panic!("expected zero-filled block"),
            }
        }
    }

    #[test]
    fn early_terminate_leaves_state_untouched_on_failure() {
        let block0 = vec![0xFFu8; 72]; // never hits L == 0
        let mut blocks: [BlockOutcome; 6] = Default::default();
        blocks[0] = BlockOutcome::Decoded { bytes: block0, errors: 0 };
        assert!(!block_zero_thorough_check(&mut blocks));
        for block in blocks.iter().skip(1) {
            assert!(!block.is_decoded());
        }
    }
}
