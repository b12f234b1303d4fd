//! Soft-sample extraction, neighbour-weighted shifting, and hard
//! slicing — turning a frame's raw `i32` sample buffer into candidate
//! byte blocks for the Reed-Solomon engine.

use crate::types::{FisbSamples, FISB_BLOCK_SAMPLES};

/// Deinterleave one FIS-B block's samples out of the full frame buffer.
///
/// Byte `j` of block `i` sits at bit-offset `offset + 2*(8*i + 48*j)`,
/// consuming 16 samples at stride 2 (2 samples/symbol). Returns the
/// on-time samples plus their one-earlier and one-later neighbours.
pub fn fisb_extract(samples: &[i32], offset: usize, block_index: usize) -> (FisbSamples, FisbSamples, FisbSamples) {
    let mut on_time = [0i32; FISB_BLOCK_SAMPLES];
    let mut before = [0i32; FISB_BLOCK_SAMPLES];
    let mut after = [0i32; FISB_BLOCK_SAMPLES];
    for j in 0..92 {
        for b in 0..8 {
            let sample_index = offset + 2 * (8 * block_index + 48 * j) + 2 * b;
            let idx = j * 8 + b;
            on_time[idx] = samples[sample_index];
            before[idx] = samples[sample_index - 1];
            after[idx] = samples[sample_index + 1];
        }
    }
    (on_time, before, after)
}

/// ADS-B's trivial (non-interleaved) layout: extract `N` on-time samples
/// plus neighbours starting at `offset`. `N` is `240` for a short packet
/// or `384` for a long one.
pub fn adsb_extract<const N: usize>(samples: &[i32], offset: usize) -> ([i32; N], [i32; N], [i32; N]) {
    let mut on_time = [0i32; N];
    let mut before = [0i32; N];
    let mut after = [0i32; N];
    for idx in 0..N {
        let sample_index = offset + 2 * idx;
        on_time[idx] = samples[sample_index];
        before[idx] = samples[sample_index - 1];
        after[idx] = samples[sample_index + 1];
    }
    (on_time, before, after)
}

/// Blend on-time samples toward a neighbour by `w`. `w == 0.0` returns
/// the on-time samples unchanged (not halved — shift 0 must reproduce
/// the input bit-for-bit). `w > 0` blends toward `before`, `w < 0`
/// toward `after`, in both cases by `|w|`.
pub fn shift(on_time: &[i32], before: &[i32], after: &[i32], w: f64) -> Vec<f64> {
    if w == 0.0 {
        return on_time.iter().map(|&b| b as f64).collect();
    }
    if w > 0.0 {
        on_time
            .iter()
            .zip(before)
            .map(|(&b, &n)| (b as f64 + w * n as f64) / 2.0)
            .collect()
    } else {
        on_time
            .iter()
            .zip(after)
            .map(|(&b, &n)| (b as f64 + (-w) * n as f64) / 2.0)
            .collect()
    }
}

/// Hard-slice: `> 0` becomes bit 1, packed MSB-first into bytes. `bits`
/// must have a length that's a multiple of 8.
pub fn hard_slice(bits: &[f64]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| {
            let mut byte = 0u8;
            for (i, &v) in chunk.iter().enumerate() {
                if v > 0.0 {
                    byte |= 1 << (7 - i);
                }
            }
            byte
        })
        .collect()
}

/// Pre-slice sample indices forced positive by the block-0 fixed-bit
/// override (UTC-coupled, App-Data-Valid).
pub const BLOCK0_FIXED_POSITIVE: [usize; 2] = [48, 50];

/// Pre-slice sample indices forced negative by the block-0 fixed-bit
/// override (reserved fields in the UAT Frame byte 2, plus one
/// reserved bit near the header). Index 47 ("position valid") is
/// deliberately absent — real stations transmit 0 there despite the
/// standard requiring 1.
pub const BLOCK0_FIXED_NEGATIVE: [usize; 8] = [49, 60, 61, 62, 63, 73, 74, 75];

/// Force the fixed-bit override onto a FIS-B block 0's shifted samples,
/// in place, before hard-slicing.
pub fn apply_block_zero_fixed_bits(bits: &mut [f64]) {
    for &i in &BLOCK0_FIXED_POSITIVE {
        bits[i] = 10000.0;
    }
    for &i in &BLOCK0_FIXED_NEGATIVE {
        bits[i] = -10000.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_zero_is_identity() {
        let on_time = [5, -5, 0, 12345];
        let before = [1, 1, 1, 1];
        let after = [2, 2, 2, 2];
        let out = shift(&on_time, &before, &after, 0.0);
        assert_eq!(out, vec![5.0, -5.0, 0.0, 12345.0]);
    }

    #[test]
    fn shift_positive_blends_before() {
        let on_time = [10];
        let before = [10];
        let after = [-1000];
        let out = shift(&on_time, &before, &after, 0.5);
        assert_eq!(out, vec![(10.0 + 0.5 * 10.0) / 2.0]);
    }

    #[test]
    fn shift_negative_blends_after() {
        let on_time = [10];
        let before = [-1000];
        let after = [10];
        let out = shift(&on_time, &before, &after, -0.5);
        assert_eq!(out, vec![(10.0 + 0.5 * 10.0) / 2.0]);
    }

    #[test]
    fn hard_slice_packs_msb_first() {
        let bits: Vec<f64> = vec![1.0, 1.0, -1.0, -1.0, -1.0, -1.0, -1.0, 1.0];
        assert_eq!(hard_slice(&bits), vec![0b1100_0001]);
    }

    #[test]
    fn fixed_bits_leave_index_47_untouched() {
        let mut bits = vec![0.0; FISB_BLOCK_SAMPLES];
        apply_block_zero_fixed_bits(&mut bits);
        assert_eq!(bits[47], 0.0);
        for &i in &BLOCK0_FIXED_POSITIVE {
            assert!(bits[i] > 0.0);
        }
        for &i in &BLOCK0_FIXED_NEGATIVE {
            assert!(bits[i] < 0.0);
        }
    }

    #[test]
    fn fisb_extract_reads_interleaved_stride() {
        // A frame just long enough for one block at offset 1.
        let mut samples = vec![0i32; 2 + 2 * (8 * 5 + 48 * 91) + 2 * 8 + 2];
        samples[1 + 2 * (8 * 0 + 48 * 0) + 2 * 0] = 42;
        let (on_time, _before, _after) = fisb_extract(&samples, 1, 0);
        assert_eq!(on_time[0], 42);
    }
}
