//! Small shared data types used across the decode pipeline.

/// Outcome of one Reed-Solomon attempt on a single FIS-B block or ADS-B
/// packet. Replaces the reference implementation's "98 means failed, 99
/// means not yet attempted" sentinel convention: there is simply
/// nothing to inspect when a block hasn't decoded.
#[derive(Debug, Clone)]
pub enum BlockOutcome {
    Decoded { bytes: Vec<u8>, errors: u8 },
    Undecoded,
}

impl BlockOutcome {
    pub fn is_decoded(&self) -> bool {
        matches!(self, BlockOutcome::Decoded { .. })
    }
}

impl Default for BlockOutcome {
    fn default() -> Self {
        BlockOutcome::Undecoded
    }
}

/// Number of soft samples making up one deinterleaved FIS-B block (92
/// bytes at 8 samples/byte).
pub const FISB_BLOCK_SAMPLES: usize = 736;

/// Soft samples for one FIS-B block: on-time, one-earlier, one-later.
pub type FisbSamples = [i32; FISB_BLOCK_SAMPLES];

/// Number of soft samples making up an ADS-B short packet (30 bytes).
pub const ADSB_SHORT_SAMPLES: usize = 240;

/// Number of soft samples making up an ADS-B long packet (48 bytes).
pub const ADSB_LONG_SAMPLES: usize = 384;
