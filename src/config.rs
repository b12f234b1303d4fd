//! Immutable decode configuration, built once at startup.

use std::path::PathBuf;

/// Recovery toggles, diagnostic toggles, and I/O directories, all fixed
/// for the lifetime of the process. Replaces the reference
/// implementation's module-level mutable globals.
#[derive(Debug, Clone)]
pub struct Config {
    pub show_failed_fisb: bool,
    pub show_failed_adsb: bool,
    pub show_lowest_levels: bool,
    pub block_zero_fixed_bits: bool,
    pub fix_trailing_zeros: bool,
    pub first_six_bytes: Vec<[u8; 6]>,
    pub error_dump_directory: Option<PathBuf>,
    pub reprocess_directory: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_failed_fisb: false,
            show_failed_adsb: false,
            show_lowest_levels: false,
            block_zero_fixed_bits: true,
            fix_trailing_zeros: true,
            first_six_bytes: Vec::new(),
            error_dump_directory: None,
            reprocess_directory: None,
        }
    }
}

impl Config {
    /// Whether a failed frame's raw sample buffer should be written out.
    pub fn dumps_errors(&self) -> bool {
        self.error_dump_directory.is_some() && self.reprocess_directory.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behaviour() {
        let cfg = Config::default();
        assert!(cfg.block_zero_fixed_bits);
        assert!(cfg.fix_trailing_zeros);
        assert!(!cfg.show_failed_fisb);
        assert!(cfg.first_six_bytes.is_empty());
    }

    #[test]
    fn reprocess_directory_suppresses_dumping() {
        let mut cfg = Config {
            error_dump_directory: Some("/tmp/dump".into()),
            ..Config::default()
        };
        assert!(cfg.dumps_errors());
        cfg.reprocess_directory = Some("/tmp/replay".into());
        assert!(!cfg.dumps_errors());
    }
}
