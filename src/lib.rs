#![warn(missing_docs)]
/*! Error-correcting decoder for 978 MHz UAT transmissions.

UAT (Universal Access Transceiver) carries two unrelated frame
families on the same 978 MHz channel: FIS-B Ground Uplink weather/NOTAM
frames, and ADS-B position reports squeezed into the same channel's
unused time slots. Both are Reed-Solomon protected, but with different
parameters and framing.

This crate reimplements the soft-decision recovery techniques a real
ground station needs beyond a textbook Reed-Solomon decode: block
deinterleaving, sub-symbol shift correction for a receiver whose symbol
clock has drifted slightly, a handful of known-good-bit overrides for
the FIS-B frame's fixed header fields, and trailing-zero repair for
frames cut off mid-transmission.

# Architecture overview

```text
   [ attribute header + i32 samples ]
                ↓
         [ dispatcher ]
          ↙         ↘
    [ fisb ]       [ adsb ]
      ↓                ↓
 [ slicer, shift_strategy, rs ]
      ↓                ↓
          [ format ]
                ↓
       [ recovered hex line ]
```

`gf256` and `rs` implement the Galois-field arithmetic and
Berlekamp-Massey/Chien/Forney Reed-Solomon engine shared by all three
code instances. `slicer` turns a frame's raw sample buffer into
candidate byte blocks; `shift_strategy` drives the empirical
shift-weight search over those candidates. `fisb` and `adsb` layer the
frame-family-specific recovery tricks on top. `attributes` and `format`
handle the line-oriented header and output protocol; `config` holds the
process-wide recovery toggles; `dispatcher` is the read-decode-print
loop used by the `uat978dec` binary.
*/

pub mod adsb;
pub mod attributes;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod fisb;
pub mod format;
pub mod gf256;
pub mod rs;
pub mod shift_strategy;
pub mod slicer;
pub mod types;

pub use error::{Error, Result};
