/*! GF(256) arithmetic for the Reed-Solomon engine.

Built from a field generator polynomial the same way classic FEC
libraries (e.g. the one `pyreedsolomon` wraps) build their log/antilog
tables: repeatedly double the running value, reducing by the generator
whenever it overflows 8 bits.
*/

/// A Galois field of order 256, parameterised by its generator polynomial.
///
/// `exp` is extended to twice the field size so that `exp[a] * exp[b]`
/// (as log indices) can be looked up as `exp[log_a + log_b]` without a
/// modulo operation.
pub struct Gf256 {
    exp: [u8; 512],
    log: [u8; 256],
}

impl Gf256 {
    /// Build the field for generator polynomial `gfpoly` (e.g. `0x187`).
    ///
    /// `gfpoly` is given with its implicit high bit (bit 8) set; only the
    /// low 8 bits are used when reducing.
    pub fn new(gfpoly: u16) -> Self {
        let mut exp = [0u8; 512];
        let mut log = [0u8; 256];
        let mut b: u32 = 1;
        for i in 0..255usize {
            exp[i] = b as u8;
            log[b as usize] = i as u8;
            b <<= 1;
            if b & 0x100 != 0 {
                b ^= gfpoly as u32;
            }
        }
        for i in 255..512 {
            exp[i] = exp[i - 255];
        }
        Self { exp, log }
    }

    /// `alpha ^ i`, where `i` may be negative (mod 255).
    pub fn exp(&self, i: i32) -> u8 {
        let idx = i.rem_euclid(255) as usize;
        self.exp[idx]
    }

    /// Discrete log of a nonzero element. Undefined for 0.
    pub fn log(&self, a: u8) -> i32 {
        self.log[a as usize] as i32
    }

    /// Multiply two field elements.
    pub fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        self.exp[self.log(a) as usize + self.log(b) as usize]
    }

    /// Divide `a` by `b` (`b` must be nonzero).
    pub fn div(&self, a: u8, b: u8) -> u8 {
        if a == 0 {
            return 0;
        }
        self.exp((self.log(a) - self.log(b)).rem_euclid(255))
    }

    /// Multiplicative inverse of a nonzero element.
    pub fn inv(&self, a: u8) -> u8 {
        self.exp(255 - self.log(a))
    }

    /// `a ^ power` for a nonzero `a`.
    pub fn pow(&self, a: u8, power: i32) -> u8 {
        if a == 0 {
            return if power == 0 { 1 } else { 0 };
        }
        self.exp(self.log(a) * power)
    }
}
