/// Reed-Solomon error correction for QR codes
/// QR codes use RS over GF(256) with primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
/// GF(256) field operations using log/exp tables
pub struct Gf256;

const PRIMITIVE: u16 = 0x11D;

const fn build_exp_table() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    // Doubled so that log sums index without reduction
    while i < 512 {
        table[i] = table[i - 255];
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

static EXP_TABLE: [u8; 512] = build_exp_table();
static LOG_TABLE: [u8; 256] = build_log_table();

impl Gf256 {
    /// Product in GF(256)
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        EXP_TABLE[LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize]
    }

    /// Quotient in GF(256); `b` must be non-zero
    pub fn div(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        EXP_TABLE[LOG_TABLE[a as usize] as usize + 255 - LOG_TABLE[b as usize] as usize]
    }

    /// alpha^n
    pub fn exp(n: usize) -> u8 {
        EXP_TABLE[n % 255]
    }

    /// Multiplicative inverse of a non-zero element
    pub fn inv(a: u8) -> u8 {
        Self::div(1, a)
    }
}

/// Evaluate a polynomial given highest-degree coefficient first
fn eval_descending(coefficients: &[u8], x: u8) -> u8 {
    coefficients.iter().fold(0u8, |acc, &c| Gf256::mul(acc, x) ^ c)
}

/// Evaluate a polynomial given lowest-degree coefficient first
fn eval_ascending(coefficients: &[u8], x: u8) -> u8 {
    coefficients
        .iter()
        .rev()
        .fold(0u8, |acc, &c| Gf256::mul(acc, x) ^ c)
}

/// Why a block could not be corrected
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReedSolomonError {
    /// Error locator degree exceeds ecc/2
    #[error("error locator degree {degree} exceeds capacity {capacity}")]
    TooManyErrors {
        /// Locator degree
        degree: usize,
        /// Correctable errors for the block
        capacity: usize,
    },
    /// Chien search found a different number of roots than the locator degree
    #[error("found {found} error positions for a locator of degree {degree}")]
    RootCountMismatch {
        /// Roots inside the block
        found: usize,
        /// Locator degree
        degree: usize,
    },
    /// Forney denominator vanished
    #[error("locator derivative is zero at an error position")]
    ZeroDerivative,
    /// Syndromes still non-zero after correction
    #[error("residual syndrome after correction")]
    ResidualSyndrome,
}

/// Reed-Solomon decoder for QR codes
pub struct ReedSolomonDecoder {
    num_ecc_codewords: usize,
}

impl ReedSolomonDecoder {
    /// Decoder for blocks carrying `num_ecc_codewords` ECC bytes
    pub fn new(num_ecc_codewords: usize) -> Self {
        Self { num_ecc_codewords }
    }

    /// Correct `received` (data then ECC, first byte = highest power) in place.
    ///
    /// Returns the number of corrected codewords.
    pub fn decode(&self, received: &mut [u8]) -> Result<usize, ReedSolomonError> {
        let syndrome = self.calculate_syndrome(received);
        if syndrome.iter().all(|&s| s == 0) {
            return Ok(0);
        }

        let sigma = Self::find_error_locator(&syndrome);
        let degree = sigma.len() - 1;
        let capacity = self.num_ecc_codewords / 2;
        if degree > capacity {
            return Err(ReedSolomonError::TooManyErrors { degree, capacity });
        }

        let n = received.len();
        let positions = Self::find_error_positions(&sigma, n);
        if positions.len() != degree {
            return Err(ReedSolomonError::RootCountMismatch {
                found: positions.len(),
                degree,
            });
        }

        // omega = syndrome * sigma mod x^ecc
        let mut omega = vec![0u8; syndrome.len()];
        for (i, slot) in omega.iter_mut().enumerate() {
            for (j, &coeff) in sigma.iter().enumerate().take(i + 1) {
                *slot ^= Gf256::mul(coeff, syndrome[i - j]);
            }
        }

        for &pos in &positions {
            // Forney: e_k = X_k * omega(X_k^-1) / sigma'(X_k^-1)
            let x_k = Gf256::exp(n - 1 - pos);
            let x_inv = Gf256::inv(x_k);
            let omega_val = eval_ascending(&omega, x_inv);
            let mut sigma_prime = 0u8;
            let mut x_pow = 1u8;
            for (i, &coeff) in sigma.iter().enumerate().skip(1) {
                if i % 2 == 1 {
                    sigma_prime ^= Gf256::mul(coeff, x_pow);
                }
                x_pow = Gf256::mul(x_pow, x_inv);
            }
            if sigma_prime == 0 {
                return Err(ReedSolomonError::ZeroDerivative);
            }
            received[pos] ^= Gf256::mul(x_k, Gf256::div(omega_val, sigma_prime));
        }

        if self.calculate_syndrome(received).iter().any(|&s| s != 0) {
            return Err(ReedSolomonError::ResidualSyndrome);
        }
        Ok(positions.len())
    }

    /// S_i = r(alpha^i) for i in 0..ecc
    fn calculate_syndrome(&self, received: &[u8]) -> Vec<u8> {
        (0..self.num_ecc_codewords)
            .map(|i| eval_descending(received, Gf256::exp(i)))
            .collect()
    }

    /// Berlekamp-Massey; returns sigma lowest-degree first, trimmed to its degree
    fn find_error_locator(syndrome: &[u8]) -> Vec<u8> {
        let mut sigma = vec![1u8];
        let mut prev = vec![1u8];
        let mut prev_delta: u8 = 1;
        let mut l = 0usize;
        let mut m = 1usize;

        for i in 0..syndrome.len() {
            let mut delta = syndrome[i];
            for j in 1..=l.min(sigma.len() - 1) {
                delta ^= Gf256::mul(sigma[j], syndrome[i - j]);
            }

            if delta == 0 {
                m += 1;
                continue;
            }

            let factor = Gf256::div(delta, prev_delta);
            let snapshot = sigma.clone();
            if sigma.len() < prev.len() + m {
                sigma.resize(prev.len() + m, 0);
            }
            for (j, &b) in prev.iter().enumerate() {
                sigma[j + m] ^= Gf256::mul(factor, b);
            }

            if 2 * l <= i {
                l = i + 1 - l;
                prev = snapshot;
                prev_delta = delta;
                m = 1;
            } else {
                m += 1;
            }
        }

        sigma.truncate(l + 1);
        sigma.resize(l + 1, 0);
        sigma
    }

    /// Chien search over the block positions
    fn find_error_positions(sigma: &[u8], n: usize) -> Vec<usize> {
        (0..n)
            .filter(|&pos| {
                // Root at X^-1 with X = alpha^(n-1-pos)
                let x_inv = Gf256::exp(255 - (n - 1 - pos) % 255);
                eval_ascending(sigma, x_inv) == 0
            })
            .collect()
    }
}
