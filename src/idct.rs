use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::coefficient::BLOCK_SIZE;

/// Direct 8x8 inverse DCT over a precomputed cosine basis.
pub struct Idct {
    /// cos((2x + 1)uπ / 16) at [u * 8 + x]
    pub(crate) table: [f64; BLOCK_SIZE],
    /// c(u) * c(v) at [u * 8 + v], with c(0) = 1/√2 and c(u) = 1 otherwise
    pub(crate) norm: [f64; BLOCK_SIZE],
}

impl Idct {
    fn norm_coeff(u: usize) -> f64 {
        match u {
            0 => FRAC_1_SQRT_2,
            _ => 1.0,
        }
    }

    pub fn new() -> Self {
        let mut table = [0.0; BLOCK_SIZE];
        let mut norm = [0.0; BLOCK_SIZE];

        for u in 0..8 {
            for x in 0..8 {
                table[u * 8 + x] = ((2.0 * x as f64 + 1.0) * u as f64 * PI / 16.0).cos();
            }

            for v in 0..8 {
                norm[u * 8 + v] = match (u, v) {
                    (0, 0) => 0.5,
                    _ => Self::norm_coeff(u) * Self::norm_coeff(v),
                };
            }
        }

        Self { table, norm }
    }

    /// Maps a natural-order coefficient block, `coefficients[v * 8 + u]` for vertical
    /// frequency v and horizontal frequency u, to row-major samples `[y * 8 + x]`.
    /// Each sample is the basis sum divided by four, rounded down.
    pub fn perform_idct(&self, coefficients: &[i32; BLOCK_SIZE]) -> [i32; BLOCK_SIZE] {
        let mut output = [0i32; BLOCK_SIZE];

        if coefficients.iter().all(|&c| c == 0) {
            return output;
        }

        for y in 0..8 {
            for x in 0..8 {
                let mut local_sum = 0.0;

                for v in 0..8 {
                    for u in 0..8 {
                        let coefficient = coefficients[v * 8 + u];
                        if coefficient == 0 {
                            continue;
                        }

                        local_sum += coefficient as f64
                            * self.norm[u * 8 + v]
                            * self.table[u * 8 + x]
                            * self.table[v * 8 + y];
                    }
                }

                output[y * 8 + x] = (local_sum / 4.0).floor() as i32;
            }
        }

        output
    }
}

impl Default for Idct {
    fn default() -> Self {
        Self::new()
    }
}
