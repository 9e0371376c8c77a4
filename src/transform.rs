//! Power-of-Two 2D Fourier Transform
//!
//! Separable 2D DFT over a square grid, built from an iterative radix-2
//! decimation-in-time kernel (bit-reversal permutation followed by
//! log2(N) butterfly stages). Grid sizes are restricted to powers of two,
//! validated once at plan construction so the per-frame path never has to
//! re-check.
//!
//! The 2D transform applies the 1D kernel to every row, then to every
//! column. The inverse flips the twiddle sign and scales by 1/N per axis,
//! so a full forward→inverse round trip over the grid carries a total
//! 1/N² normalization — callers must not normalize again.
//!
//! ```text
//! forward:  rows ──► columns          (no scaling)
//! inverse:  rows ──► columns          (1/N per axis, 1/N² total)
//! ```
//!
//! Row passes run in parallel; the column pass transposes, reuses the row
//! kernel, and transposes back. Each pass completes before the next begins
//! (separability requires the barrier).
//!
//! ## Example
//!
//! ```rust
//! use phase_scramble::transform::Fft2d;
//!
//! let n = 8;
//! let mut fft = Fft2d::new(n).unwrap();
//!
//! // An impulse at the origin transforms to a flat spectrum.
//! let mut input = vec![0.0; n * n];
//! input[0] = 1.0;
//! let spectrum = fft.forward_grid(&input).unwrap();
//! for bin in &spectrum {
//!     assert!((bin.re - 1.0).abs() < 1e-12);
//!     assert!(bin.im.abs() < 1e-12);
//! }
//! ```

use rayon::prelude::*;

use crate::types::{Complex, EngineError, EngineResult, Sample};

/// Planned 2D FFT for a fixed power-of-two square grid.
#[derive(Debug, Clone)]
pub struct Fft2d {
    /// Grid side length
    n: usize,
    /// Forward twiddle factors e^{-2πik/N} for k in [0, N/2)
    twiddles: Vec<Complex>,
    /// Transpose scratch for the column pass
    scratch: Vec<Complex>,
}

impl Fft2d {
    /// Plan a 2D transform for an `n`×`n` grid.
    ///
    /// `n` must be a power of two; anything else is a configuration error.
    pub fn new(n: usize) -> EngineResult<Self> {
        if n < 2 || !n.is_power_of_two() {
            return Err(EngineError::GridSizeNotPowerOfTwo(n));
        }
        let step = -2.0 * std::f64::consts::PI / n as f64;
        let twiddles = (0..n / 2)
            .map(|k| Complex::from_polar(1.0, step * k as f64))
            .collect();
        Ok(Self {
            n,
            twiddles,
            scratch: vec![Complex::new(0.0, 0.0); n * n],
        })
    }

    /// Grid side length this plan was built for.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Forward transform of a real `n`×`n` grid (row-major).
    ///
    /// Returns the complex spectrum. Errors if the input length is not
    /// `n`×`n`.
    pub fn forward_grid(&mut self, input: &[Sample]) -> EngineResult<Vec<Complex>> {
        let expected = self.n * self.n;
        if input.len() != expected {
            return Err(EngineError::SourceSizeMismatch {
                n: self.n,
                expected,
                actual: input.len(),
            });
        }
        let mut buf: Vec<Complex> = input.iter().map(|&x| Complex::new(x, 0.0)).collect();
        self.pass_rows(&mut buf, false);
        self.pass_columns(&mut buf, false);
        Ok(buf)
    }

    /// Inverse transform of an `n`×`n` complex spectrum, in place.
    ///
    /// Includes the full 1/N² normalization. The buffer length is an
    /// engine-internal contract, asserted rather than surfaced.
    pub fn inverse_grid_inplace(&mut self, buf: &mut [Complex]) {
        assert_eq!(buf.len(), self.n * self.n);
        self.pass_rows(buf, true);
        self.pass_columns(buf, true);
    }

    /// Apply the 1D kernel to every row of the grid.
    fn pass_rows(&self, buf: &mut [Complex], inverse: bool) {
        let twiddles = &self.twiddles;
        buf.par_chunks_mut(self.n)
            .for_each(|row| fft_1d(row, twiddles, inverse));
    }

    /// Apply the 1D kernel to every column via transpose → rows → transpose.
    fn pass_columns(&mut self, buf: &mut [Complex], inverse: bool) {
        let n = self.n;
        let twiddles: &[Complex] = &self.twiddles;
        let scratch: &mut [Complex] = &mut self.scratch;
        transpose(buf, scratch, n);
        scratch
            .par_chunks_mut(n)
            .for_each(|row| fft_1d(row, twiddles, inverse));
        transpose(scratch, buf, n);
    }
}

/// In-place radix-2 decimation-in-time FFT over one length-N line.
///
/// `twiddles` holds e^{-2πik/N} for k in [0, N/2); the inverse direction
/// conjugates them and applies the 1/N scale.
fn fft_1d(buf: &mut [Complex], twiddles: &[Complex], inverse: bool) {
    let n = buf.len();
    debug_assert!(n.is_power_of_two());
    debug_assert_eq!(twiddles.len(), n / 2);
    if n <= 1 {
        return;
    }

    // Bit-reversal permutation
    let mut j = 0usize;
    for i in 0..n {
        if i < j {
            buf.swap(i, j);
        }
        let mut m = n >> 1;
        while m >= 1 && j >= m {
            j -= m;
            m >>= 1;
        }
        j += m;
    }

    // Cooley-Tukey butterflies
    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let stride = n / len;
        for start in (0..n).step_by(len) {
            for k in 0..half {
                let w = if inverse {
                    twiddles[k * stride].conj()
                } else {
                    twiddles[k * stride]
                };
                let a = start + k;
                let b = a + half;
                let t = w * buf[b];
                buf[b] = buf[a] - t;
                buf[a] += t;
            }
        }
        len <<= 1;
    }

    if inverse {
        let scale = 1.0 / n as f64;
        for v in buf.iter_mut() {
            *v *= scale;
        }
    }
}

/// Square transpose from `src` into `dst` (both row-major, length n²).
fn transpose(src: &[Complex], dst: &mut [Complex], n: usize) {
    for y in 0..n {
        for x in 0..n {
            dst[x * n + y] = src[y * n + x];
        }
    }
}
