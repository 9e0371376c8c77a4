//! Source Spectrum Precomputation
//!
//! One-time analysis of the source grid: run the forward 2D transform and
//! split every frequency bin into magnitude and phase. The magnitude field
//! is what the synthesizer preserves frame after frame; the original phase
//! is one end of the scramble blend. Both are immutable after analysis.
//!
//! This module also owns the centered spatial-frequency convention shared
//! by the phasor evolver and the synthesizer: bin indices above N/2 alias
//! to their negative equivalents, and frequencies are expressed in cycles
//! per grid unit, so the radial frequency of any bin lies in [0, √2/2].
//!
//! ```text
//! index k:     0   1   2  ...  N/2  ...  N-2  N-1
//! freq (×1/N): 0  +1  +2  ... +N/2  ...  -2   -1
//! ```
//!
//! ## Example
//!
//! ```rust
//! use phase_scramble::spectrum::SourceSpectrum;
//! use phase_scramble::transform::Fft2d;
//!
//! let n = 4;
//! let mut fft = Fft2d::new(n).unwrap();
//! let spectrum = SourceSpectrum::analyze(&mut fft, &vec![1.0; n * n]).unwrap();
//!
//! // A constant grid has all its energy in the DC bin.
//! assert!((spectrum.magnitude()[0] - 16.0).abs() < 1e-9);
//! assert!(spectrum.original_phase()[0].abs() < 1e-9);
//! ```

use crate::transform::Fft2d;
use crate::types::{EngineResult, Sample};

/// Centered spatial frequency of a 1D bin index, in cycles per grid unit.
///
/// Indices above N/2 wrap to negative frequencies; index N/2 itself maps to
/// +1/2 (the Nyquist bin is self-conjugate either way).
#[inline]
pub fn bin_frequency(index: usize, n: usize) -> f64 {
    debug_assert!(index < n);
    let k = if index <= n / 2 {
        index as i64
    } else {
        index as i64 - n as i64
    };
    k as f64 / n as f64
}

/// Radial spatial frequency of bin (x, y): Euclidean distance from DC in
/// the centered convention.
#[inline]
pub fn radial_frequency(x: usize, y: usize, n: usize) -> f64 {
    let fx = bin_frequency(x, n);
    let fy = bin_frequency(y, n);
    (fx * fx + fy * fy).sqrt()
}

/// Immutable per-bin magnitude and phase of the source grid.
#[derive(Debug, Clone)]
pub struct SourceSpectrum {
    n: usize,
    magnitude: Vec<f64>,
    original_phase: Vec<f64>,
}

impl SourceSpectrum {
    /// Analyze an `n`×`n` real source grid (row-major, any fixed range).
    ///
    /// Runs once per engine lifetime; O(N² log N) and allowed to block.
    /// Errors if the grid length does not match the transform plan.
    pub fn analyze(fft: &mut Fft2d, source: &[Sample]) -> EngineResult<Self> {
        let spectrum = fft.forward_grid(source)?;
        let mut magnitude = Vec::with_capacity(spectrum.len());
        let mut original_phase = Vec::with_capacity(spectrum.len());
        for bin in &spectrum {
            magnitude.push(bin.norm());
            original_phase.push(bin.arg());
        }
        Ok(Self {
            n: fft.size(),
            magnitude,
            original_phase,
        })
    }

    /// Grid side length.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Per-bin magnitude |F|, row-major N×N.
    pub fn magnitude(&self) -> &[f64] {
        &self.magnitude
    }

    /// Per-bin original phase atan2(Im F, Re F) in (-π, π], row-major N×N.
    pub fn original_phase(&self) -> &[f64] {
        &self.original_phase
    }
}
