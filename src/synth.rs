//! Spectrum Synthesis — Phase Blend, Motion Ramp, Hermitian Mirroring
//!
//! Rebuilds the full complex spectrum every step from the fixed magnitude
//! field, the original phase, and the evolving random phasor field:
//!
//! ```text
//! φ_mix  = angle( (1−s)·e^{iφ0} + s·P )        circular blend, s ∈ [0,1]
//! φ_ramp = −2π·(fx·dx + fy·dy)                 global motion translation
//! S      = A · e^{i(φ_mix + φ_ramp)}
//! ```
//!
//! The blend is a vector sum, not an angle lerp: at s=0 the result is
//! exactly φ0, at s=1 exactly the phasor angle, and intermediate values
//! traverse the shorter arc. When the two unit vectors nearly cancel the
//! blend falls back to φ0.
//!
//! Only the primary half of the grid is computed; every remaining bin is
//! assigned the complex conjugate of its partner, so Hermitian symmetry
//! holds bitwise and the inverse transform is real by construction. The DC
//! bin and the four self-conjugate Nyquist bins are forced purely real
//! (±A).
//!
//! ## Example
//!
//! ```rust
//! use phase_scramble::synth::SpectrumSynthesizer;
//! use phase_scramble::types::Complex;
//!
//! let n = 4;
//! let synth = SpectrumSynthesizer::new(n);
//! let magnitude = vec![1.0; n * n];
//! let phase = vec![0.0; n * n];
//! let phasors = vec![Complex::new(0.0, 1.0); n * n];
//! let mut out = vec![Complex::new(0.0, 0.0); n * n];
//!
//! // s = 0: the original phase passes through untouched.
//! synth.synthesize(&magnitude, &phase, &phasors, 0.0, (0.0, 0.0), &mut out);
//! assert_eq!(out[n + 1], Complex::new(1.0, 0.0));
//! ```

use rayon::prelude::*;
use std::f64::consts::PI;

use crate::spectrum::bin_frequency;
use crate::types::{unit, Complex};

/// Below this squared modulus the circular blend is degenerate (the two
/// unit vectors cancel) and the original phase is used instead.
const BLEND_EPS: f64 = 1e-12;

/// Per-step spectrum builder for a fixed grid size.
#[derive(Debug, Clone)]
pub struct SpectrumSynthesizer {
    n: usize,
    /// Centered frequency per 1D index, cycles per grid unit.
    freq: Vec<f64>,
}

impl SpectrumSynthesizer {
    /// Create a synthesizer for an `n`×`n` grid (n validated upstream).
    pub fn new(n: usize) -> Self {
        let freq = (0..n).map(|k| bin_frequency(k, n)).collect();
        Self { n, freq }
    }

    /// Synthesize the full spectrum into `out`.
    ///
    /// `scramble` is clamped to [0, 1]; `offset` is the accumulated
    /// translation (dx, dy) in grid cells. Buffer lengths are an
    /// engine-internal contract.
    pub fn synthesize(
        &self,
        magnitude: &[f64],
        original_phase: &[f64],
        phasors: &[Complex],
        scramble: f64,
        offset: (f64, f64),
        out: &mut [Complex],
    ) {
        let n = self.n;
        let half = n / 2;
        assert_eq!(magnitude.len(), n * n);
        assert_eq!(original_phase.len(), n * n);
        assert_eq!(phasors.len(), n * n);
        assert_eq!(out.len(), n * n);

        let s = scramble.clamp(0.0, 1.0);
        let (dx, dy) = offset;
        let freq = &self.freq;

        // Primary half: rows 0..=N/2. Rows 0 and N/2 are their own
        // conjugate partners, mirrored within the row.
        out.par_chunks_mut(n).enumerate().for_each(|(y, row)| {
            if y > half {
                return;
            }
            let fy = freq[y];
            let self_conj_row = y == 0 || y == half;
            let x_end = if self_conj_row { half } else { n - 1 };
            for x in 0..=x_end {
                let bin = y * n + x;
                let a = magnitude[bin];
                let phi_mix = mix_phase(original_phase[bin], phasors[bin], s);
                let phi = phi_mix - 2.0 * PI * (freq[x] * dx + fy * dy);
                row[x] = if self_conj_row && (x == 0 || x == half) {
                    // DC / Nyquist self-conjugate bins: purely real ±A
                    Complex::new(if phi.cos() >= 0.0 { a } else { -a }, 0.0)
                } else {
                    Complex::from_polar(a, phi)
                };
            }
            if self_conj_row {
                for x in half + 1..n {
                    row[x] = row[n - x].conj();
                }
            }
        });

        // Mirror rows N/2+1..N from their partners by direct assignment so
        // symmetry is exact, not recomputed.
        let (head, tail) = out.split_at_mut((half + 1) * n);
        let head = &head[..];
        tail.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
            let y = half + 1 + i;
            let src = &head[(n - y) * n..(n - y + 1) * n];
            row[0] = src[0].conj();
            for x in 1..n {
                row[x] = src[n - x].conj();
            }
        });
    }

    /// Grid side length.
    pub fn size(&self) -> usize {
        self.n
    }
}

/// Circular blend of the original phase and the random phasor direction.
#[inline]
fn mix_phase(phi0: f64, phasor: Complex, s: f64) -> f64 {
    if s <= 0.0 {
        phi0
    } else if s >= 1.0 {
        phasor.arg()
    } else {
        let v = unit(phi0) * (1.0 - s) + phasor * s;
        if v.norm_sqr() < BLEND_EPS {
            phi0
        } else {
            v.arg()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phasor::PhasorField;
    use crate::spectrum::SourceSpectrum;
    use crate::transform::Fft2d;
    use crate::types::wrap_angle;

    fn test_source(n: usize) -> SourceSpectrum {
        let mut fft = Fft2d::new(n).unwrap();
        let grid: Vec<f64> = (0..n * n)
            .map(|i| (((i * 31 + 7) % 97) as f64 / 97.0) - 0.3)
            .collect();
        SourceSpectrum::analyze(&mut fft, &grid).unwrap()
    }

    fn synthesize_with(
        n: usize,
        scramble: f64,
        offset: (f64, f64),
        steps: u32,
    ) -> (SourceSpectrum, PhasorField, Vec<Complex>) {
        let source = test_source(n);
        let mut field = PhasorField::new(n, 11, 1.5, 0.02, 1.0);
        for _ in 0..steps {
            field.advance(0.05);
        }
        let synth = SpectrumSynthesizer::new(n);
        let mut out = vec![Complex::new(0.0, 0.0); n * n];
        synth.synthesize(
            source.magnitude(),
            source.original_phase(),
            field.phasors(),
            scramble,
            offset,
            &mut out,
        );
        (source, field, out)
    }

    #[test]
    fn test_hermitian_symmetry_is_bitwise() {
        let n = 16;
        let half = n / 2;
        let (_, _, out) = synthesize_with(n, 0.7, (0.3, -0.2), 3);
        for y in 0..n {
            for x in 0..n {
                let partner = out[((n - y) % n) * n + ((n - x) % n)];
                let here = out[y * n + x];
                if (x == 0 || x == half) && (y == 0 || y == half) {
                    assert_eq!(here.im, 0.0);
                } else {
                    assert_eq!(here.re.to_bits(), partner.re.to_bits());
                    assert_eq!(here.im.to_bits(), (-partner.im).to_bits());
                }
            }
        }
    }

    #[test]
    fn test_scramble_zero_preserves_original_phase() {
        let n = 16;
        let half = n / 2;
        let (source, _, out) = synthesize_with(n, 0.0, (0.0, 0.0), 5);
        for y in 0..n {
            for x in 0..n {
                if (x == 0 || x == half) && (y == 0 || y == half) {
                    continue;
                }
                let bin = y * n + x;
                let d = wrap_angle(out[bin].arg() - source.original_phase()[bin]);
                assert!(d.abs() < 1e-9, "phase drifted at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_scramble_one_uses_phasor_angle() {
        let n = 16;
        let half = n / 2;
        let (_, field, out) = synthesize_with(n, 1.0, (0.0, 0.0), 5);
        // Primary bins carry the phasor angle; mirrored bins its negation.
        for y in 1..half {
            for x in 0..n {
                let bin = y * n + x;
                let d = wrap_angle(out[bin].arg() - field.phasors()[bin].arg());
                assert!(d.abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_self_conjugate_bins_are_signed_magnitude() {
        let n = 8;
        let half = n / 2;
        let (source, _, out) = synthesize_with(n, 0.4, (0.1, 0.2), 2);
        for &y in &[0, half] {
            for &x in &[0, half] {
                let bin = y * n + x;
                assert_eq!(out[bin].im, 0.0);
                assert!((out[bin].re.abs() - source.magnitude()[bin]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_motion_ramp_applies_linear_phase() {
        let n = 16;
        let (source, _, out) = synthesize_with(n, 0.0, (1.0, 0.0), 0);
        // Bin (1, 0): fx = 1/n, so the ramp is exactly -2π/n.
        let expected = wrap_angle(source.original_phase()[1] - 2.0 * PI / n as f64);
        assert!(wrap_angle(out[1].arg() - expected).abs() < 1e-9);
        // Bin (0, 1): fy-only bin, dy = 0, so no ramp.
        assert!(wrap_angle(out[n].arg() - source.original_phase()[n]).abs() < 1e-9);
    }

    #[test]
    fn test_scramble_clamped_outside_unit_range() {
        let n = 8;
        let (_, _, low) = synthesize_with(n, -0.5, (0.0, 0.0), 4);
        let (_, _, zero) = synthesize_with(n, 0.0, (0.0, 0.0), 4);
        assert_eq!(low, zero);
        let (_, _, high) = synthesize_with(n, 1.5, (0.0, 0.0), 4);
        let (_, _, one) = synthesize_with(n, 1.0, (0.0, 0.0), 4);
        assert_eq!(high, one);
    }

    #[test]
    fn test_degenerate_blend_falls_back_to_original_phase() {
        // φ0 = 0 against a phasor at π with s = 0.5: the blend vector
        // cancels exactly, so the original phase wins.
        let n = 4;
        let synth = SpectrumSynthesizer::new(n);
        let magnitude = vec![2.0; n * n];
        let phase = vec![0.0; n * n];
        let phasors = vec![Complex::new(-1.0, 0.0); n * n];
        let mut out = vec![Complex::new(0.0, 0.0); n * n];
        synth.synthesize(&magnitude, &phase, &phasors, 0.5, (0.0, 0.0), &mut out);
        assert!((out[n + 1].re - 2.0).abs() < 1e-12);
        assert!(out[n + 1].im.abs() < 1e-12);
    }

    #[test]
    fn test_blend_traverses_shorter_arc() {
        let p = unit(0.8);
        let mid = mix_phase(0.2, p, 0.5);
        assert!((mid - 0.5).abs() < 1e-12);
        // Across the ±π seam: 3.0 and -3.0 blend near ±π, not near 0.
        let mid = mix_phase(3.0, unit(-3.0), 0.5);
        assert!(mid.abs() > 3.0 || (mid.abs() - PI).abs() < 0.2);
    }
}
