//! Core types for spectral phase-scramble synthesis
//!
//! This module defines the fundamental types used throughout the engine:
//! complex spectrum samples, the shared error type, and small phase-angle
//! helpers.
//!
//! ## Complex spectrum bins
//!
//! Every spatial-frequency bin of the synthesized spectrum is a complex
//! number whose magnitude carries the source image's energy at that
//! frequency and whose argument carries the (blended) phase:
//!
//! ```text
//!            Im
//!            ^
//!            |     * S = A·e^{iφ}
//!            |    /
//!            |   / magnitude A (fixed, from source)
//!            |  /  phase φ (scrambled per step)
//!            | /
//!   ---------+---------> Re
//!            |
//! ```
//!
//! ## Example
//!
//! ```rust
//! use phase_scramble::types::wrap_angle;
//! use std::f64::consts::PI;
//!
//! let wrapped = wrap_angle(3.5);
//! assert!((wrapped - (3.5 - 2.0 * PI)).abs() < 1e-12);
//! ```

use num_complex::Complex64;
use std::f64::consts::PI;

/// Type alias for complex numbers using f64 precision
pub type Complex = Complex64;

/// A floating point sample (real-valued grids: source image, output frame)
pub type Sample = f64;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur during engine construction and use
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("grid size {0} is not a power of two")]
    GridSizeNotPowerOfTwo(usize),

    #[error("source grid has {actual} samples, expected {expected} ({n}x{n})")]
    SourceSizeMismatch {
        n: usize,
        expected: usize,
        actual: usize,
    },

    #[error("step rate must be positive and finite, got {0} Hz")]
    InvalidStepRate(f64),

    #[error("evolution constant {name} must be positive and finite, got {value}")]
    InvalidEvolutionConstant { name: &'static str, value: f64 },

    #[error("max catch-up steps must be at least 1")]
    InvalidCatchupCap,

    #[error("no output available: no synthesis step has completed yet")]
    NotReady,

    #[error("failed to read config file {path}: {reason}")]
    ConfigRead { path: String, reason: String },

    #[error("failed to parse config: {0}")]
    ConfigParse(String),
}

const TWO_PI: f64 = 2.0 * PI;

/// Wrap a single angle to (-π, π].
#[inline]
pub fn wrap_angle(x: f64) -> f64 {
    let mut y = x % TWO_PI;
    if y > PI {
        y -= TWO_PI;
    } else if y <= -PI {
        y += TWO_PI;
    }
    y
}

/// Unit-modulus complex number at the given angle.
#[inline]
pub fn unit(angle: f64) -> Complex {
    Complex::from_polar(1.0, angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_angle_identity_in_range() {
        for &x in &[-3.0, -1.0, 0.0, 1.0, 3.0] {
            assert!((wrap_angle(x) - x).abs() < 1e-12);
        }
    }

    #[test]
    fn test_wrap_angle_beyond_pi() {
        let w = wrap_angle(PI + 0.5);
        assert!((w - (0.5 - PI)).abs() < 1e-12);
        let w = wrap_angle(-PI - 0.5);
        assert!((w - (PI - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_angle_many_turns() {
        let w = wrap_angle(10.0 * TWO_PI + 0.25);
        assert!((w - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_unit_has_modulus_one() {
        for i in 0..16 {
            let a = i as f64 * 0.4 - 3.0;
            assert!((unit(a).norm() - 1.0).abs() < 1e-15);
        }
    }

    #[test]
    fn test_error_display() {
        let e = EngineError::GridSizeNotPowerOfTwo(100);
        assert!(e.to_string().contains("100"));
        let e = EngineError::NotReady;
        assert!(e.to_string().contains("no synthesis step"));
    }
}
