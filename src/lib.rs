//! # Spectral Phase-Scramble Synthesis Engine
//!
//! Synthesizes a real-valued 2D stimulus frame whose Fourier magnitude
//! spectrum is fixed (taken from a source image) while its phase spectrum
//! is continuously, controllably randomized — a perceptually tunable morph
//! between a recognizable image and pure noise, with optional apparent
//! motion.
//!
//! ## Pipeline
//!
//! ```text
//! source grid ──► forward FFT ──► magnitude A, phase φ0    (once)
//!
//! per step:
//!   phasor field P ──► advance (OU on unit circle, τ(r) per bin)
//!   spectrum S = A·e^{i(mix(φ0, ∠P, s) + ramp(dx,dy))}     (Hermitian)
//!   output O = Re(inverse FFT of S)
//!
//! tick(dt) ──► frame clock ──► 0..k steps (fixed rate, capped catch-up)
//! ```
//!
//! The scramble factor `s` blends the original and random phase per bin
//! (circular vector blend, not angle lerp); the phasor field gives low
//! spatial frequencies slow drift and high frequencies fast shimmer; a
//! linear phase ramp translates the reconstructed frame toroidally. The
//! synthesized spectrum is conjugate-symmetric by direct assignment, so
//! the inverse transform is real by construction.
//!
//! Everything is deterministic: random draws are pure functions of
//! (seed, bin, step), so identical configurations and tick sequences
//! replay bit-identically.
//!
//! ## Example
//!
//! ```rust
//! use phase_scramble::prelude::*;
//!
//! let n = 32;
//! let source: Vec<f64> = (0..n * n)
//!     .map(|i| ((i % n) + (i / n)) as f64 / (2 * n) as f64)
//!     .collect();
//!
//! let config = EngineConfig {
//!     grid_size: n,
//!     scramble: 0.5,
//!     velocity_x: 1.0,
//!     ..Default::default()
//! };
//! let mut engine = Engine::new(config, &source).unwrap();
//!
//! // Host loop: feed elapsed time, read frames when ready.
//! engine.tick(1.0 / 30.0);
//! let frame = engine.output().unwrap();
//! assert_eq!(frame.len(), n * n);
//!
//! engine.set_scramble(1.0); // pure noise from the next step on
//! ```

pub mod config;
pub mod engine;
pub mod frame_clock;
pub mod phasor;
pub mod rng;
pub mod spectrum;
pub mod synth;
pub mod transform;
pub mod types;

/// Common imports for engine hosts.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::engine::Engine;
    pub use crate::types::{Complex, EngineError, EngineResult, Sample};
}
