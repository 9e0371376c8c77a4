//! Phase-Scramble Engine
//!
//! The engine facade ties the pipeline together: one-time source analysis
//! at construction, then per-tick synthesis steps gated by the frame
//! clock. Each step runs, in order:
//!
//! ```text
//! advance (dx,dy) ─► phasor advance ─► spectrum synthesis ─► inverse FFT
//!                                                                 │
//!                                  output frame (real part) ◄─────┘
//! ```
//!
//! Steps are strictly sequential (each step's phasor state feeds the
//! next), and live parameters are sampled once at the start of a step so
//! the two numeric phases never see a torn update. Output is
//! double-buffered: the consumer keeps reading frame k while frame k+1 is
//! written.
//!
//! ## Example
//!
//! ```rust
//! use phase_scramble::config::EngineConfig;
//! use phase_scramble::engine::Engine;
//!
//! let n = 16;
//! let source: Vec<f64> = (0..n * n).map(|i| (i % n) as f64 / n as f64).collect();
//! let config = EngineConfig {
//!     grid_size: n,
//!     scramble: 0.5,
//!     ..Default::default()
//! };
//! let mut engine = Engine::new(config, &source).unwrap();
//!
//! assert!(engine.output().is_err()); // nothing synthesized yet
//! let steps = engine.tick(0.1);      // 100 ms at 60 Hz: several steps
//! assert!(steps > 0);
//! assert_eq!(engine.output().unwrap().len(), n * n);
//! ```

use crate::config::EngineConfig;
use crate::frame_clock::FrameClock;
use crate::phasor::PhasorField;
use crate::spectrum::SourceSpectrum;
use crate::synth::SpectrumSynthesizer;
use crate::transform::Fft2d;
use crate::types::{Complex, EngineError, EngineResult, Sample};

/// Spectral phase-scramble synthesis engine for one source grid.
#[derive(Debug, Clone)]
pub struct Engine {
    fft: Fft2d,
    source: SourceSpectrum,
    phasors: PhasorField,
    synth: SpectrumSynthesizer,
    clock: FrameClock,
    /// Live parameters, sampled atomically at the start of each step.
    scramble: f64,
    velocity: (f64, f64),
    /// Accumulated translation offset in grid cells.
    offset: (f64, f64),
    step_count: u64,
    /// Scratch spectrum, rebuilt fully every step.
    spectrum: Vec<Complex>,
    /// Double-buffered output: `front` is the latest completed frame.
    front: Vec<Sample>,
    back: Vec<Sample>,
    ready: bool,
    last_im_residual: f64,
}

impl Engine {
    /// Build an engine from a validated configuration and an N×N source
    /// grid (row-major, normalized range).
    ///
    /// This is the only blocking call: it runs the forward transform on
    /// the source. All configuration errors surface here, before any step
    /// can run.
    pub fn new(config: EngineConfig, source_grid: &[Sample]) -> EngineResult<Self> {
        config.validate()?;
        let n = config.grid_size;
        let mut fft = Fft2d::new(n)?;
        let source = SourceSpectrum::analyze(&mut fft, source_grid)?;
        let phasors = PhasorField::new(
            n,
            config.seed,
            config.tau0_seconds,
            config.frequency_scale,
            config.gamma,
        );
        let clock = FrameClock::new(config.step_rate_hz, config.max_catchup_steps)?;
        tracing::debug!(
            grid_size = n,
            step_rate_hz = config.step_rate_hz,
            seed = config.seed,
            "phase-scramble engine initialized"
        );
        Ok(Self {
            fft,
            source,
            phasors,
            synth: SpectrumSynthesizer::new(n),
            clock,
            scramble: config.scramble.clamp(0.0, 1.0),
            velocity: (config.velocity_x, config.velocity_y),
            offset: (0.0, 0.0),
            step_count: 0,
            spectrum: vec![Complex::new(0.0, 0.0); n * n],
            front: vec![0.0; n * n],
            back: vec![0.0; n * n],
            ready: false,
            last_im_residual: 0.0,
        })
    }

    /// Advance the frame clock by `dt` seconds and run the synthesis steps
    /// it owes. Returns the number of steps executed (possibly zero).
    pub fn tick(&mut self, dt: f64) -> u32 {
        let steps = self.clock.tick(dt);
        for _ in 0..steps {
            self.step();
        }
        steps
    }

    /// One full synthesis step at the fixed step interval.
    fn step(&mut self) {
        // Sample live parameters once; both numeric phases below must see
        // the same values.
        let scramble = self.scramble;
        let (vx, vy) = self.velocity;
        let dt = self.clock.interval();

        self.offset.0 += vx * dt;
        self.offset.1 += vy * dt;
        self.phasors.advance(dt);
        self.synth.synthesize(
            self.source.magnitude(),
            self.source.original_phase(),
            self.phasors.phasors(),
            scramble,
            self.offset,
            &mut self.spectrum,
        );
        self.fft.inverse_grid_inplace(&mut self.spectrum);

        // The spectrum is Hermitian by construction, so the inverse is real
        // up to floating-point noise. Track the residual instead of
        // discarding it blindly; a large residual means a symmetry bug.
        let mut max_im = 0.0f64;
        for (o, s) in self.back.iter_mut().zip(self.spectrum.iter()) {
            *o = s.re;
            max_im = max_im.max(s.im.abs());
        }
        self.last_im_residual = max_im;
        if max_im > 1e-3 {
            tracing::warn!(
                residual = max_im,
                "imaginary residual above tolerance after reconstruction"
            );
        }

        std::mem::swap(&mut self.front, &mut self.back);
        self.ready = true;
        self.step_count += 1;
        tracing::trace!(step = self.step_count, scramble, "synthesis step complete");
    }

    /// Latest completed output frame, row-major N×N.
    ///
    /// Errors with [`EngineError::NotReady`] until the first step has
    /// completed.
    pub fn output(&self) -> EngineResult<&[Sample]> {
        if self.ready {
            Ok(&self.front)
        } else {
            Err(EngineError::NotReady)
        }
    }

    /// Set the scramble blend factor; clamped to [0, 1], effective on the
    /// next step.
    pub fn set_scramble(&mut self, s: f64) {
        self.scramble = s.clamp(0.0, 1.0);
    }

    /// Current scramble blend factor.
    pub fn scramble(&self) -> f64 {
        self.scramble
    }

    /// Set the motion velocity in grid cells per second, effective on the
    /// next step.
    pub fn set_motion(&mut self, vx: f64, vy: f64) {
        self.velocity = (vx, vy);
    }

    /// Current motion velocity (vx, vy).
    pub fn velocity(&self) -> (f64, f64) {
        self.velocity
    }

    /// Grid side length N.
    pub fn grid_size(&self) -> usize {
        self.synth.size()
    }

    /// Completed synthesis steps since construction.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Largest |Im| seen in the last reconstruction (0.0 before the first
    /// step). Should stay within floating-point noise of zero.
    pub fn last_imaginary_residual(&self) -> f64 {
        self.last_im_residual
    }
}
