//! # Surrogate Time Series Generation
//!
//! This crate generates *surrogate* time series: randomized realizations of
//! an input signal that preserve selected statistical properties (amplitude
//! distribution, power spectrum, short-range correlation) while destroying
//! others (long-range deterministic structure). Ensembles of surrogates are
//! the standard machinery for testing null hypotheses about nonlinearity
//! and dynamical structure in observed data.
//!
//! ## Design
//!
//! Every construction follows a set-up-once, sample-many contract:
//!
//! 1. Describe *how* to randomize with a [`SurrogateMethod`] descriptor.
//! 2. [`SurrogateGenerator::build`] validates the descriptor against the
//!    concrete signal and performs all randomness-independent work once
//!    (block partitioning, smoothing and peak detection, FFT planning,
//!    sorting).
//! 3. Each [`generate`](SurrogateGenerator::generate) call draws one
//!    independent surrogate, consuming randomness from the generator's own
//!    [`SurrogateRng`]; a built generator cannot fail.
//!
//! Validation is fully front-loaded: ensemble loops never handle errors.
//!
//! ## Available constructions
//!
//! - **RandomShuffle**: full permutation; destroys all temporal structure
//! - **CircShift**: circular rotation; only the alignment changes
//! - **BlockShuffle**: near-equal contiguous blocks, reordered (never in
//!   the identity order) after a random rotation
//! - **CycleShuffle**: blocks delimited by the peaks of a Gaussian-smoothed
//!   copy, permuted with boundary samples fixed in place
//! - **ShuffleDimensions**: per-point component permutation for
//!   multivariate series (see [`DimensionShuffleGenerator`])
//! - **AAFT / IAAFT**: phase-randomized draws rank-remapped onto the
//!   original values, preserving the amplitude distribution exactly
//!
//! ## Quick Start
//!
//! ```rust
//! use surrogate_series::{SurrogateGenerator, SurrogateMethod, SurrogateRng};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let signal: Vec<f64> = (0..256).map(|i| (i as f64 / 10.0).sin()).collect();
//!
//!     let mut generator = SurrogateGenerator::build(
//!         &signal,
//!         SurrogateMethod::Aaft,
//!         SurrogateRng::with_seed(42),
//!     )?;
//!
//!     // Draw an ensemble; each surrogate is an exact permutation of the
//!     // input values with approximately the input's power spectrum.
//!     let ensemble = generator.generate_ensemble(200);
//!     assert_eq!(ensemble.len(), 200);
//!     assert_eq!(ensemble[0].len(), signal.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! Draws from one generator are sequential; the generator owns its RNG and
//! mutates it per call. For parallel ensemble generation, build one
//! generator per worker with independently seeded contexts — see
//! [`rng::mix_seed`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod fft_ops;
pub mod generator;
pub mod methods;
pub mod multivariate;
pub mod phase_randomize;
pub mod rng;
pub mod smoothing;

pub use errors::{SurrogateError, SurrogateResult};
pub use generator::{circular_rotate, SurrogateGenerator};
pub use methods::{CycleShuffleConfig, IaaftConfig, ShiftSpec, SurrogateMethod};
pub use multivariate::{DimensionShuffleGenerator, PointSeries};
pub use phase_randomize::PhaseRandomizer;
pub use rng::{mix_seed, SurrogateRng};
