//! Method descriptors for the surrogate constructions.
//!
//! A [`SurrogateMethod`] is an immutable description of *how* to randomize;
//! it carries no signal-dependent state. Field values are validated when a
//! generator is built, against the concrete signal, never at draw time.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Available surrogate constructions.
///
/// Each variant implements a distinct null hypothesis: which statistical
/// properties of the input are preserved and which are destroyed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SurrogateMethod {
    /// Full uniform permutation of the signal values. Destroys all temporal
    /// correlation; preserves the exact value multiset.
    RandomShuffle,
    /// Circular rotation of the signal. Preserves all pointwise structure;
    /// only the phase/alignment changes.
    CircShift(ShiftSpec),
    /// Partition the signal into contiguous blocks of near-equal length and
    /// permute the blocks. Preserves correlation within blocks; destroys it
    /// across block boundaries.
    BlockShuffle {
        /// Number of blocks; must satisfy `2 <= n_blocks < signal length`
        n_blocks: usize,
    },
    /// Partition the signal at the local maxima of a Gaussian-smoothed copy
    /// and permute the resulting cycles.
    CycleShuffle(CycleShuffleConfig),
    /// Permute the components within each point of a multivariate signal
    /// independently. Destroys cross-dimension structure; preserves the
    /// temporal sequence of points.
    ShuffleDimensions,
    /// Amplitude Adjusted Fourier Transform: rank-remap a phase-randomized
    /// draw onto the original values. Preserves the amplitude distribution
    /// exactly and the power spectrum approximately.
    Aaft,
    /// Iterative AAFT: alternately impose the original amplitude spectrum
    /// and the original value distribution until convergence.
    Iaaft(IaaftConfig),
}

/// Shift amount specification for [`SurrogateMethod::CircShift`].
///
/// A fixed shift makes every draw identical, which is intentional when a
/// specific alignment is requested; a candidate set draws one shift
/// uniformly per call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShiftSpec {
    /// Rotate by exactly this amount on every draw. Positive values rotate
    /// right (`Fixed(2)` sends `[1,2,3,4,5]` to `[4,5,1,2,3]`), negative
    /// values rotate left.
    Fixed(isize),
    /// Draw one shift uniformly from this non-empty candidate set per call.
    Choices(Vec<isize>),
}

/// Configuration for [`SurrogateMethod::CycleShuffle`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CycleShuffleConfig {
    /// Width of the Gaussian smoothing window in samples
    pub window: usize,
    /// Standard deviation of the window as a fraction of its half-width
    pub sigma: f64,
}

impl Default for CycleShuffleConfig {
    fn default() -> Self {
        Self {
            window: 7,
            sigma: 0.5,
        }
    }
}

/// Configuration for [`SurrogateMethod::Iaaft`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IaaftConfig {
    /// Maximum refinement iterations per draw
    pub max_iterations: usize,
    /// Stop once the relative spectrum error improves by less than this
    /// between consecutive iterations
    pub tolerance: f64,
}

impl Default for IaaftConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

impl SurrogateMethod {
    /// Cycle shuffle with the default smoothing window.
    pub fn cycle_shuffle() -> Self {
        Self::CycleShuffle(CycleShuffleConfig::default())
    }

    /// Iterative AAFT with the default refinement budget.
    pub fn iaaft() -> Self {
        Self::Iaaft(IaaftConfig::default())
    }
}
