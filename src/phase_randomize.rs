//! Set-up-once phase randomization.
//!
//! A [`PhaseRandomizer`] computes the forward FFT of its input exactly once
//! and keeps the complex spectrum. Every draw then randomizes the phases of
//! the stored spectrum under the two-sided (conjugate-symmetric) convention,
//! inverse-transforms, and restores the input's mean and variance. The
//! result has the same power spectrum as the input with independently
//! randomized phase.
//!
//! This is the nested generator consumed by the AAFT and IAAFT
//! constructions, and a usable surrogate source in its own right: it tests
//! the null hypothesis of a linear Gaussian process.

use crate::errors::{validate_all_finite, validate_data_length, SurrogateResult};
use crate::fft_ops::{forward_spectrum, get_cached_fft_inverse};
use crate::rng::SurrogateRng;
use num_complex::Complex;
use std::sync::Arc;

/// Stateful phase-randomization generator.
///
/// Holds the input's spectrum and summary statistics; draws mutate only the
/// supplied RNG and a reusable scratch buffer.
pub struct PhaseRandomizer {
    len: usize,
    spectrum: Vec<Complex<f64>>,
    inverse: Arc<dyn rustfft::Fft<f64> + Send + Sync>,
    scratch: Vec<Complex<f64>>,
    mean: f64,
    variance: f64,
}

impl PhaseRandomizer {
    /// Precompute the spectrum of `data` and plan the inverse transform.
    ///
    /// Fails on an empty or non-finite signal; a built randomizer cannot
    /// fail at draw time.
    pub fn build(data: &[f64]) -> SurrogateResult<Self> {
        validate_data_length(data, 1, "phase_randomize")?;
        validate_all_finite(data, "signal")?;

        let n = data.len();
        let spectrum = forward_spectrum(data)?;
        let inverse = get_cached_fft_inverse(n)?;

        let mean = data.iter().sum::<f64>() / n as f64;
        let variance = data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / n as f64;

        Ok(Self {
            len: n,
            scratch: vec![Complex::new(0.0, 0.0); n],
            spectrum,
            inverse,
            mean,
            variance,
        })
    }

    /// Length of the signal this randomizer was built against.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the underlying signal is empty. Always false for a built
    /// randomizer; present for slice-like API completeness.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Draw one phase-randomized realization.
    ///
    /// Magnitudes are taken from the stored spectrum exactly; phases of the
    /// positive-frequency bins are redrawn uniformly on `[0, 2pi)` and
    /// mirrored to the negative bins as complex conjugates. The DC and
    /// Nyquist bins stay real so the inverse transform is real-valued.
    pub fn draw(&mut self, rng: &mut SurrogateRng) -> Vec<f64> {
        let n = self.len;
        self.scratch.copy_from_slice(&self.spectrum);

        for i in 1..n / 2 {
            let magnitude = self.scratch[i].norm();
            let random_phase = 2.0 * std::f64::consts::PI * rng.f64();

            self.scratch[i] = Complex::from_polar(magnitude, random_phase);
            self.scratch[n - i] = self.scratch[i].conj();
        }

        self.scratch[0] = Complex::new(self.scratch[0].re, 0.0);
        if n % 2 == 0 {
            self.scratch[n / 2] = Complex::new(self.scratch[n / 2].re, 0.0);
        }

        self.inverse.process(&mut self.scratch);

        // rustfft does not normalize; the forward/inverse pair accumulates n
        let normalization = 1.0 / n as f64;
        let surrogate: Vec<f64> = self.scratch.iter().map(|c| c.re * normalization).collect();

        self.restore_moments(surrogate)
    }

    /// Rescale a draw to the original mean and variance.
    ///
    /// Phase randomization preserves total power but redistributes it
    /// between the DC offset and the fluctuations; matching the first two
    /// moments keeps standalone draws comparable to the input.
    fn restore_moments(&self, draw: Vec<f64>) -> Vec<f64> {
        let n = draw.len() as f64;
        let draw_mean = draw.iter().sum::<f64>() / n;
        let draw_var = draw
            .iter()
            .map(|&x| (x - draw_mean) * (x - draw_mean))
            .sum::<f64>()
            / n;

        if draw_var > 1e-10 {
            let scale = (self.variance / draw_var).sqrt();
            draw.iter()
                .map(|&x| (x - draw_mean) * scale + self.mean)
                .collect()
        } else {
            // Degenerate spectrum (constant input): nothing to rescale
            draw
        }
    }
}
