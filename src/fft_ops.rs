//! FFT plumbing shared by the spectral surrogate constructions.
//!
//! Phase randomization and iterative amplitude adjustment both transform the
//! same signal length many times, so FFT plans are cached process-wide with
//! LRU eviction. Planning is the expensive part of rustfft; executing a
//! cached plan is O(n log n) with no setup cost per draw.

use crate::errors::{SurrogateError, SurrogateResult};
use lru::LruCache;
use num_complex::Complex;
use rustfft::FftPlanner;
use std::num::NonZeroUsize;
use std::sync::LazyLock;
use std::sync::{Arc, Mutex};

/// Cache key for FFT plans, distinguishing forward and inverse transforms
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct FftCacheKey {
    size: usize,
    is_forward: bool,
}

type FftPlanCache = LruCache<FftCacheKey, Arc<dyn rustfft::Fft<f64> + Send + Sync>>;

/// Maximum cache size to bound memory held by retained plans
const MAX_CACHE_ENTRIES: usize = 64;
/// Maximum transform size to prevent runaway allocations (2^24 points)
const MAX_FFT_SIZE: usize = 1 << 24;

static FFT_CACHE: LazyLock<Mutex<FftPlanCache>> =
    LazyLock::new(|| Mutex::new(LruCache::new(NonZeroUsize::new(MAX_CACHE_ENTRIES).unwrap())));

/// Get a cached FFT plan (forward or inverse) with LRU eviction.
fn get_cached_fft_plan(
    size: usize,
    is_forward: bool,
) -> SurrogateResult<Arc<dyn rustfft::Fft<f64> + Send + Sync>> {
    if size == 0 {
        return Err(SurrogateError::InvalidParameter {
            parameter: "fft_size".to_string(),
            value: 0.0,
            constraint: "must be > 0".to_string(),
        });
    }
    if size > MAX_FFT_SIZE {
        return Err(SurrogateError::InvalidParameter {
            parameter: "fft_size".to_string(),
            value: size as f64,
            constraint: format!("must be <= {}", MAX_FFT_SIZE),
        });
    }

    let cache_key = FftCacheKey { size, is_forward };

    let mut cache = match FFT_CACHE.lock() {
        Ok(guard) => guard,
        // Recover from a poisoned mutex: the cache holds only plans, which
        // stay valid regardless of where another thread panicked.
        Err(poisoned) => poisoned.into_inner(),
    };

    if let Some(cached_fft) = cache.get(&cache_key) {
        return Ok(cached_fft.clone());
    }

    let mut planner = FftPlanner::new();
    let new_fft = if is_forward {
        planner.plan_fft_forward(size)
    } else {
        planner.plan_fft_inverse(size)
    };

    cache.put(cache_key, new_fft.clone());
    Ok(new_fft)
}

/// Get a cached forward FFT plan for the given transform size.
pub fn get_cached_fft_forward(
    size: usize,
) -> SurrogateResult<Arc<dyn rustfft::Fft<f64> + Send + Sync>> {
    get_cached_fft_plan(size, true)
}

/// Get a cached inverse FFT plan for the given transform size.
pub fn get_cached_fft_inverse(
    size: usize,
) -> SurrogateResult<Arc<dyn rustfft::Fft<f64> + Send + Sync>> {
    get_cached_fft_plan(size, false)
}

/// Forward-transform a real signal into its complex spectrum.
pub fn forward_spectrum(data: &[f64]) -> SurrogateResult<Vec<Complex<f64>>> {
    let fft = get_cached_fft_forward(data.len())?;
    let mut buffer: Vec<Complex<f64>> = data.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut buffer);
    Ok(buffer)
}

/// One-sided power spectrum `|X_k|^2` for `k` in `0..=n/2`.
///
/// Used by the iterative amplitude adjustment to measure how far a
/// candidate surrogate's spectrum has drifted from the target.
pub fn power_spectrum(data: &[f64]) -> SurrogateResult<Vec<f64>> {
    let spectrum = forward_spectrum(data)?;
    let n = spectrum.len();
    Ok(spectrum[..=n / 2].iter().map(|c| c.norm_sqr()).collect())
}
