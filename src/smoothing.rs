//! Gaussian smoothing primitives for peak-based block partitioning.
//!
//! Cycle shuffling delimits blocks at the local maxima of a smoothed copy
//! of the signal. The smoothing here is a plain Gaussian window applied by
//! full linear convolution; the result is trimmed back to the input length
//! before peak detection.

/// Symmetric Gaussian window of `n` samples.
///
/// `sigma` is the standard deviation expressed as a fraction of the window
/// half-width, so the same `sigma` gives the same relative taper at any `n`:
/// `w_i = exp(-((i - (n-1)/2) / (sigma * (n-1)/2))^2 / 2)`.
pub fn gaussian_kernel(n: usize, sigma: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![1.0];
    }

    let half_width = (n - 1) as f64 / 2.0;
    (0..n)
        .map(|i| {
            let x = (i as f64 - half_width) / (sigma * half_width);
            (-0.5 * x * x).exp()
        })
        .collect()
}

/// Full linear convolution of `signal` with `kernel`.
///
/// Output length is `signal.len() + kernel.len() - 1`. Returns an empty
/// vector if either input is empty.
pub fn convolve(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }

    let out_len = signal.len() + kernel.len() - 1;
    let mut result = vec![0.0; out_len];
    for (i, &s) in signal.iter().enumerate() {
        for (j, &k) in kernel.iter().enumerate() {
            result[i + j] += s * k;
        }
    }
    result
}

/// Trim a full convolution result back to `target_len` samples.
///
/// The excess is discarded symmetrically; when it is odd, the extra sample
/// comes off the trailing side.
pub fn trim_convolution(conv: &[f64], target_len: usize) -> Vec<f64> {
    debug_assert!(conv.len() >= target_len);
    let excess = conv.len() - target_len;
    let front = excess / 2;
    conv[front..front + target_len].to_vec()
}

/// Indices of strict interior local maxima: `data[i-1] < data[i] > data[i+1]`.
///
/// The first and last samples are never peaks.
pub fn local_maxima(data: &[f64]) -> Vec<usize> {
    if data.len() < 3 {
        return Vec::new();
    }

    (1..data.len() - 1)
        .filter(|&i| data[i - 1] < data[i] && data[i] > data[i + 1])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_kernel_symmetry() {
        let kernel = gaussian_kernel(7, 0.5);
        assert_eq!(kernel.len(), 7);
        for i in 0..kernel.len() {
            assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < 1e-12);
        }
        // Center sample is the mode
        assert_eq!(kernel[3], 1.0);
        assert!(kernel[0] < kernel[1] && kernel[1] < kernel[2] && kernel[2] < kernel[3]);
    }

    #[test]
    fn test_gaussian_kernel_degenerate_sizes() {
        assert!(gaussian_kernel(0, 0.5).is_empty());
        assert_eq!(gaussian_kernel(1, 0.5), vec![1.0]);
    }

    #[test]
    fn test_gaussian_kernel_wider_sigma_flatter_taper() {
        let narrow = gaussian_kernel(7, 0.25);
        let wide = gaussian_kernel(7, 1.0);
        assert!(narrow[0] < wide[0]);
    }

    #[test]
    fn test_convolve_lengths_and_identity() {
        let signal = vec![1.0, 2.0, 3.0, 4.0];
        let conv = convolve(&signal, &[1.0]);
        assert_eq!(conv, signal);

        let kernel = vec![0.5, 0.5];
        let conv = convolve(&signal, &kernel);
        assert_eq!(conv.len(), 5);
        assert!((conv[0] - 0.5).abs() < 1e-12);
        assert!((conv[1] - 1.5).abs() < 1e-12);
        assert!((conv[4] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_convolve_empty_inputs() {
        assert!(convolve(&[], &[1.0]).is_empty());
        assert!(convolve(&[1.0], &[]).is_empty());
    }

    #[test]
    fn test_trim_convolution_symmetric() {
        // Even excess: equal trim on both sides
        let conv: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let trimmed = trim_convolution(&conv, 6);
        assert_eq!(trimmed, vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);

        // Odd excess: one extra sample off the trailing side
        let trimmed = trim_convolution(&conv, 7);
        assert_eq!(trimmed, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_local_maxima_interior_only() {
        let data = vec![5.0, 1.0, 4.0, 1.0, 2.0, 1.0, 9.0];
        // Indices 0 and 6 hold the largest values but are boundary samples
        assert_eq!(local_maxima(&data), vec![2, 4]);
    }

    #[test]
    fn test_local_maxima_plateau_not_peak() {
        // Strict inequality on both sides: plateaus are not peaks
        let data = vec![0.0, 2.0, 2.0, 0.0];
        assert!(local_maxima(&data).is_empty());
    }

    #[test]
    fn test_local_maxima_short_input() {
        assert!(local_maxima(&[1.0, 2.0]).is_empty());
        assert!(local_maxima(&[]).is_empty());
    }
}
