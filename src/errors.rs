//! Error types and validation functions for surrogate generation.
//!
//! All validation happens eagerly when a generator is built, so that
//! ensemble-generation loops never need per-draw error handling. Once a
//! generator has been constructed successfully, drawing from it cannot fail.

use thiserror::Error;

/// Errors raised while validating a surrogate method against a signal.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SurrogateError {
    /// Signal too short for the requested surrogate construction.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required number of samples
        required: usize,
        /// Actual number of samples provided
        actual: usize,
    },

    /// Invalid parameter value in a method descriptor.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// Signal dimensionality does not match the requested method.
    #[error("Dimensionality mismatch: method requires {required} dimensions, signal has {actual}")]
    DimensionalityMismatch {
        /// Minimum number of dimensions the method requires
        required: usize,
        /// Number of dimensions the signal actually has
        actual: usize,
    },

    /// Numerical problem in the input data or a spectral transform.
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for the numerical failure
        reason: String,
    },
}

/// Result type for surrogate generation operations.
///
/// Convenience alias for operations that may fail with [`SurrogateError`].
pub type SurrogateResult<T> = Result<T, SurrogateError>;

/// Validates that a signal has sufficient length for a surrogate method.
///
/// # Arguments
/// * `data` - Input time series data
/// * `min_required` - Minimum number of samples required
/// * `operation` - Name of the operation requiring the data
///
/// # Example
/// ```rust
/// use surrogate_series::errors::validate_data_length;
///
/// let data = vec![1.0, 2.0, 3.0];
/// assert!(validate_data_length(&data, 2, "circ_shift").is_ok());
/// assert!(validate_data_length(&data, 5, "circ_shift").is_err());
/// ```
pub fn validate_data_length(
    data: &[f64],
    min_required: usize,
    _operation: &str,
) -> SurrogateResult<()> {
    if data.len() < min_required {
        Err(SurrogateError::InsufficientData {
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Validates that a parameter is within expected bounds (inclusive).
///
/// # Arguments
/// * `value` - Parameter value to validate
/// * `min` - Minimum acceptable value
/// * `max` - Maximum acceptable value
/// * `name` - Parameter name for error reporting
pub fn validate_parameter(value: f64, min: f64, max: f64, name: &str) -> SurrogateResult<()> {
    if value.is_nan() {
        return Err(SurrogateError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "must not be NaN".to_string(),
        });
    }

    if value < min || value > max {
        Err(SurrogateError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: format!("[{}, {}]", min, max),
        })
    } else {
        Ok(())
    }
}

/// Validates that all values in a slice are finite.
///
/// Returns immediately on the first non-finite value. Surrogate
/// constructions that sort or FFT the input rely on every sample being
/// finite, so builders call this up front rather than discovering NaN
/// ordering problems mid-draw.
///
/// # Example
/// ```rust
/// use surrogate_series::errors::validate_all_finite;
///
/// assert!(validate_all_finite(&[1.0, 2.0, 3.0], "signal").is_ok());
/// assert!(validate_all_finite(&[1.0, f64::NAN], "signal").is_err());
/// ```
pub fn validate_all_finite(data: &[f64], name: &str) -> SurrogateResult<()> {
    if let Some((i, &value)) = data.iter().enumerate().find(|(_, &v)| !v.is_finite()) {
        let value_desc = if value.is_nan() {
            "NaN".to_string()
        } else if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };

        return Err(SurrogateError::NumericalError {
            reason: format!(
                "{} contains non-finite value at index {}: {}",
                name, i, value_desc
            ),
        });
    }

    Ok(())
}
