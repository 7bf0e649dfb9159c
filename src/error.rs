//! Error type shared by the engine, stores and configuration loading.
//!
//! The recognition core itself has no runtime failure path: discretizing,
//! building and matching are total once their configuration validated.
//! Everything here is either a construction-time rejection or a failure of
//! the surrounding collaborators (names, files, documents).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GestureError {
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },
    #[error("pattern is empty after processing")]
    EmptyPattern,
    #[error("pattern name must not be blank")]
    InvalidName,
    #[error("a pattern named `{0}` already exists")]
    DuplicateName(String),
    #[error("no pattern named `{0}`")]
    PatternNotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GestureError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        GestureError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GestureError>;

/// Reject NaN, infinities and negative values for a tunable threshold.
pub(crate) fn ensure_non_negative(field: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(GestureError::invalid(
            field,
            format!("must be a finite non-negative number, got {value}"),
        ));
    }
    Ok(())
}

/// Reject values outside the closed unit interval.
pub(crate) fn ensure_unit_interval(field: &'static str, value: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(GestureError::invalid(
            field,
            format!("must lie in [0, 1], got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_message() {
        let err = GestureError::invalid("discretization", "must be a multiple of 4");
        assert_eq!(
            err.to_string(),
            "invalid configuration for `discretization`: must be a multiple of 4"
        );
    }

    #[test]
    fn test_threshold_guards() {
        assert!(ensure_non_negative("x", 0.0).is_ok());
        assert!(ensure_non_negative("x", -0.1).is_err());
        assert!(ensure_non_negative("x", f32::NAN).is_err());
        assert!(ensure_unit_interval("x", 1.0).is_ok());
        assert!(ensure_unit_interval("x", 1.01).is_err());
        assert!(ensure_unit_interval("x", f32::NAN).is_err());
    }
}
