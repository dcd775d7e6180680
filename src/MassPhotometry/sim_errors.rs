/////////////////////ERROR HANDLING////////////////////////////////////////////////////////
use thiserror::Error;

/// Errors raised while generating synthetic mass photometry data.
///
/// `InvalidParameter` is a recoverable input problem. `InvariantViolation` means the
/// equilibrium algebra produced a state that breaks mass balance or fraction
/// conservation; it is an internal-consistency fault and callers must not swallow it.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error("noise distribution error: {0}")]
    Distribution(String),
    #[error("condition mismatch: {0}")]
    ConditionMismatch(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

impl SimulationError {
    /// true for faults that indicate broken equilibrium algebra rather than bad input
    pub fn is_internal_fault(&self) -> bool {
        matches!(self, SimulationError::InvariantViolation(_))
    }
}

/// Fails with `InvalidParameter` unless `value` is finite and strictly positive.
pub fn ensure_positive(name: &str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidParameter(format!(
            "{} must be a positive finite number, got {}",
            name, value
        )))
    }
}
////////////////////////////////////////////////////////////////////////////////////////////
