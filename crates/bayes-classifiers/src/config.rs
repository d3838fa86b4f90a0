use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

/// Estimation settings for the Gaussian Naive Bayes model.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Added to every defined per-class variance after estimation.
    /// Zero keeps the plain population variance.
    pub var_smoothing: f64,
}

impl ModelConfig {
    pub fn new(var_smoothing: f64) -> Self {
        Self { var_smoothing }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.var_smoothing.is_finite() || self.var_smoothing < 0.0 {
            return Err(ClassifierError::InvalidParameter {
                name: "var_smoothing".to_string(),
                value: self.var_smoothing.to_string(),
                reason: "must be a finite, non-negative number".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self { var_smoothing: 0.0 }
    }
}
