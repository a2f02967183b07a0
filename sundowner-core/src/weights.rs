//! Weighting coefficients blending the score components.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coefficients applied to each score component when computing the overall
/// score.
///
/// The calculator applies the weights as given. Callers wanting an overall
/// score within `0.0..=1.0` should supply weights summing to one.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeightConfig {
    /// Multiplier for the Wilson vote score.
    pub vote: f64,
    /// Multiplier for the time-of-day recency score.
    pub day_offset: f64,
    /// Multiplier for the time-of-week recency score.
    pub week_offset: f64,
}

/// Errors returned by [`WeightConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeightConfigError {
    /// A weight was NaN or infinite.
    #[error("{field} weight must be finite")]
    NonFinite {
        /// Name of the offending weight.
        field: &'static str,
    },
    /// A weight was below zero.
    #[error("{field} weight must not be negative")]
    Negative {
        /// Name of the offending weight.
        field: &'static str,
    },
}

impl WeightConfig {
    /// Build a weight set.
    #[must_use]
    pub const fn new(vote: f64, day_offset: f64, week_offset: f64) -> Self {
        Self {
            vote,
            day_offset,
            week_offset,
        }
    }

    /// Check that every weight is finite and non-negative.
    ///
    /// The sum is not checked.
    ///
    /// # Errors
    /// Returns [`WeightConfigError`] naming the first invalid field.
    ///
    /// # Examples
    ///
    /// ```
    /// use sundowner_core::{WeightConfig, WeightConfigError};
    ///
    /// assert!(WeightConfig::default().validate().is_ok());
    /// let err = WeightConfig::new(f64::NAN, 0.3, 0.1).validate().unwrap_err();
    /// assert_eq!(err, WeightConfigError::NonFinite { field: "vote" });
    /// ```
    pub fn validate(self) -> Result<Self, WeightConfigError> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(WeightConfigError::NonFinite { field });
            }
            if value < 0.0 {
                return Err(WeightConfigError::Negative { field });
            }
        }
        Ok(self)
    }

    const fn fields(self) -> [(&'static str, f64); 3] {
        [
            ("vote", self.vote),
            ("day_offset", self.day_offset),
            ("week_offset", self.week_offset),
        ]
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self::new(0.8, 0.3, 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WeightConfig::new(-0.1, 0.3, 0.1), WeightConfigError::Negative { field: "vote" })]
    #[case(WeightConfig::new(0.8, f64::INFINITY, 0.1), WeightConfigError::NonFinite { field: "day_offset" })]
    #[case(WeightConfig::new(0.8, 0.3, f64::NAN), WeightConfigError::NonFinite { field: "week_offset" })]
    fn rejects_invalid_weights(#[case] weights: WeightConfig, #[case] expected: WeightConfigError) {
        assert_eq!(weights.validate(), Err(expected));
    }

    #[rstest]
    fn accepts_weights_not_summing_to_one() {
        let weights = WeightConfig::new(2.0, 0.0, 5.0);
        assert_eq!(weights.validate(), Ok(weights));
    }
}
