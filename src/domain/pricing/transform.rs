use crate::domain::errors::PredictionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target transform applied to prices at training time.
///
/// The model predicts in the transformed ("log-price") space, so every
/// prediction must go through the matching inverse before it is returned.
/// `Log1p` and `Log` are not interchangeable: `exp` applied to a `log1p`
/// target overshoots every price by one unit and the error grows relative to
/// small prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetTransform {
    /// `y = ln(1 + price)`, inverted with `expm1`.
    Log1p,
    /// `y = ln(price)`, inverted with `exp`.
    Log,
}

impl TargetTransform {
    /// Training-time direction: price to log-price.
    pub fn forward(self, price: f64) -> f64 {
        match self {
            TargetTransform::Log1p => price.ln_1p(),
            TargetTransform::Log => price.ln(),
        }
    }

    /// Log-price back to price, unrounded.
    pub fn inverse(self, y_log: f64) -> f64 {
        match self {
            TargetTransform::Log1p => y_log.exp_m1(),
            TargetTransform::Log => y_log.exp(),
        }
    }

    /// Inverse transform followed by rounding to a whole unit.
    ///
    /// Ties round to even (banker's rounding).
    pub fn detransform(self, y_log: f64) -> Result<f64, PredictionError> {
        let price = self.inverse(y_log);
        if !price.is_finite() {
            return Err(PredictionError::NonFinite { value: price });
        }
        Ok(price.round_ties_even())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetTransform::Log1p => "log1p",
            TargetTransform::Log => "log",
        }
    }
}

impl fmt::Display for TargetTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log1p_round_trip() {
        let t = TargetTransform::Log1p;
        let price = 250_000.0;
        assert!((t.inverse(t.forward(price)) - price).abs() < 1e-6);
    }

    #[test]
    fn test_log_round_trip() {
        let t = TargetTransform::Log;
        let price = 250_000.0;
        assert!((t.inverse(t.forward(price)) - price).abs() < 1e-6);
    }

    #[test]
    fn test_inverses_are_not_interchangeable() {
        let y = TargetTransform::Log1p.forward(10.0);
        let right = TargetTransform::Log1p.inverse(y);
        let wrong = TargetTransform::Log.inverse(y);
        assert!((right - 10.0).abs() < 1e-9);
        assert!((wrong - right - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_detransform_rounds_to_whole_units() {
        let y = TargetTransform::Log.forward(199_999.6);
        assert_eq!(TargetTransform::Log.detransform(y).unwrap(), 200_000.0);
    }

    #[test]
    fn test_detransform_ties_to_even() {
        // Both inverses recover these halves exactly, so the tie reaches the rounding.
        for t in [TargetTransform::Log, TargetTransform::Log1p] {
            assert_eq!(t.inverse(t.forward(0.5)), 0.5);
            assert_eq!(t.detransform(t.forward(0.5)).unwrap(), 0.0);
            assert_eq!(t.inverse(t.forward(2.5)), 2.5);
            assert_eq!(t.detransform(t.forward(2.5)).unwrap(), 2.0);
        }
    }

    #[test]
    fn test_detransform_rejects_overflow() {
        let result = TargetTransform::Log.detransform(1_000.0);
        assert!(matches!(result, Err(PredictionError::NonFinite { .. })));
    }

    #[test]
    fn test_serde_names() {
        let t: TargetTransform = serde_json::from_str("\"log1p\"").unwrap();
        assert_eq!(t, TargetTransform::Log1p);
        assert_eq!(serde_json::to_string(&TargetTransform::Log).unwrap(), "\"log\"");
    }
}
