use crate::domain::pricing::request::{BASELINE_FIELDS, FieldSpec, POSTCODE_FIELDS};
use crate::domain::pricing::transform::TargetTransform;
use std::fmt;
use std::str::FromStr;

/// The two independently trained deployments.
///
/// They differ in request schema, feature schema source and target
/// transform, and are never unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PricingVariant {
    /// Optional EPC attributes plus sale year; feature list from metadata; `log1p` target.
    Baseline,
    /// Required attributes plus a raw postcode; fixed feature list; `log` target.
    Postcode,
}

impl PricingVariant {
    pub fn target_transform(self) -> TargetTransform {
        match self {
            PricingVariant::Baseline => TargetTransform::Log1p,
            PricingVariant::Postcode => TargetTransform::Log,
        }
    }

    pub fn request_fields(self) -> &'static [FieldSpec] {
        match self {
            PricingVariant::Baseline => BASELINE_FIELDS,
            PricingVariant::Postcode => POSTCODE_FIELDS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PricingVariant::Baseline => "baseline",
            PricingVariant::Postcode => "postcode",
        }
    }
}

impl fmt::Display for PricingVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "baseline" | "a" => Ok(PricingVariant::Baseline),
            "postcode" | "b" => Ok(PricingVariant::Postcode),
            _ => anyhow::bail!(
                "Invalid PRICING_VARIANT: {}. Must be 'baseline' or 'postcode'",
                s
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_transforms_differ() {
        assert_eq!(
            PricingVariant::Baseline.target_transform(),
            TargetTransform::Log1p
        );
        assert_eq!(PricingVariant::Postcode.target_transform(), TargetTransform::Log);
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!(
            "Postcode".parse::<PricingVariant>().unwrap(),
            PricingVariant::Postcode
        );
        assert_eq!("a".parse::<PricingVariant>().unwrap(), PricingVariant::Baseline);
        assert!("district".parse::<PricingVariant>().is_err());
    }

    #[test]
    fn test_postcode_fields_all_required() {
        assert!(PricingVariant::Postcode.request_fields().iter().all(|f| f.required));
        let required: Vec<&str> = PricingVariant::Baseline
            .request_fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        assert_eq!(required, vec!["year"]);
    }
}
