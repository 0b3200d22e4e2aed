use crate::error::ValidationError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Depreciation rates for the filing year. Federal and state pools are
/// computed with independent bonus rates because many states disallow
/// bonus depreciation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct TaxConfig {
    /// First-year bonus depreciation rate (0.0 - 1.0)
    #[schemars(with = "f64")]
    pub bonus_rate: Decimal,
    /// State bonus depreciation rate (0.0 - 1.0), often zero
    #[schemars(with = "f64")]
    pub state_bonus_rate: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        // 2024 federal bonus percentage; states commonly decouple entirely
        TaxConfig {
            bonus_rate: dec!(0.60),
            state_bonus_rate: Decimal::ZERO,
        }
    }
}

impl TaxConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        rate_in_unit_interval("bonus_rate", self.bonus_rate)?;
        rate_in_unit_interval("state_bonus_rate", self.state_bonus_rate)?;
        Ok(())
    }
}

/// Thresholds for the audit risk rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Section 179 total above which a return draws attention. This is a
    /// screening threshold, distinct from the statutory cap the compliance
    /// engine enforces.
    #[schemars(with = "f64")]
    pub section179_soft_limit: Decimal,
}

impl Default for AuditConfig {
    fn default() -> Self {
        AuditConfig {
            section179_soft_limit: dec!(1000000),
        }
    }
}

impl AuditConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.section179_soft_limit < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount {
                field: "section179_soft_limit",
                value: self.section179_soft_limit,
            });
        }
        Ok(())
    }
}

/// Full engine configuration, resolved and validated once at engine
/// construction time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub tax: TaxConfig,
    pub audit: AuditConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.tax.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

fn rate_in_unit_interval(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ValidationError::RateOutOfRange { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn bonus_rate_above_one_rejected() {
        let cfg = TaxConfig {
            bonus_rate: dec!(1.5),
            state_bonus_rate: Decimal::ZERO,
        };
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::RateOutOfRange {
                field: "bonus_rate",
                value: dec!(1.5)
            })
        );
    }

    #[test]
    fn negative_state_rate_rejected() {
        let cfg = TaxConfig {
            bonus_rate: dec!(0.60),
            state_bonus_rate: dec!(-0.1),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn negative_soft_limit_rejected() {
        let cfg = AuditConfig {
            section179_soft_limit: dec!(-1),
        };
        assert!(cfg.validate().is_err());
    }
}
