use crate::error::ValidationError;
use crate::forms::FilingStatus;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// SALT (state and local tax) deduction cap
pub const SALT_CAP: Decimal = dec!(10000);

/// Medical expenses are deductible only above this fraction of AGI
const MEDICAL_AGI_FLOOR: Decimal = dec!(0.075);

/// 2024 standard deduction by filing status
pub fn standard_deduction(status: FilingStatus) -> Decimal {
    match status {
        FilingStatus::Single => dec!(14600),
        FilingStatus::MarriedJoint => dec!(29200),
        FilingStatus::MarriedSeparate => dec!(14600),
        FilingStatus::HeadOfHousehold => dec!(21900),
    }
}

/// Itemized deduction breakdown, before limits are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ItemizedDeductions {
    #[schemars(with = "f64")]
    pub medical_expenses: Decimal,
    #[schemars(with = "f64")]
    pub state_local_taxes: Decimal,
    #[schemars(with = "f64")]
    pub mortgage_interest: Decimal,
    #[schemars(with = "f64")]
    pub charitable_contributions: Decimal,
    #[schemars(with = "f64")]
    pub casualty_losses: Decimal,
}

/// Total itemized deductions after limits: the 7.5%-of-AGI medical floor,
/// the SALT cap, and a zero floor on every component so negative entries
/// can never reduce the total.
pub fn itemized_total(
    deductions: &ItemizedDeductions,
    adjusted_gross_income: Decimal,
) -> Result<Decimal, ValidationError> {
    if adjusted_gross_income < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount {
            field: "adjusted_gross_income",
            value: adjusted_gross_income,
        });
    }

    let medical_threshold = MEDICAL_AGI_FLOOR * adjusted_gross_income;
    let allowable_medical = (deductions.medical_expenses - medical_threshold).max(Decimal::ZERO);
    let allowable_salt = deductions.state_local_taxes.min(SALT_CAP).max(Decimal::ZERO);

    let total = allowable_medical
        + allowable_salt
        + deductions.mortgage_interest.max(Decimal::ZERO)
        + deductions.charitable_contributions.max(Decimal::ZERO)
        + deductions.casualty_losses.max(Decimal::ZERO);

    Ok(total.round_dp(2))
}

/// Deduction figures carried on the computed return.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeductionSummary {
    pub standard_deduction: Decimal,
    pub itemized_deductions: Decimal,
    pub deduction_taken: Decimal,
}

/// The deduction actually used is always the greater of standard and
/// itemized; there is no force-itemize mode.
pub fn best_deduction(status: FilingStatus, itemized: Decimal) -> DeductionSummary {
    let standard = standard_deduction(status);
    DeductionSummary {
        standard_deduction: standard,
        itemized_deductions: itemized,
        deduction_taken: standard.max(itemized),
    }
}
