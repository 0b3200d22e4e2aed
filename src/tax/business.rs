//! Schedule C business income, self-employment tax, and the QBI deduction.

use crate::error::ValidationError;
use crate::forms::FilingStatus;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Net SE earnings factor (Schedule SE line 4a)
pub const SE_INCOME_FACTOR: Decimal = dec!(0.9235);
/// Combined OASDI + Medicare rate. This flat rate is the single source of
/// truth for SE tax; the wage-base-capped OASDI split is intentionally not
/// implemented so the engine and the compliance reconciliation rule agree.
pub const SE_TAX_RATE: Decimal = dec!(0.153);
const SE_TAX_DEDUCTIBLE_SHARE: Decimal = dec!(0.5);

const QBI_DEDUCTION_RATE: Decimal = dec!(0.20);

fn qbi_income_limit(status: FilingStatus) -> Decimal {
    match status {
        FilingStatus::Single => dec!(191950),
        FilingStatus::MarriedJoint => dec!(383900),
        FilingStatus::MarriedSeparate => dec!(191950),
        FilingStatus::HeadOfHousehold => dec!(191950),
    }
}

/// Schedule C expense categories. Negative entries are floored at zero when
/// totalling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessExpenses {
    pub advertising: Decimal,
    pub office_expenses: Decimal,
    pub supplies: Decimal,
    pub meals: Decimal,
    pub travel: Decimal,
    pub vehicle: Decimal,
    pub home_office: Decimal,
    pub insurance: Decimal,
    pub professional_fees: Decimal,
    pub depreciation: Decimal,
    pub other: Decimal,
}

impl BusinessExpenses {
    pub fn total(&self) -> Decimal {
        [
            self.advertising,
            self.office_expenses,
            self.supplies,
            self.meals,
            self.travel,
            self.vehicle,
            self.home_office,
            self.insurance,
            self.professional_fees,
            self.depreciation,
            self.other,
        ]
        .iter()
        .copied()
        .map(|v| v.max(Decimal::ZERO))
        .sum::<Decimal>()
        .round_dp(2)
    }
}

/// One Schedule C business with a detailed expense breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleCDetail {
    pub business_name: String,
    pub gross_receipts: Decimal,
    pub expenses: BusinessExpenses,
}

impl ScheduleCDetail {
    pub fn net_profit(&self) -> Decimal {
        (self.gross_receipts - self.expenses.total()).round_dp(2)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.gross_receipts < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount {
                field: "gross_receipts",
                value: self.gross_receipts,
            });
        }
        Ok(())
    }
}

/// Combined net profit across multiple businesses.
pub fn aggregate_net_profit(schedules: &[ScheduleCDetail]) -> Result<Decimal, ValidationError> {
    let mut total = Decimal::ZERO;
    for schedule in schedules {
        schedule.validate()?;
        total += schedule.net_profit();
    }
    Ok(total.round_dp(2))
}

/// Self-employment tax with its above-the-line deductible half.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelfEmploymentTax {
    pub tax: Decimal,
    pub deductible_half: Decimal,
}

/// Canonical SE tax: 92.35% of net SE income at the flat 15.3% combined
/// rate. Zero when net income is zero or a loss.
pub fn self_employment_tax(net_se_income: Decimal) -> SelfEmploymentTax {
    if net_se_income <= Decimal::ZERO {
        return SelfEmploymentTax::default();
    }

    let base = net_se_income * SE_INCOME_FACTOR;
    let tax = (base * SE_TAX_RATE).round_dp(2);
    SelfEmploymentTax {
        tax,
        deductible_half: (tax * SE_TAX_DEDUCTIBLE_SHARE).round_dp(2),
    }
}

/// Simplified QBI deduction: 20% of QBI capped at 20% of taxable income
/// before the deduction, zeroed entirely above the income limit. No partial
/// phaseout, no SSTB or wage limits.
pub fn qbi_deduction(
    status: FilingStatus,
    total_qbi: Decimal,
    taxable_income_before_qbi: Decimal,
) -> Decimal {
    if total_qbi <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if taxable_income_before_qbi > qbi_income_limit(status) {
        return Decimal::ZERO;
    }

    (total_qbi * QBI_DEDUCTION_RATE)
        .min(taxable_income_before_qbi * QBI_DEDUCTION_RATE)
        .max(Decimal::ZERO)
        .round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expenses_total_floors_negative_entries() {
        let expenses = BusinessExpenses {
            supplies: dec!(3000),
            advertising: dec!(2500),
            meals: dec!(-400),
            ..Default::default()
        };
        assert_eq!(expenses.total(), dec!(5500));
    }

    #[test]
    fn net_profit_subtracts_expenses() {
        let schedule = ScheduleCDetail {
            business_name: "Design Studio".to_string(),
            gross_receipts: dec!(60000),
            expenses: BusinessExpenses {
                supplies: dec!(3000),
                advertising: dec!(2500),
                home_office: dec!(4000),
                ..Default::default()
            },
        };
        assert_eq!(schedule.net_profit(), dec!(50500));
    }

    #[test]
    fn aggregate_across_businesses() {
        let schedules = vec![
            ScheduleCDetail {
                business_name: "Design Studio".to_string(),
                gross_receipts: dec!(60000),
                expenses: BusinessExpenses {
                    supplies: dec!(3000),
                    ..Default::default()
                },
            },
            ScheduleCDetail {
                business_name: "Consulting".to_string(),
                gross_receipts: dec!(35000),
                expenses: BusinessExpenses {
                    travel: dec!(1800),
                    professional_fees: dec!(2200),
                    ..Default::default()
                },
            },
        ];
        assert_eq!(aggregate_net_profit(&schedules).unwrap(), dec!(88000));
    }

    #[test]
    fn negative_gross_receipts_rejected() {
        let schedule = ScheduleCDetail {
            business_name: "Broken".to_string(),
            gross_receipts: dec!(-1),
            expenses: BusinessExpenses::default(),
        };
        assert!(aggregate_net_profit(&[schedule]).is_err());
    }

    #[test]
    fn se_tax_flat_formula() {
        // 54,000 * 0.9235 = 49,869; * 0.153 = 7,629.957 -> 7,629.96
        let se = self_employment_tax(dec!(54000));
        assert_eq!(se.tax, dec!(7629.96));
        assert_eq!(se.deductible_half, dec!(3814.98));
    }

    #[test]
    fn se_tax_zero_for_loss() {
        assert_eq!(self_employment_tax(dec!(-5000)), SelfEmploymentTax::default());
        assert_eq!(self_employment_tax(Decimal::ZERO), SelfEmploymentTax::default());
    }

    #[test]
    fn qbi_twenty_percent_of_qbi() {
        // 20% of 50k QBI, taxable income comfortably higher
        assert_eq!(
            qbi_deduction(FilingStatus::Single, dec!(50000), dec!(90000)),
            dec!(10000)
        );
    }

    #[test]
    fn qbi_capped_by_taxable_income() {
        // 20% of 30k taxable income is the binding cap
        assert_eq!(
            qbi_deduction(FilingStatus::Single, dec!(50000), dec!(30000)),
            dec!(6000)
        );
    }

    #[test]
    fn qbi_zeroed_above_income_limit() {
        assert_eq!(
            qbi_deduction(FilingStatus::Single, dec!(50000), dec!(200000)),
            Decimal::ZERO
        );
        // Joint filers have a higher limit
        assert_eq!(
            qbi_deduction(FilingStatus::MarriedJoint, dec!(50000), dec!(200000)),
            dec!(10000)
        );
    }

    #[test]
    fn qbi_zero_for_no_business_income() {
        assert_eq!(
            qbi_deduction(FilingStatus::Single, Decimal::ZERO, dec!(50000)),
            Decimal::ZERO
        );
    }
}
