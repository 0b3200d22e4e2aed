//! Progressive federal tax brackets. Each bracket is a `(lower threshold,
//! marginal rate)` pair; the top bracket has no upper bound.

use crate::forms::FilingStatus;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub type Bracket = (Decimal, Decimal);

const SINGLE_2024: [Bracket; 7] = [
    (dec!(0), dec!(0.10)),
    (dec!(11600), dec!(0.12)),
    (dec!(47150), dec!(0.22)),
    (dec!(100525), dec!(0.24)),
    (dec!(191950), dec!(0.32)),
    (dec!(243725), dec!(0.35)),
    (dec!(609350), dec!(0.37)),
];

const MARRIED_JOINT_2024: [Bracket; 7] = [
    (dec!(0), dec!(0.10)),
    (dec!(23200), dec!(0.12)),
    (dec!(94300), dec!(0.22)),
    (dec!(201050), dec!(0.24)),
    (dec!(383900), dec!(0.32)),
    (dec!(487450), dec!(0.35)),
    (dec!(731200), dec!(0.37)),
];

const MARRIED_SEPARATE_2024: [Bracket; 7] = [
    (dec!(0), dec!(0.10)),
    (dec!(11600), dec!(0.12)),
    (dec!(47150), dec!(0.22)),
    (dec!(100525), dec!(0.24)),
    (dec!(191950), dec!(0.32)),
    (dec!(243725), dec!(0.35)),
    (dec!(365600), dec!(0.37)),
];

const HEAD_OF_HOUSEHOLD_2024: [Bracket; 7] = [
    (dec!(0), dec!(0.10)),
    (dec!(16550), dec!(0.12)),
    (dec!(63100), dec!(0.22)),
    (dec!(100500), dec!(0.24)),
    (dec!(191950), dec!(0.32)),
    (dec!(243725), dec!(0.35)),
    (dec!(609350), dec!(0.37)),
];

/// 2024 federal bracket table for a filing status. Tables are currently
/// hardcoded to tax year 2024.
pub fn brackets_2024(status: FilingStatus) -> &'static [Bracket] {
    match status {
        FilingStatus::Single => &SINGLE_2024,
        FilingStatus::MarriedJoint => &MARRIED_JOINT_2024,
        FilingStatus::MarriedSeparate => &MARRIED_SEPARATE_2024,
        FilingStatus::HeadOfHousehold => &HEAD_OF_HOUSEHOLD_2024,
    }
}

/// Tax each marginal slice at its own rate.
pub fn progressive_tax(taxable_income: Decimal, brackets: &[Bracket]) -> Decimal {
    if taxable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut tax = Decimal::ZERO;
    for (i, (start, rate)) in brackets.iter().enumerate() {
        if taxable_income <= *start {
            break;
        }
        let upper = brackets
            .get(i + 1)
            .map(|b| b.0)
            .unwrap_or(taxable_income);
        let slice = taxable_income.min(upper) - start;
        tax += slice * rate;
    }

    tax.round_dp(2)
}

/// Effective rate (total tax / taxable income), rounded to 4 dp.
pub fn effective_tax_rate(taxable_income: Decimal, brackets: &[Bracket]) -> Decimal {
    if taxable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (progressive_tax(taxable_income, brackets) / taxable_income).round_dp(4)
}
