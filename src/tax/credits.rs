//! Child Tax Credit and Earned Income Tax Credit.

use crate::forms::FilingStatus;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

pub const CTC_PER_CHILD: Decimal = dec!(2000);
/// Refundable portion cap per qualifying child
pub const CTC_REFUNDABLE_LIMIT: Decimal = dec!(1600);

const CTC_PHASEOUT_STEP: Decimal = dec!(1000);
/// $50 reduction per full $1,000 of AGI over the threshold
const CTC_PHASEOUT_PER_STEP: Decimal = dec!(50);

fn ctc_phaseout_threshold(status: FilingStatus) -> Decimal {
    match status {
        FilingStatus::Single => dec!(200000),
        FilingStatus::MarriedJoint => dec!(400000),
        FilingStatus::MarriedSeparate => dec!(200000),
        FilingStatus::HeadOfHousehold => dec!(200000),
    }
}

/// Child Tax Credit split into refundable and non-refundable portions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChildTaxCredit {
    pub total: Decimal,
    pub refundable: Decimal,
    pub nonrefundable: Decimal,
}

pub fn child_tax_credit(
    status: FilingStatus,
    agi: Decimal,
    qualifying_children: u32,
) -> ChildTaxCredit {
    if qualifying_children == 0 {
        return ChildTaxCredit::default();
    }

    let children = Decimal::from(qualifying_children);
    let mut credit = children * CTC_PER_CHILD;

    let threshold = ctc_phaseout_threshold(status);
    if agi > threshold {
        let steps = ((agi - threshold) / CTC_PHASEOUT_STEP).floor();
        credit = (credit - steps * CTC_PHASEOUT_PER_STEP).max(Decimal::ZERO);
    }

    let refundable = credit.min(children * CTC_REFUNDABLE_LIMIT);
    ChildTaxCredit {
        total: credit.round_dp(2),
        refundable: refundable.round_dp(2),
        nonrefundable: (credit - refundable).round_dp(2),
    }
}

struct EitcRule {
    max_credit: Decimal,
    phase_in_rate: Decimal,
    phase_out_rate: Decimal,
    phase_out_start: Decimal,
}

// Indexed by number of qualifying children, capped at 3.
const EITC_RULES: [EitcRule; 4] = [
    EitcRule {
        max_credit: dec!(600),
        phase_in_rate: dec!(0.0765),
        phase_out_rate: dec!(0.0765),
        phase_out_start: dec!(9800),
    },
    EitcRule {
        max_credit: dec!(3995),
        phase_in_rate: dec!(0.34),
        phase_out_rate: dec!(0.1598),
        phase_out_start: dec!(21560),
    },
    EitcRule {
        max_credit: dec!(6604),
        phase_in_rate: dec!(0.40),
        phase_out_rate: dec!(0.2106),
        phase_out_start: dec!(21560),
    },
    EitcRule {
        max_credit: dec!(7430),
        phase_in_rate: dec!(0.45),
        phase_out_rate: dec!(0.2106),
        phase_out_start: dec!(21560),
    },
];

/// Simplified EITC: phase in on the lesser of earned income and AGI, phase
/// out linearly above the start point, never negative.
pub fn earned_income_credit(
    earned_income: Decimal,
    agi: Decimal,
    qualifying_children: u32,
) -> Decimal {
    let rule = &EITC_RULES[qualifying_children.min(3) as usize];
    let income = earned_income.min(agi);

    let mut credit = rule.max_credit.min(income * rule.phase_in_rate);
    if income > rule.phase_out_start {
        credit -= (income - rule.phase_out_start) * rule.phase_out_rate;
    }

    credit.max(Decimal::ZERO).round_dp(2)
}

/// All supported credits for a return.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreditSummary {
    pub child_tax_credit: ChildTaxCredit,
    pub earned_income_credit: Decimal,
    pub total: Decimal,
}

pub fn total_credits(
    status: FilingStatus,
    agi: Decimal,
    earned_income: Decimal,
    qualifying_children: u32,
) -> CreditSummary {
    let ctc = child_tax_credit(status, agi, qualifying_children);
    let eitc = earned_income_credit(earned_income, agi, qualifying_children);
    let total = (ctc.total + eitc).round_dp(2);
    CreditSummary {
        child_tax_credit: ctc,
        earned_income_credit: eitc,
        total,
    }
}
