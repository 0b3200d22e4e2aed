//! Deduction risk rules. These read the form-shaped view of the return,
//! not the engine internals, so the check sees exactly what was filed.

use crate::review::scoring::{RiskScore, RuleFlag, ScoreCard};
use crate::tax::filing::ReturnForms;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const SECTION_179_INCOME_RATIO: Decimal = dec!(0.5);
const YOY_DEDUCTION_RATIO: Decimal = dec!(3);
const ROUND_NUMBER_UNIT: Decimal = dec!(1000);

/// Run every deduction risk rule against the filed forms.
pub fn run_risk_scoring(forms: &ReturnForms, prior_year_deductions: Option<Decimal>) -> RiskScore {
    let mut card = ScoreCard::new("deduction risk");

    let total_income = forms.form_1040.total_income;
    let deduction = forms.form_1040.deduction;

    card.apply("R179_RATIO_HIGH", || {
        let section179 = match &forms.form_4562 {
            Some(f) => f.section179,
            None => return Ok(None),
        };
        if total_income <= Decimal::ZERO {
            return Err(format!(
                "total income {total_income} is not positive, ratio undefined"
            ));
        }
        Ok((section179 / total_income > SECTION_179_INCOME_RATIO).then(|| RuleFlag {
            code: "R179_RATIO_HIGH",
            description: format!(
                "Section 179 election {section179} exceeds half of total income {total_income}"
            ),
            severity: 9,
            score_impact: 25,
        }))
    });

    card.apply("BONUS_USED", || {
        let bonus = forms.form_4562.as_ref().map(|f| f.bonus).unwrap_or_default();
        Ok((bonus > Decimal::ZERO).then(|| RuleFlag {
            code: "BONUS_USED",
            description: format!("bonus depreciation of {bonus} claimed"),
            severity: 5,
            score_impact: 10,
        }))
    });

    card.apply("SC_LOSS", || {
        let net_profit = match &forms.schedule_c {
            Some(f) => f.net_profit,
            None => return Ok(None),
        };
        Ok((net_profit < Decimal::ZERO).then(|| RuleFlag {
            code: "SC_LOSS",
            description: format!("Schedule C reports a net loss of {net_profit}"),
            severity: 7,
            score_impact: 18,
        }))
    });

    card.apply("SC_ROUND_NUM", || {
        let net_profit = match &forms.schedule_c {
            Some(f) => f.net_profit,
            None => return Ok(None),
        };
        let round_number =
            !net_profit.is_zero() && (net_profit % ROUND_NUMBER_UNIT).is_zero();
        Ok(round_number.then(|| RuleFlag {
            code: "SC_ROUND_NUM",
            description: format!(
                "Schedule C net profit {net_profit} is a suspiciously round number"
            ),
            severity: 4,
            score_impact: 8,
        }))
    });

    card.apply("DED_GT_INCOME", || {
        // Only meaningful against positive income; a zero-income return
        // trivially has deductions above income
        if total_income <= Decimal::ZERO {
            return Ok(None);
        }
        Ok((deduction > total_income).then(|| RuleFlag {
            code: "DED_GT_INCOME",
            description: format!(
                "deductions {deduction} exceed total income {total_income}"
            ),
            severity: 10,
            score_impact: 30,
        }))
    });

    card.apply("YOY_DED_SPIKE", || {
        let prior = match prior_year_deductions {
            Some(p) if p > Decimal::ZERO => p,
            _ => return Ok(None),
        };
        let ratio = deduction / prior;
        Ok((ratio > YOY_DEDUCTION_RATIO).then(|| RuleFlag {
            code: "YOY_DED_SPIKE",
            description: format!(
                "deductions jumped {}x over the prior year ({deduction} vs {prior})",
                ratio.round_dp(2)
            ),
            severity: 8,
            score_impact: 20,
        }))
    });

    card.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::scoring::RiskLevel;
    use crate::tax::filing::{Form1040, Form4562, ScheduleCForm};

    fn forms(total_income: Decimal, deduction: Decimal) -> ReturnForms {
        ReturnForms {
            form_1040: Form1040 {
                total_income,
                deduction,
                taxable_income: (total_income - deduction).max(Decimal::ZERO),
            },
            form_4562: None,
            schedule_c: None,
            schedule_se: None,
        }
    }

    fn fired(result: &RiskScore, code: &str) -> bool {
        result.flags.iter().any(|f| f.code == code)
    }

    #[test]
    fn plain_return_scores_zero() {
        let result = run_risk_scoring(&forms(dec!(85000), dec!(14600)), None);
        assert_eq!(result.score, 0);
        assert_eq!(result.level, RiskLevel::Low);
    }

    #[test]
    fn heavy_section179_relative_to_income() {
        let mut f = forms(dec!(80000), dec!(14600));
        f.form_4562 = Some(Form4562 {
            section179: dec!(50000),
            bonus: Decimal::ZERO,
        });
        let result = run_risk_scoring(&f, None);
        assert!(fired(&result, "R179_RATIO_HIGH"));
        assert_eq!(result.score, 25);
        assert_eq!(result.level, RiskLevel::Moderate);
    }

    #[test]
    fn any_bonus_use_adds_base_score() {
        let mut f = forms(dec!(85000), dec!(14600));
        f.form_4562 = Some(Form4562 {
            section179: Decimal::ZERO,
            bonus: dec!(45000),
        });
        let result = run_risk_scoring(&f, None);
        assert!(fired(&result, "BONUS_USED"));
    }

    #[test]
    fn schedule_c_loss_flagged() {
        let mut f = forms(dec!(40000), dec!(14600));
        f.schedule_c = Some(ScheduleCForm {
            net_profit: dec!(-5017),
        });
        let result = run_risk_scoring(&f, None);
        assert!(fired(&result, "SC_LOSS"));
        assert_eq!(result.score, 18);
    }

    #[test]
    fn round_loss_fires_both_schedule_c_rules() {
        let mut f = forms(dec!(40000), dec!(14600));
        f.schedule_c = Some(ScheduleCForm {
            net_profit: dec!(-5000),
        });
        let result = run_risk_scoring(&f, None);
        assert!(fired(&result, "SC_LOSS"));
        assert!(fired(&result, "SC_ROUND_NUM"));
        assert_eq!(result.score, 26);
    }

    #[test]
    fn round_net_profit_flagged() {
        let mut f = forms(dec!(85000), dec!(14600));
        f.schedule_c = Some(ScheduleCForm {
            net_profit: dec!(32000),
        });
        let result = run_risk_scoring(&f, None);
        assert!(fired(&result, "SC_ROUND_NUM"));

        f.schedule_c = Some(ScheduleCForm {
            net_profit: dec!(32417.55),
        });
        let result = run_risk_scoring(&f, None);
        assert!(!fired(&result, "SC_ROUND_NUM"));
    }

    #[test]
    fn zero_net_profit_is_not_a_round_number() {
        let mut f = forms(dec!(85000), dec!(14600));
        f.schedule_c = Some(ScheduleCForm {
            net_profit: Decimal::ZERO,
        });
        let result = run_risk_scoring(&f, None);
        assert!(!fired(&result, "SC_ROUND_NUM"));
    }

    #[test]
    fn deductions_above_income_is_severe() {
        let result = run_risk_scoring(&forms(dec!(20000), dec!(35000)), None);
        assert!(fired(&result, "DED_GT_INCOME"));
        let flag = result.flags.iter().find(|f| f.code == "DED_GT_INCOME").unwrap();
        assert_eq!(flag.severity, 10);
        assert_eq!(flag.score_impact, 30);
    }

    #[test]
    fn deduction_spike_needs_prior_year() {
        let f = forms(dec!(120000), dec!(60000));
        assert!(!fired(&run_risk_scoring(&f, None), "YOY_DED_SPIKE"));
        assert!(fired(
            &run_risk_scoring(&f, Some(dec!(15000))),
            "YOY_DED_SPIKE"
        ));
    }

    #[test]
    fn undefined_ratio_excludes_rule_without_aborting() {
        let mut f = forms(Decimal::ZERO, dec!(14600));
        f.form_4562 = Some(Form4562 {
            section179: dec!(50000),
            bonus: dec!(45000),
        });
        let result = run_risk_scoring(&f, None);
        assert!(result.excluded_rules.contains(&"R179_RATIO_HIGH"));
        // The remaining rules still ran
        assert!(fired(&result, "BONUS_USED"));
    }

    #[test]
    fn zero_income_return_not_penalized_for_deductions() {
        // The standard deduction always exceeds zero income; that alone is
        // not a risk signal
        let result = run_risk_scoring(&forms(Decimal::ZERO, dec!(14600)), None);
        assert!(!fired(&result, "DED_GT_INCOME"));
        assert_eq!(result.score, 0);
    }
}
