//! Depreciation audit rules. These screen for aggressive but legal
//! behavior; structural violations belong to the compliance check.

use crate::config::AuditConfig;
use crate::review::scoring::{AuditResult, RuleFlag, ScoreCard};
use crate::tax::depreciation::PoolDepreciation;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const BONUS_HEAVY_RATIO: Decimal = dec!(0.8);
const YOY_SPIKE_RATIO: Decimal = dec!(2.5);
const STATE_MISMATCH_RATIO: Decimal = dec!(0.5);

/// Run every audit rule against a depreciated asset pool.
pub fn run_audit(
    depreciation: &PoolDepreciation,
    config: &AuditConfig,
    prior_year_depreciation: Option<Decimal>,
) -> AuditResult {
    let mut card = ScoreCard::new("depreciation audit");

    let total_cost: Decimal = depreciation.federal.iter().map(|a| a.cost).sum();
    let section179 = depreciation.federal_section179();
    let bonus = depreciation.federal_bonus();
    // Ratio rules compare current-year deductions, not lifetime totals
    let federal_current = depreciation.federal_first_year();
    let state_current = depreciation.state_first_year();

    card.apply("DEP179_HIGH", || {
        Ok((section179 > config.section179_soft_limit).then(|| RuleFlag {
            code: "DEP179_HIGH",
            description: format!(
                "Section 179 election of {section179} exceeds the {} screening threshold",
                config.section179_soft_limit
            ),
            severity: 8,
            score_impact: 20,
        }))
    });

    card.apply("BONUS_HEAVY", || {
        if total_cost.is_zero() {
            return Ok(None);
        }
        Ok((bonus / total_cost > BONUS_HEAVY_RATIO).then(|| RuleFlag {
            code: "BONUS_HEAVY",
            description: format!(
                "bonus depreciation {bonus} is more than 80% of asset cost {total_cost}"
            ),
            severity: 6,
            score_impact: 15,
        }))
    });

    card.apply("SHORT_RECOVERY", || {
        let shortest = depreciation
            .federal
            .iter()
            .map(|a| a.schedule.len())
            .min();
        Ok(shortest
            .filter(|years| *years <= 3)
            .map(|years| RuleFlag {
                code: "SHORT_RECOVERY",
                description: format!("asset depreciated over only {years} years"),
                severity: 5,
                score_impact: 10,
            }))
    });

    card.apply("YOY_SPIKE", || {
        let prior = match prior_year_depreciation {
            Some(p) if p > Decimal::ZERO => p,
            _ => return Ok(None),
        };
        let ratio = federal_current / prior;
        Ok((ratio > YOY_SPIKE_RATIO).then(|| RuleFlag {
            code: "YOY_SPIKE",
            description: format!(
                "depreciation jumped {}x over the prior year ({federal_current} vs {prior})",
                ratio.round_dp(2)
            ),
            severity: 7,
            score_impact: 18,
        }))
    });

    card.apply("STATE_MISMATCH", || {
        if federal_current.is_zero() {
            return Ok(None);
        }
        let gap = (federal_current - state_current).abs() / federal_current;
        Ok((gap > STATE_MISMATCH_RATIO).then(|| RuleFlag {
            code: "STATE_MISMATCH",
            description: format!(
                "federal deduction {federal_current} diverges from state {state_current} by more than 50%"
            ),
            severity: 6,
            score_impact: 12,
        }))
    });

    card.finish()
}
