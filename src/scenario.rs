//! What-if simulation: the same return computed under alternative
//! depreciation postures.

use crate::config::EngineConfig;
use crate::error::TaxError;
use crate::forms::Taxpayer;
use crate::tax::engine::{ComputedReturn, TaxEngine};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioMode {
    Baseline,
    Conservative,
    Aggressive,
}

impl ScenarioMode {
    pub const ALL: [ScenarioMode; 3] = [
        ScenarioMode::Baseline,
        ScenarioMode::Conservative,
        ScenarioMode::Aggressive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioMode::Baseline => "baseline",
            ScenarioMode::Conservative => "conservative",
            ScenarioMode::Aggressive => "aggressive",
        }
    }

    /// The configuration this scenario runs under. Conservative forgoes
    /// bonus depreciation entirely; aggressive elects the full federal
    /// bonus. Audit thresholds are untouched.
    fn apply(&self, base: &EngineConfig) -> EngineConfig {
        let mut config = base.clone();
        match self {
            ScenarioMode::Baseline => {}
            ScenarioMode::Conservative => {
                config.tax.bonus_rate = Decimal::ZERO;
                config.tax.state_bonus_rate = Decimal::ZERO;
            }
            ScenarioMode::Aggressive => {
                config.tax.bonus_rate = Decimal::ONE;
            }
        }
        config
    }
}

impl std::fmt::Display for ScenarioMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One computed return per scenario mode.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub mode: ScenarioMode,
    pub result: ComputedReturn,
}

/// Run the taxpayer through every scenario. A failure in any scenario
/// aborts the whole simulation, wrapped with the mode that failed.
pub fn run_scenarios(
    config: &EngineConfig,
    taxpayer: &Taxpayer,
) -> Result<Vec<ScenarioOutcome>, TaxError> {
    ScenarioMode::ALL
        .iter()
        .map(|mode| {
            let result = TaxEngine::new(mode.apply(config))
                .map_err(TaxError::from)
                .and_then(|engine| engine.run_return(taxpayer))
                .map_err(|source| TaxError::Scenario {
                    mode: mode.as_str().to_string(),
                    source: Box::new(source),
                })?;
            Ok(ScenarioOutcome {
                mode: *mode,
                result,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FilingStatus, IncomeForm};
    use crate::tax::depreciation::DepreciableAsset;
    use rust_decimal_macros::dec;

    fn business_taxpayer() -> Taxpayer {
        Taxpayer {
            taxpayer_id: "TEST-001".to_string(),
            filing_status: FilingStatus::Single,
            forms: vec![IncomeForm::ScheduleC {
                gross_receipts: dec!(120000),
                expenses: dec!(40000),
            }],
            assets: vec![DepreciableAsset {
                cost: dec!(100000),
                recovery_period: 5,
                placed_in_service_qtr: 2,
                section179: Decimal::ZERO,
                use_ads: false,
            }],
            itemized_deductions: Decimal::ZERO,
            itemized_detail: None,
            qualifying_children: 0,
            prior_year_depreciation: None,
            prior_year_deductions: None,
        }
    }

    #[test]
    fn three_outcomes_in_mode_order() {
        let outcomes = run_scenarios(&EngineConfig::default(), &business_taxpayer()).unwrap();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].mode, ScenarioMode::Baseline);
        assert_eq!(outcomes[1].mode, ScenarioMode::Conservative);
        assert_eq!(outcomes[2].mode, ScenarioMode::Aggressive);
    }

    #[test]
    fn bonus_posture_varies_by_mode() {
        let outcomes = run_scenarios(&EngineConfig::default(), &business_taxpayer()).unwrap();
        let bonus = |o: &ScenarioOutcome| o.result.depreciation.federal_bonus();

        assert_eq!(bonus(&outcomes[0]), dec!(60000));
        assert_eq!(bonus(&outcomes[1]), Decimal::ZERO);
        assert_eq!(bonus(&outcomes[2]), dec!(100000));
    }

    #[test]
    fn income_tax_is_identical_across_modes() {
        // Depreciation posture does not feed taxable income in this model
        let outcomes = run_scenarios(&EngineConfig::default(), &business_taxpayer()).unwrap();
        let taxable: Vec<_> = outcomes.iter().map(|o| o.result.taxable_income).collect();
        assert_eq!(taxable[0], taxable[1]);
        assert_eq!(taxable[1], taxable[2]);
    }

    #[test]
    fn failure_is_wrapped_with_the_mode() {
        let mut tp = business_taxpayer();
        tp.assets[0].recovery_period = 4;

        let err = run_scenarios(&EngineConfig::default(), &tp).unwrap_err();
        match err {
            TaxError::Scenario { mode, source } => {
                assert_eq!(mode, "baseline");
                assert!(matches!(*source, TaxError::Validation(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
