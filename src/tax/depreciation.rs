//! Per-asset depreciation schedules: Section 179 expensing, bonus
//! depreciation, and MACRS/ADS main schedules.

use crate::config::TaxConfig;
use crate::error::ValidationError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// MACRS GDS half-year percentage tables, keyed by recovery period.
const MACRS_GDS_3: [Decimal; 4] = [dec!(0.3333), dec!(0.4445), dec!(0.1481), dec!(0.0741)];
const MACRS_GDS_5: [Decimal; 6] = [
    dec!(0.20),
    dec!(0.32),
    dec!(0.192),
    dec!(0.1152),
    dec!(0.1152),
    dec!(0.0576),
];
const MACRS_GDS_7: [Decimal; 8] = [
    dec!(0.1429),
    dec!(0.2449),
    dec!(0.1749),
    dec!(0.1249),
    dec!(0.0893),
    dec!(0.0892),
    dec!(0.0893),
    dec!(0.0446),
];
const MACRS_GDS_10: [Decimal; 11] = [
    dec!(0.10),
    dec!(0.18),
    dec!(0.144),
    dec!(0.1152),
    dec!(0.0922),
    dec!(0.0737),
    dec!(0.0655),
    dec!(0.0655),
    dec!(0.0656),
    dec!(0.0655),
    dec!(0.0328),
];
const MACRS_GDS_15: [Decimal; 15] = [
    dec!(0.05),
    dec!(0.095),
    dec!(0.0855),
    dec!(0.077),
    dec!(0.0693),
    dec!(0.0623),
    dec!(0.059),
    dec!(0.059),
    dec!(0.0591),
    dec!(0.059),
    dec!(0.0591),
    dec!(0.059),
    dec!(0.0591),
    dec!(0.059),
    dec!(0.0295),
];
const MACRS_GDS_20: [Decimal; 21] = [
    dec!(0.0375),
    dec!(0.0722),
    dec!(0.0668),
    dec!(0.0618),
    dec!(0.0571),
    dec!(0.0529),
    dec!(0.0489),
    dec!(0.0452),
    dec!(0.0446),
    dec!(0.0446),
    dec!(0.0446),
    dec!(0.0446),
    dec!(0.0446),
    dec!(0.0446),
    dec!(0.0446),
    dec!(0.0446),
    dec!(0.0446),
    dec!(0.0446),
    dec!(0.0446),
    dec!(0.0446),
    dec!(0.0223),
];

fn macrs_rates(recovery_period: u8) -> Result<&'static [Decimal], ValidationError> {
    match recovery_period {
        3 => Ok(&MACRS_GDS_3),
        5 => Ok(&MACRS_GDS_5),
        7 => Ok(&MACRS_GDS_7),
        10 => Ok(&MACRS_GDS_10),
        15 => Ok(&MACRS_GDS_15),
        20 => Ok(&MACRS_GDS_20),
        other => Err(ValidationError::UnsupportedRecoveryPeriod(other)),
    }
}

/// A single depreciable asset. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DepreciableAsset {
    #[schemars(with = "f64")]
    pub cost: Decimal,
    /// Recovery period in years; must be a MACRS table key (3/5/7/10/15/20)
    pub recovery_period: u8,
    /// Calendar quarter the asset was placed in service (1-4)
    pub placed_in_service_qtr: u8,
    /// Elected Section 179 expensing, must not exceed cost
    #[serde(default)]
    #[schemars(with = "f64")]
    pub section179: Decimal,
    /// Use the Alternative Depreciation System (straight line) instead of MACRS
    #[serde(default)]
    pub use_ads: bool,
}

impl DepreciableAsset {
    pub fn validate(&self) -> Result<(), ValidationError> {
        macrs_rates(self.recovery_period)?;
        if !(1..=4).contains(&self.placed_in_service_qtr) {
            return Err(ValidationError::InvalidQuarter(self.placed_in_service_qtr));
        }
        if self.cost < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount {
                field: "cost",
                value: self.cost,
            });
        }
        if self.section179 < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount {
                field: "section179",
                value: self.section179,
            });
        }
        if self.section179 > self.cost {
            return Err(ValidationError::Section179ExceedsCost {
                elected: self.section179,
                cost: self.cost,
            });
        }
        Ok(())
    }
}

/// Ordered collection of assets placed in service in the same tax year.
#[derive(Debug, Clone, Default)]
pub struct AssetPool {
    pub assets: Vec<DepreciableAsset>,
}

/// Basis remaining after the Section 179 election.
pub fn apply_section179(cost: Decimal, elected: Decimal) -> Decimal {
    (cost - cost.min(elected)).round_dp(2)
}

/// First-year bonus depreciation on the post-179 basis.
pub fn bonus_depreciation(basis: Decimal, rate: Decimal) -> Decimal {
    (basis * rate).round_dp(2)
}

/// Mid-quarter convention test: more than 40% of total pool cost placed in
/// service in Q4. The result is surfaced on the pool output but does not
/// change schedule selection; mid-quarter percentage tables are not
/// implemented and every asset uses the half-year table.
pub fn requires_mid_quarter(assets: &[DepreciableAsset]) -> bool {
    let total: Decimal = assets.iter().map(|a| a.cost).sum();
    if total.is_zero() {
        return false;
    }
    let q4: Decimal = assets
        .iter()
        .filter(|a| a.placed_in_service_qtr == 4)
        .map(|a| a.cost)
        .sum();
    q4 / total > dec!(0.40)
}

/// Straight-line schedule. The rounding remainder is folded into the final
/// year so the schedule sums exactly to basis.
pub fn ads_schedule(basis: Decimal, recovery_period: u8) -> Vec<Decimal> {
    let years = usize::from(recovery_period);
    let annual = (basis / Decimal::from(recovery_period)).round_dp(2);
    let mut schedule = vec![annual; years];
    let total: Decimal = schedule.iter().copied().sum();
    if let Some(last) = schedule.last_mut() {
        *last += (basis - total).round_dp(2);
    }
    schedule
}

/// MACRS GDS half-year schedule, with the same final-year remainder
/// correction as ADS.
pub fn macrs_schedule(basis: Decimal, recovery_period: u8) -> Result<Vec<Decimal>, ValidationError> {
    let rates = macrs_rates(recovery_period)?;
    let mut schedule: Vec<Decimal> = rates.iter().map(|r| (basis * r).round_dp(2)).collect();
    let total: Decimal = schedule.iter().copied().sum();
    if let Some(last) = schedule.last_mut() {
        *last += (basis - total).round_dp(2);
    }
    Ok(schedule)
}

/// Full depreciation result for one asset under one jurisdiction's rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetDepreciation {
    pub cost: Decimal,
    pub section179: Decimal,
    pub bonus: Decimal,
    pub remaining_basis: Decimal,
    pub schedule: Vec<Decimal>,
    pub total_depreciation: Decimal,
}

pub fn depreciate_asset(
    asset: &DepreciableAsset,
    bonus_rate: Decimal,
) -> Result<AssetDepreciation, ValidationError> {
    asset.validate()?;

    let section179_taken = asset.cost.min(asset.section179);
    let mut basis = apply_section179(asset.cost, asset.section179);

    let bonus = bonus_depreciation(basis, bonus_rate);
    basis = (basis - bonus).round_dp(2);

    let schedule = if asset.use_ads {
        ads_schedule(basis, asset.recovery_period)
    } else {
        macrs_schedule(basis, asset.recovery_period)?
    };

    let schedule_total: Decimal = schedule.iter().copied().sum();
    let total_depreciation = (section179_taken + bonus + schedule_total).round_dp(2);

    log::debug!(
        "asset cost={} s179={} bonus={} basis={} total={}",
        asset.cost,
        section179_taken,
        bonus,
        basis,
        total_depreciation
    );

    Ok(AssetDepreciation {
        cost: asset.cost,
        section179: section179_taken,
        bonus,
        remaining_basis: basis,
        schedule,
        total_depreciation,
    })
}

/// Federal and state schedules for a whole asset pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolDepreciation {
    pub federal: Vec<AssetDepreciation>,
    pub state: Vec<AssetDepreciation>,
    /// True when the mid-quarter convention applies to the pool. Schedules
    /// above still use the half-year table; see `requires_mid_quarter`.
    pub mid_quarter_required: bool,
}

impl PoolDepreciation {
    pub fn federal_total(&self) -> Decimal {
        self.federal.iter().map(|a| a.total_depreciation).sum()
    }

    pub fn state_total(&self) -> Decimal {
        self.state.iter().map(|a| a.total_depreciation).sum()
    }

    pub fn federal_section179(&self) -> Decimal {
        self.federal.iter().map(|a| a.section179).sum()
    }

    pub fn federal_bonus(&self) -> Decimal {
        self.federal.iter().map(|a| a.bonus).sum()
    }

    /// Current-year federal deduction: 179 + bonus + first schedule year.
    pub fn federal_first_year(&self) -> Decimal {
        self.federal.iter().map(first_year).sum()
    }

    pub fn state_first_year(&self) -> Decimal {
        self.state.iter().map(first_year).sum()
    }
}

fn first_year(asset: &AssetDepreciation) -> Decimal {
    asset.section179 + asset.bonus + asset.schedule.first().copied().unwrap_or_default()
}

/// Depreciate every asset in the pool under both federal and state bonus
/// rates. One output entry per asset, in pool order.
pub fn depreciate_pool(
    pool: &AssetPool,
    config: &TaxConfig,
) -> Result<PoolDepreciation, ValidationError> {
    let mid_quarter_required = requires_mid_quarter(&pool.assets);

    let mut federal = Vec::with_capacity(pool.assets.len());
    let mut state = Vec::with_capacity(pool.assets.len());

    for asset in &pool.assets {
        federal.push(depreciate_asset(asset, config.bonus_rate)?);
        state.push(depreciate_asset(asset, config.state_bonus_rate)?);
    }

    Ok(PoolDepreciation {
        federal,
        state,
        mid_quarter_required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(cost: Decimal, period: u8, qtr: u8, section179: Decimal) -> DepreciableAsset {
        DepreciableAsset {
            cost,
            recovery_period: period,
            placed_in_service_qtr: qtr,
            section179,
            use_ads: false,
        }
    }

    #[test]
    fn five_year_macrs_with_179_and_bonus() {
        // cost 100k, 179 = 25k, bonus 60% of 75k = 45k, MACRS basis 30k
        let a = asset(dec!(100000), 5, 4, dec!(25000));
        let result = depreciate_asset(&a, dec!(0.60)).unwrap();

        assert_eq!(result.section179, dec!(25000));
        assert_eq!(result.bonus, dec!(45000));
        assert_eq!(result.remaining_basis, dec!(30000));
        assert_eq!(
            result.schedule,
            vec![
                dec!(6000),
                dec!(9600),
                dec!(5760),
                dec!(3456),
                dec!(3456),
                dec!(1728)
            ]
        );
        let schedule_total: Decimal = result.schedule.iter().copied().sum();
        assert_eq!(schedule_total, dec!(30000));
        assert_eq!(result.total_depreciation, dec!(100000));
    }

    #[test]
    fn total_reconciles_to_the_cent() {
        // An awkward basis that forces rounding in every year
        let a = asset(dec!(10333.33), 7, 2, dec!(1000.01));
        let result = depreciate_asset(&a, dec!(0.40)).unwrap();

        let schedule_total: Decimal = result.schedule.iter().copied().sum();
        assert_eq!(
            result.total_depreciation,
            result.section179 + result.bonus + schedule_total
        );
        assert_eq!(schedule_total, result.remaining_basis);
    }

    #[test]
    fn ads_schedule_sums_to_basis() {
        let schedule = ads_schedule(dec!(10000), 3);
        assert_eq!(schedule.len(), 3);
        let total: Decimal = schedule.iter().copied().sum();
        assert_eq!(total, dec!(10000));
        // 3333.33 + 3333.33 + 3333.34
        assert_eq!(schedule[2], dec!(3333.34));
    }

    #[test]
    fn ads_asset_uses_straight_line() {
        let mut a = asset(dec!(9000), 3, 1, Decimal::ZERO);
        a.use_ads = true;
        let result = depreciate_asset(&a, Decimal::ZERO).unwrap();
        assert_eq!(result.schedule, vec![dec!(3000), dec!(3000), dec!(3000)]);
        assert_eq!(result.total_depreciation, dec!(9000));
    }

    #[test]
    fn unsupported_recovery_period_fails() {
        let a = asset(dec!(5000), 4, 1, Decimal::ZERO);
        assert_eq!(
            depreciate_asset(&a, Decimal::ZERO),
            Err(ValidationError::UnsupportedRecoveryPeriod(4))
        );
    }

    #[test]
    fn section179_above_cost_fails() {
        let a = asset(dec!(5000), 5, 1, dec!(6000));
        assert!(matches!(
            a.validate(),
            Err(ValidationError::Section179ExceedsCost { .. })
        ));
    }

    #[test]
    fn quarter_out_of_range_fails() {
        let a = asset(dec!(5000), 5, 5, Decimal::ZERO);
        assert_eq!(a.validate(), Err(ValidationError::InvalidQuarter(5)));
    }

    #[test]
    fn mid_quarter_fires_above_forty_percent_q4() {
        let assets = vec![
            asset(dec!(50000), 5, 1, Decimal::ZERO),
            asset(dec!(50000), 5, 4, Decimal::ZERO),
        ];
        // exactly 50% in Q4
        assert!(requires_mid_quarter(&assets));

        let assets = vec![
            asset(dec!(60000), 5, 1, Decimal::ZERO),
            asset(dec!(40000), 5, 4, Decimal::ZERO),
        ];
        // exactly 40% is not "more than 40%"
        assert!(!requires_mid_quarter(&assets));
    }

    #[test]
    fn empty_pool_never_mid_quarter() {
        assert!(!requires_mid_quarter(&[]));
    }

    #[test]
    fn pool_uses_separate_state_bonus_rate() {
        let pool = AssetPool {
            assets: vec![asset(dec!(100000), 5, 4, dec!(25000))],
        };
        let config = TaxConfig {
            bonus_rate: dec!(0.60),
            state_bonus_rate: Decimal::ZERO,
        };
        let result = depreciate_pool(&pool, &config).unwrap();

        assert!(result.mid_quarter_required);
        assert_eq!(result.federal[0].bonus, dec!(45000));
        assert_eq!(result.state[0].bonus, Decimal::ZERO);
        // State spreads the full 75k post-179 basis over the MACRS schedule
        assert_eq!(result.state[0].remaining_basis, dec!(75000));
        // First-year deductions diverge: 25k + 45k + 6k vs 25k + 0 + 15k
        assert_eq!(result.federal_first_year(), dec!(76000));
        assert_eq!(result.state_first_year(), dec!(40000));
        // Both jurisdictions fully depreciate the asset over its life
        assert_eq!(result.federal_total(), dec!(100000));
        assert_eq!(result.state_total(), dec!(100000));
    }
}
