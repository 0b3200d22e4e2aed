//! The return orchestrator. Stages run strictly in order and any failure
//! aborts the run; no partial return is ever produced.

use crate::config::EngineConfig;
use crate::error::{TaxError, ValidationError};
use crate::forms::Taxpayer;
use crate::review::audit::run_audit;
use crate::review::scoring::AuditResult;
use crate::tax::brackets::{brackets_2024, effective_tax_rate, progressive_tax};
use crate::tax::business::{qbi_deduction, self_employment_tax, SelfEmploymentTax};
use crate::tax::credits::{total_credits, CreditSummary};
use crate::tax::deductions::{best_deduction, itemized_total, DeductionSummary};
use crate::tax::depreciation::{depreciate_pool, AssetPool, PoolDepreciation};
use crate::tax::income::{normalize, IncomeBuckets};
use rust_decimal::Decimal;
use serde::Serialize;

/// How much of the combined credits offset tax and how much is paid out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppliedCredits {
    /// Total credit applied against tax before credits
    pub applied: Decimal,
    /// Refundable credit paid out beyond the tax offset
    pub refundable_disbursed: Decimal,
}

/// Non-refundable credits offset tax but never push it below zero; the
/// refundable pool (refundable CTC plus EITC) offsets what remains and is
/// disbursed beyond that, even when tax is already zero.
fn apply_credits(tax_before_credits: Decimal, credits: &CreditSummary) -> AppliedCredits {
    let nonrefundable_applied = tax_before_credits.min(credits.child_tax_credit.nonrefundable);
    let remaining = tax_before_credits - nonrefundable_applied;

    let refundable_pool = credits.child_tax_credit.refundable + credits.earned_income_credit;
    let refundable_applied = remaining.min(refundable_pool);

    AppliedCredits {
        applied: (nonrefundable_applied + refundable_applied).round_dp(2),
        refundable_disbursed: (refundable_pool - refundable_applied).round_dp(2),
    }
}

/// A fully computed federal return.
#[derive(Debug, Clone, Serialize)]
pub struct ComputedReturn {
    pub taxpayer_id: String,
    pub income: IncomeBuckets,
    pub total_income: Decimal,
    pub deductions: DeductionSummary,
    pub taxable_income: Decimal,
    pub depreciation: PoolDepreciation,
    pub se_tax: SelfEmploymentTax,
    pub tax_before_credits: Decimal,
    pub credits: CreditSummary,
    pub applied_credits: AppliedCredits,
    pub income_tax_after_credits: Decimal,
    /// Informational only; not subtracted from taxable income
    pub qbi_deduction: Decimal,
    pub total_tax: Decimal,
    pub effective_rate: Decimal,
    pub federal_withholding: Decimal,
    /// Negative when a refund is due
    pub balance_due: Decimal,
    pub audit: AuditResult,
}

/// Computes returns under one validated configuration. Cheap to construct;
/// every run uses fresh accumulators so engines may be reused or rebuilt
/// freely.
#[derive(Debug, Clone)]
pub struct TaxEngine {
    config: EngineConfig,
}

impl TaxEngine {
    /// Validates the configuration once, up front.
    pub fn new(config: EngineConfig) -> Result<TaxEngine, ValidationError> {
        config.validate()?;
        Ok(TaxEngine { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn run_return(&self, taxpayer: &Taxpayer) -> Result<ComputedReturn, TaxError> {
        for form in &taxpayer.forms {
            form.validate()?;
        }

        // Income
        let income = normalize(&taxpayer.forms);
        let total_income = income.total_income();
        // AGI equals total income in this model; there are no other
        // above-the-line adjustments
        let agi = total_income;

        // Deductions
        let itemized = match &taxpayer.itemized_detail {
            Some(detail) => itemized_total(detail, agi.max(Decimal::ZERO))?,
            None => taxpayer.itemized_deductions,
        };
        let deductions = best_deduction(taxpayer.filing_status, itemized);

        // Depreciation
        let pool = AssetPool {
            assets: taxpayer.assets.clone(),
        };
        let depreciation = depreciate_pool(&pool, &self.config.tax)?;

        // Self-employment tax on 1099-NEC compensation plus Schedule C net
        let net_se_income = income.self_employment + income.business_income;
        let se_tax = self_employment_tax(net_se_income);

        // Taxable income and tax
        let taxable_income = (total_income - deductions.deduction_taken)
            .max(Decimal::ZERO)
            .round_dp(2);
        let brackets = brackets_2024(taxpayer.filing_status);
        let tax_before_credits = progressive_tax(taxable_income, brackets);

        // Credits
        let earned_income = income.wages + net_se_income;
        let credits = total_credits(
            taxpayer.filing_status,
            agi,
            earned_income,
            taxpayer.qualifying_children,
        );
        let applied_credits = apply_credits(tax_before_credits, &credits);
        let income_tax_after_credits =
            (tax_before_credits - applied_credits.applied).round_dp(2);

        let qbi = qbi_deduction(taxpayer.filing_status, net_se_income, taxable_income);

        let total_tax = (income_tax_after_credits + se_tax.tax).round_dp(2);
        let federal_withholding = income.withholding_federal;
        let balance_due = (total_tax - federal_withholding).round_dp(2);

        log::info!(
            "taxpayer {} taxable={} tax={} se={} total={}",
            taxpayer.taxpayer_id,
            taxable_income,
            tax_before_credits,
            se_tax.tax,
            total_tax
        );

        // Audit screening
        let audit = run_audit(
            &depreciation,
            &self.config.audit,
            taxpayer.prior_year_depreciation,
        );

        Ok(ComputedReturn {
            taxpayer_id: taxpayer.taxpayer_id.clone(),
            effective_rate: effective_tax_rate(taxable_income, brackets),
            income,
            total_income,
            deductions,
            taxable_income,
            depreciation,
            se_tax,
            tax_before_credits,
            credits,
            applied_credits,
            income_tax_after_credits,
            qbi_deduction: qbi,
            total_tax,
            federal_withholding,
            balance_due,
            audit,
        })
    }
}
