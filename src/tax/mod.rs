//! Federal tax computation: income normalization, deductions,
//! depreciation, credits, brackets, and the return orchestrator.

pub mod brackets;
pub mod business;
pub mod credits;
pub mod deductions;
pub mod depreciation;
pub mod engine;
pub mod filing;
pub mod income;

pub use brackets::{brackets_2024, effective_tax_rate, progressive_tax};
pub use business::{
    aggregate_net_profit, qbi_deduction, self_employment_tax, BusinessExpenses, ScheduleCDetail,
    SelfEmploymentTax,
};
pub use credits::{child_tax_credit, earned_income_credit, total_credits, CreditSummary};
pub use deductions::{best_deduction, standard_deduction, DeductionSummary, ItemizedDeductions};
pub use depreciation::{
    depreciate_asset, depreciate_pool, AssetDepreciation, AssetPool, DepreciableAsset,
    PoolDepreciation,
};
pub use engine::{ComputedReturn, TaxEngine};
pub use filing::{build_return_forms, ReturnForms};
pub use income::{normalize, IncomeBuckets};
