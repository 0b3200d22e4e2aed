//! Federal income tax computation and review pipeline: a deterministic
//! return calculator (income, deductions, MACRS depreciation, credits,
//! SE tax) followed by audit screening, deduction risk scoring, structural
//! compliance checks, and escalation routing.

pub mod config;
pub mod error;
pub mod forms;
pub mod review;
pub mod scenario;
pub mod tax;

pub use config::{AuditConfig, EngineConfig, TaxConfig};
pub use error::{TaxError, ValidationError};
pub use forms::{FilingInput, FilingStatus, IncomeForm, Taxpayer};
pub use review::{
    evaluate_for_escalation, run_compliance_check, run_risk_scoring, ComplianceResult,
    EscalationResult, RiskLevel, SafetyResult, ScoredResult,
};
pub use scenario::{run_scenarios, ScenarioMode, ScenarioOutcome};
pub use tax::{build_return_forms, ComputedReturn, ReturnForms, TaxEngine};
