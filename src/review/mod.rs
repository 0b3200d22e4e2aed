//! Post-computation review: audit screening, deduction risk scoring,
//! structural compliance, and escalation routing.

pub mod audit;
pub mod compliance;
pub mod escalation;
pub mod risk;
pub mod scoring;

pub use audit::run_audit;
pub use compliance::{run_compliance_check, ComplianceIssue, ComplianceResult, IssueSeverity};
pub use escalation::{
    evaluate_for_escalation, CaseSeverity, EscalationCase, EscalationResult, SafetyResult,
};
pub use risk::run_risk_scoring;
pub use scoring::{AuditResult, RiskLevel, RiskScore, RuleFlag, ScoreCard, ScoredResult};
