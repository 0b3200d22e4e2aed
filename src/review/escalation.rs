//! Decides whether a reviewed return needs a human. Three independent
//! checks are unioned: compliance failure, elevated risk, and a rejection
//! from the upstream safety gate.

use crate::review::compliance::ComplianceResult;
use crate::review::scoring::{RiskLevel, ScoredResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Scored results at or above this score escalate regardless of level.
const ESCALATION_SCORE_FLOOR: u32 = 50;

/// Verdict from the external safety gate. Absence of a gate means allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SafetyResult {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Default for SafetyResult {
    fn default() -> Self {
        SafetyResult {
            allowed: true,
            reason: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseSeverity {
    High,
    Critical,
}

/// One reason a return was escalated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EscalationCase {
    pub severity: CaseSeverity,
    pub summary: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EscalationResult {
    pub taxpayer_id: String,
    pub needs_escalation: bool,
    pub cases: Vec<EscalationCase>,
}

/// Evaluate a reviewed return. Each call starts from scratch; nothing is
/// carried over between taxpayers.
pub fn evaluate_for_escalation(
    taxpayer_id: &str,
    compliance: &ComplianceResult,
    scored_results: &[&ScoredResult],
    safety: &SafetyResult,
) -> EscalationResult {
    let mut cases = Vec::new();

    if !compliance.compliant {
        cases.push(EscalationCase {
            severity: CaseSeverity::Critical,
            summary: "return failed compliance checks".to_string(),
            details: compliance
                .errors()
                .map(|i| format!("{}: {}", i.code, i.message))
                .collect(),
        });
    }

    for result in scored_results {
        let elevated = result.level >= RiskLevel::High || result.score >= ESCALATION_SCORE_FLOOR;
        if !elevated {
            continue;
        }
        let severity = if result.level == RiskLevel::High {
            CaseSeverity::High
        } else {
            CaseSeverity::Critical
        };
        cases.push(EscalationCase {
            severity,
            summary: format!(
                "{} scored {} ({})",
                result.subject, result.score, result.level
            ),
            details: result
                .flags
                .iter()
                .map(|f| format!("{}: {}", f.code, f.description))
                .collect(),
        });
    }

    if !safety.allowed {
        cases.push(EscalationCase {
            severity: CaseSeverity::Critical,
            summary: "request rejected by the safety gate".to_string(),
            details: safety.reason.iter().cloned().collect(),
        });
    }

    EscalationResult {
        taxpayer_id: taxpayer_id.to_string(),
        needs_escalation: !cases.is_empty(),
        cases,
    }
}
