//! Generic scored rule engine shared by the depreciation audit and the
//! deduction risk check. Both accumulate independent rule flags into a
//! capped score and map it to a risk level.

use crate::error::TaxError;
use serde::Serialize;

/// Scores never exceed this cap, however many rules fire.
pub const MAX_SCORE: u32 = 100;

/// A single fired rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFlag {
    pub code: &'static str,
    pub description: String,
    /// 1 (informational) to 10 (egregious)
    pub severity: u8,
    pub score_impact: u32,
}

/// Risk level derived from the capped score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> RiskLevel {
        match score {
            0..=24 => RiskLevel::Low,
            25..=49 => RiskLevel::Moderate,
            50..=74 => RiskLevel::High,
            _ => RiskLevel::Severe,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
            RiskLevel::Severe => "SEVERE",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulator for one check run. Always constructed fresh per call so no
/// state leaks between taxpayers.
#[derive(Debug)]
pub struct ScoreCard {
    subject: &'static str,
    flags: Vec<RuleFlag>,
    raw_score: u32,
    excluded_rules: Vec<&'static str>,
}

impl ScoreCard {
    pub fn new(subject: &'static str) -> ScoreCard {
        ScoreCard {
            subject,
            flags: Vec::new(),
            raw_score: 0,
            excluded_rules: Vec::new(),
        }
    }

    /// Evaluate one rule. Rules are independent predicates: `Ok(Some(flag))`
    /// fires, `Ok(None)` passes. A rule that cannot be evaluated is skipped
    /// with a warning and recorded as excluded; it never aborts the check.
    pub fn apply<F>(&mut self, code: &'static str, rule: F)
    where
        F: FnOnce() -> Result<Option<RuleFlag>, String>,
    {
        match rule() {
            Ok(Some(flag)) => {
                self.raw_score += flag.score_impact;
                self.flags.push(flag);
            }
            Ok(None) => {}
            Err(reason) => {
                log::warn!("{} rule {} skipped: {}", self.subject, code, reason);
                self.excluded_rules.push(code);
            }
        }
    }

    pub fn finish(self) -> ScoredResult {
        let score = self.raw_score.min(MAX_SCORE);
        ScoredResult {
            subject: self.subject,
            flags: self.flags,
            score,
            level: RiskLevel::from_score(score),
            excluded_rules: self.excluded_rules,
        }
    }
}

/// Outcome of one scored check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    /// What was checked, e.g. "depreciation audit"
    pub subject: &'static str,
    pub flags: Vec<RuleFlag>,
    pub score: u32,
    pub level: RiskLevel,
    /// Rules skipped because they could not be evaluated
    pub excluded_rules: Vec<&'static str>,
}

impl ScoredResult {
    /// Enforce a caller-supplied hard score limit.
    pub fn ensure_below(&self, limit: u32) -> Result<(), TaxError> {
        if self.score >= limit {
            return Err(TaxError::RiskThreshold {
                score: self.score,
                limit,
            });
        }
        Ok(())
    }
}

pub type AuditResult = ScoredResult;
pub type RiskScore = ScoredResult;
