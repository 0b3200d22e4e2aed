//! Structural compliance checks over the filed forms. Unlike the scored
//! checks, these are pass/fail: any ERROR-severity issue makes the return
//! non-compliant.

use crate::tax::business::{SE_INCOME_FACTOR, SE_TAX_RATE};
use crate::tax::filing::ReturnForms;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Statutory Section 179 cap for 2024. The engine never enforces this;
/// catching an over-election is this check's job.
pub const SECTION_179_LIMIT: Decimal = dec!(1220000);

/// Tolerance for the SE tax reconciliation, absorbing rounding drift.
const SE_TAX_TOLERANCE: Decimal = dec!(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceIssue {
    pub code: &'static str,
    pub severity: IssueSeverity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceResult {
    pub compliant: bool,
    pub issues: Vec<ComplianceIssue>,
}

impl ComplianceResult {
    pub fn errors(&self) -> impl Iterator<Item = &ComplianceIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
    }
}

/// Run every structural check against the filed forms.
pub fn run_compliance_check(forms: &ReturnForms) -> ComplianceResult {
    let mut issues = Vec::new();

    // Cross-form presence rules
    if forms.form_4562.is_some() && forms.schedule_c.is_none() {
        issues.push(ComplianceIssue {
            code: "FORM_DEP_MISSING_SC",
            severity: IssueSeverity::Error,
            message: "Form 4562 filed without a Schedule C".to_string(),
        });
    }
    if forms.schedule_se.is_some() && forms.schedule_c.is_none() {
        issues.push(ComplianceIssue {
            code: "FORM_SE_MISSING_SC",
            severity: IssueSeverity::Error,
            message: "Schedule SE filed without a Schedule C".to_string(),
        });
    }

    if let Some(form_4562) = &forms.form_4562 {
        if form_4562.section179 < Decimal::ZERO {
            issues.push(ComplianceIssue {
                code: "179_NEGATIVE",
                severity: IssueSeverity::Error,
                message: format!(
                    "Section 179 deduction cannot be negative, got {}",
                    form_4562.section179
                ),
            });
        }
        if form_4562.section179 > SECTION_179_LIMIT {
            issues.push(ComplianceIssue {
                code: "179_LIMIT_EXCEEDED",
                severity: IssueSeverity::Error,
                message: format!(
                    "Section 179 deduction {} exceeds the {SECTION_179_LIMIT} statutory limit",
                    form_4562.section179
                ),
            });
        }
        if form_4562.bonus < Decimal::ZERO {
            issues.push(ComplianceIssue {
                code: "BONUS_NEGATIVE",
                severity: IssueSeverity::Error,
                message: format!(
                    "bonus depreciation cannot be negative, got {}",
                    form_4562.bonus
                ),
            });
        }
    }

    if let Some(schedule_c) = &forms.schedule_c {
        if schedule_c.net_profit < Decimal::ZERO {
            issues.push(ComplianceIssue {
                code: "SC_NEGATIVE_PROFIT",
                severity: IssueSeverity::Info,
                message: format!(
                    "Schedule C net loss of {}; loss year noted",
                    schedule_c.net_profit
                ),
            });
        }

        // SE tax must reconcile with Schedule C net profit
        if let Some(schedule_se) = &forms.schedule_se {
            let expected = if schedule_c.net_profit > Decimal::ZERO {
                (schedule_c.net_profit * SE_INCOME_FACTOR * SE_TAX_RATE).round_dp(2)
            } else {
                Decimal::ZERO
            };
            if (schedule_se.se_tax - expected).abs() > SE_TAX_TOLERANCE {
                issues.push(ComplianceIssue {
                    code: "SE_TAX_MISMATCH",
                    severity: IssueSeverity::Error,
                    message: format!(
                        "Schedule SE tax {} does not reconcile with net profit {} (expected {expected})",
                        schedule_se.se_tax, schedule_c.net_profit
                    ),
                });
            }
        }
    }

    let form_1040 = &forms.form_1040;
    if form_1040.total_income < Decimal::ZERO {
        issues.push(ComplianceIssue {
            code: "1040_NEG_INCOME",
            severity: IssueSeverity::Error,
            message: format!("total income is negative: {}", form_1040.total_income),
        });
    }
    if form_1040.taxable_income < Decimal::ZERO {
        issues.push(ComplianceIssue {
            code: "1040_NEG_TAXABLE",
            severity: IssueSeverity::Error,
            message: format!("taxable income is negative: {}", form_1040.taxable_income),
        });
    }
    if form_1040.taxable_income > form_1040.total_income {
        issues.push(ComplianceIssue {
            code: "1040_INVALID_TAXABLE",
            severity: IssueSeverity::Error,
            message: format!(
                "taxable income {} exceeds total income {}",
                form_1040.taxable_income, form_1040.total_income
            ),
        });
    }

    let compliant = !issues.iter().any(|i| i.severity == IssueSeverity::Error);
    ComplianceResult { compliant, issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::filing::{Form1040, Form4562, ScheduleCForm, ScheduleSeForm};

    fn forms(total_income: Decimal, deduction: Decimal, taxable: Decimal) -> ReturnForms {
        ReturnForms {
            form_1040: Form1040 {
                total_income,
                deduction,
                taxable_income: taxable,
            },
            form_4562: None,
            schedule_c: None,
            schedule_se: None,
        }
    }

    fn has(result: &ComplianceResult, code: &str) -> bool {
        result.issues.iter().any(|i| i.code == code)
    }

    #[test]
    fn clean_return_is_compliant() {
        let result = run_compliance_check(&forms(dec!(85000), dec!(14600), dec!(70400)));
        assert!(result.compliant);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn form_4562_requires_schedule_c() {
        let mut f = forms(dec!(85000), dec!(14600), dec!(70400));
        f.form_4562 = Some(Form4562 {
            section179: dec!(10000),
            bonus: Decimal::ZERO,
        });
        let result = run_compliance_check(&f);
        assert!(!result.compliant);
        assert!(has(&result, "FORM_DEP_MISSING_SC"));
    }

    #[test]
    fn schedule_se_requires_schedule_c() {
        let mut f = forms(dec!(85000), dec!(14600), dec!(70400));
        f.schedule_se = Some(ScheduleSeForm { se_tax: dec!(5000) });
        let result = run_compliance_check(&f);
        assert!(!result.compliant);
        assert!(has(&result, "FORM_SE_MISSING_SC"));
    }

    #[test]
    fn section_179_statutory_cap() {
        let mut f = forms(dec!(2000000), dec!(14600), dec!(1985400));
        f.schedule_c = Some(ScheduleCForm {
            net_profit: dec!(2000000),
        });
        f.form_4562 = Some(Form4562 {
            section179: dec!(1300000),
            bonus: Decimal::ZERO,
        });
        let result = run_compliance_check(&f);
        assert!(has(&result, "179_LIMIT_EXCEEDED"));

        f.form_4562 = Some(Form4562 {
            section179: SECTION_179_LIMIT,
            bonus: Decimal::ZERO,
        });
        let result = run_compliance_check(&f);
        assert!(!has(&result, "179_LIMIT_EXCEEDED"));
    }

    #[test]
    fn negative_depreciation_amounts_rejected() {
        let mut f = forms(dec!(85000), dec!(14600), dec!(70400));
        f.schedule_c = Some(ScheduleCForm {
            net_profit: dec!(10000),
        });
        f.form_4562 = Some(Form4562 {
            section179: dec!(-1),
            bonus: dec!(-1),
        });
        let result = run_compliance_check(&f);
        assert!(has(&result, "179_NEGATIVE"));
        assert!(has(&result, "BONUS_NEGATIVE"));
    }

    #[test]
    fn schedule_c_loss_is_informational_only() {
        let mut f = forms(dec!(30000), dec!(14600), dec!(15400));
        f.schedule_c = Some(ScheduleCForm {
            net_profit: dec!(-5000),
        });
        let result = run_compliance_check(&f);
        assert!(result.compliant);
        let issue = result.issues.iter().find(|i| i.code == "SC_NEGATIVE_PROFIT").unwrap();
        assert_eq!(issue.severity, IssueSeverity::Info);
    }

    #[test]
    fn se_tax_must_reconcile_with_net_profit() {
        let mut f = forms(dec!(50000), dec!(14600), dec!(35400));
        f.schedule_c = Some(ScheduleCForm {
            net_profit: dec!(32000),
        });
        // 32,000 * 0.9235 * 0.153 = 4,521.46
        f.schedule_se = Some(ScheduleSeForm {
            se_tax: dec!(4521.46),
        });
        assert!(run_compliance_check(&f).compliant);

        // Within the $5 tolerance
        f.schedule_se = Some(ScheduleSeForm {
            se_tax: dec!(4525.00),
        });
        assert!(run_compliance_check(&f).compliant);

        f.schedule_se = Some(ScheduleSeForm {
            se_tax: dec!(7629.96),
        });
        let result = run_compliance_check(&f);
        assert!(!result.compliant);
        assert!(has(&result, "SE_TAX_MISMATCH"));
    }

    #[test]
    fn invalid_1040_lines_rejected() {
        let result = run_compliance_check(&forms(dec!(-100), dec!(0), dec!(-100)));
        assert!(has(&result, "1040_NEG_INCOME"));
        assert!(has(&result, "1040_NEG_TAXABLE"));

        // Taxable exceeding total income is structurally impossible
        let result = run_compliance_check(&forms(dec!(20000), dec!(0), dec!(35000)));
        assert!(has(&result, "1040_INVALID_TAXABLE"));
    }

    #[test]
    fn severity_ordering() {
        assert!(IssueSeverity::Info < IssueSeverity::Warning);
        assert!(IssueSeverity::Warning < IssueSeverity::Error);
    }
}
