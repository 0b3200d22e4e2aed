//! Compute command - full pipeline from filing input to escalation verdict

use crate::cmd::read_filing_input;
use clap::Args;
use fedtax::review::{ComplianceResult, EscalationResult, RiskScore};
use fedtax::tax::ReturnForms;
use fedtax::{
    build_return_forms, evaluate_for_escalation, run_compliance_check, run_risk_scoring,
    ComputedReturn, TaxEngine,
};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ComputeCommand {
    /// JSON filing input file (or "-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Everything the pipeline produced for one taxpayer
#[derive(Debug, Serialize)]
struct PipelineReport {
    #[serde(rename = "return")]
    computed: ComputedReturn,
    forms: ReturnForms,
    compliance: ComplianceResult,
    risk: RiskScore,
    escalation: EscalationResult,
}

impl ComputeCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let filing = read_filing_input(&self.input)?;
        let engine = TaxEngine::new(filing.config.clone())?;

        let computed = engine.run_return(&filing.taxpayer)?;
        let forms = build_return_forms(&filing.taxpayer, &computed);
        let compliance = run_compliance_check(&forms);
        let risk = run_risk_scoring(&forms, filing.taxpayer.prior_year_deductions);
        let safety = filing.safety.clone().unwrap_or_default();
        let escalation = evaluate_for_escalation(
            &filing.taxpayer.taxpayer_id,
            &compliance,
            &[&computed.audit, &risk],
            &safety,
        );

        let report = PipelineReport {
            computed,
            forms,
            compliance,
            risk,
            escalation,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&filing.taxpayer.taxpayer_id, filing.taxpayer.filing_status, &report);
        }
        Ok(())
    }
}

fn print_report(
    taxpayer_id: &str,
    filing_status: fedtax::FilingStatus,
    report: &PipelineReport,
) {
    let ret = &report.computed;

    println!("Federal Return - {taxpayer_id} ({filing_status})");
    println!("==============================================");
    println!();

    let summary = vec![
        SummaryRow::new("Total income", ret.total_income.to_string()),
        SummaryRow::new("Deduction taken", ret.deductions.deduction_taken.to_string()),
        SummaryRow::new("Taxable income", ret.taxable_income.to_string()),
        SummaryRow::new("Tax before credits", ret.tax_before_credits.to_string()),
        SummaryRow::new("Credits applied", ret.applied_credits.applied.to_string()),
        SummaryRow::new(
            "Refundable disbursed",
            ret.applied_credits.refundable_disbursed.to_string(),
        ),
        SummaryRow::new("Self-employment tax", ret.se_tax.tax.to_string()),
        SummaryRow::new("Total tax", ret.total_tax.to_string()),
        SummaryRow::new("Federal withholding", ret.federal_withholding.to_string()),
        SummaryRow::new("Balance due", ret.balance_due.to_string()),
        SummaryRow::new("Effective rate", ret.effective_rate.to_string()),
    ];
    print_table(&summary);
    println!();

    if !ret.depreciation.federal.is_empty() {
        println!(
            "Depreciation: federal first-year {}, state first-year {}{}",
            ret.depreciation.federal_first_year(),
            ret.depreciation.state_first_year(),
            if ret.depreciation.mid_quarter_required {
                " (mid-quarter convention triggered)"
            } else {
                ""
            }
        );
        println!();
    }

    print_flags("Audit screening", &ret.audit);
    print_flags("Deduction risk", &report.risk);

    if report.compliance.issues.is_empty() {
        println!("Compliance: no issues");
    } else {
        println!(
            "Compliance: {}",
            if report.compliance.compliant {
                "compliant (informational issues below)"
            } else {
                "NON-COMPLIANT"
            }
        );
        let rows: Vec<IssueRow> = report
            .compliance
            .issues
            .iter()
            .map(|i| IssueRow {
                code: i.code.to_string(),
                severity: format!("{:?}", i.severity).to_uppercase(),
                message: i.message.clone(),
            })
            .collect();
        print_table(&rows);
    }
    println!();

    if report.escalation.needs_escalation {
        println!(
            "Escalation: {} case(s) raised for human review",
            report.escalation.cases.len()
        );
        for case in &report.escalation.cases {
            println!("  [{:?}] {}", case.severity, case.summary);
            for detail in &case.details {
                println!("    - {detail}");
            }
        }
    } else {
        println!("Escalation: none required");
    }
}

fn print_flags(title: &str, result: &fedtax::ScoredResult) {
    println!("{title}: score {} ({})", result.score, result.level);
    if !result.flags.is_empty() {
        let rows: Vec<FlagRow> = result
            .flags
            .iter()
            .map(|f| FlagRow {
                code: f.code.to_string(),
                severity: f.severity.to_string(),
                impact: f.score_impact.to_string(),
                description: f.description.clone(),
            })
            .collect();
        print_table(&rows);
    }
    if !result.excluded_rules.is_empty() {
        println!("  skipped rules: {}", result.excluded_rules.join(", "));
    }
    println!();
}

fn print_table<T: Tabled>(rows: &[T]) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

#[derive(Debug, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Line")]
    line: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl SummaryRow {
    fn new(line: &str, amount: String) -> SummaryRow {
        SummaryRow {
            line: line.to_string(),
            amount,
        }
    }
}

#[derive(Debug, Tabled)]
struct FlagRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Sev")]
    severity: String,
    #[tabled(rename = "Impact")]
    impact: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Debug, Tabled)]
struct IssueRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Message")]
    message: String,
}
