//! Validate command - surface compliance and risk findings without printing
//! a full return

use crate::cmd::read_filing_input;
use clap::Args;
use fedtax::{build_return_forms, run_compliance_check, run_risk_scoring, TaxEngine};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// JSON filing input file (or "-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Fail when the deduction risk score reaches this limit
    #[arg(long)]
    max_risk: Option<u32>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ValidationOutput {
    taxpayer_id: String,
    compliant: bool,
    issue_count: usize,
    issues: Vec<IssueOutput>,
    risk_score: u32,
    risk_level: String,
}

#[derive(Debug, Serialize)]
struct IssueOutput {
    code: String,
    severity: String,
    message: String,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let filing = read_filing_input(&self.input)?;
        let engine = TaxEngine::new(filing.config.clone())?;
        let computed = engine.run_return(&filing.taxpayer)?;
        let forms = build_return_forms(&filing.taxpayer, &computed);

        let compliance = run_compliance_check(&forms);
        let risk = run_risk_scoring(&forms, filing.taxpayer.prior_year_deductions);

        let output = ValidationOutput {
            taxpayer_id: filing.taxpayer.taxpayer_id.clone(),
            compliant: compliance.compliant,
            issue_count: compliance.issues.len(),
            issues: compliance
                .issues
                .iter()
                .map(|i| IssueOutput {
                    code: i.code.to_string(),
                    severity: format!("{:?}", i.severity).to_uppercase(),
                    message: i.message.clone(),
                })
                .collect(),
            risk_score: risk.score,
            risk_level: risk.level.to_string(),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&output);
        }

        if let Some(limit) = self.max_risk {
            risk.ensure_below(limit)?;
        }

        // Exit with code 1 on a non-compliant return
        if !compliance.compliant {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(output: &ValidationOutput) {
    println!(
        "{}: {} ({} issue(s)), risk {} ({})",
        output.taxpayer_id,
        if output.compliant {
            "compliant"
        } else {
            "NON-COMPLIANT"
        },
        output.issue_count,
        output.risk_score,
        output.risk_level
    );
    for issue in &output.issues {
        println!("  [{}] {}: {}", issue.severity, issue.code, issue.message);
    }
}
