//! Scenarios command - side-by-side comparison of depreciation postures

use crate::cmd::read_filing_input;
use clap::Args;
use fedtax::run_scenarios;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ScenariosCommand {
    /// JSON filing input file (or "-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled)]
struct ScenarioRow {
    #[tabled(rename = "Scenario")]
    scenario: String,
    #[tabled(rename = "Section 179")]
    section179: String,
    #[tabled(rename = "Bonus")]
    bonus: String,
    #[tabled(rename = "First-Year Deduction")]
    first_year: String,
    #[tabled(rename = "Total Tax")]
    total_tax: String,
    #[tabled(rename = "Audit Score")]
    audit_score: String,
}

impl ScenariosCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let filing = read_filing_input(&self.input)?;
        let outcomes = run_scenarios(&filing.config, &filing.taxpayer)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
            return Ok(());
        }

        let rows: Vec<ScenarioRow> = outcomes
            .iter()
            .map(|o| ScenarioRow {
                scenario: o.mode.to_string(),
                section179: o.result.depreciation.federal_section179().to_string(),
                bonus: o.result.depreciation.federal_bonus().to_string(),
                first_year: o.result.depreciation.federal_first_year().to_string(),
                total_tax: o.result.total_tax.to_string(),
                audit_score: o.result.audit.score.to_string(),
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}
