//! Schema command - print expected input formats

use clap::Args;
use fedtax::FilingInput;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the filing input
    JsonSchema,
    /// A worked example input document
    Example,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(FilingInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::Example => println!("{EXAMPLE_INPUT}"),
        }
        Ok(())
    }
}

const EXAMPLE_INPUT: &str = r#"{
  "taxpayer": {
    "taxpayer_id": "123-45-6789",
    "filing_status": "SINGLE",
    "forms": [
      {"form": "W-2", "employer_ein": "12-3456789", "wages": 85000,
       "federal_withheld": 12000, "state_withheld": 3500},
      {"form": "1099-NEC", "payer_tin": "98-7654321", "nonemployee_comp": 22000},
      {"form": "Schedule C", "gross_receipts": 50000, "expenses": 18000},
      {"form": "1099-INT", "payer_tin": "11-2223333", "interest_income": 450}
    ],
    "assets": [
      {"cost": 100000, "recovery_period": 5, "placed_in_service_qtr": 4,
       "section179": 25000}
    ],
    "itemized_deductions": 9000,
    "qualifying_children": 0,
    "prior_year_depreciation": 18000
  },
  "config": {
    "tax": {"bonus_rate": 0.60, "state_bonus_rate": 0.0},
    "audit": {"section179_soft_limit": 1000000}
  }
}"#;
