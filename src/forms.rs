use crate::config::EngineConfig;
use crate::error::ValidationError;
use crate::review::escalation::SafetyResult;
use crate::tax::deductions::ItemizedDeductions;
use crate::tax::depreciation::DepreciableAsset;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Filing status per Form 1040
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

impl FilingStatus {
    pub fn display(&self) -> &'static str {
        match self {
            FilingStatus::Single => "Single",
            FilingStatus::MarriedJoint => "Married Filing Jointly",
            FilingStatus::MarriedSeparate => "Married Filing Separately",
            FilingStatus::HeadOfHousehold => "Head of Household",
        }
    }
}

impl std::fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// An income-reporting form attached to a return. The `form` tag carries the
/// IRS form name on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "form")]
pub enum IncomeForm {
    #[serde(rename = "W-2")]
    W2 {
        employer_ein: String,
        #[schemars(with = "f64")]
        wages: Decimal,
        #[schemars(with = "f64")]
        federal_withheld: Decimal,
        #[schemars(with = "f64")]
        state_withheld: Decimal,
    },
    #[serde(rename = "1099-NEC")]
    Nec1099 {
        payer_tin: String,
        #[schemars(with = "f64")]
        nonemployee_comp: Decimal,
    },
    #[serde(rename = "1099-INT")]
    Int1099 {
        payer_tin: String,
        #[schemars(with = "f64")]
        interest_income: Decimal,
    },
    #[serde(rename = "1099-DIV")]
    Div1099 {
        payer_tin: String,
        #[schemars(with = "f64")]
        ordinary_dividends: Decimal,
    },
    #[serde(rename = "Schedule C")]
    ScheduleC {
        #[schemars(with = "f64")]
        gross_receipts: Decimal,
        #[schemars(with = "f64")]
        expenses: Decimal,
    },
    /// Form types this engine does not recognise. Ignored during income
    /// normalization so new form variants never break existing callers.
    #[serde(other)]
    Other,
}

impl IncomeForm {
    /// Reject amounts that are out of domain for the form. Schedule C
    /// expenses may exceed receipts (a net loss is legal, and flagged
    /// downstream), but no reported amount may itself be negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            IncomeForm::W2 {
                wages,
                federal_withheld,
                state_withheld,
                ..
            } => {
                non_negative("wages", *wages)?;
                non_negative("federal_withheld", *federal_withheld)?;
                non_negative("state_withheld", *state_withheld)?;
            }
            IncomeForm::Nec1099 {
                nonemployee_comp, ..
            } => non_negative("nonemployee_comp", *nonemployee_comp)?,
            IncomeForm::Int1099 {
                interest_income, ..
            } => non_negative("interest_income", *interest_income)?,
            IncomeForm::Div1099 {
                ordinary_dividends, ..
            } => non_negative("ordinary_dividends", *ordinary_dividends)?,
            IncomeForm::ScheduleC {
                gross_receipts,
                expenses,
            } => {
                non_negative("gross_receipts", *gross_receipts)?;
                non_negative("expenses", *expenses)?;
            }
            IncomeForm::Other => {}
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount { field, value });
    }
    Ok(())
}

/// A taxpayer filing request. Immutable for the duration of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Taxpayer {
    pub taxpayer_id: String,
    pub filing_status: FilingStatus,
    #[serde(default)]
    pub forms: Vec<IncomeForm>,
    #[serde(default)]
    pub assets: Vec<DepreciableAsset>,
    /// Pre-computed itemized deduction total. Ignored when
    /// `itemized_detail` is present.
    #[serde(default)]
    #[schemars(with = "f64")]
    pub itemized_deductions: Decimal,
    /// Itemized deduction breakdown; when present the engine applies the
    /// AGI floor and SALT cap itself instead of trusting the flat total.
    #[serde(default)]
    pub itemized_detail: Option<ItemizedDeductions>,
    #[serde(default)]
    pub qualifying_children: u32,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub prior_year_depreciation: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub prior_year_deductions: Option<Decimal>,
}

/// Root input document for the CLI: one taxpayer plus configuration and the
/// safety gate verdict supplied by the surrounding system.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FilingInput {
    pub taxpayer: Taxpayer,
    #[serde(default)]
    pub config: EngineConfig,
    /// Verdict of the external AI-safety gate, if any ran for this request
    #[serde(default)]
    pub safety: Option<SafetyResult>,
}
