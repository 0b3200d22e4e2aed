use crate::forms::IncomeForm;
use rust_decimal::Decimal;
use serde::Serialize;

/// Canonical income buckets produced from the heterogeneous form list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IncomeBuckets {
    pub wages: Decimal,
    pub self_employment: Decimal,
    pub interest: Decimal,
    pub dividends: Decimal,
    pub business_income: Decimal,
    pub withholding_federal: Decimal,
    pub withholding_state: Decimal,
}

impl IncomeBuckets {
    /// Total income in this simplified model: interest and dividends count
    /// as ordinary income, with no qualified/ordinary split and no capital
    /// gains treatment.
    pub fn total_income(&self) -> Decimal {
        (self.wages
            + self.self_employment
            + self.business_income
            + self.interest
            + self.dividends)
            .round_dp(2)
    }
}

/// Aggregate income forms into buckets. Dispatch is an exhaustive match on
/// the form variant; unrecognised forms are skipped.
pub fn normalize(forms: &[IncomeForm]) -> IncomeBuckets {
    let mut buckets = IncomeBuckets::default();

    for form in forms {
        match form {
            IncomeForm::W2 {
                wages,
                federal_withheld,
                state_withheld,
                ..
            } => {
                buckets.wages += wages;
                buckets.withholding_federal += federal_withheld;
                buckets.withholding_state += state_withheld;
            }
            IncomeForm::Nec1099 {
                nonemployee_comp, ..
            } => buckets.self_employment += nonemployee_comp,
            IncomeForm::ScheduleC {
                gross_receipts,
                expenses,
            } => buckets.business_income += gross_receipts - expenses,
            IncomeForm::Int1099 {
                interest_income, ..
            } => buckets.interest += interest_income,
            IncomeForm::Div1099 {
                ordinary_dividends, ..
            } => buckets.dividends += ordinary_dividends,
            IncomeForm::Other => {}
        }
    }

    buckets
}
