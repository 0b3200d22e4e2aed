use rust_decimal::Decimal;

/// Input validation failures. These abort the pipeline for the taxpayer -
/// no partial return is ever produced from malformed input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unsupported recovery period: {0} years (expected 3, 5, 7, 10, 15 or 20)")]
    UnsupportedRecoveryPeriod(u8),
    #[error("section 179 election {elected} exceeds asset cost {cost}")]
    Section179ExceedsCost { elected: Decimal, cost: Decimal },
    #[error("quarter placed in service must be 1-4, got {0}")]
    InvalidQuarter(u8),
    #[error("{field} must be between 0 and 1, got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },
    #[error("{field} cannot be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
}

/// Error taxonomy for the whole engine.
#[derive(Debug, thiserror::Error)]
pub enum TaxError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A structural rule violation severe enough to block further processing.
    /// The compliance engine itself reports issues rather than raising; this
    /// is reserved for callers that choose to treat non-conformance as fatal.
    #[error("compliance violation: {0}")]
    Compliance(String),
    /// A scored result breached a caller-supplied hard limit.
    #[error("risk threshold exceeded: score {score} >= limit {limit}")]
    RiskThreshold { score: u32, limit: u32 },
    /// A failure during multi-scenario simulation, preserving the cause.
    #[error("scenario '{mode}' simulation failed")]
    Scenario {
        mode: String,
        #[source]
        source: Box<TaxError>,
    },
}
