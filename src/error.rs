//! Error type shared by the plan table, loaders and calculators

use thiserror::Error;

/// Errors raised at the edges of the engine (lookups and file loading).
///
/// Numeric degeneracies inside the calculators are never errors; they
/// surface as zero or non-finite values in the output instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown repayment plan: {0}")]
    UnknownPlan(String),

    #[error("plan '{plan}' is not offered by the {calculator} calculator")]
    PlanNotOffered {
        plan: String,
        calculator: &'static str,
    },

    #[error("unknown tax year: {0}")]
    UnknownTaxYear(String),

    #[error("invalid repayment plan '{plan}': {reason}")]
    InvalidPlan { plan: String, reason: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
