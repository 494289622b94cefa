//! Student loan projection engine shared by the undergraduate and
//! postgraduate calculators

mod state;
mod engine;
mod snapshots;

pub use state::{LoanState, ProjectionState};
pub use engine::{
    find_first_repayment_year, income_contingent_payment, project_salary, resolve_interest_rate,
    simulate, ProjectionConfig, ProjectionEngine, ProjectionInput, CURRENT_YEAR_ENV,
    GRADUATION_LOOKBACK_YEARS,
};
pub use snapshots::{LoanOutcome, ProjectionResult, RepaymentBurden, YearSnapshot};
