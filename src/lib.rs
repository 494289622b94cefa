//! PaySaver - personal finance calculators
//!
//! This library provides:
//! - Student loan repayment projections (undergraduate and postgraduate plans)
//! - Repayment plan tables, built in or loaded from CSV
//! - Batch projections over many borrowers
//! - Mortgage repayment and affordability estimates
//! - Take-home pay after income tax and national insurance

pub mod error;
pub mod plans;
pub mod borrower;
pub mod projection;
pub mod scenario;
pub mod mortgage;
pub mod take_home;

// Re-export commonly used types
pub use error::{Error, Result};
pub use plans::{LoanCalculator, PlanId, PlanTable, RepaymentPlan};
pub use borrower::Borrower;
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionInput, ProjectionResult, YearSnapshot};
pub use scenario::ScenarioRunner;
