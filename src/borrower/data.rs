//! Borrower records for batch projections

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::plans::PlanTable;
use crate::projection::ProjectionInput;

/// A single borrower from a batch input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borrower {
    /// Caller-supplied identifier, echoed in the output
    pub id: String,

    /// Outstanding loan at graduation
    pub loan_amount: f64,

    pub current_salary: f64,

    /// Expected annual salary growth as a fraction
    pub salary_growth: f64,

    pub graduation_year: i32,

    /// Plan identifier, looked up in a [`PlanTable`]
    pub plan: String,
}

impl Borrower {
    /// Resolve the plan and build engine input
    pub fn to_input(&self, plans: &PlanTable) -> Result<ProjectionInput> {
        let plan = plans.get(&self.plan)?.clone();
        Ok(ProjectionInput {
            loan_amount: self.loan_amount,
            current_salary: self.current_salary,
            expected_salary_growth: self.salary_growth,
            graduation_year: self.graduation_year,
            plan,
        })
    }
}
