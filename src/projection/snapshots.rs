//! Output structures for loan projections

use serde::{Deserialize, Serialize};

use super::state::LoanState;

/// One simulated year of a loan projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSnapshot {
    pub year: i32,
    pub state: LoanState,

    /// Balance after this year's interest and payment
    pub balance: f64,

    // Income-contingent payment due (before capping at the balance)
    pub monthly_payment: f64,
    pub annual_payment: f64,

    /// Payment actually applied to the balance
    pub amount_paid: f64,

    pub interest_rate: f64,
    pub salary: f64,
    pub total_paid: f64,
    pub interest_accrued: f64,

    /// Amount forgiven, set on the write-off year only
    #[serde(default)]
    pub written_off: Option<f64>,
}

/// How heavily the current repayment weighs on the current salary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepaymentBurden {
    /// Salary at or below the threshold
    None,
    /// Up to 5% of salary
    Low,
    /// Up to 10% of salary
    Moderate,
    High,
}

impl RepaymentBurden {
    pub fn classify(current_salary: f64, threshold: f64, annual_repayment: f64) -> Self {
        if current_salary <= threshold {
            RepaymentBurden::None
        } else if annual_repayment <= current_salary * 0.05 {
            RepaymentBurden::Low
        } else if annual_repayment <= current_salary * 0.1 {
            RepaymentBurden::Moderate
        } else {
            RepaymentBurden::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RepaymentBurden::None => "No repayments required",
            RepaymentBurden::Low => "Low repayment burden",
            RepaymentBurden::Moderate => "Moderate repayment burden",
            RepaymentBurden::High => "High repayment burden",
        }
    }
}

/// How the loan ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoanOutcome {
    /// Nothing was ever owed
    NothingOwed,
    /// Repaid in full before the write-off year
    PaidOff { year: i32 },
    /// Remaining balance forgiven
    WrittenOff { year: i32, amount: f64 },
    /// Final payment in the write-off year cleared the balance exactly
    ClearedAtWriteOff { year: i32 },
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Display name of the plan projected
    pub plan_name: String,

    /// Year repayment obligations begin (anchor of the write-off countdown)
    pub first_repayment_year: i32,
    pub write_off_year: i32,
    pub payoff_year: Option<i32>,

    /// Interest rate at today's salary
    pub current_interest_rate: f64,
    pub current_annual_repayment: f64,
    pub current_monthly_repayment: f64,
    pub repayment_burden: RepaymentBurden,

    pub total_repaid: f64,
    pub written_off_amount: f64,
    pub will_be_written_off: bool,

    /// Yearly snapshots from graduation to write-off
    pub series: Vec<YearSnapshot>,
}

impl ProjectionResult {
    /// Total interest added over the life of the loan
    pub fn total_interest(&self) -> f64 {
        self.series.iter().map(|s| s.interest_accrued).sum()
    }

    /// Snapshot for a given calendar year, if simulated
    pub fn snapshot(&self, year: i32) -> Option<&YearSnapshot> {
        self.series.iter().find(|s| s.year == year)
    }

    pub fn outcome(&self) -> LoanOutcome {
        if let Some(year) = self.payoff_year {
            return LoanOutcome::PaidOff { year };
        }
        if self.will_be_written_off {
            return LoanOutcome::WrittenOff {
                year: self.write_off_year,
                amount: self.written_off_amount,
            };
        }
        let owed_at_graduation = self
            .series
            .first()
            .is_some_and(|s| s.state != LoanState::Settled);
        if owed_at_graduation {
            LoanOutcome::ClearedAtWriteOff {
                year: self.write_off_year,
            }
        } else {
            LoanOutcome::NothingOwed
        }
    }
}
