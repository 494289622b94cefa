//! Running balance state for a single loan projection

use serde::{Deserialize, Serialize};

use super::snapshots::YearSnapshot;

/// What happened to the loan in a simulated year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanState {
    /// Interest accrues, nothing is repaid
    Accruing,
    /// Interest accrues and a repayment is taken from salary
    Repaying,
    /// Balance already cleared (paid off, written off, or never owed)
    Settled,
}

/// Mutable state carried from one projection year to the next
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Principal plus accrued interest still owed
    pub remaining_balance: f64,

    /// Cumulative repayments
    pub total_paid: f64,

    /// First year the balance reached zero through repayment
    pub payoff_year: Option<i32>,

    /// Balance forgiven in the write-off year
    pub written_off_amount: f64,
}

impl ProjectionState {
    /// Initialize state at graduation
    pub fn new(loan_amount: f64) -> Self {
        Self {
            remaining_balance: loan_amount,
            total_paid: 0.0,
            payoff_year: None,
            written_off_amount: 0.0,
        }
    }

    /// State the coming year starts in, before any repayment decision
    pub fn is_settled(&self) -> bool {
        self.remaining_balance <= 0.0
    }

    /// Record a year in which nothing is owed
    pub fn settled_year(&self, year: i32, salary: f64) -> YearSnapshot {
        YearSnapshot {
            year,
            state: LoanState::Settled,
            balance: 0.0,
            monthly_payment: 0.0,
            annual_payment: 0.0,
            amount_paid: 0.0,
            interest_rate: 0.0,
            salary,
            total_paid: self.total_paid,
            interest_accrued: 0.0,
            written_off: None,
        }
    }

    /// Accrue a year of interest and apply `payment_due`, if any.
    ///
    /// Payment is capped at the balance after interest. When `terminal` is set
    /// whatever remains afterwards is written off and the state settles.
    pub fn advance_year(
        &mut self,
        year: i32,
        salary: f64,
        yearly_rate: f64,
        payment_due: Option<f64>,
        terminal: bool,
    ) -> YearSnapshot {
        let interest_accrued = self.remaining_balance * yearly_rate;
        self.remaining_balance += interest_accrued;

        let mut annual_payment = 0.0;
        let mut amount_paid = 0.0;
        if let Some(due) = payment_due {
            annual_payment = due;
            amount_paid = due.min(self.remaining_balance);
            self.remaining_balance -= amount_paid;
            self.total_paid += amount_paid;

            if !terminal && self.remaining_balance <= 0.0 && self.payoff_year.is_none() {
                self.payoff_year = Some(year);
                self.remaining_balance = 0.0;
            }
        }

        let state = if payment_due.is_some() {
            LoanState::Repaying
        } else {
            LoanState::Accruing
        };

        let mut snapshot = YearSnapshot {
            year,
            state,
            balance: self.remaining_balance,
            monthly_payment: annual_payment / 12.0,
            annual_payment,
            amount_paid,
            interest_rate: yearly_rate,
            salary,
            total_paid: self.total_paid,
            interest_accrued,
            written_off: None,
        };

        if terminal {
            self.written_off_amount = self.remaining_balance;
            self.remaining_balance = 0.0;
            snapshot.balance = 0.0;
            snapshot.written_off = Some(self.written_off_amount);
        }

        snapshot
    }
}
