//! Mortgage repayment and affordability calculators
//!
//! Both use the standard amortization formula
//! `P * r * (1+r)^n / ((1+r)^n - 1)` with `r` the monthly rate and `n` the
//! number of monthly payments. They differ in how they treat a zero rate:
//! the repayment calculator divides the principal evenly, the affordability
//! report does not special-case it and yields NaN.

use serde::{Deserialize, Serialize};

/// Mortgage terms offered, in years
pub const MORTGAGE_TERMS: [u32; 6] = [15, 20, 25, 30, 35, 40];

/// Household income multiples for the borrowing capacity estimate
pub const CONSERVATIVE_MULTIPLE: f64 = 4.0;
pub const STANDARD_MULTIPLE: f64 = 4.5;
pub const AGGRESSIVE_MULTIPLE: f64 = 5.0;

fn amortized_payment(principal: f64, monthly_rate: f64, payments: f64) -> f64 {
    let growth = (1.0 + monthly_rate).powf(payments);
    principal * (monthly_rate * growth) / (growth - 1.0)
}

/// Monthly payment on a repayment mortgage.
///
/// `annual_rate` is a fraction (0.055 for 5.5%). A zero rate spreads the
/// principal evenly over the term.
pub fn repayment_monthly_payment(principal: f64, annual_rate: f64, term_years: u32) -> f64 {
    let monthly_rate = annual_rate / 12.0;
    let payments = f64::from(term_years) * 12.0;

    if monthly_rate == 0.0 {
        principal / payments
    } else {
        amortized_payment(principal, monthly_rate, payments)
    }
}

/// Inputs to the affordability report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub property_price: f64,
    pub deposit: f64,
    /// Annual interest rate as a fraction
    pub annual_rate: f64,
    pub term_years: u32,
    pub primary_salary: f64,
    pub secondary_salary: f64,
}

/// Lending risk by loan-to-income multiple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    /// Below 4.0x
    Low,
    /// 4.0x to 4.5x
    Medium,
    /// 4.5x to 5.0x
    High,
    /// 5.0x and above
    VeryHigh,
}

impl RiskBand {
    pub fn from_multiple(multiple: f64) -> Self {
        if multiple < 4.0 {
            RiskBand::Low
        } else if multiple < 4.5 {
            RiskBand::Medium
        } else if multiple < 5.0 {
            RiskBand::High
        } else {
            RiskBand::VeryHigh
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Low => "LOW RISK LOAN",
            RiskBand::Medium => "MEDIUM RISK LOAN",
            RiskBand::High => "HIGH RISK LOAN",
            RiskBand::VeryHigh => "VERY HIGH RISK LOAN",
        }
    }
}

/// Maximum loan estimates at typical lender income multiples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorrowingCapacity {
    pub conservative: f64,
    pub standard: f64,
    pub aggressive: f64,
}

impl BorrowingCapacity {
    pub fn for_income(household_income: f64) -> Self {
        Self {
            conservative: household_income * CONSERVATIVE_MULTIPLE,
            standard: household_income * STANDARD_MULTIPLE,
            aggressive: household_income * AGGRESSIVE_MULTIPLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityReport {
    pub loan_amount: f64,
    pub household_income: f64,
    /// Loan as a multiple of household income (0 without a property price)
    pub income_multiple: f64,
    pub risk_band: RiskBand,
    pub borrowing_capacity: BorrowingCapacity,
    pub monthly_payment: f64,
}

/// Assess a mortgage against household income
pub fn assess_affordability(input: &AffordabilityInput) -> AffordabilityReport {
    let household_income = input.primary_salary + input.secondary_salary;
    let loan_amount = input.property_price - input.deposit;

    let income_multiple = if input.property_price > 0.0 {
        loan_amount / household_income
    } else {
        0.0
    };

    let monthly_rate = input.annual_rate / 12.0;
    let payments = f64::from(input.term_years) * 12.0;
    let monthly_payment = if loan_amount > 0.0 {
        amortized_payment(loan_amount, monthly_rate, payments)
    } else {
        0.0
    };

    AffordabilityReport {
        loan_amount,
        household_income,
        income_multiple,
        risk_band: RiskBand::from_multiple(income_multiple),
        borrowing_capacity: BorrowingCapacity::for_income(household_income),
        monthly_payment,
    }
}
