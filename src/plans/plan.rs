//! Repayment plan parameters and the built-in plan identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Built-in student loan plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    /// Pre-2012 undergraduate loans
    Plan1,
    /// 2012-2023 undergraduate loans
    Plan2,
    /// 2023+ undergraduate loans
    Plan5,
    /// Postgraduate master's/doctoral loans
    #[serde(rename = "postgrad")]
    Postgraduate,
}

impl PlanId {
    pub const ALL: [PlanId; 4] = [
        PlanId::Plan1,
        PlanId::Plan2,
        PlanId::Plan5,
        PlanId::Postgraduate,
    ];

    /// Plans offered by the undergraduate calculator
    pub const UNDERGRADUATE: [PlanId; 3] = [PlanId::Plan1, PlanId::Plan2, PlanId::Plan5];

    /// Plans offered by the postgraduate calculator
    pub const POSTGRADUATE: [PlanId; 1] = [PlanId::Postgraduate];

    /// Table key for this plan
    pub fn key(&self) -> &'static str {
        match self {
            PlanId::Plan1 => "plan1",
            PlanId::Plan2 => "plan2",
            PlanId::Plan5 => "plan5",
            PlanId::Postgraduate => "postgrad",
        }
    }

    /// Parameter record for this plan
    pub fn plan(&self) -> RepaymentPlan {
        match self {
            PlanId::Plan1 => RepaymentPlan {
                name: "Plan 1 (Pre-2012)".to_string(),
                threshold: 22_015.0,
                rate: 0.09,
                write_off_years: 25,
                base_interest_rate: 0.015,
                max_interest_rate: 0.015,
                high_income_threshold: 22_015.0,
            },
            PlanId::Plan2 => RepaymentPlan {
                name: "Plan 2 (2012-2023)".to_string(),
                threshold: 27_295.0,
                rate: 0.09,
                write_off_years: 30,
                base_interest_rate: 0.03,
                max_interest_rate: 0.06,
                high_income_threshold: 49_130.0,
            },
            PlanId::Plan5 => RepaymentPlan {
                name: "Plan 5 (2023+)".to_string(),
                threshold: 25_000.0,
                rate: 0.09,
                write_off_years: 40,
                base_interest_rate: 0.03,
                max_interest_rate: 0.06,
                high_income_threshold: 45_000.0,
            },
            PlanId::Postgraduate => RepaymentPlan {
                name: "Postgraduate Loan".to_string(),
                threshold: 21_000.0,
                rate: 0.06,
                write_off_years: 30,
                base_interest_rate: 0.03,
                max_interest_rate: 0.06,
                high_income_threshold: 42_000.0,
            },
        }
    }
}

impl Default for PlanId {
    fn default() -> Self {
        PlanId::Plan2
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PlanId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plan1" => Ok(PlanId::Plan1),
            "plan2" => Ok(PlanId::Plan2),
            "plan5" => Ok(PlanId::Plan5),
            "postgrad" | "postgraduate" => Ok(PlanId::Postgraduate),
            _ => Err(Error::UnknownPlan(s.to_string())),
        }
    }
}

/// The two loan calculators and the built-in plans each one offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanCalculator {
    #[default]
    Undergraduate,
    Postgraduate,
}

impl LoanCalculator {
    pub const ALL: [LoanCalculator; 2] = [LoanCalculator::Undergraduate, LoanCalculator::Postgraduate];

    pub fn name(&self) -> &'static str {
        match self {
            LoanCalculator::Undergraduate => "undergraduate",
            LoanCalculator::Postgraduate => "postgraduate",
        }
    }

    pub fn plans(&self) -> &'static [PlanId] {
        match self {
            LoanCalculator::Undergraduate => &PlanId::UNDERGRADUATE,
            LoanCalculator::Postgraduate => &PlanId::POSTGRADUATE,
        }
    }

    /// Plan selected when none is given
    pub fn default_plan(&self) -> PlanId {
        match self {
            LoanCalculator::Undergraduate => PlanId::Plan2,
            LoanCalculator::Postgraduate => PlanId::Postgraduate,
        }
    }

    /// Calculator offering a built-in plan
    pub fn for_plan(id: PlanId) -> Self {
        match id {
            PlanId::Postgraduate => LoanCalculator::Postgraduate,
            _ => LoanCalculator::Undergraduate,
        }
    }

    /// Reject a built-in plan this calculator does not offer.
    ///
    /// Identifiers that are not built-in plans (custom CSV plans) pass.
    pub fn check_plan(&self, id: &str) -> Result<(), Error> {
        match id.parse::<PlanId>() {
            Ok(plan) if !self.plans().contains(&plan) => Err(Error::PlanNotOffered {
                plan: plan.to_string(),
                calculator: self.name(),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for LoanCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Repayment rules for one student loan plan.
///
/// All rates are fractions of 1 (0.09 for 9%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentPlan {
    /// Display label
    pub name: String,

    /// Annual salary at or below which nothing is repaid
    pub threshold: f64,

    /// Share of salary above the threshold that is repaid
    pub rate: f64,

    /// Years from first repayment eligibility until the balance is forgiven
    pub write_off_years: i32,

    /// Interest rate at or below the repayment threshold
    pub base_interest_rate: f64,

    /// Interest rate at or above the high income threshold
    pub max_interest_rate: f64,

    /// Salary from which the maximum interest rate applies
    pub high_income_threshold: f64,
}

impl RepaymentPlan {
    /// Whether interest is charged at a single rate regardless of income
    pub fn is_flat_rate(&self) -> bool {
        self.base_interest_rate == self.max_interest_rate
    }

    /// Check the plan parameters are usable by the engine.
    ///
    /// An income-linked plan needs `high_income_threshold >= threshold`.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |reason: &str| Error::InvalidPlan {
            plan: self.name.clone(),
            reason: reason.to_string(),
        };

        let numbers = [
            self.threshold,
            self.rate,
            self.base_interest_rate,
            self.max_interest_rate,
            self.high_income_threshold,
        ];
        if numbers.iter().any(|v| !v.is_finite()) {
            return Err(invalid("parameters must be finite"));
        }
        if self.write_off_years <= 0 {
            return Err(invalid("write-off period must be at least one year"));
        }
        if !self.is_flat_rate() && self.high_income_threshold < self.threshold {
            return Err(invalid(
                "high income threshold is below the repayment threshold",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_plans_are_valid() {
        for id in PlanId::ALL {
            assert!(id.plan().validate().is_ok(), "{} should validate", id);
        }
    }

    #[test]
    fn test_plan_id_parsing() {
        assert_eq!("plan2".parse::<PlanId>().unwrap(), PlanId::Plan2);
        assert_eq!(" Postgrad ".parse::<PlanId>().unwrap(), PlanId::Postgraduate);
        assert!(matches!(
            "plan4".parse::<PlanId>(),
            Err(Error::UnknownPlan(_))
        ));
    }

    #[test]
    fn test_plan1_is_flat_rate() {
        assert!(PlanId::Plan1.plan().is_flat_rate());
        assert!(!PlanId::Plan2.plan().is_flat_rate());
    }

    #[test]
    fn test_calculators_split_builtin_plans() {
        let offered: Vec<PlanId> = LoanCalculator::ALL
            .iter()
            .flat_map(|calc| calc.plans().iter().copied())
            .collect();
        assert_eq!(offered.len(), PlanId::ALL.len());
        for id in PlanId::ALL {
            assert!(offered.contains(&id));
            assert!(LoanCalculator::for_plan(id).plans().contains(&id));
        }
        for calc in LoanCalculator::ALL {
            assert!(calc.plans().contains(&calc.default_plan()));
        }
        assert_eq!(LoanCalculator::default().default_plan(), PlanId::default());
    }

    #[test]
    fn test_calculator_rejects_plans_it_does_not_offer() {
        assert!(LoanCalculator::Undergraduate.check_plan("plan5").is_ok());
        assert!(LoanCalculator::Postgraduate.check_plan("Postgraduate").is_ok());
        assert!(matches!(
            LoanCalculator::Undergraduate.check_plan("postgrad"),
            Err(Error::PlanNotOffered { calculator: "undergraduate", .. })
        ));
        assert!(matches!(
            LoanCalculator::Postgraduate.check_plan("plan2"),
            Err(Error::PlanNotOffered { .. })
        ));
        // Custom plans are not tied to a calculator
        assert!(LoanCalculator::Postgraduate.check_plan("scotland").is_ok());
    }

    #[test]
    fn test_inverted_interest_band_rejected() {
        let mut plan = PlanId::Plan2.plan();
        plan.high_income_threshold = 20_000.0;
        assert!(matches!(plan.validate(), Err(Error::InvalidPlan { .. })));

        // Flat-rate plans do not care where the band sits
        plan.max_interest_rate = plan.base_interest_rate;
        assert!(plan.validate().is_ok());
    }
}
