//! Student loan repayment plans keyed by plan identifier

mod plan;
pub mod loader;

pub use plan::{LoanCalculator, PlanId, RepaymentPlan};

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Mapping from plan identifier to plan parameters
#[derive(Debug, Clone)]
pub struct PlanTable {
    plans: BTreeMap<String, RepaymentPlan>,
}

impl PlanTable {
    /// Table holding the built-in plans
    pub fn standard() -> Self {
        let plans = PlanId::ALL
            .iter()
            .map(|id| (id.key().to_string(), id.plan()))
            .collect();
        Self { plans }
    }

    /// Standard plans overlaid with the plans from a CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let mut table = Self::standard();
        for (id, plan) in loader::load_plans(path)? {
            log::debug!("Loaded plan '{}' ({})", id, plan.name);
            table.insert(id, plan)?;
        }
        Ok(table)
    }

    /// Add or replace a plan after validating it
    pub fn insert(&mut self, id: impl Into<String>, plan: RepaymentPlan) -> Result<()> {
        plan.validate()?;
        self.plans.insert(id.into().to_ascii_lowercase(), plan);
        Ok(())
    }

    /// Look up a plan by identifier (case-insensitive)
    pub fn get(&self, id: &str) -> Result<&RepaymentPlan> {
        self.plans
            .get(&id.trim().to_ascii_lowercase())
            .ok_or_else(|| Error::UnknownPlan(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RepaymentPlan)> {
        self.plans.iter().map(|(id, plan)| (id.as_str(), plan))
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl Default for PlanTable {
    fn default() -> Self {
        Self::standard()
    }
}
