//! Scenario runner for batch projections
//!
//! Holds a plan table and configuration once, then runs many projections
//! in parallel. Each projection is independent, so results come back in
//! input order with no shared state between them.

use rayon::prelude::*;

use crate::borrower::Borrower;
use crate::error::Result;
use crate::plans::PlanTable;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionInput, ProjectionResult};

/// Pre-configured runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let results = runner.run_borrowers(&load_borrowers("borrowers.csv")?);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    plans: PlanTable,
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Runner with the standard plans, anchored on the current year
    pub fn new() -> Self {
        Self::with_plans(PlanTable::standard(), ProjectionConfig::from_env())
    }

    pub fn with_plans(plans: PlanTable, config: ProjectionConfig) -> Self {
        Self {
            plans,
            engine: ProjectionEngine::new(config),
        }
    }

    /// Run a single projection
    pub fn run(&self, input: &ProjectionInput) -> ProjectionResult {
        self.engine.simulate(input)
    }

    /// Run projections for many inputs in parallel
    pub fn run_batch(&self, inputs: &[ProjectionInput]) -> Vec<ProjectionResult> {
        log::info!("Projecting {} loans", inputs.len());
        inputs.par_iter().map(|input| self.engine.simulate(input)).collect()
    }

    /// Resolve each borrower's plan and project it.
    ///
    /// A borrower naming an unknown plan gets an error in its slot; the rest
    /// of the batch still runs.
    pub fn run_borrowers(&self, borrowers: &[Borrower]) -> Vec<Result<ProjectionResult>> {
        log::info!("Projecting {} borrowers", borrowers.len());
        borrowers
            .par_iter()
            .map(|borrower| {
                let input = borrower.to_input(&self.plans)?;
                Ok(self.engine.simulate(&input))
            })
            .collect()
    }

    /// Project the same borrower under every plan in the table
    pub fn compare_plans(&self, template: &ProjectionInput) -> Vec<(String, ProjectionResult)> {
        let candidates: Vec<_> = self.plans.iter().collect();
        candidates
            .par_iter()
            .map(|(id, plan)| {
                let input = ProjectionInput {
                    plan: (*plan).clone(),
                    ..template.clone()
                };
                (id.to_string(), self.engine.simulate(&input))
            })
            .collect()
    }

    pub fn plans(&self) -> &PlanTable {
        &self.plans
    }

    pub fn config(&self) -> &ProjectionConfig {
        self.engine.config()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
