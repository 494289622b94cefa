//! Year-by-year student loan projection engine

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::plans::RepaymentPlan;
use super::snapshots::{ProjectionResult, RepaymentBurden};
use super::state::ProjectionState;

/// Environment variable overriding the calendar year projections anchor on
pub const CURRENT_YEAR_ENV: &str = "PAYSAVER_CURRENT_YEAR";

/// Number of graduation years offered, counting back from the current year
pub const GRADUATION_LOOKBACK_YEARS: i32 = 40;

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// Calendar year the current salary is quoted for
    pub current_year: i32,

    /// How far past graduation to look for a salary crossing the threshold
    pub forward_search_years: i32,

    /// Years after graduation repayments are assumed to start when no
    /// threshold crossing is found
    pub fallback_grace_years: i32,
}

impl ProjectionConfig {
    /// Default configuration anchored on a fixed year
    pub fn for_year(current_year: i32) -> Self {
        Self {
            current_year,
            forward_search_years: 20,
            fallback_grace_years: 2,
        }
    }

    /// Default configuration, honouring `PAYSAVER_CURRENT_YEAR` if set
    pub fn from_env() -> Self {
        match std::env::var(CURRENT_YEAR_ENV) {
            Ok(raw) => match raw.trim().parse() {
                Ok(year) => Self::for_year(year),
                Err(_) => {
                    log::warn!("Ignoring {}={:?}: not a year", CURRENT_YEAR_ENV, raw);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Graduation years a borrower can pick, most recent first
    pub fn graduation_year_options(&self) -> Vec<i32> {
        (0..GRADUATION_LOOKBACK_YEARS)
            .map(|i| self.current_year - i)
            .collect()
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self::for_year(chrono::Local::now().year())
    }
}

/// Inputs for one loan projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub loan_amount: f64,
    pub current_salary: f64,

    /// Annual salary growth as a fraction (0.025 for 2.5%), may be negative
    pub expected_salary_growth: f64,

    pub graduation_year: i32,
    pub plan: RepaymentPlan,
}

/// Annual interest rate charged at a given salary.
///
/// Flat-rate plans return their single rate. Income-linked plans charge the
/// base rate up to the repayment threshold, the maximum rate from the high
/// income threshold, and interpolate linearly in between.
pub fn resolve_interest_rate(salary: f64, plan: &RepaymentPlan) -> f64 {
    if plan.is_flat_rate() {
        return plan.base_interest_rate;
    }

    if salary <= plan.threshold {
        plan.base_interest_rate
    } else if salary >= plan.high_income_threshold {
        plan.max_interest_rate
    } else {
        let range = plan.high_income_threshold - plan.threshold;
        let position = (salary - plan.threshold) / range;
        let rate_range = plan.max_interest_rate - plan.base_interest_rate;
        plan.base_interest_rate + position * rate_range
    }
}

/// Salary in `year`, compounding `growth` from the current salary.
///
/// Years up to the current year are discounted back, later years grown.
pub fn project_salary(current_salary: f64, growth: f64, year: i32, current_year: i32) -> f64 {
    if year <= current_year {
        current_salary / (1.0 + growth).powi(current_year - year)
    } else {
        current_salary * (1.0 + growth).powi(year - current_year)
    }
}

/// Income-contingent repayment due on a year's salary
pub fn income_contingent_payment(salary: f64, plan: &RepaymentPlan) -> f64 {
    if salary > plan.threshold {
        (salary - plan.threshold) * plan.rate
    } else {
        0.0
    }
}

/// Year repayments begin, with the default search window
pub fn find_first_repayment_year(input: &ProjectionInput, current_year: i32) -> i32 {
    ProjectionEngine::new(ProjectionConfig::for_year(current_year)).find_first_repayment_year(input)
}

/// Run a projection with the default search window
pub fn simulate(input: &ProjectionInput, current_year: i32) -> ProjectionResult {
    ProjectionEngine::new(ProjectionConfig::for_year(current_year)).simulate(input)
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    fn salary_in(&self, input: &ProjectionInput, year: i32) -> f64 {
        project_salary(
            input.current_salary,
            input.expected_salary_growth,
            year,
            self.config.current_year,
        )
    }

    /// Year repayment obligations begin, anchoring the write-off countdown.
    ///
    /// A borrower already above the threshold is traced back to the first
    /// year since graduation they crossed it. Otherwise the salary is grown
    /// forward to find when they will. Failing both, repayments are assumed
    /// to start after the grace period.
    pub fn find_first_repayment_year(&self, input: &ProjectionInput) -> i32 {
        let threshold = input.plan.threshold;
        let current_year = self.config.current_year;
        let graduation_year = input.graduation_year;

        if input.current_salary > threshold {
            let started = (graduation_year..=current_year)
                .find(|&year| self.salary_in(input, year) > threshold);
            if let Some(year) = started {
                log::debug!("Repayments started in {} (already above threshold)", year);
                return year;
            }
        }

        let last_year = graduation_year.saturating_add(self.config.forward_search_years);
        let projected = (current_year.max(graduation_year)..=last_year)
            .find(|&year| self.salary_in(input, year) > threshold);
        if let Some(year) = projected {
            log::debug!("Repayments projected to start in {}", year);
            return year;
        }

        let fallback = graduation_year.saturating_add(self.config.fallback_grace_years);
        log::debug!(
            "Salary never crosses {:.0} by {}; assuming repayments start in {}",
            threshold,
            last_year,
            fallback
        );
        fallback
    }

    /// Simulate the loan from graduation until payoff or write-off
    pub fn simulate(&self, input: &ProjectionInput) -> ProjectionResult {
        let plan = &input.plan;
        let first_repayment_year = self.find_first_repayment_year(input);
        let write_off_year = first_repayment_year.saturating_add(plan.write_off_years);

        let current_interest_rate = resolve_interest_rate(input.current_salary, plan);
        let current_annual_repayment = income_contingent_payment(input.current_salary, plan);

        if input.loan_amount <= 0.0 {
            log::warn!("Loan amount {} is not positive; nothing to repay", input.loan_amount);
        }

        let mut state = ProjectionState::new(input.loan_amount);
        let mut series = Vec::new();

        for year in input.graduation_year..=write_off_year {
            let salary = self.salary_in(input, year);

            if state.is_settled() {
                series.push(state.settled_year(year, salary));
                continue;
            }

            let yearly_rate = resolve_interest_rate(salary, plan);
            let terminal = year == write_off_year;
            // The write-off year only needs a salary above the threshold
            let eligible = salary > plan.threshold && (terminal || year >= first_repayment_year);
            let payment_due = eligible.then(|| income_contingent_payment(salary, plan));

            let snapshot = state.advance_year(year, salary, yearly_rate, payment_due, terminal);
            if state.payoff_year == Some(year) {
                log::debug!("Loan paid off in {}", year);
            }
            series.push(snapshot);
        }

        if state.written_off_amount > 0.0 {
            log::debug!(
                "Writing off {:.2} in {}",
                state.written_off_amount,
                write_off_year
            );
        }

        ProjectionResult {
            plan_name: plan.name.clone(),
            first_repayment_year,
            write_off_year,
            payoff_year: state.payoff_year,
            current_interest_rate,
            current_annual_repayment,
            current_monthly_repayment: current_annual_repayment / 12.0,
            repayment_burden: RepaymentBurden::classify(
                input.current_salary,
                plan.threshold,
                current_annual_repayment,
            ),
            total_repaid: state.total_paid,
            written_off_amount: state.written_off_amount,
            will_be_written_off: state.written_off_amount > 0.0,
            series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::PlanId;
    use crate::projection::{LoanOutcome, LoanState};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn input(plan: PlanId, loan: f64, salary: f64, growth: f64, graduation: i32) -> ProjectionInput {
        ProjectionInput {
            loan_amount: loan,
            current_salary: salary,
            expected_salary_growth: growth,
            graduation_year: graduation,
            plan: plan.plan(),
        }
    }

    fn plan2_reference() -> ProjectionInput {
        input(PlanId::Plan2, 50_000.0, 30_000.0, 0.025, 2024)
    }

    #[test]
    fn test_flat_rate_plan_ignores_salary() {
        let plan = PlanId::Plan1.plan();
        for salary in [-5_000.0, 0.0, 22_015.0, 35_000.0, 1_000_000.0] {
            assert_eq!(resolve_interest_rate(salary, &plan), 0.015);
        }
    }

    #[test]
    fn test_interest_rate_band_edges() {
        let plan = PlanId::Plan2.plan();
        assert_eq!(resolve_interest_rate(plan.threshold, &plan), 0.03);
        assert_eq!(resolve_interest_rate(plan.high_income_threshold, &plan), 0.06);
        assert_eq!(resolve_interest_rate(-1_000.0, &plan), 0.03);
        assert_eq!(resolve_interest_rate(90_000.0, &plan), 0.06);
    }

    #[test]
    fn test_interest_rate_interpolates() {
        let plan = PlanId::Plan2.plan();
        let midpoint = (plan.threshold + plan.high_income_threshold) / 2.0;
        assert_relative_eq!(resolve_interest_rate(midpoint, &plan), 0.045, epsilon = 1e-12);
    }

    #[test]
    fn test_collapsed_band_never_divides() {
        let mut plan = PlanId::Plan2.plan();
        plan.high_income_threshold = plan.threshold;
        assert_eq!(resolve_interest_rate(plan.threshold, &plan), 0.03);
        assert_eq!(resolve_interest_rate(plan.threshold + 1.0, &plan), 0.06);
    }

    #[test]
    fn test_salary_projection_both_directions() {
        assert_relative_eq!(project_salary(30_000.0, 0.1, 2025, 2025), 30_000.0);
        assert_relative_eq!(project_salary(30_000.0, 0.1, 2024, 2025), 30_000.0 / 1.1);
        assert_relative_eq!(project_salary(30_000.0, 0.1, 2027, 2025), 30_000.0 * 1.21, epsilon = 1e-9);
    }

    #[test]
    fn test_first_repayment_traced_back() {
        // 80k today at 3% growth was well above threshold at graduation
        let inp = input(PlanId::Plan2, 20_000.0, 80_000.0, 0.03, 2020);
        assert_eq!(find_first_repayment_year(&inp, 2025), 2020);

        // 28k today at 5% growth: 2024 salary is 26,667, below the threshold
        let inp = input(PlanId::Plan2, 20_000.0, 28_000.0, 0.05, 2020);
        assert_eq!(find_first_repayment_year(&inp, 2025), 2025);
    }

    #[test]
    fn test_first_repayment_projected_forward() {
        // 25k growing 5% crosses 27,295 in 2027 (27,562.5)
        let inp = input(PlanId::Plan2, 20_000.0, 25_000.0, 0.05, 2024);
        assert_eq!(find_first_repayment_year(&inp, 2025), 2027);
    }

    #[test]
    fn test_first_repayment_for_future_graduate_already_earning() {
        // Graduating after the current year leaves nothing to trace back
        let inp = input(PlanId::Plan2, 30_000.0, 35_000.0, 0.04, 2030);
        assert_eq!(find_first_repayment_year(&inp, 2025), 2030);
        assert_eq!(simulate(&inp, 2025).write_off_year, 2060);
    }

    #[test]
    fn test_first_repayment_fallback() {
        let inp = input(PlanId::Plan2, 50_000.0, 20_000.0, 0.0, 2024);
        assert_eq!(find_first_repayment_year(&inp, 2025), 2026);

        let result = simulate(&inp, 2025);
        assert_eq!(result.write_off_year, 2056);
        assert_eq!(result.total_repaid, 0.0);
        assert!(result.will_be_written_off);
        assert!(result.series.iter().all(|s| s.state == LoanState::Accruing));
    }

    #[test]
    fn test_plan2_reference_scenario() {
        let result = simulate(&plan2_reference(), 2025);

        assert_eq!(result.first_repayment_year, 2024);
        assert_eq!(result.write_off_year, 2054);
        assert_eq!(result.payoff_year, None);
        assert_abs_diff_eq!(result.current_annual_repayment, 243.45, epsilon = 1e-9);
        assert_abs_diff_eq!(result.current_monthly_repayment, 243.45 / 12.0, epsilon = 1e-9);
        assert_eq!(result.repayment_burden, RepaymentBurden::Low);

        assert_eq!(result.series.len(), 31);
        assert_eq!(result.series.first().map(|s| s.year), Some(2024));
        assert_eq!(result.series.last().map(|s| s.year), Some(2054));

        assert!(result.will_be_written_off);
        assert!(result.written_off_amount > result.total_repaid);
        assert!(matches!(result.outcome(), LoanOutcome::WrittenOff { year: 2054, .. }));

        let last = result.series.last().unwrap();
        assert_eq!(last.balance, 0.0);
        assert_eq!(last.written_off, Some(result.written_off_amount));
        assert_eq!(last.total_paid, result.total_repaid);
    }

    #[test]
    fn test_final_payment_clears_balance_in_write_off_year() {
        // Salary first crosses the threshold in the write-off year itself
        let inp = input(PlanId::Plan1, 1.0, 14_835.0, 0.015, 2025);
        let result = simulate(&inp, 2025);

        assert_eq!(result.first_repayment_year, 2027);
        assert_eq!(result.write_off_year, 2052);
        assert_eq!(result.payoff_year, None);
        assert_eq!(result.written_off_amount, 0.0);
        assert!(!result.will_be_written_off);
        assert_eq!(result.outcome(), LoanOutcome::ClearedAtWriteOff { year: 2052 });

        let last = result.series.last().unwrap();
        assert_eq!(last.state, LoanState::Repaying);
        assert_eq!(last.written_off, Some(0.0));
        assert_eq!(last.balance, 0.0);
        assert_relative_eq!(last.total_paid, result.total_repaid);
        assert!(result.series[..result.series.len() - 1]
            .iter()
            .all(|s| s.state == LoanState::Accruing));
    }

    #[test]
    fn test_extreme_graduation_year_saturates() {
        let inp = input(PlanId::Plan2, 50_000.0, 30_000.0, 0.025, i32::MAX - 5);
        let result = simulate(&inp, 2025);

        assert_eq!(result.first_repayment_year, i32::MAX - 5);
        assert_eq!(result.write_off_year, i32::MAX);
        assert_eq!(result.series.len(), 6);
        assert_eq!(result.series.last().map(|s| s.year), Some(i32::MAX));
    }

    #[test]
    fn test_write_off_year_independent_of_loan() {
        let small = input(PlanId::Plan5, 1_000.0, 32_000.0, 0.02, 2023);
        let large = input(PlanId::Plan5, 90_000.0, 32_000.0, 0.02, 2023);
        let first = find_first_repayment_year(&small, 2025);

        assert_eq!(simulate(&small, 2025).write_off_year, first + 40);
        assert_eq!(simulate(&large, 2025).write_off_year, first + 40);
    }

    #[test]
    fn test_zero_loan_is_settled_throughout() {
        let inp = input(PlanId::Plan2, 0.0, 30_000.0, 0.025, 2024);
        let result = simulate(&inp, 2025);

        assert_eq!(result.payoff_year, None);
        assert_eq!(result.written_off_amount, 0.0);
        assert!(!result.will_be_written_off);
        assert_eq!(result.outcome(), LoanOutcome::NothingOwed);
        // Current repayment still reflects salary, not the balance
        assert_abs_diff_eq!(result.current_annual_repayment, 243.45, epsilon = 1e-9);

        for s in &result.series {
            assert_eq!(s.state, LoanState::Settled);
            assert_eq!(s.balance, 0.0);
            assert_eq!(s.annual_payment, 0.0);
            assert_eq!(s.total_paid, 0.0);
        }
    }

    #[test]
    fn test_high_earner_pays_off_and_stays_settled() {
        let inp = input(PlanId::Plan2, 20_000.0, 80_000.0, 0.03, 2020);
        let result = simulate(&inp, 2025);

        assert_eq!(result.payoff_year, Some(2025));
        assert!(!result.will_be_written_off);
        assert!(matches!(result.outcome(), LoanOutcome::PaidOff { year: 2025 }));

        let payoff = result.snapshot(2025).unwrap();
        assert_eq!(payoff.balance, 0.0);
        assert!(payoff.amount_paid < payoff.annual_payment);

        for s in result.series.iter().filter(|s| s.year > 2025) {
            assert_eq!(s.state, LoanState::Settled);
            assert_eq!(s.balance, 0.0);
            assert_eq!(s.interest_accrued, 0.0);
            assert_eq!(s.total_paid, result.total_repaid);
        }
    }

    #[test]
    fn test_total_paid_never_decreases() {
        for id in PlanId::ALL {
            let inp = input(id, 45_000.0, 41_000.0, 0.03, 2018);
            let result = simulate(&inp, 2025);
            for pair in result.series.windows(2) {
                assert!(pair[1].total_paid >= pair[0].total_paid);
                assert_eq!(pair[1].year, pair[0].year + 1);
            }
        }
    }

    #[test]
    fn test_postgraduate_loan_pays_off() {
        let inp = input(PlanId::Postgraduate, 12_000.0, 40_000.0, 0.02, 2022);
        let result = simulate(&inp, 2025);

        assert_eq!(result.first_repayment_year, 2022);
        assert_eq!(result.write_off_year, 2052);
        assert_eq!(result.payoff_year, Some(2035));
        assert!(result.total_repaid > 12_000.0);
    }

    #[test]
    fn test_simulation_is_deterministic() {
        let inp = plan2_reference();
        assert_eq!(simulate(&inp, 2025), simulate(&inp, 2025));
    }

    #[test]
    fn test_graduation_year_options() {
        let years = ProjectionConfig::for_year(2025).graduation_year_options();
        assert_eq!(years.len(), 40);
        assert_eq!(years[0], 2025);
        assert_eq!(years[39], 1986);
    }
}
