//! Project one borrower under every repayment plan side by side
//!
//! Supports JSON output via the --json flag
//! Accepts the borrower via environment variables:
//!   LOAN_AMOUNT, CURRENT_SALARY, SALARY_GROWTH_PCT, GRADUATION_YEAR
//! and the anchor year via PAYSAVER_CURRENT_YEAR

use paysaver::projection::{ProjectionConfig, ProjectionInput};
use paysaver::{PlanId, PlanTable, ScenarioRunner};
use serde::Serialize;
use std::env;
use std::time::Instant;

#[derive(Serialize)]
struct PlanComparison {
    plan: String,
    name: String,
    first_repayment_year: i32,
    write_off_year: i32,
    payoff_year: Option<i32>,
    monthly_repayment: f64,
    total_repaid: f64,
    total_interest: f64,
    written_off: f64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");
    let start = Instant::now();

    let config = ProjectionConfig::from_env();
    let template = ProjectionInput {
        loan_amount: env_or("LOAN_AMOUNT", 50_000.0),
        current_salary: env_or("CURRENT_SALARY", 30_000.0),
        expected_salary_growth: env_or("SALARY_GROWTH_PCT", 2.5) / 100.0,
        graduation_year: env_or("GRADUATION_YEAR", config.current_year),
        plan: PlanId::default().plan(),
    };

    let runner = ScenarioRunner::with_plans(PlanTable::standard(), config);
    let mut rows: Vec<PlanComparison> = runner
        .compare_plans(&template)
        .into_iter()
        .map(|(plan, result)| PlanComparison {
            plan,
            total_interest: result.total_interest(),
            name: result.plan_name,
            first_repayment_year: result.first_repayment_year,
            write_off_year: result.write_off_year,
            payoff_year: result.payoff_year,
            monthly_repayment: result.current_monthly_repayment,
            total_repaid: result.total_repaid,
            written_off: result.written_off_amount,
        })
        .collect();
    rows.sort_by(|a, b| a.total_repaid.total_cmp(&b.total_repaid));

    log::info!("Compared {} plans in {:?}", rows.len(), start.elapsed());

    if json_output {
        match serde_json::to_string_pretty(&rows) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize comparison: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Loan £{:.0}, salary £{:.0}, growth {:.1}%, graduated {}",
        template.loan_amount,
        template.current_salary,
        template.expected_salary_growth * 100.0,
        template.graduation_year);
    println!();
    println!("{:<10} {:>6} {:>8} {:>7} {:>10} {:>12} {:>12} {:>12}",
        "Plan", "Starts", "WriteOff", "Payoff", "Monthly", "TotalRepaid", "Interest", "WrittenOff");
    println!("{}", "-".repeat(84));
    for row in &rows {
        let payoff = row.payoff_year.map_or_else(|| "-".to_string(), |y| y.to_string());
        println!("{:<10} {:>6} {:>8} {:>7} {:>10.2} {:>12.2} {:>12.2} {:>12.2}",
            row.plan,
            row.first_repayment_year,
            row.write_off_year,
            payoff,
            row.monthly_repayment,
            row.total_repaid,
            row.total_interest,
            row.written_off,
        );
    }
}
