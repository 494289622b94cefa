//! PaySaver CLI
//!
//! Command-line front end for the loan, mortgage and take-home pay calculators

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use paysaver::borrower::load_borrowers;
use paysaver::mortgage::{self, AffordabilityInput, MORTGAGE_TERMS};
use paysaver::projection::{ProjectionConfig, ProjectionInput, ProjectionResult};
use paysaver::take_home::{take_home_pay, TaxYear};
use paysaver::{LoanCalculator, PlanId, PlanTable, ScenarioRunner};

#[derive(Parser, Debug)]
#[command(name = "paysaver", about = "Student loan, mortgage and take-home pay calculators", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project a student loan from graduation to payoff or write-off
    Loan(LoanArgs),
    /// Project every borrower in a CSV file
    Batch(BatchArgs),
    /// Monthly payment on a repayment mortgage
    Mortgage(MortgageArgs),
    /// Mortgage affordability against household income
    Afford(AffordArgs),
    /// Take-home pay after income tax and national insurance
    TakeHome(TakeHomeArgs),
    /// List the repayment plans available
    Plans(PlanSource),
}

#[derive(Args, Debug)]
struct PlanSource {
    /// CSV of extra or replacement plans
    #[arg(long)]
    plans: Option<PathBuf>,

    /// Calendar year the current salary is quoted for
    #[arg(long)]
    current_year: Option<i32>,
}

impl PlanSource {
    fn runner(&self) -> Result<ScenarioRunner> {
        let plans = match &self.plans {
            Some(path) => PlanTable::from_csv_path(path)
                .with_context(|| format!("loading plans from {}", path.display()))?,
            None => PlanTable::standard(),
        };
        let config = match self.current_year {
            Some(year) => ProjectionConfig::for_year(year),
            None => ProjectionConfig::from_env(),
        };
        Ok(ScenarioRunner::with_plans(plans, config))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CalculatorArg {
    Undergraduate,
    Postgraduate,
}

impl From<CalculatorArg> for LoanCalculator {
    fn from(arg: CalculatorArg) -> Self {
        match arg {
            CalculatorArg::Undergraduate => LoanCalculator::Undergraduate,
            CalculatorArg::Postgraduate => LoanCalculator::Postgraduate,
        }
    }
}

#[derive(Args, Debug)]
struct LoanArgs {
    /// Total loan balance at graduation
    #[arg(long, default_value_t = 50_000.0)]
    loan_amount: f64,

    /// Current annual salary
    #[arg(long, default_value_t = 30_000.0)]
    salary: f64,

    /// Expected annual salary growth, in percent
    #[arg(long, default_value_t = 2.5, allow_negative_numbers = true)]
    growth: f64,

    /// Graduation year (defaults to the current year)
    #[arg(long)]
    graduation_year: Option<i32>,

    /// Calculator whose plans are offered
    #[arg(long, value_enum, default_value_t = CalculatorArg::Undergraduate)]
    calculator: CalculatorArg,

    /// Repayment plan identifier (defaults to the calculator's usual plan)
    #[arg(long)]
    plan: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(flatten)]
    source: PlanSource,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Borrower CSV (id,loan_amount,current_salary,salary_growth_pct,graduation_year,plan)
    #[arg(long)]
    input: PathBuf,

    /// Summary CSV destination (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    source: PlanSource,
}

#[derive(Args, Debug)]
struct MortgageArgs {
    #[arg(long, default_value_t = 300_000.0)]
    loan_amount: f64,

    /// Annual interest rate, in percent
    #[arg(long, default_value_t = 5.5)]
    rate: f64,

    /// Term in years
    #[arg(long, default_value_t = 25)]
    term: u32,
}

#[derive(Args, Debug)]
struct AffordArgs {
    #[arg(long, default_value_t = 300_000.0)]
    price: f64,

    #[arg(long, default_value_t = 60_000.0)]
    deposit: f64,

    /// Annual interest rate, in percent
    #[arg(long, default_value_t = 5.5)]
    rate: f64,

    /// Term in years
    #[arg(long, default_value_t = 25)]
    term: u32,

    /// Primary applicant's annual salary
    #[arg(long, default_value_t = 35_000.0)]
    salary1: f64,

    /// Secondary applicant's annual salary
    #[arg(long, default_value_t = 28_000.0)]
    salary2: f64,

    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct TakeHomeArgs {
    #[arg(long, default_value_t = 35_000.0)]
    salary: f64,

    /// Tax year, e.g. 2025/26
    #[arg(long, default_value = "2025/26")]
    tax_year: String,

    #[arg(long)]
    json: bool,
}

/// One line of the batch summary
#[derive(Serialize)]
struct BatchRow {
    id: String,
    plan: String,
    first_repayment_year: Option<i32>,
    write_off_year: Option<i32>,
    payoff_year: Option<i32>,
    current_monthly_repayment: Option<f64>,
    total_repaid: Option<f64>,
    written_off_amount: Option<f64>,
    error: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Loan(args) => run_loan(args),
        Command::Batch(args) => run_batch(args),
        Command::Mortgage(args) => run_mortgage(args),
        Command::Afford(args) => run_afford(args),
        Command::TakeHome(args) => run_take_home(args),
        Command::Plans(source) => run_plans(source),
    }
}

fn run_loan(args: LoanArgs) -> Result<()> {
    let runner = args.source.runner()?;
    let config = runner.config();
    let graduation_year = args.graduation_year.unwrap_or(config.current_year);
    if !config.graduation_year_options().contains(&graduation_year) {
        bail!(
            "graduation year {} is outside the {}-year window ending {}",
            graduation_year,
            paysaver::projection::GRADUATION_LOOKBACK_YEARS,
            config.current_year
        );
    }

    let calculator = LoanCalculator::from(args.calculator);
    let plan_id = args
        .plan
        .unwrap_or_else(|| calculator.default_plan().key().to_string());
    calculator.check_plan(&plan_id)?;

    let input = ProjectionInput {
        loan_amount: args.loan_amount,
        current_salary: args.salary,
        expected_salary_growth: args.growth / 100.0,
        graduation_year,
        plan: runner.plans().get(&plan_id)?.clone(),
    };
    let result = runner.run(&input);

    match args.format {
        OutputFormat::Table => print_loan_table(&result),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            for row in &result.series {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

fn print_loan_table(result: &ProjectionResult) {
    println!("{}", result.plan_name);
    println!("{}\n", "=".repeat(result.plan_name.len()));

    println!("{:>5} {:>12} {:>7} {:>10} {:>10} {:>12} {:>12}",
        "Year", "Salary", "Rate", "Payment", "Interest", "Balance", "TotalPaid");
    println!("{}", "-".repeat(74));
    for row in &result.series {
        println!("{:>5} {:>12.2} {:>6.2}% {:>10.2} {:>10.2} {:>12.2} {:>12.2}",
            row.year,
            row.salary,
            row.interest_rate * 100.0,
            row.amount_paid,
            row.interest_accrued,
            row.balance,
            row.total_paid,
        );
    }

    println!("\nSummary:");
    println!("  Monthly repayment:     £{:.2}", result.current_monthly_repayment);
    println!("  Annual repayment:      £{:.2}", result.current_annual_repayment);
    println!("  Current interest rate: {:.1}%", result.current_interest_rate * 100.0);
    println!("  Repayment burden:      {}", result.repayment_burden.label());
    println!("  Repayments start:      {}", result.first_repayment_year);
    println!("  Total repaid:          £{:.2}", result.total_repaid);
    match result.payoff_year {
        Some(year) => println!("  Paid off in:           {}", year),
        None => println!("  Written off in:        {} (£{:.2})", result.write_off_year, result.written_off_amount),
    }
}

fn run_batch(args: BatchArgs) -> Result<()> {
    let runner = args.source.runner()?;
    let borrowers = load_borrowers(&args.input)
        .with_context(|| format!("loading borrowers from {}", args.input.display()))?;
    log::info!("Loaded {} borrowers from {}", borrowers.len(), args.input.display());

    let results = runner.run_borrowers(&borrowers);

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    let mut writer = csv::Writer::from_writer(sink);

    let mut failures = 0;
    for (borrower, result) in borrowers.iter().zip(results) {
        let row = match result {
            Ok(r) => BatchRow {
                id: borrower.id.clone(),
                plan: borrower.plan.clone(),
                first_repayment_year: Some(r.first_repayment_year),
                write_off_year: Some(r.write_off_year),
                payoff_year: r.payoff_year,
                current_monthly_repayment: Some(r.current_monthly_repayment),
                total_repaid: Some(r.total_repaid),
                written_off_amount: Some(r.written_off_amount),
                error: None,
            },
            Err(e) => {
                failures += 1;
                log::warn!("Borrower {}: {}", borrower.id, e);
                BatchRow {
                    id: borrower.id.clone(),
                    plan: borrower.plan.clone(),
                    first_repayment_year: None,
                    write_off_year: None,
                    payoff_year: None,
                    current_monthly_repayment: None,
                    total_repaid: None,
                    written_off_amount: None,
                    error: Some(e.to_string()),
                }
            }
        };
        writer.serialize(row)?;
    }
    writer.flush()?;

    log::info!("Projected {} borrowers ({} failed)", borrowers.len(), failures);
    Ok(())
}

fn check_term(term: u32) {
    if !MORTGAGE_TERMS.contains(&term) {
        log::warn!("Unusual mortgage term of {} years (offered: {:?})", term, MORTGAGE_TERMS);
    }
}

fn run_mortgage(args: MortgageArgs) -> Result<()> {
    check_term(args.term);
    let payment = mortgage::repayment_monthly_payment(args.loan_amount, args.rate / 100.0, args.term);
    println!("Monthly payment: £{:.2}", payment);
    Ok(())
}

fn run_afford(args: AffordArgs) -> Result<()> {
    check_term(args.term);
    let report = mortgage::assess_affordability(&AffordabilityInput {
        property_price: args.price,
        deposit: args.deposit,
        annual_rate: args.rate / 100.0,
        term_years: args.term,
        primary_salary: args.salary1,
        secondary_salary: args.salary2,
    });

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Loan amount:       £{:.0}", report.loan_amount);
    println!("Household income:  £{:.0}", report.household_income);
    println!("Income multiple:   {:.1}x ({})", report.income_multiple, report.risk_band.label());
    println!("Monthly payment:   £{:.2}", report.monthly_payment);
    println!("Borrowing capacity:");
    println!("  Conservative (4.0x): £{:.0}", report.borrowing_capacity.conservative);
    println!("  Standard (4.5x):     £{:.0}", report.borrowing_capacity.standard);
    println!("  Aggressive (5.0x):   £{:.0}", report.borrowing_capacity.aggressive);
    Ok(())
}

fn run_take_home(args: TakeHomeArgs) -> Result<()> {
    let tax_year: TaxYear = args.tax_year.parse()?;
    let pay = take_home_pay(args.salary, tax_year);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&pay)?);
        return Ok(());
    }

    println!("Tax year {}", pay.tax_year);
    println!("  Gross salary:       £{:.2}", pay.gross_salary);
    println!("  Income tax:         £{:.2}", pay.income_tax);
    println!("  National insurance: £{:.2}", pay.national_insurance);
    println!("  Net annual:         £{:.2}", pay.net_annual);
    println!("  Net monthly:        £{:.2}", pay.net_monthly);
    Ok(())
}

fn run_plans(source: PlanSource) -> Result<()> {
    let runner = source.runner()?;
    println!("{:<10} {:<22} {:>10} {:>6} {:>8} {:>14}  {}",
        "Id", "Name", "Threshold", "Rate", "WriteOff", "Interest", "Calculator");
    for (id, plan) in runner.plans().iter() {
        let calculator = id
            .parse::<PlanId>()
            .map_or("custom", |builtin| LoanCalculator::for_plan(builtin).name());
        let interest = if plan.is_flat_rate() {
            format!("{:.1}%", plan.base_interest_rate * 100.0)
        } else {
            format!("{:.1}-{:.1}%", plan.base_interest_rate * 100.0, plan.max_interest_rate * 100.0)
        };
        println!("{:<10} {:<22} {:>10.0} {:>5.0}% {:>7}y {:>14}  {}",
            id, plan.name, plan.threshold, plan.rate * 100.0, plan.write_off_years, interest, calculator);
    }
    Ok(())
}
