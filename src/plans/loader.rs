//! Load custom repayment plans from CSV
//!
//! Rates are written as percentages in the file, as they are quoted publicly,
//! and converted to fractions on load.

use super::RepaymentPlan;
use crate::error::Result;
use csv::Reader;
use std::path::Path;

/// Raw CSV row of a plan table
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    id: String,
    name: String,
    threshold: f64,
    rate_pct: f64,
    write_off_years: i32,
    base_interest_pct: f64,
    max_interest_pct: f64,
    high_income_threshold: f64,
}

impl CsvRow {
    fn into_plan(self) -> (String, RepaymentPlan) {
        let plan = RepaymentPlan {
            name: self.name,
            threshold: self.threshold,
            rate: self.rate_pct / 100.0,
            write_off_years: self.write_off_years,
            base_interest_rate: self.base_interest_pct / 100.0,
            max_interest_rate: self.max_interest_pct / 100.0,
            high_income_threshold: self.high_income_threshold,
        };
        (self.id, plan)
    }
}

/// Load all plans from a CSV file
pub fn load_plans<P: AsRef<Path>>(path: P) -> Result<Vec<(String, RepaymentPlan)>> {
    let reader = Reader::from_path(path)?;
    read_rows(reader)
}

/// Load plans from any reader (e.g. an in-memory buffer)
pub fn load_plans_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<(String, RepaymentPlan)>> {
    read_rows(Reader::from_reader(reader))
}

fn read_rows<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<(String, RepaymentPlan)>> {
    let mut plans = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        let (id, plan) = row.into_plan();
        plan.validate()?;
        plans.push((id, plan));
    }
    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_relative_eq;

    const HEADER: &str = "id,name,threshold,rate_pct,write_off_years,base_interest_pct,max_interest_pct,high_income_threshold\n";

    #[test]
    fn test_load_plans_converts_percentages() {
        let data = format!("{HEADER}plan4,Plan 4 (Scotland),31395,9,30,4.3,4.3,31395\n");
        let plans = load_plans_from_reader(data.as_bytes()).unwrap();
        assert_eq!(plans.len(), 1);

        let (id, plan) = &plans[0];
        assert_eq!(id, "plan4");
        assert_eq!(plan.name, "Plan 4 (Scotland)");
        assert_relative_eq!(plan.rate, 0.09);
        assert_relative_eq!(plan.base_interest_rate, 0.043);
        assert!(plan.is_flat_rate());
    }

    #[test]
    fn test_invalid_plan_rejected() {
        let data = format!("{HEADER}odd,Odd,30000,9,30,3,6,20000\n");
        let err = load_plans_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidPlan { .. }));
    }

    #[test]
    fn test_malformed_row_is_csv_error() {
        let data = format!("{HEADER}bad,Bad,lots,9,30,3,6,20000\n");
        let err = load_plans_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
    }
}
