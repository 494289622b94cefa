//! Load borrowers from CSV

use super::Borrower;
use crate::error::Result;
use csv::Reader;
use std::io::Read;
use std::path::Path;

/// Raw CSV row; growth is quoted as a percentage
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    id: String,
    loan_amount: f64,
    current_salary: f64,
    salary_growth_pct: f64,
    graduation_year: i32,
    plan: String,
}

impl CsvRow {
    fn into_borrower(self) -> Borrower {
        Borrower {
            id: self.id,
            loan_amount: self.loan_amount,
            current_salary: self.current_salary,
            salary_growth: self.salary_growth_pct / 100.0,
            graduation_year: self.graduation_year,
            plan: self.plan,
        }
    }
}

/// Load all borrowers from a CSV file
pub fn load_borrowers<P: AsRef<Path>>(path: P) -> Result<Vec<Borrower>> {
    read_rows(Reader::from_path(path)?)
}

/// Load borrowers from any reader (e.g., string buffer, stdin)
pub fn load_borrowers_from_reader<R: Read>(reader: R) -> Result<Vec<Borrower>> {
    read_rows(Reader::from_reader(reader))
}

fn read_rows<R: Read>(mut reader: Reader<R>) -> Result<Vec<Borrower>> {
    let mut borrowers = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        borrowers.push(row.into_borrower());
    }

    Ok(borrowers)
}
