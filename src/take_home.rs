//! Take-home pay from income tax and national insurance bands

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Tax years with known bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxYear {
    Y2021_22,
    Y2022_23,
    Y2023_24,
    Y2024_25,
    Y2025_26,
}

impl TaxYear {
    pub const ALL: [TaxYear; 5] = [
        TaxYear::Y2025_26,
        TaxYear::Y2024_25,
        TaxYear::Y2023_24,
        TaxYear::Y2022_23,
        TaxYear::Y2021_22,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaxYear::Y2021_22 => "2021/22",
            TaxYear::Y2022_23 => "2022/23",
            TaxYear::Y2023_24 => "2023/24",
            TaxYear::Y2024_25 => "2024/25",
            TaxYear::Y2025_26 => "2025/26",
        }
    }

    /// Band table for the year
    pub fn bands(&self) -> TaxBands {
        // Shared by every year on file
        let base = TaxBands {
            personal_allowance: 12_570.0,
            basic_rate_limit: 50_270.0,
            higher_rate_limit: 125_140.0,
            basic_rate: 0.20,
            higher_rate: 0.40,
            additional_rate: 0.45,
            ni_lower_limit: 12_570.0,
            ni_upper_limit: 50_270.0,
            ni_basic_rate: 0.08,
            ni_higher_rate: 0.02,
        };

        match self {
            TaxYear::Y2025_26 | TaxYear::Y2024_25 => base,
            TaxYear::Y2023_24 => TaxBands {
                ni_basic_rate: 0.115,
                ..base
            },
            TaxYear::Y2022_23 | TaxYear::Y2021_22 => TaxBands {
                higher_rate_limit: 150_000.0,
                ni_basic_rate: 0.12,
                ..base
            },
        }
    }
}

impl Default for TaxYear {
    fn default() -> Self {
        TaxYear::Y2025_26
    }
}

impl fmt::Display for TaxYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxYear {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaxYear::ALL
            .into_iter()
            .find(|year| year.as_str() == s.trim())
            .ok_or_else(|| Error::UnknownTaxYear(s.to_string()))
    }
}

/// Income tax and national insurance thresholds for one tax year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBands {
    pub personal_allowance: f64,
    pub basic_rate_limit: f64,
    pub higher_rate_limit: f64,
    pub basic_rate: f64,
    pub higher_rate: f64,
    pub additional_rate: f64,
    pub ni_lower_limit: f64,
    pub ni_upper_limit: f64,
    pub ni_basic_rate: f64,
    pub ni_higher_rate: f64,
}

impl TaxBands {
    /// Annual income tax due on a gross salary
    pub fn income_tax(&self, salary: f64) -> f64 {
        let taxable = (salary - self.personal_allowance).max(0.0);
        if taxable <= 0.0 {
            return 0.0;
        }

        let basic_band = self.basic_rate_limit - self.personal_allowance;
        let higher_band_top = self.higher_rate_limit - self.personal_allowance;

        let mut tax = taxable.min(basic_band) * self.basic_rate;
        if taxable > basic_band {
            let higher = (taxable - basic_band).min(self.higher_rate_limit - self.basic_rate_limit);
            tax += higher * self.higher_rate;
        }
        if taxable > higher_band_top {
            tax += (taxable - higher_band_top) * self.additional_rate;
        }
        tax
    }

    /// Annual employee national insurance on a gross salary
    pub fn national_insurance(&self, salary: f64) -> f64 {
        if salary <= self.ni_lower_limit {
            return 0.0;
        }

        let main = (salary - self.ni_lower_limit).min(self.ni_upper_limit - self.ni_lower_limit);
        let mut ni = main * self.ni_basic_rate;
        if salary > self.ni_upper_limit {
            ni += (salary - self.ni_upper_limit) * self.ni_higher_rate;
        }
        ni
    }
}

/// Breakdown of a gross salary into deductions and net pay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeHomePay {
    pub tax_year: TaxYear,
    pub gross_salary: f64,
    pub income_tax: f64,
    pub national_insurance: f64,
    pub net_annual: f64,
    pub net_monthly: f64,
}

/// Estimate take-home pay for a salary in a tax year
pub fn take_home_pay(salary: f64, tax_year: TaxYear) -> TakeHomePay {
    let bands = tax_year.bands();
    let income_tax = bands.income_tax(salary);
    let national_insurance = bands.national_insurance(salary);
    let net_annual = salary - income_tax - national_insurance;

    TakeHomePay {
        tax_year,
        gross_salary: salary,
        income_tax,
        national_insurance,
        net_annual,
        net_monthly: net_annual / 12.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_basic_rate_taxpayer() {
        let pay = take_home_pay(35_000.0, TaxYear::Y2025_26);
        // (35,000 - 12,570) = 22,430 taxable
        assert_abs_diff_eq!(pay.income_tax, 4_486.0, epsilon = 1e-6);
        assert_abs_diff_eq!(pay.national_insurance, 1_794.4, epsilon = 1e-6);
        assert_abs_diff_eq!(pay.net_annual, 28_719.6, epsilon = 1e-6);
        assert_abs_diff_eq!(pay.net_monthly, 2_393.3, epsilon = 1e-6);
    }

    #[test]
    fn test_higher_rate_taxpayer() {
        let bands = TaxYear::Y2025_26.bands();
        // 37,700 at 20% + 9,730 at 40%
        assert_abs_diff_eq!(bands.income_tax(60_000.0), 11_432.0, epsilon = 1e-6);
        // 37,700 at 8% + 9,730 at 2%
        assert_abs_diff_eq!(bands.national_insurance(60_000.0), 3_210.6, epsilon = 1e-6);
    }

    #[test]
    fn test_additional_rate_taxpayer() {
        let bands = TaxYear::Y2025_26.bands();
        // 7,540 + 29,948 + 24,860 * 45%
        assert_abs_diff_eq!(bands.income_tax(150_000.0), 48_675.0, epsilon = 1e-6);
    }

    #[test]
    fn test_below_allowance() {
        let pay = take_home_pay(12_000.0, TaxYear::Y2023_24);
        assert_eq!(pay.income_tax, 0.0);
        assert_eq!(pay.national_insurance, 0.0);
        assert_eq!(pay.net_annual, 12_000.0);
    }

    #[test]
    fn test_ni_rate_changes_by_year() {
        let salary = 40_000.0;
        let ni = |year: TaxYear| year.bands().national_insurance(salary);
        assert!(ni(TaxYear::Y2022_23) > ni(TaxYear::Y2023_24));
        assert!(ni(TaxYear::Y2023_24) > ni(TaxYear::Y2024_25));
        assert_eq!(ni(TaxYear::Y2024_25), ni(TaxYear::Y2025_26));
    }

    #[test]
    fn test_tax_year_parsing() {
        assert_eq!("2023/24".parse::<TaxYear>().unwrap(), TaxYear::Y2023_24);
        assert!(matches!("2019/20".parse::<TaxYear>(), Err(Error::UnknownTaxYear(_))));
        assert_eq!(TaxYear::default().to_string(), "2025/26");
    }
}
