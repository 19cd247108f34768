use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{JuntaError, JuntaResult};

pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    Soles,
    Dollars,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Soles => "S/",
            Currency::Dollars => "$",
        }
    }
}

/// How often members contribute and one payout happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    Weekly,
    Biweekly,
    #[default]
    Monthly,
}

/// Descriptive settings of a junta, shown on its info screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub name: String,
    /// Contribution per member per period, in cents
    pub amount_cents: u64,
    pub currency: Currency,
    pub period: Period,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl GroupInfo {
    pub fn new(name: impl Into<String>, amount_cents: u64, currency: Currency) -> Self {
        Self {
            name: name.into(),
            amount_cents,
            currency,
            period: Period::default(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap_or_default(),
        }
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    pub fn with_dates(mut self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    /// "S/ 150.00"
    pub fn formatted_amount(&self) -> String {
        format!(
            "{} {}.{:02}",
            self.currency.symbol(),
            self.amount_cents / 100,
            self.amount_cents % 100
        )
    }

    pub fn formatted_dates(&self) -> (String, String) {
        (
            self.start_date.format(DATE_FORMAT).to_string(),
            self.end_date.format(DATE_FORMAT).to_string(),
        )
    }

    pub fn validate(&self) -> JuntaResult<()> {
        if self.name.trim().is_empty() {
            return Err(JuntaError::InvalidGroupInfo("name is required".to_string()));
        }
        if self.amount_cents == 0 {
            return Err(JuntaError::InvalidGroupInfo("amount must be positive".to_string()));
        }
        if self.end_date < self.start_date {
            return Err(JuntaError::InvalidGroupInfo(format!(
                "end date {} is before start date {}",
                self.end_date.format(DATE_FORMAT),
                self.start_date.format(DATE_FORMAT)
            )));
        }
        Ok(())
    }
}

/// Parses a `dd/mm/YYYY` date as entered on the info form
pub fn parse_date(raw: &str) -> JuntaResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| JuntaError::InvalidGroupInfo(format!("invalid date {:?}", raw)))
}
