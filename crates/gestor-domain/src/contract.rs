//! Client contracts and their recurring monthly value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::{new_id, Amounted, Displayable, Identifiable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: String,
    pub client_id: String,
    pub company_id: String,
    pub monthly_value: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

impl Contract {
    pub fn new(
        client_id: impl Into<String>,
        company_id: impl Into<String>,
        monthly_value: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: new_id(),
            client_id: client_id.into(),
            company_id: company_id.into(),
            monthly_value,
            start_date,
            end_date,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Inclusive check against the contract's validity window.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

impl Identifiable for Contract {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for Contract {
    fn amount(&self) -> f64 {
        self.monthly_value
    }
}

impl Displayable for Contract {
    fn display_label(&self) -> String {
        format!(
            "contract:{} [{} → {}]",
            self.id, self.start_date, self.end_date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn active_window_is_inclusive() {
        let contract = Contract::new("c1", "1", 5000.0, date(2024, 1, 1), date(2024, 12, 31));
        assert!(contract.is_active_on(date(2024, 1, 1)));
        assert!(contract.is_active_on(date(2024, 12, 31)));
        assert!(!contract.is_active_on(date(2025, 1, 1)));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let contract = Contract::new("c1", "1", 5000.0, date(2024, 1, 1), date(2024, 12, 31));
        let json = serde_json::to_value(&contract).unwrap();
        assert_eq!(json["clientId"], "c1");
        assert_eq!(json["monthlyValue"], 5000.0);
        assert_eq!(json["endDate"], "2024-12-31");
    }
}
