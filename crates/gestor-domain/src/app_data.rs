//! The complete application snapshot and its seed dataset.

use serde::{Deserialize, Serialize};

use crate::{Client, Company, Contract, Employee, Transaction};

/// Every collection the application owns, persisted and exported as one JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl AppData {
    /// Fixed dataset used when nothing has been persisted yet.
    pub fn seed() -> Self {
        Self {
            companies: vec![
                Company::new("1", "Baião Assessoria Alpha", "00.000.001/0001-01"),
                Company::new("2", "Baião Gestão Beta", "00.000.002/0001-02"),
                Company::new("3", "Baião Consultoria Gamma", "00.000.003/0001-03"),
                Company::new("4", "Baião Soluções Delta", "00.000.004/0001-04"),
            ],
            clients: vec![Client {
                id: "c1".into(),
                name: "Prefeitura Municipal Exemplo".into(),
                city: "São Paulo - SP".into(),
            }],
            employees: vec![
                Employee::new("e1", "Empresário (Admin)", "Diretor Geral").admin(),
                Employee::new("e2", "Consultor Técnico", "Colaborador"),
            ],
            contracts: Vec::new(),
            transactions: Vec::new(),
        }
    }

    pub fn company(&self, id: &str) -> Option<&Company> {
        self.companies.iter().find(|company| company.id == id)
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.id == id)
    }

    pub fn contract(&self, id: &str) -> Option<&Contract> {
        self.contracts.iter().find(|contract| contract.id == id)
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    /// Company name for display; blank when the reference is dangling.
    pub fn company_name(&self, id: &str) -> &str {
        self.company(id)
            .map(|company| company.name.as_str())
            .unwrap_or("")
    }

    /// Client name for display; blank when the reference is dangling.
    pub fn client_name(&self, id: &str) -> &str {
        self.client(id)
            .map(|client| client.name.as_str())
            .unwrap_or("")
    }

    /// Number of contracts signed by `client_id`, across every company.
    pub fn contract_count(&self, client_id: &str) -> usize {
        self.contracts
            .iter()
            .filter(|contract| contract.client_id == client_id)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
            && self.clients.is_empty()
            && self.employees.is_empty()
            && self.contracts.is_empty()
            && self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_four_companies_and_two_employees() {
        let data = AppData::seed();
        assert_eq!(data.companies.len(), 4);
        assert_eq!(data.employees.len(), 2);
        assert!(data.employee("e1").map(|e| e.is_admin).unwrap_or(false));
        assert!(data.contracts.is_empty());
        assert!(data.transactions.is_empty());
    }

    #[test]
    fn dangling_references_resolve_to_blank_names() {
        let data = AppData::seed();
        assert_eq!(data.company_name("9"), "");
        assert_eq!(data.client_name("missing"), "");
        assert_eq!(data.client_name("c1"), "Prefeitura Municipal Exemplo");
    }

    #[test]
    fn contract_count_spans_companies() {
        let mut data = AppData::seed();
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = chrono::NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        data.contracts = vec![
            Contract::new("c1", "1", 1000.0, start, end),
            Contract::new("c1", "3", 2000.0, start, end),
            Contract::new("c2", "3", 500.0, start, end),
        ];
        assert_eq!(data.contract_count("c1"), 2);
        assert_eq!(data.contract_count("c2"), 1);
        assert_eq!(data.contract_count("missing"), 0);
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let data: AppData = serde_json::from_str(r#"{"companies": []}"#).unwrap();
        assert!(data.is_empty());
    }
}
