use serde::{Deserialize, Serialize};

use crate::common::{Displayable, Identifiable, NamedEntity};

/// Legal entity of the holding group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(rename = "cnpj")]
    pub tax_id: String,
}

impl Company {
    pub fn new(id: impl Into<String>, name: impl Into<String>, tax_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tax_id: tax_id.into(),
        }
    }

    /// Last word of the name, used as a compact label in comparisons.
    pub fn short_name(&self) -> &str {
        self.name
            .split_whitespace()
            .last()
            .unwrap_or(self.name.as_str())
    }
}

impl Identifiable for Company {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Company {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Company {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.tax_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_uses_last_word() {
        let company = Company::new("1", "Baião Assessoria Alpha", "00.000.001/0001-01");
        assert_eq!(company.short_name(), "Alpha");
    }

    #[test]
    fn tax_id_serializes_as_cnpj() {
        let company = Company::new("1", "Alpha", "00.000.001/0001-01");
        let json = serde_json::to_value(&company).unwrap();
        assert_eq!(json["cnpj"], "00.000.001/0001-01");
    }
}
