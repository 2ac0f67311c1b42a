use serde::{Deserialize, Serialize};

use crate::common::{new_id, Displayable, Identifiable, NamedEntity};

/// Municipality (or other public body) served under contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub city: String,
}

impl Client {
    pub fn new(name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            city: city.into(),
        }
    }
}

impl Identifiable for Client {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Client {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Client {
    fn display_label(&self) -> String {
        format!("{} - {}", self.name, self.city)
    }
}
