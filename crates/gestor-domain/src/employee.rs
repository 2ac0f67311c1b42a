use serde::{Deserialize, Serialize};

use crate::common::{Displayable, Identifiable, NamedEntity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_admin: bool,
}

impl Employee {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            is_admin: false,
        }
    }

    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

impl Identifiable for Employee {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Employee {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Employee {
    fn display_label(&self) -> String {
        format!("{} • {}", self.name, self.role)
    }
}
