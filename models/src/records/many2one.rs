use serde::{Deserialize, Serialize};

/// A relational reference as the ERP returns it: `[id, display name]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Many2One {
    pub id: i64,
    pub name: String,
}

impl Many2One {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
