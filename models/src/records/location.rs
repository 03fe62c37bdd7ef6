use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLocation {
    pub id: i64,
    pub name: String,
    pub complete_name: Option<String>,
    /// Point-of-sale registers that sell out of this location.
    #[serde(default)]
    pub pos_names: Vec<String>,
}

impl StockLocation {
    /// Full hierarchical name when the ERP sent one, otherwise the short name.
    pub fn display_path(&self) -> &str {
        self.complete_name.as_deref().unwrap_or(&self.name)
    }
}
