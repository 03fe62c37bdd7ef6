use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Employee,
}

impl UserRole {
    /// Role granted to a login email.
    ///
    /// Support and admin mailboxes manage the chain; everyone else works a branch.
    pub fn for_email(email: &str) -> Self {
        let email = email.to_lowercase();
        if email.contains("admin") || email.contains("soporte") {
            UserRole::Admin
        } else {
            UserRole::Employee
        }
    }

    pub fn sees_all_transfers(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// The person using the portal, resolved from their ERP user and employee records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalUser {
    pub id: i64,
    pub name: String,
    pub login: String,
    pub role: UserRole,
    pub company_id: i64,
    pub company_name: String,
    pub partner_id: Option<i64>,
}
