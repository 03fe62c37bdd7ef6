use crate::error::PortalError;
use crate::odoo_client::{Domain, OdooClient, QueryOptions};
use crate::portal::records::{record_id, relation, text};
use crate::portal::{COMPANY_NAME, DEFAULT_COMPANY_ID};

use common::{ErrorLocation, RedactedSecret};
use models::{PortalUser, UserRole};

use std::panic::Location;

use log::{debug, info};

const USER_MODEL: &str = "res.users";
const USER_FIELDS: [&str; 4] = ["name", "login", "company_id", "partner_id"];
const EMPLOYEE_MODEL: &str = "hr.employee";
const EMPLOYEE_FIELDS: [&str; 3] = ["name", "job_id", "department_id"];

/// Resolve the person behind an email address.
///
/// Authenticates with the service account, then looks the email up as a
/// login. The employee record, when there is one, supplies the display name.
pub async fn login_by_email(
    client: &OdooClient,
    login: &str,
    secret: &RedactedSecret,
    email: &str,
) -> Result<PortalUser, PortalError> {
    let email = email.trim();

    client.authenticate(login, secret).await?;

    let single = QueryOptions::default().with_limit(1);

    let users = client
        .query_records(
            USER_MODEL,
            Domain::new().leaf("login", "=", email),
            &USER_FIELDS,
            &single,
        )
        .await?;

    let Some(user) = users.first() else {
        return Err(PortalError::NotFound {
            message: format!("no ERP user has the login {email}"),
            location: ErrorLocation::from(Location::caller()),
        });
    };

    let employees = client
        .query_records(
            EMPLOYEE_MODEL,
            Domain::new().leaf("work_email", "ilike", email),
            &EMPLOYEE_FIELDS,
            &single,
        )
        .await?;

    let employee_name = employees.first().and_then(|e| text(e, "name"));
    if employee_name.is_none() {
        debug!("No employee record for {email}, using the user name");
    }

    let company = relation(user, "company_id");
    let portal_user = PortalUser {
        id: record_id(user)?,
        name: employee_name
            .or_else(|| text(user, "name"))
            .unwrap_or_else(|| email.to_string()),
        login: text(user, "login").unwrap_or_else(|| email.to_string()),
        role: UserRole::for_email(email),
        company_id: company.as_ref().map(|c| c.id).unwrap_or(DEFAULT_COMPANY_ID),
        company_name: company
            .map(|c| c.name)
            .unwrap_or_else(|| COMPANY_NAME.to_string()),
        partner_id: relation(user, "partner_id").map(|p| p.id),
    };

    info!(
        "Portal login for {email}: user {} as {:?}",
        portal_user.id, portal_user.role
    );
    Ok(portal_user)
}
