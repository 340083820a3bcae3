use serde::{Deserialize, Serialize};

use crate::model::category::Category;

/// The user a portal session belongs to. The email is the sole identity
/// carrier across pages; no session token exists in this subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalUser {
    #[serde(default)]
    pub user_id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub location_id: Option<String>,
}

/// Response of the user-access lookup: the resolved user plus the
/// categories (with their models) assigned to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccess {
    pub user: PortalUser,
    #[serde(default)]
    pub categories: Vec<Category>,
}
