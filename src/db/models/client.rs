//! Client model

use serde::{Deserialize, Serialize};

/// Legal form of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ClientKind {
    Company,
    Individual,
}

/// Client record row
///
/// Deletion is soft (`is_active = false`); invoices and quotes keep their
/// reference either way.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub id: i64,
    pub kind: ClientKind,
    /// Company name, or last name for individuals
    pub name: String,
    pub firstname: Option<String>,
    /// Contact person, for companies
    pub contact_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
    /// Mandatory for companies
    pub siret: Option<String>,
    pub vat_number: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Client {
    /// Display name: "name firstname" for individuals, company name otherwise
    pub fn display_name(&self) -> String {
        match (&self.kind, &self.firstname) {
            (ClientKind::Individual, Some(firstname)) => format!("{} {}", self.name, firstname),
            _ => self.name.clone(),
        }
    }
}

/// Create client payload
#[derive(Debug, Clone, Deserialize)]
pub struct ClientCreate {
    pub kind: Option<ClientKind>,
    pub name: String,
    pub firstname: Option<String>,
    pub contact_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub country: Option<String>,
    pub siret: Option<String>,
    pub vat_number: Option<String>,
    pub notes: Option<String>,
}

/// Update client payload (all fields optional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientUpdate {
    pub kind: Option<ClientKind>,
    pub name: Option<String>,
    pub firstname: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub siret: Option<String>,
    pub vat_number: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}
