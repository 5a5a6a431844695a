//! Customer and vendor contacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::LedgerError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    #[default]
    Customer,
    Vendor,
    Both,
}

impl ContactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Vendor => "Vendor",
            Self::Both => "Both",
        }
    }
}

impl TryFrom<&str> for ContactKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Customer" | "customer" => Ok(Self::Customer),
            "Vendor" | "vendor" => Ok(Self::Vendor),
            "Both" | "both" => Ok(Self::Both),
            other => Err(LedgerError::Validation(format!(
                "invalid contact type: {other}"
            ))),
        }
    }
}

/// A party the business deals with. Sales, credits and expenses reference
/// contacts by (normalized) name, not by id, so deletion is blocked while
/// the name is still referenced anywhere.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ContactKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
