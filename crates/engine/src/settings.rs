//! Shop-wide settings.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

/// Persisted app settings. Stored under its own collection key as a single
/// object rather than an array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Optional app-lock PIN. The engine only stores it; enforcement is the
    /// caller's concern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_pin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gstin: Option<String>,
    #[serde(default = "default_invoice_prefix")]
    pub invoice_prefix: String,
    /// When enabled, newly created sales with a billing block get an invoice
    /// number assigned from `last_invoice_number`.
    #[serde(default)]
    pub tax_enabled: bool,
    /// Counter behind invoice numbering; incremented exactly once per newly
    /// numbered sale.
    #[serde(default)]
    pub last_invoice_number: u64,
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_invoice_prefix() -> String {
    "INV".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            currency: default_currency(),
            lock_pin: None,
            gstin: None,
            invoice_prefix: default_invoice_prefix(),
            tax_enabled: false,
            last_invoice_number: 0,
        }
    }
}

impl Settings {
    /// Takes the next invoice number, bumping the counter.
    pub fn next_invoice_number(&mut self) -> String {
        self.last_invoice_number += 1;
        format!("{}-{:04}", self.invoice_prefix, self.last_invoice_number)
    }
}
