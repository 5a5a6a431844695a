//! Settings and whole-store maintenance: clear, backup export and restore.

use chrono::Utc;

use crate::{Backup, ResultEngine, Snapshot, SettingsPatch, store::CollectionKey};

use super::Engine;

impl Engine {
    /// Partial merge over the shop settings.
    pub async fn update_settings(&mut self, patch: SettingsPatch) -> ResultEngine<()> {
        let mut settings = self.snapshot.settings.clone();
        if let Some(theme) = patch.theme {
            settings.theme = theme;
        }
        if let Some(currency) = patch.currency {
            settings.currency = currency;
        }
        if let Some(lock_pin) = patch.lock_pin {
            settings.lock_pin = lock_pin;
        }
        if let Some(gstin) = patch.gstin {
            settings.gstin = gstin;
        }
        if let Some(prefix) = patch.invoice_prefix {
            settings.invoice_prefix = prefix;
        }
        if let Some(tax_enabled) = patch.tax_enabled {
            settings.tax_enabled = tax_enabled;
        }

        self.store.save(CollectionKey::Settings, &settings).await?;
        self.snapshot.settings = settings;
        Ok(())
    }

    /// Resets every collection to empty and the settings to their defaults.
    pub async fn clear_all_data(&mut self) -> ResultEngine<bool> {
        self.store.clear_all().await?;
        self.snapshot = Snapshot::default();
        Ok(true)
    }

    /// Replaces every collection verbatim with the supplied backup,
    /// defaulting any omitted collection to empty.
    ///
    /// No cross-entity validation happens here; whatever the backup claims
    /// is written as-is. Dangling links it may contain are repaired by the
    /// reconciliation pass the next time an engine is built over this store.
    pub async fn restore_data(&mut self, backup: Backup) -> ResultEngine<bool> {
        self.store.import_all(&backup).await?;
        self.snapshot = Snapshot::from(backup);
        Ok(true)
    }

    /// The current snapshot in the backup file shape, stamped with the
    /// export time.
    #[must_use]
    pub fn export_all_data(&self) -> Backup {
        Backup::capture(&self.snapshot, Utc::now())
    }
}
