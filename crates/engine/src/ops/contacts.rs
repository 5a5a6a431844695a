//! Contact mutations.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    Contact, ContactPatch, LedgerError, NewContact, ResultEngine, store::CollectionKey, util,
};

use super::Engine;

impl Engine {
    pub async fn add_contact(&mut self, draft: NewContact) -> ResultEngine<Uuid> {
        let name = util::normalize_required_name(&draft.name, "contact")?;

        let contact = Contact {
            id: Uuid::new_v4(),
            name,
            phone: draft.phone,
            kind: draft.kind,
            notes: draft.notes,
            created_at: Utc::now(),
        };
        let contact_id = contact.id;

        let mut contacts = self.snapshot.contacts.clone();
        contacts.push(contact);
        self.store.save(CollectionKey::Contacts, &contacts).await?;
        self.snapshot.contacts = contacts;
        Ok(contact_id)
    }

    pub async fn update_contact(&mut self, id: Uuid, patch: ContactPatch) -> ResultEngine<()> {
        let index = self
            .snapshot
            .contacts
            .iter()
            .position(|contact| contact.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("contact {id}")))?;

        let mut contacts = self.snapshot.contacts.clone();
        let contact = &mut contacts[index];
        if let Some(name) = patch.name {
            contact.name = util::normalize_required_name(&name, "contact")?;
        }
        if let Some(kind) = patch.kind {
            contact.kind = kind;
        }
        if let Some(phone) = patch.phone {
            contact.phone = Some(phone);
        }
        if let Some(notes) = patch.notes {
            contact.notes = Some(notes);
        }

        self.store.save(CollectionKey::Contacts, &contacts).await?;
        self.snapshot.contacts = contacts;
        Ok(())
    }

    /// Deletes a contact unless its name is still referenced by a sale's
    /// customer, a credit's party, or an expense's vendor.
    pub async fn delete_contact(&mut self, id: Uuid) -> ResultEngine<()> {
        let contact = self
            .snapshot
            .contact(id)
            .ok_or_else(|| LedgerError::NotFound(format!("contact {id}")))?;
        let name = contact.name.clone();

        let in_sales = self
            .snapshot
            .sales
            .iter()
            .any(|sale| util::same_name(&util::normalize_name(&sale.customer_name), &name));
        let in_credits = self
            .snapshot
            .credits
            .iter()
            .any(|credit| util::same_name(&util::normalize_name(&credit.party), &name));
        let in_expenses = self.snapshot.expenses.iter().any(|expense| {
            expense
                .vendor
                .as_deref()
                .is_some_and(|vendor| util::same_name(&util::normalize_name(vendor), &name))
        });
        if in_sales || in_credits || in_expenses {
            return Err(LedgerError::Conflict(format!(
                "contact \"{name}\" is referenced by existing records"
            )));
        }

        let mut contacts = self.snapshot.contacts.clone();
        contacts.retain(|contact| contact.id != id);
        self.store.save(CollectionKey::Contacts, &contacts).await?;
        self.snapshot.contacts = contacts;
        Ok(())
    }
}
