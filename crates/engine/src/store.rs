//! The persistence gateway: whole-collection key/value reads and writes.
//!
//! Each entity collection is one serialized JSON array under one key in the
//! `collections` table. There is no query capability beyond reading a full
//! collection, and deliberately no wrapping transaction around multi-key
//! writes: callers order their writes (referenced collection first) and the
//! load-time reconciliation pass repairs whatever a crash leaves behind.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseConnection, DbErr, EntityTrait, sea_query::OnConflict};
use serde::{Serialize, de::DeserializeOwned};

use crate::{Backup, LedgerError, ResultEngine};

mod rows {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "collections")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub key: String,
        pub value: Json,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Storage key of one entity collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionKey {
    Sales,
    Expenses,
    Credits,
    Settings,
    Contacts,
    Products,
    Returns,
}

impl CollectionKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Expenses => "expenses",
            Self::Credits => "credits",
            Self::Settings => "settings",
            Self::Contacts => "contacts",
            Self::Products => "products",
            Self::Returns => "returns",
        }
    }
}

/// Whole-collection get/set over the backing database.
#[derive(Clone, Debug)]
pub struct CollectionStore {
    database: DatabaseConnection,
}

impl CollectionStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    /// Raw read of one collection value; `None` when the key was never
    /// written.
    pub async fn get(&self, key: CollectionKey) -> ResultEngine<Option<serde_json::Value>> {
        let row = rows::Entity::find_by_id(key.as_str().to_owned())
            .one(&self.database)
            .await?;
        Ok(row.map(|row| row.value))
    }

    /// Typed read of one collection, defaulting a missing key.
    pub async fn load<T>(&self, key: CollectionKey) -> ResultEngine<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.get(key).await? {
            Some(value) => serde_json::from_value(value).map_err(|err| {
                LedgerError::Persistence(DbErr::Json(format!(
                    "corrupt '{}' collection: {err}",
                    key.as_str()
                )))
            }),
            None => Ok(T::default()),
        }
    }

    /// Writes one whole collection (upsert of its single row).
    pub async fn save<T>(&self, key: CollectionKey, value: &T) -> ResultEngine<()>
    where
        T: Serialize,
    {
        let json = serde_json::to_value(value).map_err(|err| {
            LedgerError::Persistence(DbErr::Json(format!(
                "cannot serialize '{}' collection: {err}",
                key.as_str()
            )))
        })?;
        let row = rows::ActiveModel {
            key: ActiveValue::Set(key.as_str().to_owned()),
            value: ActiveValue::Set(json),
        };
        rows::Entity::insert(row)
            .on_conflict(
                OnConflict::column(rows::Column::Key)
                    .update_column(rows::Column::Value)
                    .to_owned(),
            )
            .exec_without_returning(&self.database)
            .await?;
        Ok(())
    }

    /// Deletes every collection row.
    pub async fn clear_all(&self) -> ResultEngine<()> {
        rows::Entity::delete_many().exec(&self.database).await?;
        Ok(())
    }

    /// Reads every collection into the backup shape.
    pub async fn export_all(&self, exported_at: DateTime<Utc>) -> ResultEngine<Backup> {
        Ok(Backup {
            sales: self.load(CollectionKey::Sales).await?,
            expenses: self.load(CollectionKey::Expenses).await?,
            credits: self.load(CollectionKey::Credits).await?,
            settings: self.load(CollectionKey::Settings).await?,
            contacts: self.load(CollectionKey::Contacts).await?,
            products: self.load(CollectionKey::Products).await?,
            returns: self.load(CollectionKey::Returns).await?,
            exported_at: Some(exported_at),
        })
    }

    /// Writes every collection of a backup verbatim. Omitted collections in
    /// the source document arrive here already defaulted to empty.
    pub async fn import_all(&self, backup: &Backup) -> ResultEngine<()> {
        self.save(CollectionKey::Products, &backup.products).await?;
        self.save(CollectionKey::Contacts, &backup.contacts).await?;
        self.save(CollectionKey::Credits, &backup.credits).await?;
        self.save(CollectionKey::Sales, &backup.sales).await?;
        self.save(CollectionKey::Returns, &backup.returns).await?;
        self.save(CollectionKey::Expenses, &backup.expenses).await?;
        self.save(CollectionKey::Settings, &backup.settings).await?;
        Ok(())
    }
}
