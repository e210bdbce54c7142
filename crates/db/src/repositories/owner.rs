//! Owner repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tally_core::ledger::{LedgerError, OwnerRecord, account::normalize_email};
use tally_shared::types::OwnerId;
use tracing::info;

use super::RepositoryError;
use crate::entities::owners;

/// Input for creating an owner.
#[derive(Debug, Clone)]
pub struct CreateOwnerInput {
    /// Login email, unique across owners.
    pub email: String,
    /// Name shown in statements.
    pub display_name: String,
}

/// Owner repository.
#[derive(Debug, Clone)]
pub struct OwnerRepository {
    db: DatabaseConnection,
}

impl OwnerRepository {
    /// Creates a new owner repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an active owner.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOwner` for a malformed email or blank display name and
    /// `DuplicateOwnerEmail` if the email is taken.
    pub async fn create_owner(
        &self,
        input: CreateOwnerInput,
    ) -> Result<OwnerRecord, RepositoryError> {
        let email = normalize_email(&input.email)?;
        let display_name = input.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(
                LedgerError::InvalidOwner("display name must not be empty".to_string()).into(),
            );
        }

        let txn = self.db.begin().await?;

        let existing = owners::Entity::find()
            .filter(owners::Column::Email.eq(email.as_str()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(LedgerError::DuplicateOwnerEmail(email).into());
        }

        let owner = owners::ActiveModel {
            id: Set(OwnerId::new().into_inner()),
            email: Set(email.clone()),
            display_name: Set(display_name),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };
        let owner = match owner.insert(&txn).await {
            Ok(model) => model,
            Err(err) => {
                let err = RepositoryError::from(err);
                return Err(if err.is_unique_violation() {
                    LedgerError::DuplicateOwnerEmail(email).into()
                } else {
                    err
                });
            }
        };

        txn.commit().await?;

        info!(owner_id = %owner.id, "Owner created");
        Ok(owner.into())
    }

    /// Finds an owner by ID.
    ///
    /// # Errors
    ///
    /// Returns `OwnerNotFound` if no owner has this ID.
    pub async fn find_owner(&self, owner_id: OwnerId) -> Result<OwnerRecord, RepositoryError> {
        owners::Entity::find_by_id(owner_id.into_inner())
            .one(&self.db)
            .await?
            .map(OwnerRecord::from)
            .ok_or_else(|| LedgerError::OwnerNotFound(owner_id).into())
    }
}
