//! Owner repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;

use crate::entities::{businesses, drops, members, owners};

/// A business with its members and their drops, nested for the owner
/// dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessWithMembers {
    /// Business row.
    pub business: businesses::Model,
    /// Members affiliated with the business, each with their drops.
    pub members: Vec<MemberWithDrops>,
}

/// A member together with all of their drops.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWithDrops {
    /// Member row.
    pub member: members::Model,
    /// The member's drops, newest first.
    pub drops: Vec<drops::Model>,
}

/// Full nested owner profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    /// Owner row.
    pub owner: owners::Model,
    /// The owner's businesses with their members.
    pub businesses: Vec<BusinessWithMembers>,
}

/// Owner repository for CRUD operations.
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

    /// Finds an owner by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<owners::Model>, DbErr> {
        owners::Entity::find()
            .filter(owners::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Finds an owner by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<owners::Model>, DbErr> {
        owners::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks if a username is already registered as an owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn username_exists(&self, username: &str) -> Result<bool, DbErr> {
        let count = owners::Entity::find()
            .filter(owners::Column::Username.eq(username))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new owner account with a zero take-home total.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        owner_name: &str,
    ) -> Result<owners::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let owner = owners::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            owner_name: Set(owner_name.to_string()),
            take_home_total: Set(rust_decimal::Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        owner.insert(&self.db).await
    }

    /// Loads the full owner profile: businesses, their members, and each
    /// member's drops.
    ///
    /// # Errors
    ///
    /// Returns an error if any database query fails.
    pub async fn profile(&self, owner_id: i32) -> Result<Option<OwnerProfile>, DbErr> {
        let Some(owner) = self.find_by_id(owner_id).await? else {
            return Ok(None);
        };

        let business_rows = businesses::Entity::find()
            .filter(businesses::Column::OwnerId.eq(owner_id))
            .order_by_asc(businesses::Column::Id)
            .all(&self.db)
            .await?;

        let mut nested = Vec::with_capacity(business_rows.len());
        for business in business_rows {
            let member_rows = members::Entity::find()
                .filter(members::Column::BusinessId.eq(business.id))
                .order_by_asc(members::Column::Id)
                .all(&self.db)
                .await?;

            let mut members_with_drops = Vec::with_capacity(member_rows.len());
            for member in member_rows {
                let drop_rows = drops::Entity::find()
                    .filter(drops::Column::MemberId.eq(member.id))
                    .order_by_desc(drops::Column::Id)
                    .all(&self.db)
                    .await?;
                members_with_drops.push(MemberWithDrops {
                    member,
                    drops: drop_rows,
                });
            }

            nested.push(BusinessWithMembers {
                business,
                members: members_with_drops,
            });
        }

        Ok(Some(OwnerProfile {
            owner,
            businesses: nested,
        }))
    }
}
