//! Member repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;

use crate::entities::{businesses, drops, members, paid_drops, paid_notices, services};

/// Error types for member operations.
#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    /// Member not found.
    #[error("Member not found: {0}")]
    NotFound(i32),

    /// No business matches the given name and code.
    #[error("Business not found")]
    BusinessNotFound,

    /// The member does not belong to a business owned by the caller.
    #[error("Member is not part of your business")]
    NotManager,

    /// Percentage outside the 0-100 range.
    #[error("Percentage must be between 0 and 100, got {0}")]
    InvalidPercentage(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A drop together with its service line items and any payment receipts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropDetail {
    /// Drop row.
    pub drop: drops::Model,
    /// Service line items logged against the drop.
    pub services: Vec<services::Model>,
    /// Owner payout receipt, if the drop was batch-paid.
    pub paid_drop: Option<paid_drops::Model>,
    /// Member payment notice, if one was attached.
    pub paid_notice: Option<paid_notices::Model>,
}

/// Full member profile for the member dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    /// Member row.
    pub member: members::Model,
    /// The business the member belongs to, if any.
    pub business: Option<businesses::Model>,
    /// Other members of the same business.
    pub teammates: Vec<members::Model>,
    /// The member's drops with services and receipts, newest first.
    pub drops: Vec<DropDetail>,
}

/// Member repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    db: DatabaseConnection,
}

impl MemberRepository {
    /// Creates a new member repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a member by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<members::Model>, DbErr> {
        members::Entity::find()
            .filter(members::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Finds a member by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<members::Model>, DbErr> {
        members::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks if a username is already registered as a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn username_exists(&self, username: &str) -> Result<bool, DbErr> {
        let count = members::Entity::find()
            .filter(members::Column::Username.eq(username))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new member account with zeroed balances, optionally
    /// already affiliated with a business.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        member_name: &str,
        business_id: Option<i32>,
    ) -> Result<members::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let zero = rust_decimal::Decimal::ZERO;
        let member = members::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            member_name: Set(member_name.to_string()),
            business_id: Set(business_id),
            percentage: Set(60),
            take_home_total: Set(zero),
            total_owe: Set(zero),
            total_owed: Set(zero),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        member.insert(&self.db).await
    }

    /// Affiliates a member with the business matching the given name and
    /// code.
    ///
    /// # Errors
    ///
    /// Returns `BusinessNotFound` if no business matches, `NotFound` if
    /// the member does not exist, or a database error.
    pub async fn join_business(
        &self,
        member_id: i32,
        business_name: &str,
        code: &str,
    ) -> Result<members::Model, MemberError> {
        let business = businesses::Entity::find()
            .filter(businesses::Column::BusinessName.eq(business_name))
            .filter(businesses::Column::Code.eq(code))
            .one(&self.db)
            .await?
            .ok_or(MemberError::BusinessNotFound)?;

        let member = self
            .find_by_id(member_id)
            .await?
            .ok_or(MemberError::NotFound(member_id))?;

        let mut active: members::ActiveModel = member.into();
        active.business_id = Set(Some(business.id));
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Updates a member's split percentage. Only the owner of the
    /// member's business may do this.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPercentage` outside 0-100, `NotFound` for an
    /// unknown member, `NotManager` when the member belongs to another
    /// owner's business (or to none), or a database error.
    pub async fn update_percentage(
        &self,
        owner_id: i32,
        member_id: i32,
        percentage: i32,
    ) -> Result<members::Model, MemberError> {
        if !(0..=100).contains(&percentage) {
            return Err(MemberError::InvalidPercentage(percentage));
        }

        let member = self
            .find_by_id(member_id)
            .await?
            .ok_or(MemberError::NotFound(member_id))?;

        let business_id = member.business_id.ok_or(MemberError::NotManager)?;
        let business = businesses::Entity::find_by_id(business_id)
            .one(&self.db)
            .await?
            .ok_or(MemberError::NotManager)?;
        if business.owner_id != owner_id {
            return Err(MemberError::NotManager);
        }

        let mut active: members::ActiveModel = member.into();
        active.percentage = Set(percentage);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Loads the full member profile: business, teammates, and the
    /// member's drops with services and payment receipts.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown member, or a database error.
    pub async fn profile(&self, member_id: i32) -> Result<MemberProfile, MemberError> {
        let member = self
            .find_by_id(member_id)
            .await?
            .ok_or(MemberError::NotFound(member_id))?;

        let (business, teammates) = match member.business_id {
            Some(business_id) => {
                let business = businesses::Entity::find_by_id(business_id)
                    .one(&self.db)
                    .await?;
                let teammates = members::Entity::find()
                    .filter(members::Column::BusinessId.eq(business_id))
                    .filter(members::Column::Id.ne(member.id))
                    .order_by_asc(members::Column::MemberName)
                    .all(&self.db)
                    .await?;
                (business, teammates)
            }
            None => (None, Vec::new()),
        };

        let drop_rows = drops::Entity::find()
            .filter(drops::Column::MemberId.eq(member.id))
            .order_by_desc(drops::Column::Id)
            .all(&self.db)
            .await?;

        let mut details = Vec::with_capacity(drop_rows.len());
        for drop in drop_rows {
            let service_rows = services::Entity::find()
                .filter(services::Column::DropId.eq(drop.id))
                .order_by_asc(services::Column::Id)
                .all(&self.db)
                .await?;

            let paid_drop = match drop.paid_drop_id {
                Some(id) => paid_drops::Entity::find_by_id(id).one(&self.db).await?,
                None => None,
            };
            let paid_notice = match drop.paid_notice_id {
                Some(id) => paid_notices::Entity::find_by_id(id).one(&self.db).await?,
                None => None,
            };

            details.push(DropDetail {
                drop,
                services: service_rows,
                paid_drop,
                paid_notice,
            });
        }

        Ok(MemberProfile {
            member,
            business,
            teammates,
            drops: details,
        })
    }
}
