//! Business repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::businesses;

/// Business repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BusinessRepository {
    db: DatabaseConnection,
}

impl BusinessRepository {
    /// Creates a new business repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all businesses. Used by the public directory members browse
    /// before joining.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<businesses::Model>, DbErr> {
        businesses::Entity::find()
            .order_by_asc(businesses::Column::BusinessName)
            .all(&self.db)
            .await
    }

    /// Finds a business by its (name, code) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name_and_code(
        &self,
        business_name: &str,
        code: &str,
    ) -> Result<Option<businesses::Model>, DbErr> {
        businesses::Entity::find()
            .filter(businesses::Column::BusinessName.eq(business_name))
            .filter(businesses::Column::Code.eq(code))
            .one(&self.db)
            .await
    }

    /// Creates a business owned by the given owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails, including unique
    /// violations on the (name, code) pair.
    pub async fn create(
        &self,
        owner_id: i32,
        business_name: &str,
        code: &str,
    ) -> Result<businesses::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let business = businesses::ActiveModel {
            business_name: Set(business_name.to_string()),
            code: Set(code.to_string()),
            owner_id: Set(owner_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        business.insert(&self.db).await
    }
}
