//! Drop repository: the lifecycle of a drop from creation through
//! finalization to payment.
//!
//! Every operation that touches running balances runs inside a single
//! database transaction and re-reads the balance rows with `FOR UPDATE`
//! locks. Balance math itself lives in `dropsplit_core::reconcile`; this
//! module only persists its results atomically.

use chrono::{NaiveDate, Utc};
use dropsplit_core::reconcile::{DropFigures, MemberBalances, ReconcileError, Reconciler};
use dropsplit_shared::{Caller, Role};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entities::{businesses, drops, members, owners, paid_drops, paid_notices, services};

/// Error types for drop lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum DropError {
    /// Drop not found.
    #[error("Drop not found: {0}")]
    NotFound(i32),

    /// The drop belongs to a different member.
    #[error("Drop does not belong to you")]
    NotDropOwner,

    /// Member not found.
    #[error("Member not found: {0}")]
    MemberNotFound(i32),

    /// The member is not affiliated with any business.
    #[error("Member is not part of a business")]
    NoBusiness,

    /// The member does not belong to a business owned by the caller.
    #[error("Member is not part of your business")]
    NotMemberManager,

    /// The business's owner row is missing.
    #[error("Owner not found: {0}")]
    OwnerNotFound(i32),

    /// A payment operation listed no drops.
    #[error("No drops specified")]
    NoDropsSpecified,

    /// Year/month pair does not form a valid date.
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// Balance figures failed validation.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for finalizing a drop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeDropInput {
    /// Work date; defaults to today (UTC) when omitted.
    pub date: Option<NaiveDate>,
    /// Gross total recorded for the drop.
    pub total: Decimal,
    /// Member's share of the total.
    pub member_cut: Decimal,
    /// Business's share of the total.
    pub business_cut: Decimal,
    /// Amount the member owes the business from this drop.
    #[serde(default)]
    pub member_owes: Decimal,
    /// Amount the business owes the member from this drop.
    #[serde(default)]
    pub business_owes: Decimal,
}

impl FinalizeDropInput {
    const fn figures(&self) -> DropFigures {
        DropFigures {
            member_cut: self.member_cut,
            business_cut: self.business_cut,
            member_owes: self.member_owes,
            business_owes: self.business_owes,
        }
    }
}

/// Input for an owner paying out a batch of drops.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayDropsInput {
    /// Member being paid.
    pub member_id: i32,
    /// Display name on the receipt.
    pub payee: String,
    /// Free-form payment note.
    pub paid_message: String,
    /// Amount paid out.
    pub amount: Decimal,
    /// Drops covered by this payment.
    pub drop_ids: Vec<i32>,
}

/// Input for a member attaching a payment notice to their drops.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNoticeInput {
    /// Display name on the notice.
    pub payee: String,
    /// Free-form payment note.
    pub paid_message: String,
    /// Amount the member reports as received.
    pub amount: Decimal,
    /// Drops the notice covers.
    pub drop_ids: Vec<i32>,
}

/// Input for logging a service line item against a drop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    /// What was done.
    pub description: String,
    /// Cash portion.
    #[serde(default)]
    pub cash: Decimal,
    /// Credit portion.
    #[serde(default)]
    pub credit: Decimal,
    /// Deposit portion.
    #[serde(default)]
    pub deposit: Decimal,
    /// Gift certificate portion.
    #[serde(default)]
    pub gift_cert_amount: Decimal,
}

/// A drop with its service line items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropWithServices {
    /// Drop row.
    pub drop: drops::Model,
    /// Service line items.
    pub services: Vec<services::Model>,
}

/// Result of finalizing a drop: all three updated rows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedDrop {
    /// Updated drop row.
    pub drop: drops::Model,
    /// Member with post-reconciliation balances.
    pub member: members::Model,
    /// Owner with the updated take-home total.
    pub owner: owners::Model,
}

/// Result of an owner batch payment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidBatch {
    /// Payment receipt.
    pub receipt: paid_drops::Model,
    /// Member with post-settlement balances.
    pub member: members::Model,
}

/// Drop repository implementing the drop lifecycle.
#[derive(Debug, Clone)]
pub struct DropRepository {
    db: DatabaseConnection,
}

impl DropRepository {
    /// Creates a new drop repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a zeroed, unpaid drop for the member. No balance effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, member_id: i32) -> Result<drops::Model, DropError> {
        let now = chrono::Utc::now().into();
        let zero = Decimal::ZERO;
        let drop = drops::ActiveModel {
            member_id: Set(member_id),
            date: Set(None),
            total: Set(zero),
            member_cut: Set(zero),
            business_cut: Set(zero),
            member_owes: Set(zero),
            business_owes: Set(zero),
            paid: Set(false),
            paid_drop_id: Set(None),
            paid_notice_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(drop.insert(&self.db).await?)
    }

    /// Fetches a drop with its services, enforcing per-resource
    /// authorization: members see their own drops, owners see drops of
    /// members of businesses they own.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `NotDropOwner` / `NotMemberManager` on
    /// authorization failure, or a database error.
    pub async fn get_for_caller(
        &self,
        caller: Caller,
        drop_id: i32,
    ) -> Result<DropWithServices, DropError> {
        let drop = drops::Entity::find_by_id(drop_id)
            .one(&self.db)
            .await?
            .ok_or(DropError::NotFound(drop_id))?;

        match caller.role {
            Role::Member => {
                if drop.member_id != caller.id {
                    return Err(DropError::NotDropOwner);
                }
            }
            Role::Owner => {
                self.assert_manages_member(&self.db, caller.id, drop.member_id)
                    .await?;
            }
        }

        let service_rows = services::Entity::find()
            .filter(services::Column::DropId.eq(drop.id))
            .order_by_asc(services::Column::Id)
            .all(&self.db)
            .await?;

        Ok(DropWithServices {
            drop,
            services: service_rows,
        })
    }

    /// Finalizes a drop: records its figures and folds them into the
    /// member's and owner's running balances, atomically.
    ///
    /// Figures are validated before the transaction opens. Inside the
    /// transaction the drop, member, and owner rows are re-read with
    /// exclusive row locks so concurrent finalizes serialize instead of
    /// losing updates.
    ///
    /// # Errors
    ///
    /// Returns `Reconcile` for negative figures, `NotFound` /
    /// `NotDropOwner` for a missing or foreign drop, `NoBusiness` when
    /// the member is unaffiliated, or a database error. Any failure
    /// aborts the transaction and leaves all rows untouched.
    pub async fn finalize(
        &self,
        caller_member_id: i32,
        drop_id: i32,
        input: FinalizeDropInput,
    ) -> Result<FinalizedDrop, DropError> {
        let figures = input.figures();
        Reconciler::validate_figures(&figures)?;

        let txn = self.db.begin().await?;

        let drop = drops::Entity::find_by_id(drop_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DropError::NotFound(drop_id))?;
        if drop.member_id != caller_member_id {
            return Err(DropError::NotDropOwner);
        }

        let member = Self::lock_member(&txn, drop.member_id).await?;
        let business_id = member.business_id.ok_or(DropError::NoBusiness)?;
        let business = businesses::Entity::find_by_id(business_id)
            .one(&txn)
            .await?
            .ok_or(DropError::NoBusiness)?;
        let owner = Self::lock_owner(&txn, business.owner_id).await?;

        let reconciled = Reconciler::apply(&balances_of(&member), owner.take_home_total, &figures);

        let now = chrono::Utc::now().into();
        let date = input.date.unwrap_or_else(|| Utc::now().date_naive());

        let mut drop_active: drops::ActiveModel = drop.into();
        drop_active.date = Set(Some(date));
        drop_active.total = Set(input.total);
        drop_active.member_cut = Set(figures.member_cut);
        drop_active.business_cut = Set(figures.business_cut);
        drop_active.member_owes = Set(figures.member_owes);
        drop_active.business_owes = Set(figures.business_owes);
        drop_active.updated_at = Set(now);
        let drop = drop_active.update(&txn).await?;

        let member = Self::persist_balances(&txn, member, &reconciled.member).await?;
        let owner = Self::persist_owner_take_home(&txn, owner, reconciled.owner_take_home).await?;

        txn.commit().await?;

        info!(
            drop_id = drop.id,
            member_id = member.id,
            owner_id = owner.id,
            "Drop finalized"
        );

        Ok(FinalizedDrop {
            drop,
            member,
            owner,
        })
    }

    /// Deletes a drop, reversing its contribution to the running
    /// balances in the same transaction. A partially reversed balance
    /// with a surviving drop is never observable.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` / `NotDropOwner` for a missing or foreign
    /// drop, or a database error.
    pub async fn delete(&self, caller_member_id: i32, drop_id: i32) -> Result<(), DropError> {
        let txn = self.db.begin().await?;

        let drop = drops::Entity::find_by_id(drop_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DropError::NotFound(drop_id))?;
        if drop.member_id != caller_member_id {
            return Err(DropError::NotDropOwner);
        }

        let member = Self::lock_member(&txn, drop.member_id).await?;
        let figures = DropFigures {
            member_cut: drop.member_cut,
            business_cut: drop.business_cut,
            member_owes: drop.member_owes,
            business_owes: drop.business_owes,
        };

        // An unaffiliated member's drops were never finalized, so there
        // is no owner balance to reverse.
        match member.business_id {
            Some(business_id) => {
                let business = businesses::Entity::find_by_id(business_id)
                    .one(&txn)
                    .await?
                    .ok_or(DropError::NoBusiness)?;
                let owner = Self::lock_owner(&txn, business.owner_id).await?;
                let reconciled =
                    Reconciler::reverse(&balances_of(&member), owner.take_home_total, &figures);

                Self::persist_balances(&txn, member, &reconciled.member).await?;
                Self::persist_owner_take_home(&txn, owner, reconciled.owner_take_home).await?;
            }
            None => {
                let reconciled =
                    Reconciler::reverse(&balances_of(&member), Decimal::ZERO, &figures);
                Self::persist_balances(&txn, member, &reconciled.member).await?;
            }
        }

        drops::Entity::delete_by_id(drop_id).exec(&txn).await?;

        txn.commit().await?;

        info!(drop_id, member_id = caller_member_id, "Drop deleted");
        Ok(())
    }

    /// Owner pays out a batch of a member's drops: inserts a receipt,
    /// marks the listed drops paid (only where currently unpaid, so a
    /// concurrent duplicate request cannot double-mark), and applies the
    /// exact-match settlement to the member's owe/owed totals.
    ///
    /// Marking drops paid does not re-run reconciliation.
    ///
    /// Lock order matches `finalize`/`delete`: drop rows are locked (by
    /// the conditional update) before the member row.
    ///
    /// # Errors
    ///
    /// Returns `NoDropsSpecified` for an empty batch, `Reconcile` for a
    /// negative amount, `MemberNotFound` / `NoBusiness` /
    /// `NotMemberManager` on authorization failure, or a database error.
    pub async fn pay_drops(
        &self,
        owner_id: i32,
        input: PayDropsInput,
    ) -> Result<PaidBatch, DropError> {
        if input.drop_ids.is_empty() {
            return Err(DropError::NoDropsSpecified);
        }
        if input.amount < Decimal::ZERO {
            return Err(ReconcileError::NegativeAmount { field: "amount" }.into());
        }

        let txn = self.db.begin().await?;

        self.assert_manages_member(&txn, owner_id, input.member_id)
            .await?;

        let receipt = paid_drops::ActiveModel {
            payee: Set(input.payee),
            paid_message: Set(input.paid_message),
            amount: Set(input.amount),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };
        let receipt = receipt.insert(&txn).await?;

        drops::Entity::update_many()
            .col_expr(drops::Column::Paid, Expr::value(true))
            .col_expr(drops::Column::PaidDropId, Expr::value(receipt.id))
            .col_expr(
                drops::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().fixed_offset()),
            )
            .filter(drops::Column::Id.is_in(input.drop_ids))
            .filter(drops::Column::MemberId.eq(input.member_id))
            .filter(drops::Column::Paid.eq(false))
            .exec(&txn)
            .await?;

        let member = Self::lock_member(&txn, input.member_id).await?;
        let settled = Reconciler::settle_exact(&balances_of(&member), input.amount);
        let member = Self::persist_balances(&txn, member, &settled).await?;

        txn.commit().await?;

        info!(
            receipt_id = receipt.id,
            member_id = member.id,
            owner_id,
            "Drop batch paid"
        );

        Ok(PaidBatch { receipt, member })
    }

    /// Member attaches a payment notice to their own unpaid drops. No
    /// balance or `paid` flag changes.
    ///
    /// # Errors
    ///
    /// Returns `NoDropsSpecified` for an empty batch, `Reconcile` for a
    /// negative amount, or a database error.
    pub async fn create_payment_notice(
        &self,
        member_id: i32,
        input: PaymentNoticeInput,
    ) -> Result<paid_notices::Model, DropError> {
        if input.drop_ids.is_empty() {
            return Err(DropError::NoDropsSpecified);
        }
        if input.amount < Decimal::ZERO {
            return Err(ReconcileError::NegativeAmount { field: "amount" }.into());
        }

        let txn = self.db.begin().await?;

        let notice = paid_notices::ActiveModel {
            payee: Set(input.payee),
            paid_message: Set(input.paid_message),
            amount: Set(input.amount),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };
        let notice = notice.insert(&txn).await?;

        drops::Entity::update_many()
            .col_expr(drops::Column::PaidNoticeId, Expr::value(notice.id))
            .col_expr(
                drops::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().fixed_offset()),
            )
            .filter(drops::Column::Id.is_in(input.drop_ids))
            .filter(drops::Column::MemberId.eq(member_id))
            .filter(drops::Column::Paid.eq(false))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        Ok(notice)
    }

    /// Lists a member's paid drops, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_paid(&self, member_id: i32) -> Result<Vec<drops::Model>, DropError> {
        Ok(drops::Entity::find()
            .filter(drops::Column::MemberId.eq(member_id))
            .filter(drops::Column::Paid.eq(true))
            .order_by_desc(drops::Column::Date)
            .all(&self.db)
            .await?)
    }

    /// Lists a member's drops within a UTC calendar month, for an owner
    /// reviewing a member of one of their businesses. The window is
    /// `[first-of-month, first-of-next-month)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMonth` for an impossible year/month pair,
    /// `MemberNotFound` / `NoBusiness` / `NotMemberManager` on
    /// authorization failure, or a database error.
    pub async fn list_member_month(
        &self,
        owner_id: i32,
        member_id: i32,
        year: i32,
        month: u32,
    ) -> Result<Vec<drops::Model>, DropError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(DropError::InvalidMonth { year, month })?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or(DropError::InvalidMonth { year, month })?;

        let member = members::Entity::find_by_id(member_id)
            .one(&self.db)
            .await?
            .ok_or(DropError::MemberNotFound(member_id))?;
        self.assert_manages_member(&self.db, owner_id, member.id)
            .await?;

        Ok(drops::Entity::find()
            .filter(drops::Column::MemberId.eq(member_id))
            .filter(drops::Column::Date.gte(start))
            .filter(drops::Column::Date.lt(end))
            .order_by_asc(drops::Column::Date)
            .all(&self.db)
            .await?)
    }

    /// Logs a service line item against one of the member's drops.
    /// Informational only; never feeds reconciliation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` / `NotDropOwner` for a missing or foreign
    /// drop, or a database error.
    pub async fn add_service(
        &self,
        caller_member_id: i32,
        drop_id: i32,
        input: ServiceInput,
    ) -> Result<services::Model, DropError> {
        let drop = drops::Entity::find_by_id(drop_id)
            .one(&self.db)
            .await?
            .ok_or(DropError::NotFound(drop_id))?;
        if drop.member_id != caller_member_id {
            return Err(DropError::NotDropOwner);
        }

        let now = chrono::Utc::now().into();
        let service = services::ActiveModel {
            drop_id: Set(drop.id),
            description: Set(input.description),
            cash: Set(input.cash),
            credit: Set(input.credit),
            deposit: Set(input.deposit),
            gift_cert_amount: Set(input.gift_cert_amount),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(service.insert(&self.db).await?)
    }

    /// Verifies the member belongs to a business owned by `owner_id`.
    async fn assert_manages_member<C: ConnectionTrait>(
        &self,
        conn: &C,
        owner_id: i32,
        member_id: i32,
    ) -> Result<(), DropError> {
        let member = members::Entity::find_by_id(member_id)
            .one(conn)
            .await?
            .ok_or(DropError::MemberNotFound(member_id))?;
        let business_id = member.business_id.ok_or(DropError::NoBusiness)?;
        let business = businesses::Entity::find_by_id(business_id)
            .one(conn)
            .await?
            .ok_or(DropError::NoBusiness)?;
        if business.owner_id != owner_id {
            return Err(DropError::NotMemberManager);
        }
        Ok(())
    }

    /// Re-reads a member row with an exclusive lock.
    async fn lock_member(
        txn: &DatabaseTransaction,
        member_id: i32,
    ) -> Result<members::Model, DropError> {
        members::Entity::find_by_id(member_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(DropError::MemberNotFound(member_id))
    }

    /// Re-reads an owner row with an exclusive lock.
    async fn lock_owner(
        txn: &DatabaseTransaction,
        owner_id: i32,
    ) -> Result<owners::Model, DropError> {
        owners::Entity::find_by_id(owner_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(DropError::OwnerNotFound(owner_id))
    }

    /// Persists reconciled balances onto a member row.
    async fn persist_balances(
        txn: &DatabaseTransaction,
        member: members::Model,
        balances: &MemberBalances,
    ) -> Result<members::Model, DropError> {
        let mut active: members::ActiveModel = member.into();
        active.take_home_total = Set(balances.take_home_total);
        active.total_owe = Set(balances.total_owe);
        active.total_owed = Set(balances.total_owed);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(txn).await?)
    }

    /// Persists an updated take-home total onto an owner row.
    async fn persist_owner_take_home(
        txn: &DatabaseTransaction,
        owner: owners::Model,
        take_home_total: Decimal,
    ) -> Result<owners::Model, DropError> {
        let mut active: owners::ActiveModel = owner.into();
        active.take_home_total = Set(take_home_total);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(txn).await?)
    }
}

/// Projects a member row onto the reconciler's balance type.
const fn balances_of(member: &members::Model) -> MemberBalances {
    MemberBalances {
        take_home_total: member.take_home_total,
        total_owe: member.total_owe,
        total_owed: member.total_owed,
    }
}
