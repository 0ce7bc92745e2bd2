//! Initial database migration.
//!
//! Creates all core tables: accounts (owners, members), businesses,
//! drops with their services, and the two payment receipt tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ACCOUNTS & BUSINESSES
        // ============================================================
        db.execute_unprepared(OWNERS_SQL).await?;
        db.execute_unprepared(BUSINESSES_SQL).await?;
        db.execute_unprepared(MEMBERS_SQL).await?;

        // ============================================================
        // PART 2: PAYMENT RECEIPTS
        // ============================================================
        db.execute_unprepared(PAID_DROPS_SQL).await?;
        db.execute_unprepared(PAID_NOTICES_SQL).await?;

        // ============================================================
        // PART 3: DROPS & SERVICES
        // ============================================================
        db.execute_unprepared(DROPS_SQL).await?;
        db.execute_unprepared(SERVICES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const OWNERS_SQL: &str = r"
CREATE TABLE owners (
    id SERIAL PRIMARY KEY,
    username VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    owner_name VARCHAR(255) NOT NULL,
    take_home_total NUMERIC(12, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_owner_take_home_nonneg CHECK (take_home_total >= 0)
);

CREATE INDEX idx_owners_username ON owners(username);
";

const BUSINESSES_SQL: &str = r"
CREATE TABLE businesses (
    id SERIAL PRIMARY KEY,
    business_name VARCHAR(255) NOT NULL,
    code VARCHAR(100) NOT NULL,
    owner_id INTEGER NOT NULL REFERENCES owners(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (business_name, code)
);

CREATE INDEX idx_businesses_owner ON businesses(owner_id);
";

const MEMBERS_SQL: &str = r"
CREATE TABLE members (
    id SERIAL PRIMARY KEY,
    username VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    member_name VARCHAR(255) NOT NULL,
    business_id INTEGER REFERENCES businesses(id) ON DELETE SET NULL,
    percentage INTEGER NOT NULL DEFAULT 60,
    take_home_total NUMERIC(12, 2) NOT NULL DEFAULT 0,
    total_owe NUMERIC(12, 2) NOT NULL DEFAULT 0,
    total_owed NUMERIC(12, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_member_percentage CHECK (percentage BETWEEN 0 AND 100),
    CONSTRAINT chk_member_take_home_nonneg CHECK (take_home_total >= 0),
    CONSTRAINT chk_member_owe_nonneg CHECK (total_owe >= 0),
    CONSTRAINT chk_member_owed_nonneg CHECK (total_owed >= 0)
);

CREATE INDEX idx_members_username ON members(username);
CREATE INDEX idx_members_business ON members(business_id) WHERE business_id IS NOT NULL;
";

const PAID_DROPS_SQL: &str = r"
CREATE TABLE paid_drops (
    id SERIAL PRIMARY KEY,
    payee VARCHAR(255) NOT NULL,
    paid_message TEXT NOT NULL,
    amount NUMERIC(12, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_paid_drop_amount_nonneg CHECK (amount >= 0)
);
";

const PAID_NOTICES_SQL: &str = r"
CREATE TABLE paid_notices (
    id SERIAL PRIMARY KEY,
    payee VARCHAR(255) NOT NULL,
    paid_message TEXT NOT NULL,
    amount NUMERIC(12, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_paid_notice_amount_nonneg CHECK (amount >= 0)
);
";

const DROPS_SQL: &str = r"
CREATE TABLE drops (
    id SERIAL PRIMARY KEY,
    member_id INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE,
    date DATE,
    total NUMERIC(12, 2) NOT NULL DEFAULT 0,
    member_cut NUMERIC(12, 2) NOT NULL DEFAULT 0,
    business_cut NUMERIC(12, 2) NOT NULL DEFAULT 0,
    member_owes NUMERIC(12, 2) NOT NULL DEFAULT 0,
    business_owes NUMERIC(12, 2) NOT NULL DEFAULT 0,
    paid BOOLEAN NOT NULL DEFAULT false,
    paid_drop_id INTEGER REFERENCES paid_drops(id) ON DELETE SET NULL,
    paid_notice_id INTEGER REFERENCES paid_notices(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_drops_member ON drops(member_id);
CREATE INDEX idx_drops_member_date ON drops(member_id, date);
CREATE INDEX idx_drops_unpaid ON drops(member_id) WHERE paid = false;
";

const SERVICES_SQL: &str = r"
CREATE TABLE services (
    id SERIAL PRIMARY KEY,
    drop_id INTEGER NOT NULL REFERENCES drops(id) ON DELETE CASCADE,
    description VARCHAR(500) NOT NULL,
    cash NUMERIC(12, 2) NOT NULL DEFAULT 0,
    credit NUMERIC(12, 2) NOT NULL DEFAULT 0,
    deposit NUMERIC(12, 2) NOT NULL DEFAULT 0,
    gift_cert_amount NUMERIC(12, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_services_drop ON services(drop_id);
";

const DROP_ALL_SQL: &str = r"
-- Order matters due to foreign key constraints
DROP TABLE IF EXISTS services CASCADE;
DROP TABLE IF EXISTS drops CASCADE;
DROP TABLE IF EXISTS paid_notices CASCADE;
DROP TABLE IF EXISTS paid_drops CASCADE;
DROP TABLE IF EXISTS members CASCADE;
DROP TABLE IF EXISTS businesses CASCADE;
DROP TABLE IF EXISTS owners CASCADE;
";
