//! Database seeder for Dropsplit development and testing.
//!
//! Seeds a test owner with a business and two affiliated members for
//! local development.
//!
//! Usage: cargo run --bin seeder

use sea_orm::DatabaseConnection;

use dropsplit_core::auth::hash_password;
use dropsplit_db::{BusinessRepository, MemberRepository, OwnerRepository};

const TEST_OWNER_USERNAME: &str = "demo-owner";
const TEST_BUSINESS_NAME: &str = "Demo Studio";
const TEST_BUSINESS_CODE: &str = "1234";
const TEST_MEMBER_USERNAMES: [&str; 2] = ["demo-member-1", "demo-member-2"];
const TEST_PASSWORD: &str = "password123";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = dropsplit_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo owner...");
    let owner_id = seed_owner(&db).await;

    println!("Seeding demo business...");
    let business_id = seed_business(&db, owner_id).await;

    println!("Seeding demo members...");
    seed_members(&db, business_id).await;

    println!("Seeding complete!");
}

async fn seed_owner(db: &DatabaseConnection) -> i32 {
    let repo = OwnerRepository::new(db.clone());

    if let Some(existing) = repo
        .find_by_username(TEST_OWNER_USERNAME)
        .await
        .expect("Failed to query owner")
    {
        println!("  Demo owner already exists, skipping...");
        return existing.id;
    }

    let password_hash = hash_password(TEST_PASSWORD).expect("Failed to hash password");
    let owner = repo
        .create(TEST_OWNER_USERNAME, &password_hash, "Demo Owner")
        .await
        .expect("Failed to insert demo owner");

    println!("  Created demo owner: {TEST_OWNER_USERNAME}");
    owner.id
}

async fn seed_business(db: &DatabaseConnection, owner_id: i32) -> i32 {
    let repo = BusinessRepository::new(db.clone());

    if let Some(existing) = repo
        .find_by_name_and_code(TEST_BUSINESS_NAME, TEST_BUSINESS_CODE)
        .await
        .expect("Failed to query business")
    {
        println!("  Demo business already exists, skipping...");
        return existing.id;
    }

    let business = repo
        .create(owner_id, TEST_BUSINESS_NAME, TEST_BUSINESS_CODE)
        .await
        .expect("Failed to insert demo business");

    println!("  Created demo business: {TEST_BUSINESS_NAME} (code {TEST_BUSINESS_CODE})");
    business.id
}

async fn seed_members(db: &DatabaseConnection, business_id: i32) {
    let repo = MemberRepository::new(db.clone());

    for (index, username) in TEST_MEMBER_USERNAMES.iter().enumerate() {
        if repo
            .find_by_username(username)
            .await
            .expect("Failed to query member")
            .is_some()
        {
            println!("  Member {username} already exists, skipping...");
            continue;
        }

        let password_hash = hash_password(TEST_PASSWORD).expect("Failed to hash password");
        let display_name = format!("Demo Member {}", index + 1);
        repo.create(username, &password_hash, &display_name, Some(business_id))
            .await
            .expect("Failed to insert demo member");

        println!("  Created demo member: {username}");
    }
}
