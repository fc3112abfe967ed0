use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use flexi_logger::{Age, Cleanup, Criterion, FileSpec, Logger, Naming};
use std::env;

use crate::error::{ApiError, ApiResult};
use crate::models::{NewChecklistItem, NewUser, UserRole};
use crate::schema::{checklist_items, users};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Initialize logger
pub fn init_logger() {
    Logger::try_with_str("info")
        .unwrap()
        .log_to_file(FileSpec::default().directory("logs"))
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Numbers,
            Cleanup::KeepLogFiles(7),
        )
        .start()
        .unwrap();
}

/// Initialize DB connection pool
pub fn init_pool() -> DbPool {
    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "forkcheck.db".to_string());
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .build(manager)
        .expect("Failed to create DB pool")
}

/// Get a single connection from the pool
pub fn get_conn(pool: &DbPool) -> DbConn {
    pool.get().expect("Failed to get DB connection")
}

/// Apply any pending migrations at startup
pub fn run_migrations(conn: &mut SqliteConnection) {
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Run a storage operation on the blocking thread pool. Pool acquisition is
/// bounded by r2d2's connection timeout and surfaces as a storage error.
pub async fn run_blocking<T, F>(pool: &DbPool, op: F) -> ApiResult<T>
where
    F: FnOnce(&mut SqliteConnection) -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    rocket::tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        op(&mut conn)
    })
    .await
    .map_err(|e| ApiError::Storage(format!("blocking task failed: {e}")))?
}

/// Seed a default supervisor account and the standard daily checklist when
/// the respective tables are empty, so the selection-based login and the
/// inspection form have something to show on first boot.
pub fn seed_defaults(conn: &mut SqliteConnection) -> QueryResult<()> {
    let user_count: i64 = users::table.count().get_result(conn)?;
    if user_count == 0 {
        let supervisor = NewUser {
            username: "supervisor".to_string(),
            full_name: "Default Supervisor".to_string(),
            role: UserRole::Supervisor.as_str().to_string(),
            created_at: Utc::now().naive_utc(),
        };
        diesel::insert_into(users::table)
            .values(&supervisor)
            .execute(conn)?;
        log::info!("seeded default supervisor account");
    }

    let item_count: i64 = checklist_items::table.count().get_result(conn)?;
    if item_count == 0 {
        let defaults: &[(&str, &str, &str)] = &[
            ("Safety", "Horn", "Sound the horn; must be clearly audible"),
            ("Safety", "Seat belt", "Check belt latches and retracts"),
            ("Safety", "Warning lights", "Head, tail and strobe lights work"),
            ("Safety", "Overhead guard", "No cracks or loose mounting bolts"),
            ("Tires", "Tire condition", "No cuts, gouges or chunking; check pressure"),
            ("Brakes", "Service brake", "Pedal firm, stops within normal distance"),
            ("Brakes", "Parking brake", "Holds the truck on an incline"),
            ("Hydraulics", "Lift and tilt cylinders", "No leaks, no drift under load"),
            ("Hydraulics", "Hose condition", "No chafing, kinks or seepage"),
            ("Forks", "Fork condition", "No cracks, bends or heel wear past limit"),
            ("Forks", "Carriage and mast", "Rollers seat properly, chains evenly tensioned"),
            ("Power", "Battery charge / fuel level", "Sufficient for the shift"),
            ("Power", "Engine oil level", "Between marks, no fresh leaks under truck"),
        ];
        let now = Utc::now().naive_utc();
        let rows: Vec<NewChecklistItem> = defaults
            .iter()
            .map(|(category, item_name, description)| NewChecklistItem {
                category: category.to_string(),
                item_name: item_name.to_string(),
                description: Some(description.to_string()),
                is_active: true,
                created_at: now,
            })
            .collect();
        diesel::insert_into(checklist_items::table)
            .values(&rows)
            .execute(conn)?;
        log::info!("seeded {} default checklist items", rows.len());
    }

    Ok(())
}

#[cfg(test)]
pub fn test_conn() -> SqliteConnection {
    let mut conn =
        SqliteConnection::establish(":memory:").expect("Failed to open in-memory database");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations on test database");
    conn
}
