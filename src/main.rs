use rocket::{launch, Build, Rocket};

mod db;
mod error;
mod models;
mod routes;
mod schema;

use db::DbPool;

fn forkcheck(pool: DbPool) -> Rocket<Build> {
    rocket::build()
        .manage(pool)
        .mount("/api", routes::api_routes())
}

#[launch]
fn rocket() -> _ {
    db::init_logger();
    let pool = db::init_pool();
    {
        let mut conn = db::get_conn(&pool);
        db::run_migrations(&mut conn);
        db::seed_defaults(&mut conn).expect("Failed to seed default records");
    }
    forkcheck(pool)
}
