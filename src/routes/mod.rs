use chrono::Utc;
use rocket::serde::json::Json;
use rocket::{get, routes, Route};
use serde_json::{json, Value};

pub mod checklist;
pub mod fleet;
pub mod forklifts;
pub mod inspections;
pub mod users;

#[get("/healthcheck")]
pub fn healthcheck() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// API routes
pub fn api_routes() -> Vec<Route> {
    routes![
        healthcheck,
        // Users
        users::create_user,
        users::get_users,
        // Forklifts
        forklifts::create_forklift,
        forklifts::get_forklifts,
        // Checklist catalog
        checklist::create_checklist_item,
        checklist::get_checklist_items,
        // Inspections
        inspections::create_daily_inspection,
        inspections::get_inspection_history,
        inspections::get_inspection_detail,
        // Fleet rollup
        fleet::get_fleet_status_summary,
    ]
}

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::{NaiveDateTime, Utc};
    use diesel::prelude::*;

    use crate::models::{
        ChecklistItem, Forklift, NewChecklistItem, NewDailyInspection, NewForklift,
        NewInspectionResult, NewUser, User,
    };
    use crate::schema::{checklist_items, daily_inspections, forklifts, inspection_results, users};

    pub fn forklift(conn: &mut SqliteConnection, unit_number: &str) -> Forklift {
        diesel::insert_into(forklifts::table)
            .values(&NewForklift {
                unit_number: unit_number.to_string(),
                brand: "Toyota".to_string(),
                model: "8FGU25".to_string(),
                year: 2021,
                serial_number: format!("SN-{unit_number}"),
                status: "active".to_string(),
                created_at: Utc::now().naive_utc(),
            })
            .get_result(conn)
            .unwrap()
    }

    pub fn operator(conn: &mut SqliteConnection, username: &str) -> User {
        diesel::insert_into(users::table)
            .values(&NewUser {
                username: username.to_string(),
                full_name: format!("Operator {username}"),
                role: "operator".to_string(),
                created_at: Utc::now().naive_utc(),
            })
            .get_result(conn)
            .unwrap()
    }

    pub fn item(conn: &mut SqliteConnection, item_name: &str) -> ChecklistItem {
        diesel::insert_into(checklist_items::table)
            .values(&NewChecklistItem {
                category: "Safety".to_string(),
                item_name: item_name.to_string(),
                description: None,
                is_active: true,
                created_at: Utc::now().naive_utc(),
            })
            .get_result(conn)
            .unwrap()
    }

    /// Insert an inspection row directly, bypassing the recorder. Lets tests
    /// control `created_at` and store statuses (like `needs_attention`) the
    /// recorder itself never writes.
    pub fn raw_inspection(
        conn: &mut SqliteConnection,
        forklift_id: i32,
        operator_id: i32,
        inspection_date: NaiveDateTime,
        created_at: NaiveDateTime,
        overall_status: &str,
    ) -> i32 {
        let row: crate::models::DailyInspection = diesel::insert_into(daily_inspections::table)
            .values(&NewDailyInspection {
                forklift_id,
                operator_id,
                inspection_date,
                shift: "morning".to_string(),
                hours_meter: None,
                fuel_level: None,
                overall_status: overall_status.to_string(),
                notes: None,
                created_at,
            })
            .get_result(conn)
            .unwrap();
        row.id
    }

    pub fn raw_result(
        conn: &mut SqliteConnection,
        inspection_id: i32,
        checklist_item_id: i32,
        status: &str,
    ) {
        diesel::insert_into(inspection_results::table)
            .values(&NewInspectionResult {
                inspection_id,
                checklist_item_id,
                status: status.to_string(),
                notes: None,
                created_at: Utc::now().naive_utc(),
            })
            .execute(conn)
            .unwrap();
    }
}
