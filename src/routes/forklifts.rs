use chrono::{Datelike, Utc};
use diesel::prelude::*;
use rocket::serde::json::Json;
use rocket::{get, post, State};
use serde::Deserialize;

use crate::db::{self, DbPool};
use crate::error::{ApiError, ApiResult};
use crate::models::{Forklift, ForkliftStatus, NewForklift};
use crate::schema::forklifts;

#[derive(Deserialize, Debug)]
pub struct CreateForkliftInput {
    pub unit_number: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub serial_number: String,
    #[serde(default)]
    pub status: ForkliftStatus,
}

pub(crate) fn insert_forklift(
    conn: &mut SqliteConnection,
    input: CreateForkliftInput,
) -> ApiResult<Forklift> {
    for (field, value) in [
        ("unit_number", &input.unit_number),
        ("brand", &input.brand),
        ("model", &input.model),
        ("serial_number", &input.serial_number),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::Validation(format!("{field} must not be empty")));
        }
    }
    let max_year = Utc::now().year() + 1;
    if input.year < 1900 || input.year > max_year {
        return Err(ApiError::Validation(format!(
            "year must be between 1900 and {max_year}"
        )));
    }

    let new_forklift = NewForklift {
        unit_number: input.unit_number,
        brand: input.brand,
        model: input.model,
        year: input.year,
        serial_number: input.serial_number,
        status: input.status.as_str().to_string(),
        created_at: Utc::now().naive_utc(),
    };
    let forklift = diesel::insert_into(forklifts::table)
        .values(&new_forklift)
        .get_result::<Forklift>(conn)?;
    Ok(forklift)
}

pub(crate) fn list_forklifts(
    conn: &mut SqliteConnection,
    status: Option<ForkliftStatus>,
) -> ApiResult<Vec<Forklift>> {
    let mut query = forklifts::table
        .select(Forklift::as_select())
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(forklifts::status.eq(status.as_str()));
    }
    let rows = query
        .order(forklifts::unit_number.asc())
        .load::<Forklift>(conn)?;
    Ok(rows)
}

/// Register a forklift (administrative)
#[post("/forklifts", format = "json", data = "<input>")]
pub async fn create_forklift(
    pool: &State<DbPool>,
    input: Json<CreateForkliftInput>,
) -> ApiResult<Json<Forklift>> {
    let input = input.into_inner();
    db::run_blocking(pool, move |conn| insert_forklift(conn, input).map(Json)).await
}

/// Get all forklifts, optionally filtered by lifecycle status
#[get("/forklifts?<status>")]
pub async fn get_forklifts(
    pool: &State<DbPool>,
    status: Option<String>,
) -> ApiResult<Json<Vec<Forklift>>> {
    let status = match status.as_deref() {
        Some(raw) => Some(ForkliftStatus::parse(raw).ok_or_else(|| {
            ApiError::Validation(format!("unknown forklift status {raw:?}"))
        })?),
        None => None,
    };
    db::run_blocking(pool, move |conn| list_forklifts(conn, status).map(Json)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_conn;

    fn input(unit_number: &str, serial_number: &str) -> CreateForkliftInput {
        CreateForkliftInput {
            unit_number: unit_number.to_string(),
            brand: "Toyota".to_string(),
            model: "8FGU25".to_string(),
            year: 2021,
            serial_number: serial_number.to_string(),
            status: ForkliftStatus::Active,
        }
    }

    #[test]
    fn creates_with_default_active_status() {
        let mut conn = test_conn();
        let fl = insert_forklift(&mut conn, input("FL001", "SN-1")).unwrap();
        assert_eq!(fl.unit_number, "FL001");
        assert_eq!(fl.status, "active");
    }

    #[test]
    fn year_out_of_range_is_rejected() {
        let mut conn = test_conn();
        let mut bad = input("FL001", "SN-1");
        bad.year = 1899;
        assert_eq!(insert_forklift(&mut conn, bad).unwrap_err().kind(), "validation");

        let mut bad = input("FL001", "SN-1");
        bad.year = Utc::now().year() + 2;
        assert_eq!(insert_forklift(&mut conn, bad).unwrap_err().kind(), "validation");
        assert!(list_forklifts(&mut conn, None).unwrap().is_empty());
    }

    #[test]
    fn duplicate_unit_number_is_a_conflict() {
        let mut conn = test_conn();
        insert_forklift(&mut conn, input("FL001", "SN-1")).unwrap();
        let err = insert_forklift(&mut conn, input("FL001", "SN-2")).unwrap_err();
        assert_eq!(err.kind(), "conflict");
    }

    #[test]
    fn duplicate_serial_number_is_a_conflict() {
        let mut conn = test_conn();
        insert_forklift(&mut conn, input("FL001", "SN-1")).unwrap();
        let err = insert_forklift(&mut conn, input("FL002", "SN-1")).unwrap_err();
        assert_eq!(err.kind(), "conflict");
    }

    #[test]
    fn listing_filters_by_status_and_orders_by_unit() {
        let mut conn = test_conn();
        insert_forklift(&mut conn, input("FL003", "SN-3")).unwrap();
        insert_forklift(&mut conn, input("FL001", "SN-1")).unwrap();
        let mut in_shop = input("FL002", "SN-2");
        in_shop.status = ForkliftStatus::Maintenance;
        insert_forklift(&mut conn, in_shop).unwrap();

        let all = list_forklifts(&mut conn, None).unwrap();
        let units: Vec<&str> = all.iter().map(|f| f.unit_number.as_str()).collect();
        assert_eq!(units, ["FL001", "FL002", "FL003"]);

        let active = list_forklifts(&mut conn, Some(ForkliftStatus::Active)).unwrap();
        assert_eq!(active.len(), 2);
    }
}
