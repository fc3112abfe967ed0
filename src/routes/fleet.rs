use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use rocket::serde::json::Json;
use rocket::{get, State};
use serde::Serialize;

use crate::db::{self, DbPool};
use crate::error::ApiResult;
use crate::models::{ChecklistStatus, Forklift};
use crate::schema::{daily_inspections, forklifts, inspection_results};

/// Window for counting recent defects against a forklift.
const PENDING_DEFECT_DAYS: i64 = 30;

#[derive(Serialize, Debug)]
pub struct ForkliftStatusSummary {
    pub forklift: Forklift,
    pub last_inspection_date: Option<NaiveDateTime>,
    pub last_inspection_status: Option<String>,
    pub days_since_inspection: Option<i64>,
    pub pending_defects: i64,
}

/// Per-forklift rollup: latest inspection (inspection date, then creation
/// time as the tiebreak) and the defect count over the trailing window.
/// Recomputed from the tables on every call; two whole-fleet queries rather
/// than one round-trip per forklift.
pub(crate) fn fleet_status_summary(
    conn: &mut SqliteConnection,
    now: NaiveDateTime,
) -> ApiResult<Vec<ForkliftStatusSummary>> {
    let fleet = forklifts::table
        .order(forklifts::unit_number.asc())
        .select(Forklift::as_select())
        .load::<Forklift>(conn)?;

    // Rows arrive newest-first within each forklift; the first one seen wins.
    let ordered: Vec<(i32, NaiveDateTime, String)> = daily_inspections::table
        .order((
            daily_inspections::forklift_id.asc(),
            daily_inspections::inspection_date.desc(),
            daily_inspections::created_at.desc(),
        ))
        .select((
            daily_inspections::forklift_id,
            daily_inspections::inspection_date,
            daily_inspections::overall_status,
        ))
        .load(conn)?;
    let mut latest: HashMap<i32, (NaiveDateTime, String)> = HashMap::new();
    for (forklift_id, inspection_date, overall_status) in ordered {
        latest
            .entry(forklift_id)
            .or_insert((inspection_date, overall_status));
    }

    let cutoff = now - Duration::days(PENDING_DEFECT_DAYS);
    let counts: Vec<(i32, i64)> = inspection_results::table
        .inner_join(daily_inspections::table)
        .filter(inspection_results::status.eq(ChecklistStatus::Defect.as_str()))
        .filter(daily_inspections::inspection_date.ge(cutoff))
        .group_by(daily_inspections::forklift_id)
        .select((daily_inspections::forklift_id, count_star()))
        .load(conn)?;
    let defect_counts: HashMap<i32, i64> = counts.into_iter().collect();

    let summaries = fleet
        .into_iter()
        .map(|forklift| {
            let last = latest.get(&forklift.id);
            ForkliftStatusSummary {
                last_inspection_date: last.map(|(date, _)| *date),
                last_inspection_status: last.map(|(_, status)| status.clone()),
                days_since_inspection: last.map(|(date, _)| (now - *date).num_days()),
                pending_defects: defect_counts.get(&forklift.id).copied().unwrap_or(0),
                forklift,
            }
        })
        .collect();
    Ok(summaries)
}

/// Fleet status rollup, ascending by unit number
#[get("/fleet/status-summary")]
pub async fn get_fleet_status_summary(
    pool: &State<DbPool>,
) -> ApiResult<Json<Vec<ForkliftStatusSummary>>> {
    db::run_blocking(pool, |conn| {
        fleet_status_summary(conn, Utc::now().naive_utc()).map(Json)
    })
    .await
}
