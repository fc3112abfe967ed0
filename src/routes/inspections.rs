use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use rocket::serde::json::Json;
use rocket::{get, post, State};
use serde::{Deserialize, Serialize};

use crate::db::{self, DbPool};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    derive_overall_status, ChecklistItem, ChecklistStatus, DailyInspection, Forklift,
    InspectionResult, InspectionStatus, NewDailyInspection, NewInspectionResult, Shift, User,
};
use crate::schema::{checklist_items, daily_inspections, forklifts, inspection_results, users};

#[derive(Deserialize, Debug)]
pub struct ChecklistOutcome {
    pub checklist_item_id: i32,
    pub status: ChecklistStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CreateInspectionInput {
    pub forklift_id: i32,
    pub operator_id: i32,
    pub inspection_date: NaiveDateTime,
    pub shift: Shift,
    #[serde(default)]
    pub hours_meter: Option<f64>,
    #[serde(default)]
    pub fuel_level: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    pub results: Vec<ChecklistOutcome>,
}

/// Persist one inspection plus its per-item results. The referenced
/// forklift, operator and checklist items must all exist; the inspection row
/// and its result rows land in one transaction, so a failed reference check
/// leaves nothing behind.
pub(crate) fn insert_inspection(
    conn: &mut SqliteConnection,
    input: CreateInspectionInput,
) -> ApiResult<DailyInspection> {
    if let Some(fuel) = input.fuel_level {
        if !(0..=100).contains(&fuel) {
            return Err(ApiError::Validation(
                "fuel_level must be between 0 and 100".into(),
            ));
        }
    }
    if let Some(hours) = input.hours_meter {
        if hours < 0.0 {
            return Err(ApiError::Validation("hours_meter must be non-negative".into()));
        }
    }

    conn.transaction::<DailyInspection, ApiError, _>(|conn| {
        let forklift_exists: bool = diesel::select(exists(
            forklifts::table.filter(forklifts::id.eq(input.forklift_id)),
        ))
        .get_result(conn)?;
        if !forklift_exists {
            return Err(ApiError::NotFound(format!(
                "forklift with id {} not found",
                input.forklift_id
            )));
        }

        let operator_exists: bool = diesel::select(exists(
            users::table.filter(users::id.eq(input.operator_id)),
        ))
        .get_result(conn)?;
        if !operator_exists {
            return Err(ApiError::NotFound(format!(
                "user with id {} not found",
                input.operator_id
            )));
        }

        let wanted_ids: Vec<i32> = input.results.iter().map(|r| r.checklist_item_id).collect();
        let known_ids: Vec<i32> = checklist_items::table
            .filter(checklist_items::id.eq_any(&wanted_ids))
            .select(checklist_items::id)
            .load(conn)?;
        for id in &wanted_ids {
            if !known_ids.contains(id) {
                return Err(ApiError::NotFound(format!(
                    "checklist item with id {id} not found"
                )));
            }
        }

        let outcomes: Vec<ChecklistStatus> = input.results.iter().map(|r| r.status).collect();
        let overall_status = derive_overall_status(&outcomes);

        let now = Utc::now().naive_utc();
        let inspection: DailyInspection = diesel::insert_into(daily_inspections::table)
            .values(&NewDailyInspection {
                forklift_id: input.forklift_id,
                operator_id: input.operator_id,
                inspection_date: input.inspection_date,
                shift: input.shift.as_str().to_string(),
                hours_meter: input.hours_meter,
                fuel_level: input.fuel_level,
                overall_status: overall_status.as_str().to_string(),
                notes: input.notes,
                created_at: now,
            })
            .get_result(conn)?;

        if !input.results.is_empty() {
            let rows: Vec<NewInspectionResult> = input
                .results
                .into_iter()
                .map(|r| NewInspectionResult {
                    inspection_id: inspection.id,
                    checklist_item_id: r.checklist_item_id,
                    status: r.status.as_str().to_string(),
                    notes: r.notes,
                    created_at: now,
                })
                .collect();
            diesel::insert_into(inspection_results::table)
                .values(&rows)
                .execute(conn)?;
        }

        log::info!(
            "recorded inspection {} for forklift {} ({})",
            inspection.id,
            inspection.forklift_id,
            inspection.overall_status
        );
        Ok(inspection)
    })
}

#[derive(Debug, Default)]
pub(crate) struct HistoryFilter {
    pub forklift_id: Option<i32>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub status: Option<InspectionStatus>,
}

/// Matching inspections, newest first. Absent filters match everything on
/// that dimension; both date bounds are inclusive.
pub(crate) fn query_history(
    conn: &mut SqliteConnection,
    filter: HistoryFilter,
) -> ApiResult<Vec<DailyInspection>> {
    let mut query = daily_inspections::table
        .select(DailyInspection::as_select())
        .into_boxed();
    if let Some(forklift_id) = filter.forklift_id {
        query = query.filter(daily_inspections::forklift_id.eq(forklift_id));
    }
    if let Some(start) = filter.start_date {
        query = query.filter(daily_inspections::inspection_date.ge(start));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(daily_inspections::inspection_date.le(end));
    }
    if let Some(status) = filter.status {
        query = query.filter(daily_inspections::overall_status.eq(status.as_str()));
    }

    let rows = query
        .order(daily_inspections::inspection_date.desc())
        .load::<DailyInspection>(conn)?;
    Ok(rows)
}

#[derive(Serialize, Debug)]
pub struct ForkliftIdentity {
    pub unit_number: String,
    pub brand: String,
    pub model: String,
}

#[derive(Serialize, Debug)]
pub struct OperatorIdentity {
    pub full_name: String,
    pub username: String,
}

#[derive(Serialize, Debug)]
pub struct ChecklistItemIdentity {
    pub category: String,
    pub item_name: String,
    pub description: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct ResultDetail {
    #[serde(flatten)]
    pub result: InspectionResult,
    pub checklist_item: ChecklistItemIdentity,
}

#[derive(Serialize, Debug)]
pub struct InspectionDetail {
    #[serde(flatten)]
    pub inspection: DailyInspection,
    pub forklift: ForkliftIdentity,
    pub operator: OperatorIdentity,
    pub results: Vec<ResultDetail>,
}

/// An absent id is a miss, not an error.
pub(crate) fn fetch_inspection_detail(
    conn: &mut SqliteConnection,
    inspection_id: i32,
) -> ApiResult<Option<InspectionDetail>> {
    let header: Option<(DailyInspection, Forklift, User)> = daily_inspections::table
        .inner_join(forklifts::table)
        .inner_join(users::table)
        .filter(daily_inspections::id.eq(inspection_id))
        .select((
            DailyInspection::as_select(),
            Forklift::as_select(),
            User::as_select(),
        ))
        .first(conn)
        .optional()?;

    let Some((inspection, forklift, operator)) = header else {
        return Ok(None);
    };

    let rows: Vec<(InspectionResult, ChecklistItem)> = inspection_results::table
        .inner_join(checklist_items::table)
        .filter(inspection_results::inspection_id.eq(inspection_id))
        .order(inspection_results::id.asc())
        .select((InspectionResult::as_select(), ChecklistItem::as_select()))
        .load(conn)?;

    let results = rows
        .into_iter()
        .map(|(result, item)| ResultDetail {
            result,
            checklist_item: ChecklistItemIdentity {
                category: item.category,
                item_name: item.item_name,
                description: item.description,
            },
        })
        .collect();

    Ok(Some(InspectionDetail {
        inspection,
        forklift: ForkliftIdentity {
            unit_number: forklift.unit_number,
            brand: forklift.brand,
            model: forklift.model,
        },
        operator: OperatorIdentity {
            full_name: operator.full_name,
            username: operator.username,
        },
        results,
    }))
}

fn parse_date_param(name: &str, raw: &str) -> ApiResult<NaiveDateTime> {
    if let Ok(dt) = raw.parse::<NaiveDateTime>() {
        return Ok(dt);
    }
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(ApiError::Validation(format!(
        "{name} must be a date or datetime, got {raw:?}"
    )))
}

/// Record a daily inspection
#[post("/inspections", format = "json", data = "<input>")]
pub async fn create_daily_inspection(
    pool: &State<DbPool>,
    input: Json<CreateInspectionInput>,
) -> ApiResult<Json<DailyInspection>> {
    let input = input.into_inner();
    db::run_blocking(pool, move |conn| insert_inspection(conn, input).map(Json)).await
}

/// Filtered inspection history, newest first
#[get("/inspections/history?<forklift_id>&<start_date>&<end_date>&<status>")]
pub async fn get_inspection_history(
    pool: &State<DbPool>,
    forklift_id: Option<i32>,
    start_date: Option<String>,
    end_date: Option<String>,
    status: Option<String>,
) -> ApiResult<Json<Vec<DailyInspection>>> {
    let filter = HistoryFilter {
        forklift_id,
        start_date: match start_date.as_deref() {
            Some(raw) => Some(parse_date_param("start_date", raw)?),
            None => None,
        },
        end_date: match end_date.as_deref() {
            Some(raw) => Some(parse_date_param("end_date", raw)?),
            None => None,
        },
        status: match status.as_deref() {
            Some(raw) => Some(InspectionStatus::parse(raw).ok_or_else(|| {
                ApiError::Validation(format!("unknown inspection status {raw:?}"))
            })?),
            None => None,
        },
    };
    db::run_blocking(pool, move |conn| query_history(conn, filter).map(Json)).await
}

/// Full inspection record with forklift, operator and per-item outcomes
#[get("/inspections/<inspection_id>")]
pub async fn get_inspection_detail(
    pool: &State<DbPool>,
    inspection_id: i32,
) -> ApiResult<Json<Option<InspectionDetail>>> {
    db::run_blocking(pool, move |conn| {
        fetch_inspection_detail(conn, inspection_id).map(Json)
    })
    .await
}
