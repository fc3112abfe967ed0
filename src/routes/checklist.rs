use chrono::Utc;
use diesel::prelude::*;
use rocket::serde::json::Json;
use rocket::{get, post, State};
use serde::Deserialize;

use crate::db::{self, DbPool};
use crate::error::{ApiError, ApiResult};
use crate::models::{ChecklistItem, NewChecklistItem};
use crate::schema::checklist_items;

fn default_active() -> bool {
    true
}

#[derive(Deserialize, Debug)]
pub struct CreateChecklistItemInput {
    pub category: String,
    pub item_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

pub(crate) fn insert_checklist_item(
    conn: &mut SqliteConnection,
    input: CreateChecklistItemInput,
) -> ApiResult<ChecklistItem> {
    if input.category.trim().is_empty() {
        return Err(ApiError::Validation("category must not be empty".into()));
    }
    if input.item_name.trim().is_empty() {
        return Err(ApiError::Validation("item_name must not be empty".into()));
    }

    let new_item = NewChecklistItem {
        category: input.category,
        item_name: input.item_name,
        description: input.description,
        is_active: input.is_active,
        created_at: Utc::now().naive_utc(),
    };
    let item = diesel::insert_into(checklist_items::table)
        .values(&new_item)
        .get_result::<ChecklistItem>(conn)?;
    Ok(item)
}

/// Active items only; disabled items stay in the table for historical
/// results but disappear from new inspection forms.
pub(crate) fn list_checklist_items(conn: &mut SqliteConnection) -> ApiResult<Vec<ChecklistItem>> {
    let rows = checklist_items::table
        .filter(checklist_items::is_active.eq(true))
        .order((
            checklist_items::category.asc(),
            checklist_items::item_name.asc(),
        ))
        .select(ChecklistItem::as_select())
        .load::<ChecklistItem>(conn)?;
    Ok(rows)
}

/// Add an inspection point to the catalog (administrative)
#[post("/checklist-items", format = "json", data = "<input>")]
pub async fn create_checklist_item(
    pool: &State<DbPool>,
    input: Json<CreateChecklistItemInput>,
) -> ApiResult<Json<ChecklistItem>> {
    let input = input.into_inner();
    db::run_blocking(pool, move |conn| {
        insert_checklist_item(conn, input).map(Json)
    })
    .await
}

/// Get the active checklist catalog
#[get("/checklist-items")]
pub async fn get_checklist_items(pool: &State<DbPool>) -> ApiResult<Json<Vec<ChecklistItem>>> {
    db::run_blocking(pool, |conn| list_checklist_items(conn).map(Json)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_conn;

    fn input(category: &str, item_name: &str, is_active: bool) -> CreateChecklistItemInput {
        CreateChecklistItemInput {
            category: category.to_string(),
            item_name: item_name.to_string(),
            description: None,
            is_active,
        }
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut conn = test_conn();
        assert_eq!(
            insert_checklist_item(&mut conn, input("", "Horn", true))
                .unwrap_err()
                .kind(),
            "validation"
        );
        assert_eq!(
            insert_checklist_item(&mut conn, input("Safety", " ", true))
                .unwrap_err()
                .kind(),
            "validation"
        );
    }

    #[test]
    fn listing_excludes_inactive_and_orders_by_category_then_name() {
        let mut conn = test_conn();
        insert_checklist_item(&mut conn, input("Tires", "Tire condition", true)).unwrap();
        insert_checklist_item(&mut conn, input("Safety", "Seat belt", true)).unwrap();
        insert_checklist_item(&mut conn, input("Safety", "Horn", true)).unwrap();
        insert_checklist_item(&mut conn, input("Brakes", "Service brake", false)).unwrap();

        let items = list_checklist_items(&mut conn).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.item_name.as_str()).collect();
        assert_eq!(names, ["Horn", "Seat belt", "Tire condition"]);
    }
}
