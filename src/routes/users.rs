use chrono::Utc;
use diesel::prelude::*;
use rocket::serde::json::Json;
use rocket::{get, post, State};
use serde::Deserialize;

use crate::db::{self, DbPool};
use crate::error::{ApiError, ApiResult};
use crate::models::{NewUser, User, UserRole};
use crate::schema::users;

#[derive(Deserialize, Debug)]
pub struct CreateUserInput {
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
}

pub(crate) fn insert_user(conn: &mut SqliteConnection, input: CreateUserInput) -> ApiResult<User> {
    if input.username.trim().len() < 3 {
        return Err(ApiError::Validation(
            "username must be at least 3 characters".into(),
        ));
    }
    if input.full_name.trim().is_empty() {
        return Err(ApiError::Validation("full_name must not be empty".into()));
    }

    let new_user = NewUser {
        username: input.username,
        full_name: input.full_name,
        role: input.role.as_str().to_string(),
        created_at: Utc::now().naive_utc(),
    };
    let user = diesel::insert_into(users::table)
        .values(&new_user)
        .get_result::<User>(conn)?;
    Ok(user)
}

pub(crate) fn list_users(conn: &mut SqliteConnection) -> ApiResult<Vec<User>> {
    let rows = users::table
        .order(users::id.asc())
        .select(User::as_select())
        .load::<User>(conn)?;
    Ok(rows)
}

/// Create a user (administrative)
#[post("/users", format = "json", data = "<input>")]
pub async fn create_user(
    pool: &State<DbPool>,
    input: Json<CreateUserInput>,
) -> ApiResult<Json<User>> {
    let input = input.into_inner();
    db::run_blocking(pool, move |conn| insert_user(conn, input).map(Json)).await
}

/// Get all users
#[get("/users")]
pub async fn get_users(pool: &State<DbPool>) -> ApiResult<Json<Vec<User>>> {
    db::run_blocking(pool, |conn| list_users(conn).map(Json)).await
}
