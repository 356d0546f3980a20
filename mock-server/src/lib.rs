use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const DEFAULT_ACCESS_TOKEN: &str = "dev-token";

/// Days ahead (today included) the birthdays endpoint looks.
pub const BIRTHDAY_WINDOW_DAYS: i64 = 7;

const ADMIN_EMAIL: &str = "admin@ex.ua";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub phone_number: Option<String>,
    pub born_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub roles: String,
    pub confirmed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Deserialize)]
pub struct SignupBody {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub born_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub user: User,
    pub detail: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

type Failure = (StatusCode, Json<Detail>);

fn failure(status: StatusCode, detail: &str) -> Failure {
    (
        status,
        Json(Detail {
            detail: detail.to_string(),
        }),
    )
}

#[derive(Default)]
struct Store {
    users: Vec<User>,
    next_id: i64,
}

#[derive(Clone)]
pub struct AppState {
    db: Arc<RwLock<Store>>,
    access_token: Arc<str>,
}

impl AppState {
    pub fn new(access_token: &str) -> Self {
        Self {
            db: Arc::new(RwLock::new(Store {
                users: Vec::new(),
                next_id: 1,
            })),
            access_token: Arc::from(access_token),
        }
    }
}

pub fn app() -> Router {
    app_with_state(AppState::new(DEFAULT_ACCESS_TOKEN))
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/birthdays/", get(birthday_users))
        .route("/api/users/{id}", get(get_user))
        .route("/api/auth/signup", post(signup))
        .with_state(state)
}

pub async fn run(listener: TcpListener, access_token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(AppState::new(access_token))).await
}

/// Users whose birthday, compared as a (month, day) key, falls between
/// `today` and `today + days` inclusive. The window wraps across the year
/// end, and a Feb 29 birthday matches whenever the window spans Feb 28 to
/// Mar 1, leap year or not.
pub fn birthdays_within(users: &[User], today: NaiveDate, days: i64) -> Vec<User> {
    if days < 0 {
        return Vec::new();
    }
    let start = (today.month(), today.day());
    let end_date = today + Duration::days(days);
    let end = (end_date.month(), end_date.day());
    let whole_year = days >= 365;

    users
        .iter()
        .filter(|u| {
            u.born_date.is_some_and(|born| {
                let key = (born.month(), born.day());
                whole_year
                    || if start <= end {
                        start <= key && key <= end
                    } else {
                        key >= start || key <= end
                    }
            })
        })
        .cloned()
        .collect()
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Failure> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
    match value.strip_prefix("Bearer ") {
        Some(token) if token == &*state.access_token => Ok(()),
        _ => Err(failure(
            StatusCode::UNAUTHORIZED,
            "Could not validate credentials",
        )),
    }
}

async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, Failure> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    Ok(Json(db.users.clone()))
}

#[derive(Debug, Deserialize)]
pub struct BirthdayQuery {
    #[serde(default = "default_window")]
    pub days: i64,
}

fn default_window() -> i64 {
    BIRTHDAY_WINDOW_DAYS
}

async fn birthday_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BirthdayQuery>,
) -> Result<Json<Vec<User>>, Failure> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    let today = Local::now().date_naive();
    debug!(days = query.days, "birthday window");
    Ok(Json(birthdays_within(&db.users, today, query.days)))
}

async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<User>, Failure> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    db.users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Not Found"))
}

async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupBody>,
) -> Result<(StatusCode, Json<SignupResponse>), Failure> {
    let born_date = validate(&body)?;

    let mut db = state.db.write().await;
    if db.users.iter().any(|u| u.email == body.email) {
        debug!(email = %body.email, "duplicate signup");
        return Err(failure(StatusCode::CONFLICT, "Account already exists"));
    }

    let now = Local::now().naive_local();
    let roles = if body.email == ADMIN_EMAIL { "admin" } else { "user" };
    let user = User {
        id: db.next_id,
        username: body.username,
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        phone_number: body.phone_number,
        born_date,
        description: body.description,
        avatar: None,
        roles: roles.to_string(),
        confirmed: false,
        created_at: now,
        updated_at: now,
    };
    db.next_id += 1;
    db.users.push(user.clone());
    info!(id = user.id, username = %user.username, "user created");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user,
            detail: "User successfully created. Check your email for confirmation.".to_string(),
        }),
    ))
}

/// Field rules of the signup schema. Returns the parsed birth date.
fn validate(body: &SignupBody) -> Result<Option<NaiveDate>, Failure> {
    let invalid = |detail: &str| failure(StatusCode::UNPROCESSABLE_ENTITY, detail);

    if !(6..=12).contains(&body.username.chars().count()) {
        return Err(invalid("username must be 6 to 12 characters"));
    }
    if !(6..=8).contains(&body.password.chars().count()) {
        return Err(invalid("password must be 6 to 8 characters"));
    }
    if !body.email.contains('@') {
        return Err(invalid("email is not valid"));
    }
    match body.born_date.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid("born_date must be YYYY-MM-DD")),
    }
}
