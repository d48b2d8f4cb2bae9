//! HTTP routes.
//!
//! | Method | Path                | Success                   |
//! |--------|---------------------|---------------------------|
//! | GET    | `/`                 | 200 HTML banner           |
//! | GET    | `/api/info`         | 200 HTML count + time     |
//! | GET    | `/api/persons`      | 200 array of records      |
//! | POST   | `/api/persons`      | 200 created record        |
//! | GET    | `/api/persons/{id}` | 200 record, 404 if absent |
//! | PUT    | `/api/persons/{id}` | 200 record, 404 if absent |
//! | DELETE | `/api/persons/{id}` | 204, idempotent           |

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Local};
use phonebook_core::{Contact, ContactId};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Request body for create and update.
///
/// Both fields are optional on the wire so that a missing field is reported
/// as "name or number missing" rather than as a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    /// Submitted name
    #[serde(default)]
    pub name: Option<String>,
    /// Submitted number
    #[serde(default)]
    pub number: Option<String>,
}

impl ContactForm {
    /// Unwraps the JSON extractor result.
    ///
    /// A request without a JSON content type counts as an empty form, the
    /// way body parsers that skip non-JSON requests behave.
    fn from_payload(payload: Result<Json<ContactForm>, JsonRejection>) -> ApiResult<Self> {
        match payload {
            Ok(Json(form)) => Ok(form),
            Err(JsonRejection::MissingJsonContentType(_)) => Ok(ContactForm::default()),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }

    fn fields(&self) -> (&str, &str) {
        (
            self.name.as_deref().unwrap_or_default(),
            self.number.as_deref().unwrap_or_default(),
        )
    }
}

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/api/info", get(info))
        .route("/api/persons", get(list_persons).post(create_person))
        .route(
            "/api/persons/{id}",
            get(get_person).put(update_person).delete(delete_person),
        )
}

async fn root() -> Html<&'static str> {
    Html("<h1>Phonebook API</h1>")
}

async fn info(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let count = state.store().count().await?;
    Ok(Html(render_info(count, Local::now())))
}

/// The info page body.
pub fn render_info(count: usize, now: DateTime<Local>) -> String {
    format!(
        "<div>Phonebook has info for {count} people</div><div>{}</div>",
        now.format("%a %b %d %Y %H:%M:%S GMT%z")
    )
}

async fn list_persons(State(state): State<AppState>) -> ApiResult<Json<Vec<Contact>>> {
    Ok(Json(state.store().find_all().await?))
}

async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Contact>> {
    state
        .store()
        .find_by_id(&ContactId::from(id))
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

async fn create_person(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> ApiResult<Json<Contact>> {
    let form = ContactForm::from_payload(payload)?;
    let (name, number) = form.fields();
    let contact = state.reconciler().create_unique(name, number).await?;
    Ok(Json(contact))
}

async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> ApiResult<Json<Contact>> {
    let form = ContactForm::from_payload(payload)?;
    let (name, number) = form.fields();

    let contact = state
        .reconciler()
        .update_unique(&ContactId::from(id), name, number)
        .await?;
    tracing::debug!(id = %contact.id, "contact replaced");
    Ok(Json(contact))
}

async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let removed = state.store().delete_by_id(&ContactId::from(id)).await?;
    tracing::debug!(removed, "delete handled");
    Ok(StatusCode::NO_CONTENT)
}

/// Fallback for paths no route or static file serves.
pub async fn unknown_endpoint() -> ApiError {
    ApiError::unknown_endpoint()
}
