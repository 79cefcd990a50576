//! HTTP handlers for the waste-bin CRUD operations.
//! Each handler loads the collection, works on it in memory, and saves it
//! back through the shared `BinStore`; nothing is cached between requests.

use crate::{
    errors::AppError,
    models::bin::{CreateBin, UpdateBin, WasteBin, current_timestamp},
    services::bin_store::{BinStore, next_bin_id},
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Html,
};
use serde::Serialize;

/// Envelope returned by the mutating endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

const BIN_NOT_FOUND: &str = "Bin not found";

/// POST `/bins` — create a bin.
///
/// The server assigns the next free ID and the timestamp. `fillLevel` is
/// stored exactly as supplied (defaulting to 0); it is only clamped on
/// update.
pub async fn create_bin(
    State(store): State<BinStore>,
    payload: Result<Json<CreateBin>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<WasteBin>>), AppError> {
    let Json(payload) = payload?;
    if payload.location.is_empty() {
        return Err(AppError::validation("location", "must not be empty"));
    }

    let mut bins = store.load().await?;
    let bin = WasteBin {
        id: next_bin_id(&bins),
        location: payload.location,
        fill_level: payload.fill_level.unwrap_or(0),
        needs_collection: payload.needs_collection.unwrap_or(false),
        last_updated: current_timestamp(),
    };
    bins.push(bin.clone());
    store.save(&bins).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data("Bin added successfully", bin)),
    ))
}

/// GET `/bins` — the full collection, in creation order.
pub async fn list_bins(State(store): State<BinStore>) -> Result<Json<Vec<WasteBin>>, AppError> {
    let bins = store.load().await?;
    Ok(Json(bins))
}

/// GET `/bins/{id}` — a single bin by ID.
pub async fn get_bin(
    State(store): State<BinStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<WasteBin>, AppError> {
    let Path(id) = id?;
    let bins = store.load().await?;
    let bin = bins
        .into_iter()
        .find(|bin| bin.id == id)
        .ok_or_else(|| AppError::not_found(BIN_NOT_FOUND))?;
    Ok(Json(bin))
}

/// PUT `/bins/{id}` — partial update.
///
/// Each supplied field is applied independently: `location` only when
/// non-empty, `fillLevel` clamped to [0, 100], `needsCollection` as given.
/// `lastUpdated` is refreshed on every successful update.
pub async fn update_bin(
    State(store): State<BinStore>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateBin>, JsonRejection>,
) -> Result<Json<ApiResponse<WasteBin>>, AppError> {
    let Path(id) = id?;
    let Json(update) = payload?;

    let mut bins = store.load().await?;
    let bin = bins
        .iter_mut()
        .find(|bin| bin.id == id)
        .ok_or_else(|| AppError::not_found(BIN_NOT_FOUND))?;

    if let Some(location) = update.location.filter(|value| !value.is_empty()) {
        bin.location = location;
    }
    if let Some(level) = update.fill_level {
        bin.fill_level = level.clamp(0, 100);
    }
    if let Some(flag) = update.needs_collection {
        bin.needs_collection = flag;
    }
    bin.last_updated = current_timestamp();
    let updated = bin.clone();

    store.save(&bins).await?;
    Ok(Json(ApiResponse::with_data("Bin updated", updated)))
}

/// DELETE `/bins/{id}` — remove a bin.
///
/// Absence is detected by comparing collection lengths before and after
/// filtering; nothing is persisted when no record matched.
pub async fn delete_bin(
    State(store): State<BinStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<WasteBin>>, AppError> {
    let Path(id) = id?;
    let mut bins = store.load().await?;
    let before = bins.len();
    bins.retain(|bin| bin.id != id);
    if bins.len() == before {
        return Err(AppError::not_found(BIN_NOT_FOUND));
    }

    store.save(&bins).await?;
    Ok(Json(ApiResponse::message_only("Bin deleted")))
}

/// GET `/` — HTML index of the API surface.
pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

const LANDING_PAGE: &str = r#"<html>
<head><title>Smart Waste Management API</title></head>
<body>
    <h1>Smart Waste Management System API (User Version)</h1>
    <ul>
        <li>GET /bins - List all bins</li>
        <li>POST /bins - Add a bin</li>
        <li>GET /bins/{id} - Get bin by ID</li>
        <li>PUT /bins/{id} - Update bin by ID</li>
        <li>DELETE /bins/{id} - Delete bin by ID</li>
    </ul>
</body>
</html>
"#;
