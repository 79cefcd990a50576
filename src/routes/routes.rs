//! Defines routes for the waste bin tracking API.
//!
//! ## Structure
//! - **Collection endpoints**
//!   - `GET    /bins` — list all bins
//!   - `POST   /bins` — register a new bin
//!
//! - **Single-bin endpoints**
//!   - `GET    /bins/{id}` — fetch one bin
//!   - `PUT    /bins/{id}` — partially update a bin
//!   - `DELETE /bins/{id}` — remove a bin
//!
//! The root path serves a small HTML index of the API.

use crate::{
    handlers::{
        bin_handlers::{create_bin, delete_bin, get_bin, landing_page, list_bins, update_bin},
        health_handlers::{healthz, readyz},
    },
    services::bin_store::BinStore,
};
use axum::{Router, routing::get};

/// Build and return the router for all bin tracking routes.
///
/// The router carries shared state (`BinStore`) to all handlers.
pub fn routes() -> Router<BinStore> {
    Router::new()
        // landing page + health endpoints (mounted at root)
        .route("/", get(landing_page))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Collection routes
        .route("/bins", get(list_bins).post(create_bin))
        // Single-bin routes
        .route(
            "/bins/{id}",
            get(get_bin).put(update_bin).delete(delete_bin),
        )
}
