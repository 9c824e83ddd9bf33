// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP control surface.
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | `GET` | `/` | | `301` to the project homepage |
//! | `GET` | `/condition` | | `200` with the status JSON |
//! | `PUT` | `/state` | `{"state": bool}` | `204` |
//! | `PUT` | `/speed` | `{"speed": 0..=255}` | `204` |
//! | `PUT` | `/workmode` | `{"workmode": "night"}` | `204`, `422` for an unknown profile |
//!
//! Request bodies reject unknown fields. A failed publish answers `500`.

mod error;
mod handlers;
mod models;

pub use handlers::AppState;
pub use models::{SpeedRequest, StateRequest, WorkmodeRequest};

use axum::Router;
use axum::routing::{get, put};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::protocol::Transport;
use crate::shutdown::Shutdown;

/// Where `GET /` redirects to.
pub const HOMEPAGE: &str = "https://github.com/monoflash/vakio";

/// Builds the router.
pub fn create_router<T: Transport + 'static>(state: AppState<T>) -> Router {
    Router::new()
        .route("/", get(handlers::homepage))
        .route("/condition", get(handlers::condition::<T>))
        .route("/state", put(handlers::put_state::<T>))
        .route("/speed", put(handlers::put_speed::<T>))
        .route("/workmode", put(handlers::put_workmode::<T>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serves `router` on `listener` until `shutdown` fires.
///
/// # Errors
///
/// Returns error if the server fails while accepting connections.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown: Shutdown,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "HTTP server listening");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
}
