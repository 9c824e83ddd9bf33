// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use crate::dispatch::Dispatcher;
use crate::error::Error;
use crate::protocol::Transport;
use crate::state::{DeviceStatus, StatusStore};

use super::HOMEPAGE;
use super::models::{SpeedRequest, StateRequest, WorkmodeRequest};

/// Shared state of the HTTP handlers.
pub struct AppState<T> {
    /// Status read by `/condition`.
    pub store: StatusStore,
    /// Dispatcher used by the `PUT` routes.
    pub dispatcher: Arc<Dispatcher<T>>,
}

impl<T: Transport> AppState<T> {
    /// Creates handler state around a dispatcher sharing `store`.
    pub fn new(store: StatusStore, dispatcher: Arc<Dispatcher<T>>) -> Self {
        Self { store, dispatcher }
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

/// GET /
pub async fn homepage() -> impl IntoResponse {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, HOMEPAGE)])
}

/// GET /condition
pub async fn condition<T>(State(state): State<AppState<T>>) -> Json<DeviceStatus> {
    Json(state.store.snapshot())
}

/// PUT /state
pub async fn put_state<T: Transport>(
    State(state): State<AppState<T>>,
    Json(req): Json<StateRequest>,
) -> Result<StatusCode, Error> {
    state.dispatcher.turn_on_off(req.state).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /speed
pub async fn put_speed<T: Transport>(
    State(state): State<AppState<T>>,
    Json(req): Json<SpeedRequest>,
) -> Result<StatusCode, Error> {
    state.dispatcher.set_speed(req.speed).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /workmode
pub async fn put_workmode<T: Transport>(
    State(state): State<AppState<T>>,
    Json(req): Json<WorkmodeRequest>,
) -> Result<StatusCode, Error> {
    state.dispatcher.set_work_profile(&req.workmode).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    use super::*;
    use crate::protocol::{Published, RecordingTransport, Topic};
    use crate::types::{FanSpeed, PowerState, WorkProfile};
    use crate::web::create_router;

    fn server() -> (TestServer, RecordingTransport, StatusStore) {
        let store = StatusStore::new();
        let transport = RecordingTransport::new();
        let dispatcher = Arc::new(Dispatcher::new(transport.clone(), store.clone()));
        let app = create_router(AppState::new(store.clone(), dispatcher));
        (TestServer::new(app).unwrap(), transport, store)
    }

    #[tokio::test]
    async fn root_redirects_to_homepage() {
        let (server, _, _) = server();
        let response = server.get("/").await;
        response.assert_status(StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.header(header::LOCATION), HOMEPAGE);
    }

    #[tokio::test]
    async fn condition_returns_snapshot() {
        let (server, _, store) = server();
        store.update(|status| {
            status.available = true;
            status.speed = FanSpeed::new(3);
            status.state = PowerState::On;
            status.work = WorkProfile::Night;
        });

        let response = server.get("/condition").await;
        response.assert_status(StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["available"], true);
        assert_eq!(body["speed"], 3);
        assert_eq!(body["state"], "on");
        assert_eq!(body["work"], "night");
        assert_eq!(body["mode"], "");
        assert_eq!(body["command"], "");
        assert_eq!(body["last_activity_at"], "0001-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn put_state_off() {
        let (server, transport, store) = server();
        store.update(|status| status.speed = FanSpeed::new(4));

        let response = server.put("/state").json(&json!({ "state": false })).await;
        response.assert_status(StatusCode::NO_CONTENT);

        let status = store.snapshot();
        assert_eq!(status.state, PowerState::Off);
        assert_eq!(status.speed, FanSpeed::OFF);
        assert_eq!(
            transport.published(),
            vec![Published {
                topic: Topic::State,
                payload: "off".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn put_speed() {
        let (server, transport, store) = server();

        let response = server.put("/speed").json(&json!({ "speed": 6 })).await;
        response.assert_status(StatusCode::NO_CONTENT);

        assert_eq!(store.snapshot().state, PowerState::On);
        assert_eq!(transport.published()[0].payload, "6");
    }

    #[tokio::test]
    async fn put_workmode() {
        let (server, transport, store) = server();

        let response = server
            .put("/workmode")
            .json(&json!({ "workmode": "recuperator" }))
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        assert_eq!(store.snapshot().work, WorkProfile::Recuperator);
        assert_eq!(transport.published()[0].topic, Topic::WorkMode);
    }

    #[tokio::test]
    async fn unknown_workmode_is_unprocessable() {
        let (server, transport, store) = server();
        let before = store.snapshot();

        let response = server
            .put("/workmode")
            .json(&json!({ "workmode": "bogus" }))
            .expect_failure()
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        assert!(transport.published().is_empty());
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn unknown_body_field_is_rejected() {
        let (server, transport, _) = server();

        let response = server
            .put("/speed")
            .json(&json!({ "speed": 2, "boost": true }))
            .expect_failure()
            .await;
        assert!(response.status_code().is_client_error());
        assert!(transport.published().is_empty());
    }

    #[tokio::test]
    async fn publish_failure_is_internal_error() {
        let (server, transport, _) = server();
        transport.set_failing(true);

        let response = server
            .put("/state")
            .json(&json!({ "state": true }))
            .expect_failure()
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
}
