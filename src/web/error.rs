// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mapping of crate errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::Error;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::Value(ref e) => {
                tracing::debug!(error = %e, "Rejected control request");
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ref e => {
                tracing::error!(error = %e, "Control request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProtocolError, ValueError};

    #[test]
    fn value_errors_are_unprocessable() {
        let response = Error::from(ValueError::InvalidWorkProfile("x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn other_errors_are_internal() {
        let response = Error::from(ProtocolError::QueueFull).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
