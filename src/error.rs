/*
 * Copyright (C) 2025 Jakub Žitník
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 */

//! The error taxonomy from the design's error handling section, collapsed
//! into a single typed enum so the façade has exactly one thing to convert
//! into an HTTP response when no hook has absorbed it.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The `HostMapper` returned an error for this request.
    #[error("host mapper error: {0}")]
    HostMapper(String),

    /// A resolved `HostConfig` failed the invariants in the data model.
    #[error("invalid host config: {0}")]
    Config(String),

    /// The request middleware hook returned an error.
    #[error("request middleware error: {0}")]
    RequestMiddleware(String),

    /// The upstream transport failed to complete the request.
    #[error("upstream transport error: {0}")]
    Transport(String),

    /// The response middleware hook returned an error.
    #[error("response middleware error: {0}")]
    ResponseMiddleware(String),

    /// The request body exceeded the configured size limit.
    #[error("request body too large")]
    BodyTooLarge,
}

impl ProxyError {
    /// The status code this error maps to when no hook overrides it.
    /// Every row of the taxonomy defaults to 502 except an oversized body,
    /// which is a client-side problem.
    pub fn default_status(&self) -> StatusCode {
        match self {
            ProxyError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.default_status();
        (status, self.to_string()).into_response()
    }
}
