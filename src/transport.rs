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

//! The pluggable HTTP transport used for upstream calls. The core proxy
//! logic never talks to a socket directly — it asks a [`Transport`] to run
//! one request and hand back one response, same as the design's
//! "round-tripper abstraction" in §6.

use async_trait::async_trait;

/// Executes a single upstream request. Implementations are shared across
/// requests and must be concurrency-safe.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, reqwest::Error>;
}

/// The system-default transport: a plain `reqwest::Client` with redirect
/// following disabled, since 3xx responses are this proxy's job to rewrite
/// and forward, not to chase transparently.
pub struct ReqwestTransport(pub reqwest::Client);

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self(client)
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build default reqwest transport");
        Self(client)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, reqwest::Error> {
        self.0.execute(request).await
    }
}
