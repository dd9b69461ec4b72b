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

//! The four optional hooks the façade accepts: request/response body
//! middleware, and request/response error hooks. Every hook is nullable —
//! an absent hook behaves as identity (middleware) or as the default action
//! (error hooks) — and every hook must be safe to call from many concurrent
//! request contexts, so all of them are `Arc<dyn Fn(...) + Send + Sync>`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::http::{request, response, StatusCode};
use axum::response::Response;
use bytes::Bytes;

use crate::error::ProxyError;
use crate::host_config::HostConfig;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// What the outbound pipeline hands to request middleware: the rewritten
/// request parts (after Host/scheme/path-prefix rewriting), the resolved
/// `HostConfig`, and the already origin-rewritten body.
pub struct RequestMiddlewareInput {
    pub parts: request::Parts,
    pub config: HostConfig,
    pub body: Bytes,
}

pub struct RequestMiddlewareOutput {
    pub parts: request::Parts,
    pub body: Bytes,
}

pub type RequestMiddleware =
    Arc<dyn Fn(RequestMiddlewareInput) -> BoxFuture<Result<RequestMiddlewareOutput, ProxyError>> + Send + Sync>;

/// What the inbound pipeline hands to response middleware: the
/// header-rewritten response parts, the resolved `HostConfig`, and the
/// already origin-rewritten body.
pub struct ResponseMiddlewareInput {
    pub parts: response::Parts,
    pub config: HostConfig,
    pub body: Bytes,
}

pub struct ResponseMiddlewareOutput {
    pub parts: response::Parts,
    pub body: Bytes,
}

pub type ResponseMiddleware =
    Arc<dyn Fn(ResponseMiddlewareInput) -> BoxFuture<Result<ResponseMiddlewareOutput, ProxyError>> + Send + Sync>;

/// What the request error hook may do with a request-side failure
/// (host-mapper error, config error, request-middleware error): accept the
/// default `502`, pick a different status, or hand back a fully-formed
/// response of its own.
pub enum RequestErrorOutcome {
    Default,
    Status(StatusCode),
    Handled(Response),
}

pub type RequestErrorHook = Arc<dyn Fn(&ProxyError) -> RequestErrorOutcome + Send + Sync>;

/// What the response error hook does with a response-side failure
/// (transport error, response-middleware error): `Propagate` surfaces the
/// (possibly different) error to the client as an error response;
/// `Handled` means the hook has fully absorbed the outcome and its response
/// should be sent as-is — the Rust rendering of the design's "returning nil
/// means the hook already wrote a custom response".
pub enum ResponseErrorOutcome {
    Propagate(ProxyError),
    Handled(Response),
}

pub type ResponseErrorHook = Arc<dyn Fn(ProxyError) -> ResponseErrorOutcome + Send + Sync>;
