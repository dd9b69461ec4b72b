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

//! A rewriting reverse HTTP proxy: it forwards requests to an upstream
//! while rewriting every occurrence of the *target* origin it finds in
//! bodies, `Location`, and `Set-Cookie` headers back to the origin the
//! client actually connected to. See [`proxy::Proxy`] for the entry point.

pub mod body;
pub mod error;
pub mod headers;
pub mod host_config;
pub mod host_mapper;
pub mod middleware;
pub mod pipeline;
pub mod proxy;
pub mod scheme;
pub mod transport;

pub use error::ProxyError;
pub use host_config::HostConfig;
pub use host_mapper::{HostMapper, RequestInfo, StaticHostMapper};
pub use middleware::{
    RequestErrorHook, RequestErrorOutcome, RequestMiddleware, RequestMiddlewareInput,
    RequestMiddlewareOutput, ResponseErrorHook, ResponseErrorOutcome, ResponseMiddleware,
    ResponseMiddlewareInput, ResponseMiddlewareOutput,
};
pub use proxy::{ConnectionIsTls, Proxy, ProxyBuilder};
pub use scheme::{Origin, Scheme};
pub use transport::{ReqwestTransport, Transport};
