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

//! Environment-driven configuration for the demonstration binary. A
//! deployment with per-request routing policy would supply its own
//! `HostMapper` instead of reading a single [`HostConfig`] from the
//! environment the way this binary does.

use std::env;

use triorigin_proxy::{HostConfig, Scheme};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The port to listen on.
    pub port: u16,
    /// The single host configuration this binary always proxies to.
    pub host_config: HostConfig,
    /// Cap on buffered request/response bodies.
    pub max_body_bytes: usize,
}

fn parse_scheme(var: &str, default: Scheme) -> Scheme {
    env::var(var)
        .ok()
        .and_then(|v| Scheme::parse(&v))
        .unwrap_or(default)
}

impl AppConfig {
    /// # Environment Variables
    /// * `PORT` - Port to listen on (default: 3000).
    /// * `UPSTREAM_HOST` - host (optionally `host:port`) this proxy physically connects to. Required.
    /// * `UPSTREAM_SCHEME` - `http` or `https` (default: `https`).
    /// * `TARGET_HOST` - the identity the upstream believes it has (default: `UPSTREAM_HOST`).
    /// * `TARGET_SCHEME` - `http` or `https` (default: `UPSTREAM_SCHEME`).
    /// * `PATH_PREFIX` - path segment visible to clients but stripped before forwarding upstream (optional).
    /// * `COOKIE_DOMAIN` - replacement `Domain` for cookies scoped to the target host (optional; unset strips `Domain` entirely).
    /// * `MAX_BODY_BYTES` - cap on buffered request/response bodies (default: unlimited).
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let upstream_host = env::var("UPSTREAM_HOST").expect("UPSTREAM_HOST must be set");
        let upstream_scheme = parse_scheme("UPSTREAM_SCHEME", Scheme::Https);
        let target_host = env::var("TARGET_HOST").unwrap_or_else(|_| upstream_host.clone());
        let target_scheme = env::var("TARGET_SCHEME")
            .ok()
            .and_then(|v| Scheme::parse(&v))
            .unwrap_or(upstream_scheme);
        let path_prefix = env::var("PATH_PREFIX").ok().filter(|v| !v.is_empty());
        let cookie_domain = env::var("COOKIE_DOMAIN").ok().filter(|v| !v.is_empty());
        let max_body_bytes = env::var("MAX_BODY_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(usize::MAX);

        let host_config = HostConfig {
            upstream_host,
            upstream_scheme,
            target_host,
            target_scheme,
            path_prefix,
            cookie_domain,
        };
        host_config
            .validate()
            .expect("invalid host configuration");

        Self {
            port,
            host_config,
            max_body_bytes,
        }
    }
}
