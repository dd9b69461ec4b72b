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

//! URL and host utilities: origin parsing, port stripping, host comparison.

use std::fmt;

use axum::http::HeaderMap;

/// A request scheme as far as this proxy cares: `http` or `https`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    /// Parses a scheme token case-insensitively. Returns `None` for anything
    /// other than `http`/`https` — this proxy never speaks anything else.
    pub fn parse(s: &str) -> Option<Scheme> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Some(Scheme::Http),
            "https" => Some(Scheme::Https),
            _ => None,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(scheme, host)` pair: one vertex of the exposed/upstream/target triangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub scheme: Scheme,
    pub host: String,
}

impl Origin {
    pub fn new(scheme: Scheme, host: impl Into<String>) -> Self {
        Self {
            scheme,
            host: host.into(),
        }
    }

    /// Renders `scheme://host`, with no trailing slash or path.
    pub fn prefix(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)
    }
}

/// Strips a trailing `:port` from a host, leaving bracketed IPv6 literals
/// (`[::1]`) and plain hostnames without a port untouched.
pub fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }

    match host.rsplit_once(':') {
        Some((h, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => h,
        _ => host,
    }
}

/// Case-insensitive host comparison, ignoring any `:port` suffix on either side.
pub fn compare_host(a: &str, b: &str) -> bool {
    strip_port(a).eq_ignore_ascii_case(strip_port(b))
}

/// The exposed host as the client addressed the proxy: `X-Forwarded-Host`
/// when present, otherwise the request's own `Host` header.
pub fn exposed_host(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-host")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .or_else(|| headers.get(axum::http::header::HOST).and_then(|v| v.to_str().ok()))
        .map(str::to_owned)
}

/// The exposed scheme: `X-Forwarded-Proto` overrides whatever the
/// connection's own TLS state would otherwise imply.
pub fn exposed_scheme(headers: &HeaderMap, is_tls: bool) -> Scheme {
    if let Some(proto) = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(Scheme::parse)
    {
        return proto;
    }
    if is_tls {
        Scheme::Https
    } else {
        Scheme::Http
    }
}
