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

//! Response/request header rewriters: `Location`, `Set-Cookie`, and
//! hop-by-hop header stripping.

use axum::http::{HeaderMap, HeaderName};
use url::Url;

use crate::host_config::HostConfig;
use crate::scheme::{compare_host, Origin, Scheme};

/// Headers that never cross a proxy boundary, per standard reverse-proxy
/// semantics.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Removes hop-by-hop headers in place, including any header named by a
/// token in the `Connection` header itself (e.g. `Connection: X-Foo` means
/// `X-Foo` is also hop-by-hop for this hop).
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let connection_tokens: Vec<String> = headers
        .get(axum::http::header::CONNECTION)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.split(',')
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
    for token in connection_tokens {
        if let Ok(name) = HeaderName::from_bytes(token.as_bytes()) {
            headers.remove(name);
        }
    }
}

/// Rewrites a `Location` header value per §4.3: if its origin equals the
/// target origin, replace it with the exposed origin (plus any configured
/// path prefix); otherwise, or if it fails to parse as an absolute URL,
/// return `None` to signal "leave unchanged".
pub fn rewrite_location(value: &str, cfg: &HostConfig, exposed: &Origin) -> Option<String> {
    let parsed = Url::parse(value).ok()?;
    let host = parsed.host_str()?;
    let scheme_matches = Scheme::parse(parsed.scheme()) == Some(cfg.target_scheme);
    if !scheme_matches || !compare_host(host, &cfg.target_host) {
        return None;
    }

    let mut out = exposed.prefix();
    if let Some(prefix) = &cfg.path_prefix {
        out.push_str(prefix);
    }
    out.push_str(parsed.path());
    if let Some(query) = parsed.query() {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = parsed.fragment() {
        out.push('#');
        out.push_str(fragment);
    }
    Some(out)
}

/// Rewrites a single `Set-Cookie` header value per §4.3: retargets a
/// `Domain` attribute matching the target host (or strips it if no
/// `CookieDomain` is configured), and clears `Secure` on an https→http
/// downgrade. Every other attribute, and cookies with no `Domain` at all,
/// pass through verbatim.
pub fn rewrite_set_cookie(raw: &str, cfg: &HostConfig, exposed_scheme: Scheme) -> String {
    let mut segments = raw.split(';');
    let name_value = segments.next().unwrap_or("").trim().to_string();

    let clear_secure = exposed_scheme == Scheme::Http && cfg.target_scheme == Scheme::Https;
    let mut attrs: Vec<String> = Vec::new();

    for segment in segments {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let lower = segment.to_ascii_lowercase();

        if let Some(domain_value) = lower
            .strip_prefix("domain=")
            .map(|_| segment.splitn(2, '=').nth(1).unwrap_or("").trim())
        {
            let candidate = domain_value.trim_start_matches('.');
            if compare_host(candidate, &cfg.target_host) {
                if let Some(new_domain) = &cfg.cookie_domain {
                    attrs.push(format!("Domain={new_domain}"));
                }
                // else: drop the Domain attribute entirely.
            } else {
                attrs.push(segment.to_string());
            }
            continue;
        }

        if lower == "secure" {
            if !clear_secure {
                attrs.push(segment.to_string());
            }
            continue;
        }

        attrs.push(segment.to_string());
    }

    let mut out = name_value;
    for attr in attrs {
        out.push_str("; ");
        out.push_str(&attr);
    }
    out
}
