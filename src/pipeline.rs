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

//! The Director (outbound request rewrite) and Modifier (inbound response
//! rewrite) halves of the pipeline described in §4.5. These are pure
//! transformations over `http::Parts`/`HeaderMap`; the orchestration that
//! calls them in the right order, buffers bodies, and invokes hooks lives
//! in [`crate::proxy`].

use axum::http::{HeaderValue, Uri};

use crate::error::ProxyError;
use crate::headers::{rewrite_location, rewrite_set_cookie, strip_hop_by_hop};
use crate::host_config::HostConfig;
use crate::scheme::Origin;

/// Strips a configured path prefix from a request path. Leaves the path
/// untouched if it doesn't actually start with the prefix (a defensive
/// fallback — the host mapper adapter validates the prefix shape, not that
/// every incoming request carries it).
pub fn strip_path_prefix(path: &str, prefix: Option<&str>) -> String {
    let Some(prefix) = prefix else {
        return path.to_string();
    };
    match path.strip_prefix(prefix) {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path.to_string(),
    }
}

/// Builds the upstream-facing URI: upstream scheme/host, with the path
/// prefix stripped and the query string preserved.
pub fn build_upstream_uri(original: &Uri, cfg: &HostConfig) -> Result<Uri, ProxyError> {
    let stripped_path = strip_path_prefix(original.path(), cfg.path_prefix.as_deref());
    let path_and_query = match original.query() {
        Some(query) => format!("{stripped_path}?{query}"),
        None => stripped_path,
    };

    Uri::builder()
        .scheme(cfg.upstream_scheme.as_str())
        .authority(cfg.upstream_host.as_str())
        .path_and_query(path_and_query)
        .build()
        .map_err(|e| ProxyError::Config(format!("failed to build upstream URI: {e}")))
}

/// The exposed-side origin prefix used for body substitution: the exposed
/// origin plus the configured path prefix, if any (§4.2).
pub fn exposed_body_prefix(exposed: &Origin, cfg: &HostConfig) -> String {
    let mut prefix = exposed.prefix();
    if let Some(path_prefix) = &cfg.path_prefix {
        prefix.push_str(path_prefix);
    }
    prefix
}

/// Rewrites `Location` and `Set-Cookie` response headers in place, then
/// strips hop-by-hop headers. Order matches §4.5: headers before body.
///
/// `Location` is only ever rewritten on a 3xx response — per §4.3 a
/// `Location` header on any other status is not this proxy's redirect to
/// rewrite, even if it happens to name the target origin.
pub fn rewrite_response_headers(
    headers: &mut axum::http::HeaderMap,
    status: axum::http::StatusCode,
    cfg: &HostConfig,
    exposed: &Origin,
) {
    if status.is_redirection() {
        if let Some(rewritten) = headers
            .get(axum::http::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| rewrite_location(v, cfg, exposed))
            .and_then(|v| HeaderValue::from_str(&v).ok())
        {
            headers.insert(axum::http::header::LOCATION, rewritten);
        }
    }

    let rewritten_cookies: Vec<HeaderValue> = headers
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|v| rewrite_set_cookie(v, cfg, exposed.scheme))
        .filter_map(|v| HeaderValue::from_str(&v).ok())
        .collect();

    if !rewritten_cookies.is_empty() {
        headers.remove(axum::http::header::SET_COOKIE);
        for value in rewritten_cookies {
            headers.append(axum::http::header::SET_COOKIE, value);
        }
    }

    strip_hop_by_hop(headers);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::Scheme;

    fn cfg() -> HostConfig {
        HostConfig {
            upstream_host: "10.0.0.5:9000".into(),
            upstream_scheme: Scheme::Http,
            target_host: "target.internal".into(),
            target_scheme: Scheme::Https,
            path_prefix: Some("/foo".into()),
            cookie_domain: Some("cookie.love".into()),
        }
    }

    #[test]
    fn strip_path_prefix_handles_exact_match() {
        assert_eq!(strip_path_prefix("/foo", Some("/foo")), "/");
    }

    #[test]
    fn strip_path_prefix_handles_nested_path() {
        assert_eq!(strip_path_prefix("/foo/bar", Some("/foo")), "/bar");
    }

    #[test]
    fn strip_path_prefix_leaves_non_matching_path_alone() {
        assert_eq!(strip_path_prefix("/foobar", Some("/foo")), "/foobar");
    }

    #[test]
    fn strip_path_prefix_noop_without_prefix() {
        assert_eq!(strip_path_prefix("/foo/bar", None), "/foo/bar");
    }

    #[test]
    fn build_upstream_uri_strips_prefix_and_preserves_query() {
        let original: Uri = "/foo/bar?x=1".parse().unwrap();
        let uri = build_upstream_uri(&original, &cfg()).unwrap();
        assert_eq!(uri.scheme_str(), Some("http"));
        assert_eq!(uri.authority().unwrap().as_str(), "10.0.0.5:9000");
        assert_eq!(uri.path(), "/bar");
        assert_eq!(uri.query(), Some("x=1"));
    }

    #[test]
    fn exposed_body_prefix_includes_path_prefix() {
        let exposed = Origin::new(Scheme::Https, "example.com");
        assert_eq!(exposed_body_prefix(&exposed, &cfg()), "https://example.com/foo");
    }

    #[test]
    fn rewrite_response_headers_rewrites_location_and_cookie_and_strips_hop_by_hop() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            axum::http::header::LOCATION,
            "https://target.internal/baz".parse().unwrap(),
        );
        headers.insert(
            axum::http::header::SET_COOKIE,
            "auth=abc; Domain=target.internal; Secure".parse().unwrap(),
        );
        headers.insert(axum::http::header::CONNECTION, "keep-alive".parse().unwrap());

        let exposed = Origin::new(Scheme::Http, "example.com");
        rewrite_response_headers(&mut headers, axum::http::StatusCode::FOUND, &cfg(), &exposed);

        assert_eq!(
            headers.get(axum::http::header::LOCATION).unwrap(),
            "http://example.com/foo/baz"
        );
        let cookie = headers.get(axum::http::header::SET_COOKIE).unwrap().to_str().unwrap();
        assert_eq!(cookie, "auth=abc; Domain=cookie.love");
        assert!(headers.get(axum::http::header::CONNECTION).is_none());
    }

    #[test]
    fn rewrite_response_headers_leaves_location_alone_on_non_redirect_status() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            axum::http::header::LOCATION,
            "https://target.internal/baz".parse().unwrap(),
        );

        let exposed = Origin::new(Scheme::Http, "example.com");
        rewrite_response_headers(&mut headers, axum::http::StatusCode::CREATED, &cfg(), &exposed);

        assert_eq!(
            headers.get(axum::http::header::LOCATION).unwrap(),
            "https://target.internal/baz"
        );
    }
}
