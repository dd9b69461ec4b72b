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

//! The host mapper adapter: turns an inbound request into a [`HostConfig`],
//! or surfaces the error through the request error hook.

use async_trait::async_trait;
use axum::http::{HeaderMap, Method, Uri};

use crate::error::ProxyError;
use crate::host_config::HostConfig;

/// The slice of an inbound request a [`HostMapper`] needs to make its
/// decision. Deliberately narrower than a full `axum` request — a mapper is
/// specified as a pure function of method/URI/headers/TLS-state, and giving
/// it exactly that (instead of the whole request) keeps it trivially
/// testable and keeps the core decoupled from any particular body type.
#[derive(Debug, Clone, Copy)]
pub struct RequestInfo<'a> {
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
    pub is_tls: bool,
}

/// Resolves an inbound request to a [`HostConfig`]. Implementations must be
/// safe to call concurrently from many request contexts and must not
/// mutate any state visible across requests.
#[async_trait]
pub trait HostMapper: Send + Sync {
    async fn resolve(&self, req: &RequestInfo<'_>) -> Result<HostConfig, ProxyError>;
}

/// A [`HostMapper`] that always returns the same [`HostConfig`], regardless
/// of the request. Useful for single-upstream deployments and for the
/// demonstration binary; real deployments with per-host routing policy
/// supply their own [`HostMapper`] (backed by configuration, a database, a
/// service registry, …) rather than this one.
#[derive(Debug, Clone)]
pub struct StaticHostMapper(pub HostConfig);

#[async_trait]
impl HostMapper for StaticHostMapper {
    async fn resolve(&self, _req: &RequestInfo<'_>) -> Result<HostConfig, ProxyError> {
        Ok(self.0.clone())
    }
}

/// Adapts the host mapper into the pipeline step described in the design:
/// resolve, then validate the invariants a `HostConfig` must hold before any
/// rewrite runs.
pub async fn resolve_host_config(
    mapper: &dyn HostMapper,
    req: &RequestInfo<'_>,
) -> Result<HostConfig, ProxyError> {
    let cfg = mapper.resolve(req).await?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::Scheme;

    fn cfg() -> HostConfig {
        HostConfig {
            upstream_host: "upstream.internal".into(),
            upstream_scheme: Scheme::Http,
            target_host: "target.internal".into(),
            target_scheme: Scheme::Http,
            path_prefix: None,
            cookie_domain: None,
        }
    }

    #[tokio::test]
    async fn static_mapper_always_resolves_to_same_config() {
        let mapper = StaticHostMapper(cfg());
        let headers = HeaderMap::new();
        let uri: Uri = "/anything".parse().unwrap();
        let info = RequestInfo {
            method: &Method::GET,
            uri: &uri,
            headers: &headers,
            is_tls: false,
        };
        let resolved = resolve_host_config(&mapper, &info).await.unwrap();
        assert_eq!(resolved, cfg());
    }

    struct FailingMapper;

    #[async_trait]
    impl HostMapper for FailingMapper {
        async fn resolve(&self, _req: &RequestInfo<'_>) -> Result<HostConfig, ProxyError> {
            Err(ProxyError::HostMapper(
                "some host mapper error occurred".into(),
            ))
        }
    }

    #[tokio::test]
    async fn mapper_error_propagates_unchanged() {
        let headers = HeaderMap::new();
        let uri: Uri = "/".parse().unwrap();
        let info = RequestInfo {
            method: &Method::GET,
            uri: &uri,
            headers: &headers,
            is_tls: false,
        };
        let err = resolve_host_config(&FailingMapper, &info).await.unwrap_err();
        assert_eq!(err.to_string(), "host mapper error: some host mapper error occurred");
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_after_resolution() {
        let mut bad = cfg();
        bad.upstream_host.clear();
        let mapper = StaticHostMapper(bad);
        let headers = HeaderMap::new();
        let uri: Uri = "/".parse().unwrap();
        let info = RequestInfo {
            method: &Method::GET,
            uri: &uri,
            headers: &headers,
            is_tls: false,
        };
        assert!(resolve_host_config(&mapper, &info).await.is_err());
    }
}
