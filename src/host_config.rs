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

//! `HostConfig`: the per-request contract a `HostMapper` hands back to the
//! pipeline — where to send bytes, what identity to rewrite out of them, and
//! the cookie-domain policy to apply while doing so.

use crate::error::ProxyError;
use crate::scheme::Scheme;

/// Resolved per-request routing and rewrite policy, as produced by a
/// [`crate::host_mapper::HostMapper`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Where the proxy physically connects.
    pub upstream_host: String,
    pub upstream_scheme: Scheme,

    /// The identity the upstream believes it has — what shows up in its own
    /// bodies, `Location` headers and `Set-Cookie` domains.
    pub target_host: String,
    pub target_scheme: Scheme,

    /// Path segment visible to the client but not to the upstream. Must
    /// start with `/` and must not end with `/` (see [`HostConfig::validate`]).
    pub path_prefix: Option<String>,

    /// Replacement `Domain` attribute for cookies whose domain matches the
    /// target host. `None` means: strip the `Domain` attribute entirely.
    pub cookie_domain: Option<String>,
}

impl HostConfig {
    /// Checks the data-model invariants that must hold before any rewrite
    /// is attempted. A `HostConfig` that fails this is a fatal configuration
    /// error for the current request, not a retryable condition.
    pub fn validate(&self) -> Result<(), ProxyError> {
        if self.upstream_host.trim().is_empty() {
            return Err(ProxyError::Config("upstream host is empty".into()));
        }
        if self.target_host.trim().is_empty() {
            return Err(ProxyError::Config("target host is empty".into()));
        }
        if let Some(prefix) = &self.path_prefix {
            if !prefix.starts_with('/') {
                return Err(ProxyError::Config(format!(
                    "path prefix {prefix:?} must start with '/'"
                )));
            }
            if prefix.len() > 1 && prefix.ends_with('/') {
                return Err(ProxyError::Config(format!(
                    "path prefix {prefix:?} must not end with '/'"
                )));
            }
        }
        Ok(())
    }
}
