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

//! The proxy façade (§4.6): wires a [`HostMapper`], a [`Transport`], and the
//! four optional hooks into a single `serve(request) -> response` entry
//! point. Construction is builder-style so options may be supplied in any
//! order, matching §9's design note.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use url::Url;

use crate::body::rewrite_body;
use crate::error::ProxyError;
use crate::headers::strip_hop_by_hop;
use crate::host_mapper::{resolve_host_config, HostMapper, RequestInfo};
use crate::middleware::{
    RequestErrorHook, RequestErrorOutcome, RequestMiddleware, RequestMiddlewareInput,
    ResponseErrorHook, ResponseErrorOutcome, ResponseMiddleware, ResponseMiddlewareInput,
};
use crate::pipeline::{build_upstream_uri, exposed_body_prefix, rewrite_response_headers};
use crate::scheme::{exposed_host, exposed_scheme, Origin};
use crate::transport::{ReqwestTransport, Transport};

/// Marker inserted into request extensions by whatever terminates TLS in
/// front of this proxy. Its absence means "not TLS", i.e. plain `http`.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionIsTls(pub bool);

/// The rewriting reverse proxy façade. Build one with [`Proxy::builder`]
/// and call [`Proxy::serve`] for each inbound request — it is itself a
/// standard request handler, safe to share (via `Arc` or `Clone`d state)
/// across every connection the surrounding server accepts.
pub struct Proxy {
    host_mapper: Arc<dyn HostMapper>,
    transport: Arc<dyn Transport>,
    request_middleware: Option<RequestMiddleware>,
    response_middleware: Option<ResponseMiddleware>,
    on_request_error: Option<RequestErrorHook>,
    on_response_error: Option<ResponseErrorHook>,
    max_body_bytes: usize,
}

impl Proxy {
    pub fn builder(host_mapper: impl HostMapper + 'static) -> ProxyBuilder {
        ProxyBuilder::new(host_mapper)
    }

    /// Runs the full outbound/inbound pipeline from §4.5 for one request.
    pub async fn serve(&self, req: Request) -> Response {
        let is_tls = req
            .extensions()
            .get::<ConnectionIsTls>()
            .map(|marker| marker.0)
            .unwrap_or(false);
        let (mut parts, body) = req.into_parts();

        let cfg = {
            let info = RequestInfo {
                method: &parts.method,
                uri: &parts.uri,
                headers: &parts.headers,
                is_tls,
            };
            match resolve_host_config(self.host_mapper.as_ref(), &info).await {
                Ok(cfg) => cfg,
                Err(err) => return self.request_error_response(err),
            }
        };

        let exposed = Origin::new(
            exposed_scheme(&parts.headers, is_tls),
            exposed_host(&parts.headers).unwrap_or_else(|| cfg.target_host.clone()),
        );

        let body_bytes = match axum::body::to_bytes(body, self.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(_) => return self.request_error_response(ProxyError::BodyTooLarge),
        };

        let upstream_uri = match build_upstream_uri(&parts.uri, &cfg) {
            Ok(uri) => uri,
            Err(err) => return self.request_error_response(err),
        };
        parts.uri = upstream_uri;

        match HeaderValue::from_str(&cfg.target_host) {
            Ok(value) => {
                parts.headers.insert(axum::http::header::HOST, value);
            }
            Err(_) => {
                return self.request_error_response(ProxyError::Config(
                    "target host is not a valid header value".into(),
                ));
            }
        }
        parts.headers.remove(axum::http::header::CONTENT_LENGTH);
        strip_hop_by_hop(&mut parts.headers);

        let exposed_prefix = exposed_body_prefix(&exposed, &cfg);
        let target_prefix = Origin::new(cfg.target_scheme, cfg.target_host.clone()).prefix();
        let rewritten_body = rewrite_body(&body_bytes, &exposed_prefix, &target_prefix);

        let (parts, outbound_body) = if let Some(mw) = &self.request_middleware {
            let input = RequestMiddlewareInput {
                parts,
                config: cfg.clone(),
                body: rewritten_body,
            };
            match mw(input).await {
                Ok(output) => (output.parts, output.body),
                Err(err) => return self.request_error_response(err),
            }
        } else {
            (parts, rewritten_body)
        };

        let upstream_request = match build_reqwest_request(&parts, outbound_body) {
            Ok(req) => req,
            Err(err) => return self.request_error_response(err),
        };

        let upstream_response = match self.transport.send(upstream_request).await {
            Ok(resp) => resp,
            Err(e) => return self.response_error_response(ProxyError::Transport(e.to_string())),
        };

        let status = upstream_response.status();
        let version = upstream_response.version();
        let mut resp_builder = axum::http::Response::builder().status(status).version(version);
        for (name, value) in upstream_response.headers().iter() {
            resp_builder = resp_builder.header(name.clone(), value.clone());
        }
        let response_skeleton = match resp_builder.body(()) {
            Ok(r) => r,
            Err(e) => {
                return self.response_error_response(ProxyError::Transport(format!(
                    "malformed upstream response headers: {e}"
                )));
            }
        };
        let (mut resp_parts, ()) = response_skeleton.into_parts();

        let response_body_bytes = match upstream_response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return self.response_error_response(ProxyError::Transport(e.to_string())),
        };

        rewrite_response_headers(&mut resp_parts.headers, resp_parts.status, &cfg, &exposed);
        let rewritten_response_body =
            rewrite_body(&response_body_bytes, &target_prefix, &exposed_prefix);

        let (mut resp_parts, final_body) = if let Some(mw) = &self.response_middleware {
            let input = ResponseMiddlewareInput {
                parts: resp_parts,
                config: cfg,
                body: rewritten_response_body,
            };
            match mw(input).await {
                Ok(output) => (output.parts, output.body),
                Err(err) => return self.response_error_response(err),
            }
        } else {
            (resp_parts, rewritten_response_body)
        };

        if let Ok(len) = HeaderValue::from_str(&final_body.len().to_string()) {
            resp_parts.headers.insert(axum::http::header::CONTENT_LENGTH, len);
        }

        Response::from_parts(resp_parts, Body::from(final_body))
    }

    fn request_error_response(&self, err: ProxyError) -> Response {
        tracing::warn!(error = %err, "request-side error");
        match &self.on_request_error {
            Some(hook) => match hook(&err) {
                RequestErrorOutcome::Default => err.into_response(),
                RequestErrorOutcome::Status(status) => (status, err.to_string()).into_response(),
                RequestErrorOutcome::Handled(resp) => resp,
            },
            None => err.into_response(),
        }
    }

    fn response_error_response(&self, err: ProxyError) -> Response {
        tracing::warn!(error = %err, "response-side error");
        match &self.on_response_error {
            Some(hook) => match hook(err) {
                ResponseErrorOutcome::Propagate(err) => err.into_response(),
                ResponseErrorOutcome::Handled(resp) => resp,
            },
            None => err.into_response(),
        }
    }
}

fn build_reqwest_request(
    parts: &axum::http::request::Parts,
    body: Bytes,
) -> Result<reqwest::Request, ProxyError> {
    let url = Url::parse(&parts.uri.to_string())
        .map_err(|e| ProxyError::Config(format!("invalid upstream url: {e}")))?;
    let mut request = reqwest::Request::new(parts.method.clone(), url);
    *request.headers_mut() = parts.headers.clone();
    *request.body_mut() = Some(reqwest::Body::from(body));
    Ok(request)
}

/// Chainable constructor for [`Proxy`]. Every option may be set in any
/// order; an unset option degrades to its documented default/identity
/// behavior.
pub struct ProxyBuilder {
    host_mapper: Arc<dyn HostMapper>,
    transport: Option<Arc<dyn Transport>>,
    request_middleware: Option<RequestMiddleware>,
    response_middleware: Option<ResponseMiddleware>,
    on_request_error: Option<RequestErrorHook>,
    on_response_error: Option<ResponseErrorHook>,
    max_body_bytes: usize,
}

impl ProxyBuilder {
    pub fn new(host_mapper: impl HostMapper + 'static) -> Self {
        Self {
            host_mapper: Arc::new(host_mapper),
            transport: None,
            request_middleware: None,
            response_middleware: None,
            on_request_error: None,
            on_response_error: None,
            max_body_bytes: usize::MAX,
        }
    }

    /// Overrides the default (`reqwest`, no redirect-following) transport.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn request_middleware(mut self, middleware: RequestMiddleware) -> Self {
        self.request_middleware = Some(middleware);
        self
    }

    pub fn response_middleware(mut self, middleware: ResponseMiddleware) -> Self {
        self.response_middleware = Some(middleware);
        self
    }

    pub fn on_request_error(mut self, hook: RequestErrorHook) -> Self {
        self.on_request_error = Some(hook);
        self
    }

    pub fn on_response_error(mut self, hook: ResponseErrorHook) -> Self {
        self.on_response_error = Some(hook);
        self
    }

    /// Caps buffered request/response bodies. Defaults to effectively
    /// unlimited — the design leaves this policy to the façade's caller.
    pub fn max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }

    pub fn build(self) -> Proxy {
        Proxy {
            host_mapper: self.host_mapper,
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(ReqwestTransport::default())),
            request_middleware: self.request_middleware,
            response_middleware: self.response_middleware,
            on_request_error: self.on_request_error,
            on_response_error: self.on_response_error,
            max_body_bytes: self.max_body_bytes,
        }
    }
}
