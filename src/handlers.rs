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

use axum::extract::{Request, State};
use axum::response::Response;

use crate::state::AppState;

/// The only handler this binary needs: every route hands its request
/// straight to the proxy façade.
pub async fn proxy_handler(State(state): State<AppState>, req: Request) -> Response {
    state.proxy.serve(req).await
}
