// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - API access layer.

pub mod api;
pub mod catalog;
pub mod client;
pub mod transport;

pub use api::{DisplayCaseApi, RegisterRequest};
pub use catalog::{GameEntryFilter, GameQuery, ReviewFilter};
pub use client::AuthenticatedClient;
pub use transport::{
    ApiRequest, ApiResponse, FilePart, HttpTransport, RequestBody, RequestOptions, TracedTransport,
    Transport,
};
