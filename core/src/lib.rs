//! Synchronous API client for the product service.
//!
//! # Overview
//! `ProductClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern).
//! `ProductService` pairs it with an injected `HttpTransport` and exposes the
//! blocking CRUD calls: list (optionally filtered by type), get, create,
//! update and delete.
//!
//! # Design
//! - `ProductClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - Status handling is a direct mapping: 404 is `ApiError::NotFound`, any
//!   other unaccepted status is `ApiError::HttpError`. Nothing is retried.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod types;

pub use client::ProductClient;
pub use config::ServerAddress;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, UreqTransport};
pub use service::ProductService;
pub use types::{Product, ProductId, ProductType};
