//! Deployment heat-map data: provinces, their cities and related news.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/data` | All provinces with cities and up to 5 recent news each |
//! | GET | `/api/province/{id}` | One province with cities and up to 20 recent news |
//! | GET | `/api/news?limit=N` | Latest news across provinces (default 10) |
//! | GET | `/api/debug` | Store diagnostics (not mounted in production) |
//!
//! Every response uses the `{ success, data, message? }` envelope.

pub mod dtos;
pub mod handlers;
pub mod mapper;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use routes::{debug_routes, routes};
pub use services::HeatmapService;
