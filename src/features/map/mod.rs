//! Server-side choropleth presentation over the heatmap data.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/map/view?title=` | Regions with fill colour and tooltip, summary, latest news |
//! | GET | `/api/map/hover?name=&index=&step=` | Tooltip and news cursor for one region |
//! | GET | `/china.json` | GeoJSON outline (placeholder when unavailable) |

pub mod color_scale;
pub mod dtos;
pub mod handlers;
pub mod map_shape;
pub mod news_cursor;
pub mod region_name;
pub mod routes;
pub mod services;
pub mod tooltip;

pub use routes::routes;
pub use services::MapViewService;
