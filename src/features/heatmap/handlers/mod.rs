mod heatmap_handler;

pub use heatmap_handler::*;
