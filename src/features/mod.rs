pub mod heatmap;
pub mod map;
