mod heatmap_service;

pub use heatmap_service::HeatmapService;
