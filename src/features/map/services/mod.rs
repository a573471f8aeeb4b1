mod map_view_service;

pub use map_view_service::MapViewService;
