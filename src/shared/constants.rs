/// News items kept per province in the "all provinces" view
pub const ALL_PROVINCES_NEWS_WINDOW: usize = 5;

/// News items kept in the single-province view
pub const PROVINCE_DETAIL_NEWS_WINDOW: usize = 20;

/// Default `limit` for the latest-news endpoint
pub const DEFAULT_NEWS_LIMIT: i64 = 10;

// =============================================================================
// MAP PANEL LIMITS
// =============================================================================

/// Cities listed in a province tooltip
pub const TOOLTIP_MAX_CITIES: usize = 5;

/// Deployment detail lines listed per city in a tooltip
pub const TOOLTIP_MAX_CITY_DETAILS: usize = 2;

/// Provinces in the "hot provinces" ranking
pub const HOT_PROVINCES_LIMIT: usize = 5;

/// Latest news shown next to the map
pub const MAP_LATEST_NEWS_LIMIT: i64 = 5;
