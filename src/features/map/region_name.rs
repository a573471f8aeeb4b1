//! Reconciles region names between the map shape and the store.
//!
//! Shapes and the store do not always agree on the administrative suffix
//! ("广东" vs "广东省"), so matching falls back to the suffix-less form.

use lazy_static::lazy_static;
use regex::Regex;

use crate::features::heatmap::dtos::ProvinceDto;

lazy_static! {
    /// One trailing administrative suffix
    /// - "广东省" -> "广东", "北京市" -> "北京", "香港特别行政区" -> "香港"
    static ref ADMIN_SUFFIX_REGEX: Regex = Regex::new(r"(省|市|自治区|特别行政区)$").unwrap();
}

/// Strip one trailing administrative suffix
pub fn normalize(name: &str) -> &str {
    match ADMIN_SUFFIX_REGEX.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

pub fn names_match(a: &str, b: &str) -> bool {
    a == b || normalize(a) == normalize(b)
}

/// Exact match first, then suffix-tolerant
pub fn find_province<'a>(provinces: &'a [ProvinceDto], name: &str) -> Option<&'a ProvinceDto> {
    provinces
        .iter()
        .find(|p| p.name == name)
        .or_else(|| {
            let wanted = normalize(name);
            provinces.iter().find(|p| normalize(&p.name) == wanted)
        })
}

/// Shape name a province is drawn under, falling back to its own name
pub fn shape_name_for<'a>(shape_names: &'a [String], province_name: &'a str) -> &'a str {
    shape_names
        .iter()
        .find(|n| n.as_str() == province_name)
        .or_else(|| shape_names.iter().find(|n| names_match(n, province_name)))
        .map_or(province_name, String::as_str)
}
