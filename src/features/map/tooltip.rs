//! HTML tooltip panels shown when hovering a region.

use serde::Serialize;

use crate::features::heatmap::dtos::ProvinceDto;
use crate::shared::constants::{TOOLTIP_MAX_CITIES, TOOLTIP_MAX_CITY_DETAILS};
use crate::shared::templates::{render_template, TemplateError};

const PROVINCE_TEMPLATE: &str = "map/province_tooltip.html";
const MISSING_TEMPLATE: &str = "map/missing_tooltip.html";

#[derive(Serialize)]
struct TooltipContext<'a> {
    name: &'a str,
    value: String,
    count: i64,
    cities: Vec<CityContext<'a>>,
    hidden_cities: usize,
}

#[derive(Serialize)]
struct CityContext<'a> {
    name: &'a str,
    count: i64,
    details: &'a [String],
    hidden_details: usize,
}

/// Tooltip for a region with data, titled with the region's display name
pub fn render_province_tooltip(
    display_name: &str,
    province: &ProvinceDto,
) -> Result<String, TemplateError> {
    let all_cities = province
        .details
        .as_ref()
        .map_or(&[][..], |d| d.cities.as_slice());

    let cities = all_cities
        .iter()
        .take(TOOLTIP_MAX_CITIES)
        .map(|city| {
            let shown = city.details.len().min(TOOLTIP_MAX_CITY_DETAILS);
            CityContext {
                name: &city.name,
                count: city.count,
                details: &city.details[..shown],
                hidden_details: city.details.len() - shown,
            }
        })
        .collect();

    render_template(
        PROVINCE_TEMPLATE,
        TooltipContext {
            name: display_name,
            value: format_number(province.value),
            count: province.count,
            cities,
            hidden_cities: all_cities.len().saturating_sub(TOOLTIP_MAX_CITIES),
        },
    )
}

/// Tooltip for a region the store knows nothing about
pub fn render_missing_tooltip(display_name: &str) -> Result<String, TemplateError> {
    render_template(MISSING_TEMPLATE, minijinja::context! { name => display_name })
}

/// `95` rather than `95.0`; fractional scores keep their digits
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::heatmap::dtos::{CityDto, ProvinceDetailsDto};
    use crate::features::heatmap::mapper::province_summary;
    use crate::shared::test_helpers::province_row;

    fn city(name: &str, details: usize) -> CityDto {
        CityDto {
            name: name.to_string(),
            count: details as i64,
            details: (1..=details).map(|i| format!("{}部署点{}", name, i)).collect(),
            news: None,
        }
    }

    #[test]
    fn test_tooltip_truncates_cities_and_details() {
        let mut province = province_summary(province_row("44", "广东省", 90.0, 37));
        province.details = Some(ProvinceDetailsDto {
            cities: vec![
                city("广州市", 4),
                city("深圳市", 2),
                city("珠海市", 1),
                city("佛山市", 1),
                city("东莞市", 1),
                city("中山市", 1),
                city("惠州市", 1),
            ],
            news: None,
        });

        let html = render_province_tooltip("广东", &province).unwrap();
        assert!(html.contains("广东"));
        assert!(html.contains("相关度:"));
        assert!(html.contains(">90<"));
        assert!(html.contains(">37<"));
        assert!(html.contains("广州市部署点2"));
        assert!(!html.contains("广州市部署点3"));
        assert!(html.contains("还有 2 条部署信息..."));
        assert!(html.contains("东莞市"));
        assert!(!html.contains("中山市"));
        assert!(html.contains("还有 2 个城市..."));
    }

    #[test]
    fn test_tooltip_without_cities() {
        let province = province_summary(province_row("54", "西藏自治区", 30.5, 5));
        let html = render_province_tooltip("西藏自治区", &province).unwrap();
        assert!(html.contains(">30.5<"));
        assert!(!html.contains("城市部署情况"));
    }

    #[test]
    fn test_tooltip_escapes_names() {
        let mut province = province_summary(province_row("44", "广东省", 90.0, 37));
        province.details = Some(ProvinceDetailsDto {
            cities: vec![city("<script>", 0)],
            news: None,
        });
        let html = render_province_tooltip("广东省", &province).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_missing_tooltip() {
        assert_eq!(render_missing_tooltip("南海诸岛").unwrap(), "南海诸岛<br/>暂无数据");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(95.0), "95");
        assert_eq!(format_number(72.25), "72.25");
        assert_eq!(format_number(-1.0), "-1");
    }
}
