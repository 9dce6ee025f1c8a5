//! National Weather Service records and their text rendering.
//!
//! Only the fields the tools print are modelled. Everything is optional so
//! that a sparse payload still decodes; missing values are rendered as
//! placeholders and every line is always printed.

use serde::Deserialize;

const UNKNOWN: &str = "Unknown";

/// `GET /alerts?area=XX`
#[derive(Debug, Default, Deserialize)]
pub struct AlertsResponse {
    #[serde(default)]
    pub features: Vec<AlertFeature>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertFeature {
    #[serde(default)]
    pub properties: AlertProperties,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertProperties {
    pub event: Option<String>,
    pub area_desc: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub headline: Option<String>,
}

/// `GET /points/{lat},{lon}`
#[derive(Debug, Default, Deserialize)]
pub struct PointsResponse {
    pub properties: Option<PointsProperties>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PointsProperties {
    pub forecast: Option<String>,
}

/// `GET {forecast url}`
#[derive(Debug, Default, Deserialize)]
pub struct ForecastResponse {
    pub properties: Option<ForecastProperties>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastProperties {
    #[serde(default)]
    pub periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub name: Option<String>,
    pub temperature: Option<f64>,
    pub temperature_unit: Option<String>,
    pub wind_speed: Option<String>,
    pub wind_direction: Option<String>,
    pub short_forecast: Option<String>,
}

/// Present, non-empty value or the placeholder.
fn or<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(placeholder)
}

pub fn format_alert(alert: &AlertProperties) -> String {
    [
        format!("Event: {}", or(&alert.event, UNKNOWN)),
        format!("Area: {}", or(&alert.area_desc, UNKNOWN)),
        format!("Severity: {}", or(&alert.severity, UNKNOWN)),
        format!("Status: {}", or(&alert.status, UNKNOWN)),
        format!("Headline: {}", or(&alert.headline, "No headline")),
        "---".to_string(),
    ]
    .join("\n")
}

pub fn format_period(period: &ForecastPeriod) -> String {
    let temperature = period
        .temperature
        .map(|t| t.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());

    [
        format!("{}:", or(&period.name, UNKNOWN)),
        format!(
            "Temperature: {}°{}",
            temperature,
            or(&period.temperature_unit, "F")
        ),
        format!(
            "Wind: {} {}",
            or(&period.wind_speed, UNKNOWN),
            or(&period.wind_direction, "")
        ),
        or(&period.short_forecast, "No forecast available").to_string(),
        "---".to_string(),
    ]
    .join("\n")
}

/// Header line, blank line, then the blocks one after another.
pub fn format_report<T>(header: &str, records: &[T], format: fn(&T) -> String) -> String {
    let blocks: Vec<String> = records.iter().map(format).collect();
    format!("{}:\n\n{}", header, blocks.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tornado_warning() -> AlertProperties {
        AlertProperties {
            event: Some("Tornado Warning".to_string()),
            area_desc: Some("Travis County".to_string()),
            severity: Some("Extreme".to_string()),
            status: Some("Actual".to_string()),
            headline: Some("Tornado Warning issued for Travis County".to_string()),
        }
    }

    #[test]
    fn alert_lines_are_in_fixed_order() {
        assert_eq!(
            format_alert(&tornado_warning()),
            "Event: Tornado Warning\n\
             Area: Travis County\n\
             Severity: Extreme\n\
             Status: Actual\n\
             Headline: Tornado Warning issued for Travis County\n\
             ---"
        );
    }

    #[test]
    fn formatting_is_repeatable() {
        let alert = tornado_warning();
        assert_eq!(format_alert(&alert), format_alert(&alert));
    }

    #[test]
    fn missing_alert_fields_render_placeholders() {
        let text = format_alert(&AlertProperties {
            severity: None,
            headline: Some(String::new()),
            ..tornado_warning()
        });
        assert!(text.contains("Severity: Unknown"));
        assert!(text.contains("Headline: No headline"));
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn empty_alert_is_all_placeholders() {
        let text = format_alert(&AlertProperties::default());
        assert_eq!(
            text,
            "Event: Unknown\nArea: Unknown\nSeverity: Unknown\nStatus: Unknown\nHeadline: No headline\n---"
        );
    }

    #[test]
    fn period_renders_all_lines() {
        let period = ForecastPeriod {
            name: Some("Tonight".to_string()),
            temperature: Some(54.0),
            temperature_unit: Some("F".to_string()),
            wind_speed: Some("5 to 10 mph".to_string()),
            wind_direction: Some("NW".to_string()),
            short_forecast: Some("Mostly Clear".to_string()),
        };
        assert_eq!(
            format_period(&period),
            "Tonight:\nTemperature: 54°F\nWind: 5 to 10 mph NW\nMostly Clear\n---"
        );
    }

    #[test]
    fn sparse_period_uses_placeholders() {
        assert_eq!(
            format_period(&ForecastPeriod::default()),
            "Unknown:\nTemperature: Unknown°F\nWind: Unknown \nNo forecast available\n---"
        );
    }

    #[test]
    fn report_joins_blocks_under_header() {
        let alerts = vec![tornado_warning(), AlertProperties::default()];
        let text = format_report("Active alerts for TX", &alerts, format_alert);
        assert!(text.starts_with("Active alerts for TX:\n\nEvent: Tornado Warning"));
        assert_eq!(text.matches("---").count(), 2);
    }

    #[test]
    fn decodes_sparse_payloads() {
        let alerts: AlertsResponse =
            serde_json::from_str(r#"{"features":[{"properties":{"event":"Flood Watch"}}]}"#)
                .unwrap();
        assert_eq!(alerts.features[0].properties.event.as_deref(), Some("Flood Watch"));

        let empty: AlertsResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.features.is_empty());

        let points: PointsResponse = serde_json::from_str(r#"{"properties":{}}"#).unwrap();
        assert!(points.properties.unwrap().forecast.is_none());
    }
}
