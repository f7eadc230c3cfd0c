use crate::error::{FarmOpsError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    #[serde(rename = "pH")]
    Ph,
    Moisture,
    Temperature,
    Nitrogen,
    Phosphorus,
    Potassium,
    OrganicMatter,
    ElectricalConductivity,
    Humidity,
    WindSpeed,
    Precipitation,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Ph => "pH",
            Metric::Moisture => "Moisture",
            Metric::Temperature => "Temperature",
            Metric::Nitrogen => "Nitrogen",
            Metric::Phosphorus => "Phosphorus",
            Metric::Potassium => "Potassium",
            Metric::OrganicMatter => "Organic Matter",
            Metric::ElectricalConductivity => "Electrical Conductivity",
            Metric::Humidity => "Humidity",
            Metric::WindSpeed => "Wind Speed",
            Metric::Precipitation => "Precipitation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "ph" | "soilph" => Some(Metric::Ph),
            "moisture" | "soilmoisture" => Some(Metric::Moisture),
            "temperature" | "temp" | "soiltemperature" => Some(Metric::Temperature),
            "nitrogen" | "n" => Some(Metric::Nitrogen),
            "phosphorus" | "p" => Some(Metric::Phosphorus),
            "potassium" | "k" => Some(Metric::Potassium),
            "organicmatter" | "om" => Some(Metric::OrganicMatter),
            "electricalconductivity" | "ec" => Some(Metric::ElectricalConductivity),
            "humidity" => Some(Metric::Humidity),
            "windspeed" | "wind" => Some(Metric::WindSpeed),
            "precipitation" | "rain" | "rainfall" => Some(Metric::Precipitation),
            _ => None,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Ph => "",
            Metric::Moisture => "%",
            Metric::Temperature => "°C",
            Metric::Nitrogen | Metric::Phosphorus | Metric::Potassium => "ppm",
            Metric::OrganicMatter => "%",
            Metric::ElectricalConductivity => "dS/m",
            Metric::Humidity => "%",
            Metric::WindSpeed => "km/h",
            Metric::Precipitation => "mm",
        }
    }

    /// Soil metrics come from in-ground probes; the rest from the weather feed.
    pub fn is_soil(&self) -> bool {
        !matches!(
            self,
            Metric::Humidity | Metric::WindSpeed | Metric::Precipitation
        )
    }

    pub fn all() -> &'static [Metric] {
        &[
            Metric::Ph,
            Metric::Moisture,
            Metric::Temperature,
            Metric::Nitrogen,
            Metric::Phosphorus,
            Metric::Potassium,
            Metric::OrganicMatter,
            Metric::ElectricalConductivity,
            Metric::Humidity,
            Metric::WindSpeed,
            Metric::Precipitation,
        ]
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single soil or weather reading. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    pub farm_id: String,
    pub metric: Metric,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl TelemetrySample {
    pub fn new(
        farm_id: impl Into<String>,
        metric: Metric,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            farm_id: farm_id.into(),
            metric,
            value,
            timestamp,
        }
    }
}

/// Closed time interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(FarmOpsError::InvalidWindow {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// Window of `hours` ending at `end`.
    pub fn trailing_hours(end: DateTime<Utc>, hours: i64) -> Result<Self> {
        let start = Duration::try_hours(hours)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| FarmOpsError::InvalidWindow {
                start: format!("{} hours before end", hours),
                end: end.to_rfc3339(),
            })?;
        Self::new(start, end)
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Rising,
    Falling,
    #[default]
    Stable,
    Unknown,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Rising => "Rising",
            Trend::Falling => "Falling",
            Trend::Stable => "Stable",
            Trend::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn metric_from_str_valid() {
        assert_eq!(Metric::from_str("pH"), Some(Metric::Ph));
        assert_eq!(Metric::from_str("soil moisture"), Some(Metric::Moisture));
        assert_eq!(
            Metric::from_str("electricalConductivity"),
            Some(Metric::ElectricalConductivity)
        );
        assert_eq!(Metric::from_str("EC"), Some(Metric::ElectricalConductivity));
        assert_eq!(Metric::from_str("organic_matter"), Some(Metric::OrganicMatter));
        assert_eq!(Metric::from_str("wind-speed"), Some(Metric::WindSpeed));
    }

    #[test]
    fn metric_from_str_invalid() {
        assert_eq!(Metric::from_str("salinity"), None);
        assert_eq!(Metric::from_str(""), None);
    }

    #[test]
    fn metric_round_trip() {
        for metric in Metric::all() {
            let debug_str = format!("{:?}", metric);
            assert_eq!(
                Metric::from_str(&debug_str),
                Some(*metric),
                "Round-trip failed for {:?}",
                metric
            );
        }
    }

    #[test]
    fn metric_serde_names() {
        assert_eq!(serde_json::to_string(&Metric::Ph).unwrap(), "\"pH\"");
        assert_eq!(
            serde_json::to_string(&Metric::OrganicMatter).unwrap(),
            "\"organicMatter\""
        );
        let m: Metric = serde_json::from_str("\"windSpeed\"").unwrap();
        assert_eq!(m, Metric::WindSpeed);
    }

    #[test]
    fn soil_vs_weather_metrics() {
        assert!(Metric::Ph.is_soil());
        assert!(Metric::ElectricalConductivity.is_soil());
        assert!(!Metric::Humidity.is_soil());
        assert!(!Metric::Precipitation.is_soil());
    }

    #[test]
    fn trend_labels_are_plain() {
        assert_eq!(Trend::Rising.to_string(), "Rising");
        assert_eq!(Trend::Falling.as_str(), "Falling");
        assert_eq!(Trend::Stable.as_str(), "Stable");
        assert_eq!(Trend::Unknown.as_str(), "Unknown");
        assert_eq!(serde_json::to_string(&Trend::Rising).unwrap(), "\"Rising\"");
    }

    #[test]
    fn window_rejects_inverted_bounds() {
        let a = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2025, 7, 2, 0, 0, 0).unwrap();
        assert!(TimeWindow::new(a, b).is_ok());
        assert!(matches!(
            TimeWindow::new(b, a),
            Err(FarmOpsError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn window_is_closed_interval() {
        let a = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2025, 7, 2, 0, 0, 0).unwrap();
        let window = TimeWindow::new(a, b).unwrap();
        assert!(window.contains(a));
        assert!(window.contains(b));
        assert!(!window.contains(b + Duration::seconds(1)));
    }

    #[test]
    fn trailing_window_spans_hours() {
        let end = Utc.with_ymd_and_hms(2025, 7, 8, 0, 0, 0).unwrap();
        let window = TimeWindow::trailing_hours(end, 168).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn trailing_window_out_of_range_is_an_error() {
        let end = Utc.with_ymd_and_hms(2025, 7, 8, 0, 0, 0).unwrap();
        assert!(matches!(
            TimeWindow::trailing_hours(end, 100_000_000_000),
            Err(FarmOpsError::InvalidWindow { .. })
        ));
        assert!(TimeWindow::trailing_hours(end, i64::MAX).is_err());
        // Negative span would put start after end
        assert!(TimeWindow::trailing_hours(end, -1).is_err());
    }
}
