use serde::Deserialize;
use std::time::Duration;

use crate::lightbox::ZoomLimits;
use crate::log::LogLevel;
use crate::typewriter::Timing;

pub const CONFIG_ELEMENT_ID: &str = "site-config";

const DEFAULT_ROLES: [&str; 3] = [
    "BIM Coordinator",
    "MSc BIM & Digital Transformation (Distinction)",
    "4D Simulation • Clash Detection • Additive Manufacturing",
];
const DEFAULT_TYPE_INTERVAL_MS: u64 = 40;
const DEFAULT_DELETE_INTERVAL_MS: u64 = 30;
const DEFAULT_HOLD_MS: u64 = 1_400;
const DEFAULT_REST_MS: u64 = 220;
const DEFAULT_REVEAL_THRESHOLD: f64 = 0.12;
const DEFAULT_ZOOM_STEP: f64 = 1.2;
const DEFAULT_ZOOM_MIN: f64 = 0.5;
const DEFAULT_ZOOM_MAX: f64 = 5.0;
const DEFAULT_CLOSE_CLEAR_DELAY_MS: u64 = 220;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const TYPE_INTERVAL_MS_BOUNDS: (u64, u64) = (1, 2_000);
const DELETE_INTERVAL_MS_BOUNDS: (u64, u64) = (1, 2_000);
const HOLD_MS_BOUNDS: (u64, u64) = (0, 60_000);
const REST_MS_BOUNDS: (u64, u64) = (0, 60_000);
const REVEAL_THRESHOLD_BOUNDS: (f64, f64) = (0.0, 1.0);
const ZOOM_STEP_BOUNDS: (f64, f64) = (1.01, 4.0);
const ZOOM_MIN_BOUNDS: (f64, f64) = (0.1, 1.0);
const ZOOM_MAX_BOUNDS: (f64, f64) = (1.0, 20.0);
const CLOSE_CLEAR_DELAY_MS_BOUNDS: (u64, u64) = (0, 10_000);

/// Shape of the optional `#site-config` JSON block. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSiteConfig {
    roles: Option<Vec<String>>,
    type_interval_ms: Option<u64>,
    delete_interval_ms: Option<u64>,
    hold_ms: Option<u64>,
    rest_ms: Option<u64>,
    reveal_threshold: Option<f64>,
    zoom_step: Option<f64>,
    zoom_min: Option<f64>,
    zoom_max: Option<f64>,
    close_clear_delay_ms: Option<u64>,
    log_level: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SiteConfig {
    pub roles: Vec<String>,
    pub timing: Timing,
    pub reveal_threshold: f64,
    pub zoom: ZoomLimits,
    pub close_clear_delay: Duration,
    pub log_level: LogLevel,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::from_raw(RawSiteConfig::default())
    }
}

impl SiteConfig {
    /// Parses the text of the config block. Malformed JSON is reported to the
    /// caller, which falls back to [`SiteConfig::default`].
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawSiteConfig = serde_json::from_str(text)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawSiteConfig) -> Self {
        let roles = raw
            .roles
            .map(|roles| {
                roles
                    .into_iter()
                    .map(|role| role.trim().to_string())
                    .filter(|role| !role.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|roles| !roles.is_empty())
            .unwrap_or_else(|| DEFAULT_ROLES.iter().map(|role| role.to_string()).collect());

        let timing = Timing {
            type_interval: Duration::from_millis(u64_with_bounds(
                raw.type_interval_ms,
                DEFAULT_TYPE_INTERVAL_MS,
                TYPE_INTERVAL_MS_BOUNDS,
            )),
            delete_interval: Duration::from_millis(u64_with_bounds(
                raw.delete_interval_ms,
                DEFAULT_DELETE_INTERVAL_MS,
                DELETE_INTERVAL_MS_BOUNDS,
            )),
            hold: Duration::from_millis(u64_with_bounds(raw.hold_ms, DEFAULT_HOLD_MS, HOLD_MS_BOUNDS)),
            rest: Duration::from_millis(u64_with_bounds(raw.rest_ms, DEFAULT_REST_MS, REST_MS_BOUNDS)),
        };

        let zoom = ZoomLimits {
            step: f64_with_bounds(raw.zoom_step, DEFAULT_ZOOM_STEP, ZOOM_STEP_BOUNDS),
            min: f64_with_bounds(raw.zoom_min, DEFAULT_ZOOM_MIN, ZOOM_MIN_BOUNDS),
            max: f64_with_bounds(raw.zoom_max, DEFAULT_ZOOM_MAX, ZOOM_MAX_BOUNDS),
        };

        Self {
            roles,
            timing,
            reveal_threshold: f64_with_bounds(
                raw.reveal_threshold,
                DEFAULT_REVEAL_THRESHOLD,
                REVEAL_THRESHOLD_BOUNDS,
            ),
            zoom,
            close_clear_delay: Duration::from_millis(u64_with_bounds(
                raw.close_clear_delay_ms,
                DEFAULT_CLOSE_CLEAR_DELAY_MS,
                CLOSE_CLEAR_DELAY_MS_BOUNDS,
            )),
            log_level: raw
                .log_level
                .as_deref()
                .and_then(LogLevel::parse)
                .unwrap_or(DEFAULT_LOG_LEVEL),
        }
    }
}

fn u64_with_bounds(value: Option<u64>, default: u64, bounds: (u64, u64)) -> u64 {
    value
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn f64_with_bounds(value: Option<f64>, default: f64, bounds: (f64, f64)) -> f64 {
    value
        .filter(|value| value.is_finite() && (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_block_yields_defaults() {
        let config = SiteConfig::from_json("  ").expect("blank text is accepted");

        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.roles.len(), 3);
        assert_eq!(config.timing.type_interval, Duration::from_millis(40));
        assert_eq!(config.timing.delete_interval, Duration::from_millis(30));
        assert_eq!(config.timing.hold, Duration::from_millis(1_400));
        assert_eq!(config.timing.rest, Duration::from_millis(220));
        assert_eq!(config.reveal_threshold, 0.12);
        assert_eq!(config.zoom, ZoomLimits { step: 1.2, min: 0.5, max: 5.0 });
        assert_eq!(config.close_clear_delay, Duration::from_millis(220));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn in_bounds_values_override_defaults() {
        let config = SiteConfig::from_json(
            r#"{
                "roles": ["Engineer", "  ", "Writer"],
                "typeIntervalMs": 55,
                "holdMs": 900,
                "revealThreshold": 0.5,
                "zoomMax": 8,
                "logLevel": "debug"
            }"#,
        )
        .expect("valid config");

        assert_eq!(config.roles, vec!["Engineer".to_string(), "Writer".to_string()]);
        assert_eq!(config.timing.type_interval, Duration::from_millis(55));
        assert_eq!(config.timing.hold, Duration::from_millis(900));
        assert_eq!(config.reveal_threshold, 0.5);
        assert_eq!(config.zoom.max, 8.0);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn out_of_bounds_values_fall_back_to_defaults() {
        let config = SiteConfig::from_json(
            r#"{
                "roles": ["", " "],
                "typeIntervalMs": 0,
                "deleteIntervalMs": 50000,
                "revealThreshold": 1.5,
                "zoomStep": 1.0,
                "zoomMin": 2.0,
                "logLevel": "verbose"
            }"#,
        )
        .expect("valid JSON with rejected values");

        assert_eq!(config.roles.len(), DEFAULT_ROLES.len());
        assert_eq!(config.timing.type_interval, Duration::from_millis(DEFAULT_TYPE_INTERVAL_MS));
        assert_eq!(config.timing.delete_interval, Duration::from_millis(DEFAULT_DELETE_INTERVAL_MS));
        assert_eq!(config.reveal_threshold, DEFAULT_REVEAL_THRESHOLD);
        assert_eq!(config.zoom.step, DEFAULT_ZOOM_STEP);
        assert_eq!(config.zoom.min, DEFAULT_ZOOM_MIN);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SiteConfig::from_json("{ roles: [").is_err());
        assert!(SiteConfig::from_json(r#"{"typeIntervalMs": "fast"}"#).is_err());
    }
}
