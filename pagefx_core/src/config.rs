//! Engine tuning knobs with the page defaults baked in.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Every threshold and delay the engine consults. Hosts usually run the
/// defaults; tests and replay scenarios override individual knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Viewport width at and below which the collapsible menu is in play.
    pub mobile_breakpoint: f32,
    /// Scroll offset past which the header takes its scrolled style.
    pub header_scroll_threshold: f32,
    /// Offset added to the scroll position when probing the active section.
    pub nav_probe_offset: f32,
    pub resize_throttle_ms: u64,
    pub reveal_threshold: f32,
    pub reveal_bottom_margin: f32,
    pub stagger_step_ms: u64,
    /// Simulated round-trip time for a form submission.
    pub submit_delay_ms: u64,
    pub banner_fade_in_ms: u64,
    pub banner_hold_ms: u64,
    pub banner_fade_out_ms: u64,
    pub scroll_top_threshold: f32,
    /// Remaining characters below which the counter turns to a warning.
    pub counter_warn_below: usize,
    /// When false the engine behaves like a platform without an
    /// intersection observer: images load eagerly, reveals still observe.
    pub observer_supported: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: MOBILE_BREAKPOINT,
            header_scroll_threshold: HEADER_SCROLL_THRESHOLD,
            nav_probe_offset: NAV_PROBE_OFFSET,
            resize_throttle_ms: RESIZE_THROTTLE_MS,
            reveal_threshold: REVEAL_THRESHOLD,
            reveal_bottom_margin: REVEAL_BOTTOM_MARGIN,
            stagger_step_ms: STAGGER_STEP_MS,
            submit_delay_ms: SUBMIT_DELAY_MS,
            banner_fade_in_ms: BANNER_FADE_IN_MS,
            banner_hold_ms: BANNER_HOLD_MS,
            banner_fade_out_ms: BANNER_FADE_OUT_MS,
            scroll_top_threshold: SCROLL_TOP_THRESHOLD,
            counter_warn_below: COUNTER_WARN_BELOW,
            observer_supported: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_page_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.mobile_breakpoint, 768.0);
        assert_eq!(config.resize_throttle_ms, 250);
        assert_eq!(config.submit_delay_ms, 2000);
        assert!(config.observer_supported);
    }

    #[test]
    fn test_partial_json_fills_in_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"submit_delay_ms": 50, "banner_hold_ms": 80}"#).unwrap();
        assert_eq!(config.submit_delay_ms, 50);
        assert_eq!(config.banner_hold_ms, 80);
        assert_eq!(config.header_scroll_threshold, 100.0);
        assert_eq!(config.counter_warn_below, 20);
    }
}
