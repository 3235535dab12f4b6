//! Decoder tuning knobs and their environment overrides
use std::time::Duration;

fn parse_env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

/// Limits and strategy switches for one [`Decoder`](crate::Decoder)
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderConfig {
    /// Finder triples attempted per binarization pass
    pub max_candidates: usize,
    /// Strongest finder detections considered when forming triples
    pub max_finder_patterns: usize,
    /// Wall-clock budget for one image, checked between candidates
    pub time_budget: Option<Duration>,
    /// Adaptive threshold window in pixels; `None` scales with the image
    pub adaptive_window: Option<usize>,
    /// Re-run the whole search on an Otsu bitmap when the adaptive pass finds nothing
    pub otsu_fallback: bool,
    /// Largest ratio between finder pitches within one triple
    pub max_pitch_ratio: f32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_candidates: 72,
            max_finder_patterns: 24,
            time_budget: None,
            adaptive_window: None,
            otsu_fallback: true,
            max_pitch_ratio: 1.5,
        }
    }
}

impl DecoderConfig {
    /// Defaults overridden by `QR_MAX_CANDIDATES`, `QR_MAX_FINDER_PATTERNS`,
    /// `QR_TIME_BUDGET_MS` (0 disables), `QR_ADAPTIVE_WINDOW` and
    /// `QR_OTSU_FALLBACK` (0/1). Unparsable values keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let budget_ms = parse_env_u64("QR_TIME_BUDGET_MS", 0);
        let window = parse_env_usize("QR_ADAPTIVE_WINDOW", 0);
        Self {
            max_candidates: parse_env_usize("QR_MAX_CANDIDATES", defaults.max_candidates).max(1),
            max_finder_patterns: parse_env_usize(
                "QR_MAX_FINDER_PATTERNS",
                defaults.max_finder_patterns,
            )
            .max(3),
            time_budget: (budget_ms > 0).then(|| Duration::from_millis(budget_ms)),
            adaptive_window: (window > 0).then_some(window),
            otsu_fallback: parse_env_bool_u8("QR_OTSU_FALLBACK", defaults.otsu_fallback),
            max_pitch_ratio: defaults.max_pitch_ratio,
        }
    }

    /// Set the attempt budget
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Set the wall-clock budget
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::default();
        assert!(config.otsu_fallback);
        assert!(config.time_budget.is_none());
        assert_eq!(config.max_pitch_ratio, 1.5);
    }

    #[test]
    fn test_parse_env_fallbacks() {
        // Unset variables keep the default
        assert_eq!(parse_env_usize("QRSCAN_TEST_UNSET_VARIABLE", 7), 7);
        assert!(parse_env_bool_u8("QRSCAN_TEST_UNSET_VARIABLE", true));
        assert_eq!(parse_env_u64("QRSCAN_TEST_UNSET_VARIABLE", 9), 9);
    }

    #[test]
    fn test_builders() {
        let config = DecoderConfig::default()
            .with_max_candidates(3)
            .with_time_budget(Duration::from_millis(50));
        assert_eq!(config.max_candidates, 3);
        assert_eq!(config.time_budget, Some(Duration::from_millis(50)));
    }
}
