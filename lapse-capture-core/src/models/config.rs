use std::time::Duration;

/// Frame rate assumed for output timestamps when none is configured.
pub const DEFAULT_FRAMERATE: f64 = 30.0;

/// Configuration for a timelapse capture session.
#[derive(Debug, Clone, PartialEq)]
pub struct LapseConfiguration {
    /// Time between scheduled captures (default: 1000 ms).
    pub interval: Duration,

    /// Total run length; the schedule ends once the next capture instant
    /// passes `start + duration`.
    pub duration: Duration,

    /// Run a one-shot autofocus scan before the schedule starts.
    pub autofocus_on_capture: bool,

    /// Frame rate used for output timestamps (None = `DEFAULT_FRAMERATE`).
    pub framerate: Option<f64>,

    /// Allow interactive cancellation from stdin ('x' aborts).
    pub keypress: bool,

    /// Allow cancellation/stop via process signals.
    pub signals: bool,

    /// Forward capture metadata on the sink's metadata-ready notification.
    pub metadata: bool,
}

impl LapseConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.interval.is_zero() {
            return Err("capture interval must be positive".into());
        }
        if let Some(rate) = self.framerate {
            if rate <= 0.0 {
                return Err(format!("invalid framerate: {}", rate));
            }
        }
        Ok(())
    }

    pub fn effective_framerate(&self) -> f64 {
        self.framerate.unwrap_or(DEFAULT_FRAMERATE)
    }

    /// Log a settings summary at debug level.
    pub fn log_settings(&self) {
        log::debug!("timelapse interval: {}ms", self.interval.as_millis());
        log::debug!("run duration: {}ms", self.duration.as_millis());
        log::debug!("AF on capture: {}", self.autofocus_on_capture);
        log::debug!("framerate: {}", self.effective_framerate());
    }
}

impl Default for LapseConfiguration {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            duration: Duration::from_millis(5000),
            autofocus_on_capture: false,
            framerate: None,
            keypress: false,
            signals: false,
            metadata: false,
        }
    }
}

/// Parse an interval string with an optional unit suffix.
///
/// Accepted suffixes: `us`, `ms`, `s`, `min`. A bare number is milliseconds.
pub fn parse_interval(text: &str) -> Result<Duration, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("empty interval".into());
    }

    let split = text
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(text.len());
    let (number, suffix) = text.split_at(split);

    let value: f64 = number
        .parse()
        .map_err(|_| format!("invalid interval: {:?}", text))?;

    let micros = match suffix.trim() {
        "us" => value,
        "" | "ms" => value * 1_000.0,
        "s" | "sec" => value * 1_000_000.0,
        "min" => value * 60_000_000.0,
        other => return Err(format!("unknown interval unit: {:?}", other)),
    };

    if !micros.is_finite() || micros < 0.0 {
        return Err(format!("invalid interval: {:?}", text));
    }
    Ok(Duration::from_micros(micros as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_number_defaults_to_milliseconds() {
        assert_eq!(parse_interval("250").unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn unit_suffixes() {
        assert_eq!(parse_interval("1000ms").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_interval("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_interval("2min").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_interval("1500us").unwrap(), Duration::from_micros(1500));
    }

    #[test]
    fn fractional_values() {
        assert_eq!(parse_interval("0.5s").unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn whitespace_is_tolerated() {
        assert_eq!(parse_interval(" 100 ms ").unwrap(), Duration::from_millis(100));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_interval("abc").is_err());
        assert!(parse_interval("").is_err());
        assert!(parse_interval("10fortnights").is_err());
        assert!(parse_interval("-5").is_err());
    }

    #[test]
    fn default_configuration_validates() {
        let config = LapseConfiguration::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.interval, Duration::from_millis(1000));
        assert_eq!(config.effective_framerate(), DEFAULT_FRAMERATE);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = LapseConfiguration {
            interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_framerate_is_rejected() {
        let config = LapseConfiguration {
            framerate: Some(-1.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
