use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::Duration;
use chrono_tz::Tz;

/// Scheduling knobs, loaded once at startup. All times are interpreted in
/// `timezone`; `working_hour_end` is exclusive.
#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    pub timezone: Tz,
    pub working_hour_start: u32,
    pub working_hour_end: u32,
    pub skip_weekends: bool,
    /// Minimum spacing between two sends on the same identity; fractional minutes allowed.
    pub interval_minutes: f64,
    /// Upper bound of the uniform random offset added to every schedule.
    pub jitter_seconds_max: f64,
}

impl SchedulingConfig {
    pub fn from_env() -> Result<Self> {
        let tz_name = env::var("SCHEDULER_TIMEZONE").unwrap_or_else(|_| "America/Los_Angeles".into());
        let timezone: Tz = tz_name
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid SCHEDULER_TIMEZONE '{tz_name}': {e}"))?;

        let cfg = Self {
            timezone,
            working_hour_start: parse_env("WORKING_HOUR_START", 9)?,
            working_hour_end: parse_env("WORKING_HOUR_END", 17)?,
            skip_weekends: parse_env("SKIP_WEEKENDS", true)?,
            interval_minutes: parse_env("SEND_INTERVAL_MINUTES", 3.5)?,
            jitter_seconds_max: parse_env("JITTER_SECONDS_MAX", 30.0)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.working_hour_start > 23 || self.working_hour_end > 23 {
            bail!("working hours must be within 0-23");
        }
        if self.working_hour_start >= self.working_hour_end {
            bail!(
                "WORKING_HOUR_START ({}) must be before WORKING_HOUR_END ({})",
                self.working_hour_start,
                self.working_hour_end
            );
        }
        if self.interval_minutes <= 0.0 {
            bail!("SEND_INTERVAL_MINUTES must be positive");
        }
        if self.jitter_seconds_max < 0.0 {
            bail!("JITTER_SECONDS_MAX must not be negative");
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::milliseconds((self.interval_minutes * 60_000.0).round() as i64)
    }

    pub fn window_hours(&self) -> u32 {
        self.working_hour_end - self.working_hour_start
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("invalid {key}: '{raw}'")),
        Err(_) => Ok(default),
    }
}
