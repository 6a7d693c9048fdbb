//! Timezone-aware working-hours math. Pure functions of the input instant and
//! the immutable scheduling config; no I/O.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::config::SchedulingConfig;

#[derive(Debug, Clone)]
pub struct WorkClock {
    tz: Tz,
    start_hour: u32,
    end_hour: u32,
    skip_weekends: bool,
}

impl WorkClock {
    pub fn new(cfg: &SchedulingConfig) -> Self {
        Self {
            tz: cfg.timezone,
            start_hour: cfg.working_hour_start,
            end_hour: cfg.working_hour_end,
            skip_weekends: cfg.skip_weekends,
        }
    }

    /// The first valid send instant at or after `from`: before the window opens
    /// it snaps to today's window start, at/after close (or on a skipped
    /// weekend day) it rolls to the next working day's window start, inside the
    /// window it is returned unchanged.
    pub fn start_of_next_window(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        let local = from.with_timezone(&self.tz);
        let date = local.date_naive();
        if self.is_skipped(date) || local.hour() >= self.end_hour {
            return self.window_open(self.next_working_day(date));
        }
        if local.hour() < self.start_hour {
            return self.window_open(date);
        }
        from
    }

    /// Cap the late side of a candidate: at/after the window close (or on a
    /// skipped weekend day) roll to the next working day's window start.
    /// Early-side times are deliberately left alone; batch starts already go
    /// through `start_of_next_window`.
    pub fn clamp_to_window(&self, candidate: DateTime<Utc>) -> DateTime<Utc> {
        let local = candidate.with_timezone(&self.tz);
        let date = local.date_naive();
        if self.is_skipped(date) || local.hour() >= self.end_hour {
            return self.window_open(self.next_working_day(date));
        }
        candidate
    }

    /// UTC bounds of a local calendar day, `[midnight, next midnight)`.
    pub fn local_day_bounds(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.resolve_local(date, NaiveTime::MIN);
        let end = self.resolve_local(date.succ_opt().unwrap_or(date), NaiveTime::MIN);
        (start, end)
    }

    pub fn is_skipped(&self, date: NaiveDate) -> bool {
        self.skip_weekends && matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    fn next_working_day(&self, start: NaiveDate) -> NaiveDate {
        let mut date = start.succ_opt().unwrap_or(start);
        for _ in 0..7 {
            if !self.is_skipped(date) {
                break;
            }
            date = date.succ_opt().unwrap_or(date);
        }
        date
    }

    fn window_open(&self, date: NaiveDate) -> DateTime<Utc> {
        let open = NaiveTime::from_hms_opt(self.start_hour, 0, 0).unwrap_or_default();
        self.resolve_local(date, open)
    }

    /// Local civil time to UTC instant. Ambiguous times (fall-back) take the
    /// earlier offset; skipped times (spring-forward gap) shift an hour later.
    fn resolve_local(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let naive = date.and_time(time);
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
            LocalResult::None => {
                let shifted = naive + Duration::hours(1);
                match self.tz.from_local_datetime(&shifted) {
                    LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                        dt.with_timezone(&Utc)
                    }
                    LocalResult::None => Utc.from_utc_datetime(&naive),
                }
            }
        }
    }
}
