mod common;

use clearhaven_campaigns::services::work_clock::WorkClock;
use common::{la_config, local};

// 2026-03-10 is a Tuesday; US DST starts 2026-03-08.

#[test]
fn inside_window_is_unchanged() {
    let cfg = la_config(0.0);
    let clock = WorkClock::new(&cfg);
    let tue_10am = local(&cfg, 2026, 3, 10, 10, 0);
    assert_eq!(clock.start_of_next_window(tue_10am), tue_10am);
    assert_eq!(clock.clamp_to_window(tue_10am), tue_10am);
}

#[test]
fn before_window_snaps_to_todays_start() {
    let cfg = la_config(0.0);
    let clock = WorkClock::new(&cfg);
    let tue_6am = local(&cfg, 2026, 3, 10, 6, 0);
    assert_eq!(clock.start_of_next_window(tue_6am), local(&cfg, 2026, 3, 10, 9, 0));
    // clamp only caps the late side
    assert_eq!(clock.clamp_to_window(tue_6am), tue_6am);
}

#[test]
fn after_window_rolls_to_next_morning() {
    let cfg = la_config(0.0);
    let clock = WorkClock::new(&cfg);
    // 19:00 is past the window
    let tue_7pm = local(&cfg, 2026, 3, 10, 19, 0);
    assert_eq!(clock.start_of_next_window(tue_7pm), local(&cfg, 2026, 3, 11, 9, 0));
    // a candidate at 17:02 rolls to 09:00 next day
    let tue_1702 = local(&cfg, 2026, 3, 10, 17, 2);
    assert_eq!(clock.clamp_to_window(tue_1702), local(&cfg, 2026, 3, 11, 9, 0));
}

#[test]
fn friday_evening_rolls_to_monday() {
    let cfg = la_config(0.0);
    let clock = WorkClock::new(&cfg);
    let fri_7pm = local(&cfg, 2026, 3, 13, 19, 0);
    assert_eq!(clock.start_of_next_window(fri_7pm), local(&cfg, 2026, 3, 16, 9, 0));
    let fri_1730 = local(&cfg, 2026, 3, 13, 17, 30);
    assert_eq!(clock.clamp_to_window(fri_1730), local(&cfg, 2026, 3, 16, 9, 0));
}

#[test]
fn saturday_rolls_to_monday_even_inside_hours() {
    let cfg = la_config(0.0);
    let clock = WorkClock::new(&cfg);
    let sat_noon = local(&cfg, 2026, 3, 14, 12, 0);
    assert_eq!(clock.start_of_next_window(sat_noon), local(&cfg, 2026, 3, 16, 9, 0));
    assert_eq!(clock.clamp_to_window(sat_noon), local(&cfg, 2026, 3, 16, 9, 0));
}

#[test]
fn weekends_allowed_when_not_skipped() {
    let mut cfg = la_config(0.0);
    cfg.skip_weekends = false;
    let clock = WorkClock::new(&cfg);
    let fri_7pm = local(&cfg, 2026, 3, 13, 19, 0);
    assert_eq!(clock.start_of_next_window(fri_7pm), local(&cfg, 2026, 3, 14, 9, 0));
}

#[test]
fn rollover_across_dst_transition() {
    let cfg = la_config(0.0);
    let clock = WorkClock::new(&cfg);
    // Friday 2026-03-06 18:00 PST; Monday 09:00 is already PDT
    let fri_6pm = local(&cfg, 2026, 3, 6, 18, 0);
    let monday_open = clock.start_of_next_window(fri_6pm);
    assert_eq!(monday_open, local(&cfg, 2026, 3, 9, 9, 0));
    // PDT is UTC-7, so 09:00 local is 16:00 UTC
    assert_eq!(monday_open.to_rfc3339(), "2026-03-09T16:00:00+00:00");
}

#[test]
fn local_day_bounds_cover_the_day() {
    let cfg = la_config(0.0);
    let clock = WorkClock::new(&cfg);
    let tue_10am = local(&cfg, 2026, 3, 10, 10, 0);
    let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    let (start, end) = clock.local_day_bounds(date);
    assert!(start <= tue_10am && tue_10am < end);
    assert_eq!(end - start, chrono::Duration::hours(24));
}
