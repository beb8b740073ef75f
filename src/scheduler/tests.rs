use super::*;
use chrono::{Datelike, TimeZone, Timelike, Weekday};

fn config(daily: &str, weekly: &str) -> ScheduleConfig {
    ScheduleConfig {
        daily: daily.into(),
        weekly: weekly.into(),
    }
}

#[test]
fn five_field_expressions_are_accepted() {
    let schedule = parse_schedule("0 6 * * *").unwrap();
    let from = Utc.with_ymd_and_hms(2024, 5, 13, 5, 0, 0).unwrap();
    let next = next_run_for(&schedule, "0 6 * * *", from).unwrap();
    assert_eq!(next, Utc.with_ymd_and_hms(2024, 5, 13, 6, 0, 0).unwrap());
}

#[test]
fn invalid_field_count_is_rejected() {
    let err = parse_schedule("* * * *").unwrap_err();
    assert!(err.to_string().contains("expected 5, 6, or 7 fields"));
}

#[test]
fn default_weekly_schedule_lands_on_monday() {
    let from = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
    let timetable = Timetable::new(&ScheduleConfig::default(), from).unwrap();
    let weekly = timetable.weekly.next;
    assert_eq!(weekly.weekday(), Weekday::Mon);
    assert_eq!(weekly.hour(), 7);
}

#[test]
fn earliest_job_is_picked_and_ties_go_to_daily() {
    // both due Monday 07:00
    let from = Utc.with_ymd_and_hms(2024, 5, 13, 6, 30, 0).unwrap();
    let mut timetable = Timetable::new(&config("0 7 * * *", "0 7 * * Mon"), from).unwrap();

    let (kind, at) = timetable.peek();
    assert_eq!(kind, JobKind::Daily);
    assert_eq!(at, Utc.with_ymd_and_hms(2024, 5, 13, 7, 0, 0).unwrap());

    // daily run took a minute
    timetable
        .advance(JobKind::Daily, at + chrono::Duration::minutes(1))
        .unwrap();
    let (kind, at) = timetable.peek();
    assert_eq!(kind, JobKind::Weekly);
    assert_eq!(at, Utc.with_ymd_and_hms(2024, 5, 13, 7, 0, 0).unwrap());

    timetable
        .advance(JobKind::Weekly, at + chrono::Duration::minutes(2))
        .unwrap();
    let (kind, at) = timetable.peek();
    assert_eq!(kind, JobKind::Daily);
    assert_eq!(at, Utc.with_ymd_and_hms(2024, 5, 14, 7, 0, 0).unwrap());
}

#[test]
fn missed_occurrences_are_skipped_after_sleep() {
    let from = Utc.with_ymd_and_hms(2024, 5, 13, 5, 0, 0).unwrap();
    let mut timetable = Timetable::new(&config("0 6 * * *", "0 7 * * Mon"), from).unwrap();
    let (kind, at) = timetable.peek();
    assert_eq!(kind, JobKind::Daily);
    assert_eq!(at, Utc.with_ymd_and_hms(2024, 5, 13, 6, 0, 0).unwrap());

    // host woke up three days late and ran the overdue sweep once
    let woke = Utc.with_ymd_and_hms(2024, 5, 16, 9, 30, 0).unwrap();
    timetable.advance(JobKind::Daily, woke).unwrap();

    // the overdue weekly run comes next, once
    let (kind, at) = timetable.peek();
    assert_eq!(kind, JobKind::Weekly);
    assert_eq!(at, Utc.with_ymd_and_hms(2024, 5, 13, 7, 0, 0).unwrap());
    timetable.advance(JobKind::Weekly, woke).unwrap();

    let (kind, at) = timetable.peek();
    assert_eq!(kind, JobKind::Daily);
    assert_eq!(at, Utc.with_ymd_and_hms(2024, 5, 17, 6, 0, 0).unwrap());
    assert_eq!(
        timetable.weekly.next,
        Utc.with_ymd_and_hms(2024, 5, 20, 7, 0, 0).unwrap()
    );
}
