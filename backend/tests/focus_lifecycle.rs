use chrono::{Duration, NaiveDate, NaiveDateTime};
use studyflow_backend::{
    repositories::focus_session as focus_repo,
    services::focus::{self, FocusError},
    types::UserId,
};

#[path = "support/mod.rs"]
mod support;

const USER: UserId = UserId(1);

/// Fixed timestamps keep assertions exact; Postgres TIMESTAMP stores
/// microseconds, so round-tripping a nanosecond-precision `now()` would not
/// compare equal.
fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 10, 26)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

#[tokio::test]
async fn start_then_end_appends_one_history_record() {
    let _guard = support::integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    support::reset(&pool).await;

    let t0 = at(9, 0, 0);
    let started = focus::start_focus(&pool, USER, "Calculus II", t0)
        .await
        .expect("start focus");
    assert_eq!(started.subject, "Calculus II");
    assert_eq!(started.start_time, t0);

    // Ended 2 minutes 5 seconds later: duration truncates to 2.
    let t1 = t0 + Duration::seconds(125);
    let (record, duration) = focus::end_focus(&pool, USER, t1).await.expect("end focus");
    assert_eq!(duration, 2);
    assert_eq!(record.duration, 2);
    assert_eq!(record.subject, "Calculus II");
    assert_eq!(record.date, t1.date());
    assert_eq!(record.start_time, t0);
    assert_eq!(record.end_time, Some(t1));

    // Active row consumed, exactly one history record.
    assert!(focus::get_current(&pool, USER).await.expect("current").is_none());
    let history = focus_repo::list_history(&pool, USER).await.expect("history");
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn end_within_same_minute_records_zero_duration() {
    let _guard = support::integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    support::reset(&pool).await;

    let t0 = at(9, 0, 0);
    focus::start_focus(&pool, USER, "Physics I", t0)
        .await
        .expect("start focus");
    let (record, duration) = focus::end_focus(&pool, USER, t0 + Duration::seconds(40))
        .await
        .expect("end focus");
    assert_eq!(duration, 0);
    assert_eq!(record.duration, 0);
}

#[tokio::test]
async fn ending_without_active_session_is_a_state_conflict() {
    let _guard = support::integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    support::reset(&pool).await;

    let result = focus::end_focus(&pool, USER, at(9, 0, 0)).await;
    assert!(matches!(result, Err(FocusError::NoActiveSession)));
}

#[tokio::test]
async fn starting_twice_overwrites_without_archiving() {
    let _guard = support::integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    support::reset(&pool).await;

    let t0 = at(9, 0, 0);
    focus::start_focus(&pool, USER, "Calculus II", t0)
        .await
        .expect("first start");
    let second = focus::start_focus(&pool, USER, "Linear Algebra", t0 + Duration::minutes(5))
        .await
        .expect("second start");
    assert_eq!(second.subject, "Linear Algebra");

    // Exactly one active session (the new one); the old one is not in history.
    let current = focus::get_current(&pool, USER)
        .await
        .expect("current")
        .expect("active session");
    assert_eq!(current.subject, "Linear Algebra");
    let history = focus_repo::list_history(&pool, USER).await.expect("history");
    assert!(history.is_empty());
}

#[tokio::test]
async fn cleanup_reaps_only_stale_sessions_and_writes_no_history() {
    let _guard = support::integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    support::reset(&pool).await;

    let other = support::seed_user(&pool, "second_student").await;
    let now = at(12, 0, 0);

    // One abandoned 25 hours ago, one fresh.
    focus::start_focus(&pool, USER, "Abandoned", now - Duration::hours(25))
        .await
        .expect("stale start");
    focus::start_focus(&pool, other, "Fresh", now - Duration::minutes(10))
        .await
        .expect("fresh start");

    let reaped = focus::cleanup_stale(&pool, now, 24).await.expect("cleanup");
    assert_eq!(reaped, 1);

    assert!(focus::get_current(&pool, USER).await.expect("current").is_none());
    assert!(focus::get_current(&pool, other)
        .await
        .expect("current")
        .is_some());

    // Abandoned sessions are lost, not archived.
    let history = focus_repo::list_history(&pool, USER).await.expect("history");
    assert!(history.is_empty());
}
