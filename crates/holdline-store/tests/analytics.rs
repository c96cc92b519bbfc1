use holdline_core::domain::{CallSid, CallStatus, CallerLocation};
use holdline_core::{PhoneHashKey, PhoneNumberProcessor};
use holdline_store::repo::{CallStart, StatusUpdate};
use holdline_store::Store;

const NOW: i64 = 1_700_000_000;

fn store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store
}

fn location(city: &str, state: &str) -> CallerLocation {
    CallerLocation {
        city: Some(city.to_string()),
        state: Some(state.to_string()),
        country: Some("US".to_string()),
    }
}

fn call(store: &Store, sid: &str, raw: Option<&str>, at: i64, loc: CallerLocation) {
    let processor = PhoneNumberProcessor::new(PhoneHashKey::new("k").expect("key"));
    store
        .calls()
        .record_start(
            at,
            CallStart {
                call_sid: CallSid::parse(sid).expect("sid"),
                caller: processor.process(raw),
                to_number: None,
                location: loc,
            },
        )
        .expect("record start");
}

fn complete(store: &Store, sid: &str, at: i64, duration: i64) {
    store
        .calls()
        .apply_status(
            at,
            StatusUpdate {
                call_sid: CallSid::parse(sid).expect("sid"),
                status: CallStatus::Completed,
                duration_seconds: Some(duration),
                ended_at: None,
            },
        )
        .expect("complete");
}

#[test]
fn empty_store_has_no_leaders() {
    let store = store();
    let snapshot = store
        .analytics()
        .snapshot(NOW, 10, 3_600)
        .expect("snapshot");

    assert!(snapshot.longest_hold.is_none());
    assert!(snapshot.most_calls.is_none());
    assert!(snapshot.total_time.is_none());
    assert!(snapshot.geo_leader.is_none());
    assert!(snapshot.recent_calls.is_empty());
    assert!(snapshot.active_calls.is_empty());
}

#[test]
fn longest_hold_picks_largest_completed_duration() {
    let store = store();
    call(&store, "CA1", Some("+19129127264"), NOW - 900, location("Savannah", "GA"));
    complete(&store, "CA1", NOW - 700, 200);
    call(&store, "CA2", Some("(415) 555-1212"), NOW - 800, location("Oakland", "CA"));
    complete(&store, "CA2", NOW - 300, 500);
    call(&store, "CA3", Some("5551234"), NOW - 100, location("Austin", "TX"));

    let longest = store
        .analytics()
        .longest_single_hold()
        .expect("longest")
        .expect("has longest");
    assert_eq!(longest.from_number_display, "(415) 92A0");
    assert_eq!(longest.duration_seconds, 500);
    assert_eq!(longest.state.as_deref(), Some("CA"));
}

#[test]
fn longest_hold_tie_goes_to_earliest_call() {
    let store = store();
    call(&store, "CA1", Some("+19129127264"), NOW - 500, location("Savannah", "GA"));
    complete(&store, "CA1", NOW - 400, 100);
    call(&store, "CA2", Some("(415) 555-1212"), NOW - 900, location("Oakland", "CA"));
    complete(&store, "CA2", NOW - 800, 100);

    let longest = store
        .analytics()
        .longest_single_hold()
        .expect("longest")
        .expect("has longest");
    assert_eq!(longest.start_time, NOW - 900);
}

#[test]
fn caller_leaders_group_by_join_key_and_skip_anonymous() {
    let store = store();
    for (index, at) in [NOW - 900, NOW - 800, NOW - 700].iter().enumerate() {
        let sid = format!("CAANON{index}");
        call(&store, &sid, None, *at, location("Nowhere", "NV"));
        complete(&store, &sid, *at + 50, 1_000);
    }

    call(&store, "CA1", Some("+19129127264"), NOW - 600, location("Savannah", "GA"));
    complete(&store, "CA1", NOW - 550, 30);
    call(&store, "CA2", Some("+19129127264"), NOW - 400, location("Atlanta", "GA"));
    complete(&store, "CA2", NOW - 350, 40);
    call(&store, "CA3", Some("(415) 555-1212"), NOW - 300, location("Oakland", "CA"));
    complete(&store, "CA3", NOW - 100, 120);

    let most_calls = store
        .analytics()
        .most_calls()
        .expect("most calls")
        .expect("has leader");
    assert_eq!(most_calls.from_number_display, "(912) 2F6E");
    assert_eq!(most_calls.total_calls, 2);
    assert_eq!(most_calls.total_duration_seconds, 70);
    assert_eq!(most_calls.city.as_deref(), Some("Atlanta"));

    let total_time = store
        .analytics()
        .most_time_overall()
        .expect("total time")
        .expect("has leader");
    assert_eq!(total_time.from_number_display, "(415) 92A0");
    assert_eq!(total_time.total_duration_seconds, 120);
}

#[test]
fn formatting_variants_count_as_separate_callers() {
    let store = store();
    call(&store, "CA1", Some("912-912-7264"), NOW - 300, location("Savannah", "GA"));
    call(&store, "CA2", Some("9129127264"), NOW - 200, location("Savannah", "GA"));

    let most_calls = store
        .analytics()
        .most_calls()
        .expect("most calls")
        .expect("has leader");
    assert_eq!(most_calls.total_calls, 1);
    assert_eq!(most_calls.from_number_display, "(912) 2F6E");
}

#[test]
fn total_time_requires_some_duration() {
    let store = store();
    call(&store, "CA1", Some("+19129127264"), NOW - 300, location("Savannah", "GA"));

    assert!(store.analytics().most_calls().expect("most calls").is_some());
    assert!(store
        .analytics()
        .most_time_overall()
        .expect("total time")
        .is_none());
}

#[test]
fn geographic_leader_counts_calls_per_region() {
    let store = store();
    call(&store, "CA1", Some("+19129127264"), NOW - 300, location("Savannah", "GA"));
    call(&store, "CA2", Some("(415) 555-1212"), NOW - 200, location("Atlanta", "GA"));
    call(&store, "CA3", Some("5551234"), NOW - 100, location("Oakland", "CA"));
    call(&store, "CA4", None, NOW - 50, CallerLocation::default());

    let leader = store
        .analytics()
        .geographic_leader()
        .expect("geo")
        .expect("has leader");
    assert_eq!(leader.state.as_deref(), Some("GA"));
    assert_eq!(leader.country.as_deref(), Some("US"));
    assert_eq!(leader.total_calls, 2);
}

#[test]
fn recent_calls_are_completed_newest_first_and_limited() {
    let store = store();
    for index in 0..5 {
        let sid = format!("CA{index}");
        let at = NOW - 1_000 + index * 100;
        call(&store, &sid, Some("+19129127264"), at, location("Savannah", "GA"));
        complete(&store, &sid, at + 60, 60);
    }
    call(&store, "CAOPEN", Some("5551234"), NOW - 10, location("Austin", "TX"));

    let recent = store.analytics().recent_calls(3).expect("recent");
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].start_time, NOW - 600);
    assert_eq!(recent[2].start_time, NOW - 800);
    assert!(recent
        .iter()
        .all(|item| item.status == CallStatus::Completed));
}

#[test]
fn active_calls_respect_window() {
    let store = store();
    call(&store, "CAOLD", Some("+19129127264"), NOW - 7_200, location("Savannah", "GA"));
    call(&store, "CANEW", Some("5551234"), NOW - 90, location("Austin", "TX"));
    call(&store, "CADONE", Some("(415) 555-1212"), NOW - 60, location("Oakland", "CA"));
    complete(&store, "CADONE", NOW - 10, 50);

    let active = store
        .analytics()
        .active_calls(NOW, 3_600)
        .expect("active");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].from_number_display, "D8BA7F");
    assert_eq!(active[0].current_duration_seconds, 90);
}

#[test]
fn snapshot_collects_every_figure() {
    let store = store();
    call(&store, "CA1", Some("+19129127264"), NOW - 300, location("Savannah", "GA"));
    complete(&store, "CA1", NOW - 100, 200);

    let snapshot = store
        .analytics()
        .snapshot(NOW, 10, 3_600)
        .expect("snapshot");
    assert_eq!(snapshot.recent_calls.len(), 1);
    assert_eq!(
        snapshot.longest_hold.as_ref().map(|hold| hold.duration_seconds),
        Some(200)
    );
}
