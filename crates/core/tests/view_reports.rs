//! View-reports flows: drill-down levels, live-entry merge, cache safety.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use chrono::Duration;
use support::{engine_over, running_entry, test_now, MockTracker};
use tally_core::{Effect, Grouping, Span, SummaryQuery};
use tally_domain::{GroupKey, SubKey, Summary};
use tokio_util::sync::CancellationToken;

fn week_query(grouping: Grouping) -> SummaryQuery {
    SummaryQuery::for_span(&support::test_profile(), grouping, Span::Week, test_now())
}

fn seed_summary(tracker: &MockTracker, grouping: Grouping, summary: Summary) {
    tracker.summaries.lock().insert(week_query(grouping).cache_key(), summary);
}

#[tokio::test]
async fn fresh_running_entry_on_an_empty_week() {
    // Empty cache, one running entry for Website that just started: exactly
    // one 0:00:00 top line, plus Website with the live elapsed time, and no
    // other groups.
    let tracker = MockTracker::with_profile();
    *tracker.running.lock() = Some(running_entry(Some(100), "docs", test_now()));
    let engine = engine_over(tracker);
    let cancel = CancellationToken::new();

    let actions = engine.evaluate("view week projects", &cancel).await;

    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].title, "0:00:00 tracked this week");
    assert_eq!(actions[0].effect, Effect::Nothing);
    assert_eq!(actions[1].title, "Website");
    assert_eq!(actions[1].subtitle, "Acme · 0:00:00");
}

#[tokio::test]
async fn live_elapsed_is_added_to_the_running_project() {
    let tracker = MockTracker::with_profile();
    *tracker.running.lock() =
        Some(running_entry(Some(100), "docs", test_now() - Duration::minutes(10)));
    let mut summary = Summary::new();
    summary.add_seconds(GroupKey::Id(100), SubKey::Title("docs".to_string()), None, 600);
    seed_summary(&tracker, Grouping::Projects, summary);
    let engine = engine_over(tracker);
    let cancel = CancellationToken::new();

    let actions = engine.evaluate("view week projects", &cancel).await;

    // 10 cached minutes plus 10 live minutes.
    assert_eq!(actions[0].title, "0:20:00 tracked this week");
    assert_eq!(actions[1].subtitle, "Acme · 0:20:00");
}

#[tokio::test]
async fn merge_never_writes_back_into_the_cache() {
    let tracker = MockTracker::with_profile();
    *tracker.running.lock() =
        Some(running_entry(Some(100), "docs", test_now() - Duration::minutes(10)));
    let engine = engine_over(tracker.clone());
    let cancel = CancellationToken::new();

    let _ = engine.evaluate("view week projects", &cancel).await;

    // A second read must hit the cache (one remote fetch) and still be the
    // original, unmerged aggregate.
    let cached = engine
        .store()
        .summary(&week_query(Grouping::Projects), false)
        .await
        .unwrap();
    assert_eq!(cached.seconds(), 0);
    assert_eq!(tracker.summary_fetches.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn groups_are_sorted_by_tracked_seconds_descending() {
    let tracker = MockTracker::with_profile();
    let mut summary = Summary::new();
    summary.add_seconds(GroupKey::Id(100), SubKey::Title("a".to_string()), None, 600);
    summary.add_seconds(GroupKey::Id(200), SubKey::Title("b".to_string()), None, 7200);
    seed_summary(&tracker, Grouping::Projects, summary);
    let engine = engine_over(tracker);
    let cancel = CancellationToken::new();

    let actions = engine.evaluate("view week projects", &cancel).await;

    let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["2:10:00 tracked this week", "Backend", "Website"]);
    assert!(actions[1].score > actions[2].score);
    assert_eq!(actions[0].score, actions[1].score + 1);
}

#[tokio::test]
async fn client_drill_down_rewrites_with_the_projects_sub_argument() {
    let tracker = MockTracker::with_profile();
    let mut summary = Summary::new();
    summary.add_seconds(GroupKey::Id(50), SubKey::Id(100), Some("Website"), 3600);
    seed_summary(&tracker, Grouping::Clients, summary);
    let engine = engine_over(tracker);
    let cancel = CancellationToken::new();

    let actions = engine.evaluate("view week clients", &cancel).await;
    let acme = actions.iter().find(|a| a.title == "Acme").unwrap();

    let Effect::Rewrite { query, .. } = &acme.effect else {
        panic!("group entries are selectors");
    };
    assert_eq!(query, "view week projects acme ");
}

#[tokio::test]
async fn leaf_selection_rewrites_into_a_seeded_start() {
    let tracker = MockTracker::with_profile();
    let mut summary = Summary::new();
    summary.add_seconds(GroupKey::Id(100), SubKey::Title("api design".to_string()), None, 3600);
    seed_summary(&tracker, Grouping::Projects, summary);
    let engine = engine_over(tracker);
    let cancel = CancellationToken::new();

    let actions = engine.evaluate("view week projects website", &cancel).await;

    assert_eq!(actions[0].title, "1:00:00 tracked this week");
    let leaf = actions.iter().find(|a| a.title == "api design").unwrap();
    let Effect::Rewrite { query, .. } = &leaf.effect else {
        panic!("leaves are selectors");
    };
    assert_eq!(query, "start website api design ");
}

#[tokio::test]
async fn sub_group_filter_spans_multiple_words() {
    let tracker = MockTracker::with_profile();
    let mut summary = Summary::new();
    summary.add_seconds(GroupKey::Id(100), SubKey::Title("api design".to_string()), None, 3600);
    summary.add_seconds(GroupKey::Id(100), SubKey::Title("api review".to_string()), None, 1800);
    seed_summary(&tracker, Grouping::Projects, summary);
    let engine = engine_over(tracker);
    let cancel = CancellationToken::new();

    // The first filter word alone matches both leaves; the full phrase must
    // narrow to one.
    let actions = engine.evaluate("view week projects website api design", &cancel).await;

    let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["api design"]);
}

#[tokio::test]
async fn span_selector_shows_for_missing_or_invalid_span() {
    let tracker = MockTracker::with_profile();
    let engine = engine_over(tracker);
    let cancel = CancellationToken::new();

    let actions = engine.evaluate("view", &cancel).await;
    let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["Day", "Week", "Month", "Year"]);

    // An invalid token narrows the same selector.
    let actions = engine.evaluate("view wee", &cancel).await;
    let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["Week"]);
}

#[tokio::test]
async fn grouping_selector_ranks_projects_first() {
    let tracker = MockTracker::with_profile();
    let engine = engine_over(tracker);
    let cancel = CancellationToken::new();

    let actions = engine.evaluate("view week ", &cancel).await;
    let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["Projects", "Clients", "Entries"]);
    assert_eq!(actions[0].score, actions[1].score + 1);
}
