//! Integration tests for tweetsweep-sweeper
//!
//! The drivers run against real ledger files, a scripted decision source, a
//! scripted deletion API and a clock that never sleeps.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tempfile::TempDir;
use tweetsweep_domain::{AuthError, Credentials, Decision, DeleteOutcome, DeletionApi, Disposition, Record, RecordId};
use tweetsweep_store::{Archive, DecisionLedger};
use tweetsweep_sweeper::{
    run_review, DecisionSource, DestructionConfig, DestructionEvent, Destroyer, FailureReason, KindFilter, Pause,
    ReviewItem, Scope, Selection, Session, SweepError,
};

fn id(s: &str) -> RecordId {
    RecordId::parse(s).unwrap()
}

fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_600_000_000, 0).unwrap()
}

fn record(s: &str, offset_secs: i64) -> Record {
    Record::new(id(s), format!("post {}", s), epoch() + ChronoDuration::seconds(offset_secs))
}

fn session_with(dir: &TempDir, ids: &[&str]) -> Session {
    let records = ids.iter().enumerate().map(|(i, s)| record(s, i as i64)).collect();
    Session::new(Archive::from_records(records), DecisionLedger::load(dir.path()).unwrap())
}

fn credentials() -> Credentials {
    Credentials::new("ck", "cs", "ak", "as")
}

/// Answers in order, then quits
struct Scripted {
    answers: VecDeque<Decision>,
    seen: Vec<RecordId>,
}

impl Scripted {
    fn new(answers: &[Decision]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            seen: Vec::new(),
        }
    }
}

impl DecisionSource for Scripted {
    fn decide(&mut self, item: &ReviewItem<'_>) -> std::io::Result<Decision> {
        self.seen.push(item.record.id.clone());
        Ok(self.answers.pop_front().unwrap_or(Decision::Quit))
    }
}

/// Deletion API that replays queued outcomes per id and defaults to success
#[derive(Default)]
struct MockApi {
    outcomes: RefCell<HashMap<RecordId, VecDeque<DeleteOutcome>>>,
    calls: RefCell<Vec<RecordId>>,
    reject_login: bool,
}

impl MockApi {
    fn script(self, s: &str, outcomes: Vec<DeleteOutcome>) -> Self {
        self.outcomes.borrow_mut().insert(id(s), outcomes.into());
        self
    }

    fn calls(&self) -> Vec<RecordId> {
        self.calls.borrow().clone()
    }
}

impl DeletionApi for MockApi {
    type Session = String;

    fn authenticate(&self, _credentials: &Credentials) -> Result<String, AuthError> {
        if self.reject_login {
            Err(AuthError("HTTP 401".to_string()))
        } else {
            Ok("tester".to_string())
        }
    }

    fn delete(&self, _session: &String, id: &RecordId) -> DeleteOutcome {
        self.calls.borrow_mut().push(id.clone());
        self.outcomes
            .borrow_mut()
            .get_mut(id)
            .and_then(VecDeque::pop_front)
            .unwrap_or(DeleteOutcome::Deleted)
    }
}

/// Clock that advances instantly and remembers every wait
struct FakePause {
    now: DateTime<Utc>,
    waits: Vec<Duration>,
}

impl FakePause {
    fn new() -> Self {
        Self {
            now: epoch(),
            waits: Vec::new(),
        }
    }
}

impl Pause for FakePause {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn pause(&mut self, duration: Duration) {
        self.now += ChronoDuration::from_std(duration).unwrap();
        self.waits.push(duration);
    }
}

fn quick_config() -> DestructionConfig {
    DestructionConfig {
        max_transient_attempts: 3,
        transient_delay_ms: 10,
        request_delay_ms: 0,
        rate_limit_margin_secs: 0,
    }
}

fn marked_ledger(dir: &TempDir, ids: &[&str]) -> DecisionLedger {
    let mut ledger = DecisionLedger::load(dir.path()).unwrap();
    for s in ids {
        ledger.record_destroy(&id(s)).unwrap();
    }
    ledger
}

#[test]
fn test_keep_destroy_skip() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with(&dir, &["a", "b", "c"]);
    let mut source = Scripted::new(&[Decision::Keep, Decision::Destroy, Decision::Skip]);

    let outcome = run_review(&mut session, &Selection::default(), &mut source).unwrap();

    assert_eq!(outcome.kept, 1);
    assert_eq!(outcome.marked, 1);
    assert_eq!(outcome.skipped, 1);
    assert!(!outcome.quit);
    assert!(session.ledger.ids(Disposition::Kept).contains(&id("a")));
    assert!(session.ledger.ids(Disposition::Marked).contains(&id("b")));
    let pending: Vec<&str> = session.pending().map(|r| r.id.as_str()).collect();
    assert_eq!(pending, vec!["c"]);

    // Decisions are on disk before the session ends
    let reloaded = DecisionLedger::load(dir.path()).unwrap();
    assert_eq!(reloaded.counts(), session.ledger.counts());
}

#[test]
fn test_decided_records_are_not_presented_again() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with(&dir, &["a", "b", "c"]);
    session.ledger.record_keep(&id("b")).unwrap();

    let mut source = Scripted::new(&[Decision::Skip, Decision::Skip]);
    run_review(&mut session, &Selection::default(), &mut source).unwrap();

    assert_eq!(source.seen, vec![id("a"), id("c")]);
}

#[test]
fn test_quit_stops_early() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with(&dir, &["a", "b", "c"]);
    let mut source = Scripted::new(&[Decision::Destroy, Decision::Quit]);

    let outcome = run_review(&mut session, &Selection::default(), &mut source).unwrap();

    assert!(outcome.quit);
    assert_eq!(outcome.marked, 1);
    assert_eq!(source.seen.len(), 2);
    assert_eq!(session.status().pending, 2);
}

#[test]
fn test_review_positions_and_parent() {
    let dir = TempDir::new().unwrap();
    let parent = record("10", 0);
    let mut reply = record("11", 1);
    reply.in_reply_to = Some(id("10"));
    let mut session = Session::new(
        Archive::from_records(vec![parent, reply]),
        DecisionLedger::load(dir.path()).unwrap(),
    );

    struct Check;
    impl DecisionSource for Check {
        fn decide(&mut self, item: &ReviewItem<'_>) -> std::io::Result<Decision> {
            assert_eq!(item.total, 2);
            if item.position == 2 {
                assert_eq!(item.parent.map(|p| p.id.as_str()), Some("10"));
                assert_eq!(item.counts.kept, 1);
            } else {
                assert!(item.parent.is_none());
            }
            Ok(Decision::Keep)
        }
    }

    let outcome = run_review(&mut session, &Selection::default(), &mut Check).unwrap();
    assert_eq!(outcome.kept, 2);
}

#[test]
fn test_span_selection() {
    let dir = TempDir::new().unwrap();
    let old = Record::new(id("1"), "old", Utc.with_ymd_and_hms(2012, 5, 1, 0, 0, 0).unwrap());
    let new = Record::new(id("2"), "new", Utc.with_ymd_and_hms(2019, 5, 1, 0, 0, 0).unwrap());
    let mut session = Session::new(
        Archive::from_records(vec![old, new]),
        DecisionLedger::load(dir.path()).unwrap(),
    );

    let selection = Selection::new(Scope::Span("2012".to_string()), KindFilter::default());
    let mut source = Scripted::new(&[Decision::Destroy, Decision::Destroy]);
    run_review(&mut session, &selection, &mut source).unwrap();

    assert_eq!(source.seen, vec![id("1")]);
    assert_eq!(session.status().pending, 1);
}

#[test]
fn test_input_error_ends_session() {
    struct Broken;
    impl DecisionSource for Broken {
        fn decide(&mut self, _item: &ReviewItem<'_>) -> std::io::Result<Decision> {
            Err(std::io::Error::other("terminal went away"))
        }
    }

    let dir = TempDir::new().unwrap();
    let mut session = session_with(&dir, &["a"]);
    let result = run_review(&mut session, &Selection::default(), &mut Broken);
    assert!(matches!(result, Err(SweepError::Input(_))));
}

#[test]
fn test_ledger_write_failure_ends_review() {
    let dir = TempDir::new().unwrap();
    let gone = dir.path().join("gone");
    let records = vec![record("a", 0), record("b", 1)];
    let mut session = Session::new(Archive::from_records(records), DecisionLedger::load(&gone).unwrap());
    let mut source = Scripted::new(&[Decision::Keep, Decision::Keep]);

    let result = run_review(&mut session, &Selection::new(Scope::All, KindFilter::default()), &mut source);

    assert!(matches!(result, Err(SweepError::Ledger(_))), "got {:?}", result);
    assert_eq!(source.seen, vec![id("a")]);
    assert!(!session.ledger.is_decided(&id("a")));
}

#[test]
fn test_rate_limit_waits_then_retries() {
    let dir = TempDir::new().unwrap();
    let mut ledger = marked_ledger(&dir, &["b", "d"]);
    let api = MockApi::default().script(
        "d",
        vec![DeleteOutcome::RateLimited {
            reset_at: epoch() + ChronoDuration::seconds(5),
        }],
    );

    let mut destroyer = Destroyer::with_pause(&api, quick_config(), FakePause::new());
    let remote = destroyer.authenticate(&credentials()).unwrap();
    let report = destroyer.run(&remote, &mut ledger).unwrap();

    assert_eq!(destroyer.pause().waits, vec![Duration::from_secs(5)]);
    assert_eq!(api.calls(), vec![id("b"), id("d"), id("d")]);
    assert_eq!(report.destroyed, vec![id("b"), id("d")]);
    assert_eq!(report.rate_limit_waits, 1);
    assert_eq!(report.remaining, 0);
    assert!(ledger.ids(Disposition::Marked).is_empty());
    assert_eq!(ledger.ids(Disposition::Destroyed).len(), 2);

    let reloaded = DecisionLedger::load(dir.path()).unwrap();
    assert!(reloaded.ids(Disposition::Marked).is_empty());
    assert_eq!(reloaded.ids(Disposition::Destroyed).len(), 2);
}

#[test]
fn test_rate_limit_in_the_past_still_waits() {
    let dir = TempDir::new().unwrap();
    let mut ledger = marked_ledger(&dir, &["x"]);
    let api = MockApi::default().script(
        "x",
        vec![DeleteOutcome::RateLimited {
            reset_at: epoch() - ChronoDuration::seconds(30),
        }],
    );

    let mut destroyer = Destroyer::with_pause(&api, quick_config(), FakePause::new());
    destroyer.run(&"tester".to_string(), &mut ledger).unwrap();

    assert_eq!(destroyer.pause().waits, vec![Duration::from_secs(1)]);
}

#[test]
fn test_permission_denied_stays_marked() {
    let dir = TempDir::new().unwrap();
    let mut ledger = marked_ledger(&dir, &["e"]);
    let api = MockApi::default().script("e", vec![DeleteOutcome::PermissionDenied]);

    let mut destroyer = Destroyer::with_pause(&api, quick_config(), FakePause::new());
    let report = destroyer.run(&"tester".to_string(), &mut ledger).unwrap();

    assert_eq!(report.failed, vec![(id("e"), FailureReason::PermissionDenied)]);
    assert_eq!(report.remaining, 1);
    assert!(ledger.ids(Disposition::Marked).contains(&id("e")));
    assert!(ledger.ids(Disposition::Destroyed).is_empty());
}

#[test]
fn test_already_deleted_counts_as_destroyed() {
    let dir = TempDir::new().unwrap();
    let mut ledger = marked_ledger(&dir, &["1", "2"]);
    let api = MockApi::default()
        .script("1", vec![DeleteOutcome::AlreadyDeleted])
        .script("2", vec![DeleteOutcome::NotFound]);

    let mut destroyer = Destroyer::with_pause(&api, quick_config(), FakePause::new());
    let report = destroyer.run(&"tester".to_string(), &mut ledger).unwrap();

    assert_eq!(report.destroyed, vec![id("1")]);
    assert_eq!(report.failed, vec![(id("2"), FailureReason::NotFound)]);
}

#[test]
fn test_second_run_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut ledger = marked_ledger(&dir, &["1", "2", "3"]);
    let api = MockApi::default();

    let mut destroyer = Destroyer::with_pause(&api, quick_config(), FakePause::new());
    destroyer.run(&"tester".to_string(), &mut ledger).unwrap();
    assert_eq!(api.calls().len(), 3);

    let mut reloaded = DecisionLedger::load(dir.path()).unwrap();
    let report = destroyer.run(&"tester".to_string(), &mut reloaded).unwrap();
    assert_eq!(api.calls().len(), 3);
    assert!(report.destroyed.is_empty());
    assert!(report.is_complete());
}

#[test]
fn test_transient_retries_then_gives_up() {
    let dir = TempDir::new().unwrap();
    let mut ledger = marked_ledger(&dir, &["1", "2"]);
    let api = MockApi::default()
        .script(
            "1",
            vec![
                DeleteOutcome::Transient("HTTP 503".into()),
                DeleteOutcome::Transient("HTTP 503".into()),
                DeleteOutcome::Transient("HTTP 502".into()),
            ],
        )
        .script("2", vec![DeleteOutcome::Transient("timeout".into())]);

    let mut events = Vec::new();
    let mut destroyer = Destroyer::with_pause(&api, quick_config(), FakePause::new());
    let report = destroyer
        .run_with(&"tester".to_string(), &mut ledger, |e| events.push(e.clone()))
        .unwrap();

    assert_eq!(api.calls(), vec![id("1"), id("1"), id("1"), id("2"), id("2")]);
    assert_eq!(
        report.failed,
        vec![(
            id("1"),
            FailureReason::TransientExhausted {
                attempts: 3,
                last_error: "HTTP 502".to_string(),
            }
        )]
    );
    assert_eq!(report.destroyed, vec![id("2")]);
    assert_eq!(destroyer.pause().waits, vec![Duration::from_millis(10); 3]);
    assert!(events.contains(&DestructionEvent::Destroyed(id("2"))));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, DestructionEvent::Retrying { .. }))
            .count(),
        3
    );
}

#[test]
fn test_revoked_credentials_abort_the_run() {
    let dir = TempDir::new().unwrap();
    let mut ledger = marked_ledger(&dir, &["1", "2", "3"]);
    let api = MockApi::default().script("2", vec![DeleteOutcome::Unauthorized]);

    let mut destroyer = Destroyer::with_pause(&api, quick_config(), FakePause::new());
    let result = destroyer.run(&"tester".to_string(), &mut ledger);

    assert!(matches!(result, Err(SweepError::Auth(_))));
    assert_eq!(api.calls(), vec![id("1"), id("2")]);
    let reloaded = DecisionLedger::load(dir.path()).unwrap();
    assert!(reloaded.ids(Disposition::Destroyed).contains(&id("1")));
    assert_eq!(reloaded.ids(Disposition::Marked).len(), 2);
}

#[test]
fn test_ledger_write_failure_halts_destruction() {
    let dir = TempDir::new().unwrap();
    let mut ledger = marked_ledger(&dir, &["1", "2"]);
    std::fs::create_dir(dir.path().join("destroyed.ids")).unwrap();
    let api = MockApi::default();

    let mut destroyer = Destroyer::with_pause(&api, quick_config(), FakePause::new());
    let result = destroyer.run(&"tester".to_string(), &mut ledger);

    assert!(matches!(result, Err(SweepError::Ledger(_))), "got {:?}", result);
    assert_eq!(api.calls(), vec![id("1")]);
    assert_eq!(ledger.ids(Disposition::Marked).len(), 2);
    let on_disk = std::fs::read_to_string(dir.path().join("marked.ids")).unwrap();
    assert_eq!(on_disk.lines().collect::<Vec<_>>(), vec!["1", "2"]);
}

#[test]
fn test_rejected_login() {
    let api = MockApi {
        reject_login: true,
        ..Default::default()
    };
    let destroyer = Destroyer::with_pause(&api, quick_config(), FakePause::new());
    assert!(matches!(destroyer.authenticate(&credentials()), Err(SweepError::Auth(_))));
}

#[test]
fn test_request_pacing() {
    let dir = TempDir::new().unwrap();
    let mut ledger = marked_ledger(&dir, &["1", "2", "3"]);
    let api = MockApi::default();
    let config = DestructionConfig {
        request_delay_ms: 250,
        ..quick_config()
    };

    let mut destroyer = Destroyer::with_pause(&api, config, FakePause::new());
    destroyer.run(&"tester".to_string(), &mut ledger).unwrap();

    assert_eq!(destroyer.pause().waits, vec![Duration::from_millis(250); 2]);
}

fn decision_strategy() -> impl Strategy<Value = Decision> {
    prop_oneof![
        4 => Just(Decision::Keep),
        4 => Just(Decision::Destroy),
        4 => Just(Decision::Skip),
        1 => Just(Decision::Quit),
    ]
}

proptest! {
    #[test]
    fn prop_every_record_in_exactly_one_state(
        answers in prop::collection::vec(decision_strategy(), 0..30),
        count in 1usize..20,
    ) {
        let dir = TempDir::new().unwrap();
        let ids: Vec<String> = (0..count).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let mut session = session_with(&dir, &refs);

        let mut source = Scripted::new(&answers);
        let outcome = run_review(&mut session, &Selection::default(), &mut source).unwrap();

        let pending: Vec<RecordId> = session.pending().map(|r| r.id.clone()).collect();
        for record in session.archive.records() {
            let states = Disposition::ALL
                .into_iter()
                .filter(|&d| session.ledger.ids(d).contains(&record.id))
                .count()
                + usize::from(pending.contains(&record.id));
            prop_assert_eq!(states, 1);
        }

        let status = session.status();
        prop_assert_eq!(status.kept, outcome.kept);
        prop_assert_eq!(status.marked, outcome.marked);
        prop_assert_eq!(status.pending + status.kept + status.marked + status.destroyed, status.total);
    }
}
