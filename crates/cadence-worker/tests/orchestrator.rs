//! End-to-end runs of `RecurrenceWorker` over the in-memory store.

use cadence_core::Task;
use cadence_core::enums::{AnchorPolicy, Priority, TaskStatus};
use cadence_core::responses::{RunReport, TaskOutcome};
use cadence_worker::memory::MemoryStore;
use cadence_worker::{RecurrenceWorker, WorkerError, WorkerSettings};
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;

fn at(m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, m, d, h, 0, 0).unwrap()
}

fn done_task(
    id: &str,
    name: &str,
    schedule: &str,
    due: Option<DateTime<Utc>>,
    completed: DateTime<Utc>,
) -> Task {
    Task {
        id: id.into(),
        name: name.into(),
        done: true,
        status: Some(TaskStatus::Done),
        priority: Some(Priority::Medium),
        tags: vec!["Home".into()],
        schedule: Some(schedule.into()),
        due_date: due,
        parent_id: None,
        created_at: at(1, 1, 0),
        last_edited_at: completed,
    }
}

fn rent() -> Task {
    done_task(
        "rent-1",
        "Pay rent",
        "Every 1 months, on day 1, at 9am",
        Some(at(3, 1, 9)),
        at(3, 2, 10),
    )
}

fn worker(store: MemoryStore) -> RecurrenceWorker<MemoryStore> {
    RecurrenceWorker::new(store, WorkerSettings::default())
}

fn worker_with(
    store: MemoryStore,
    tweak: impl FnOnce(&mut WorkerSettings),
) -> RecurrenceWorker<MemoryStore> {
    let mut settings = WorkerSettings::default();
    tweak(&mut settings);
    RecurrenceWorker::new(store, settings)
}

fn created_due(report: &RunReport, name: &str) -> DateTime<Utc> {
    let line = report
        .tasks
        .iter()
        .find(|t| t.name == name)
        .unwrap_or_else(|| panic!("no report line for {name}"));
    match &line.outcome {
        TaskOutcome::Created { due_date, .. } => *due_date,
        other => panic!("expected {name} to be created, got {other:?}"),
    }
}

// ── Happy path ────────────────────────────────────────────────────

#[tokio::test]
async fn creates_successor_and_advances_checkpoint() {
    let worker = worker(MemoryStore::with_tasks([rent()]));
    let now = at(3, 5, 12);

    let report = worker.run_at(now).await.unwrap();

    assert_eq!(report.checkpoint, DateTime::UNIX_EPOCH);
    assert_eq!(report.run_at, now);
    assert_eq!((report.found, report.created, report.failed), (1, 1, 0));
    assert_eq!(created_due(&report, "Pay rent"), at(4, 1, 9));
    assert_eq!(worker.store().checkpoint(), Some(now));

    let tasks = worker.store().tasks();
    assert_eq!(tasks.len(), 2);
    let successor = &tasks[1];
    assert_eq!(successor.name, "Pay rent");
    assert!(!successor.done);
    assert_eq!(successor.status, Some(TaskStatus::ToDo));
    assert_eq!(successor.priority, Some(Priority::Medium));
    assert_eq!(successor.tags, vec!["Home".to_string()]);
    assert_eq!(successor.schedule, rent().schedule);
    assert_eq!(successor.due_date, Some(at(4, 1, 9)));
    assert_eq!(successor.parent_id.as_deref(), Some("rent-1"));

    match &report.tasks[0].outcome {
        TaskOutcome::Created { task_id, .. } => assert_eq!(task_id.as_deref(), Some(successor.id.as_str())),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn second_run_finds_nothing_new() {
    let worker = worker(MemoryStore::with_tasks([rent()]));
    worker.run_at(at(3, 5, 12)).await.unwrap();

    let report = worker.run_at(at(3, 5, 13)).await.unwrap();
    assert_eq!(report.checkpoint, at(3, 5, 12));
    assert_eq!(report.found, 0);
    assert_eq!(worker.store().tasks().len(), 2);
    assert_eq!(worker.store().checkpoint(), Some(at(3, 5, 13)));
}

#[tokio::test]
async fn rerun_from_same_checkpoint_skips_open_successor() {
    let worker = worker(MemoryStore::with_tasks([rent()]));
    worker.run_at(at(3, 5, 12)).await.unwrap();

    worker.store().set_checkpoint(None);
    let report = worker.run_at(at(3, 5, 13)).await.unwrap();

    assert_eq!(report.found, 1);
    assert_eq!(report.skipped_duplicate, 1);
    assert_eq!(report.tasks[0].outcome, TaskOutcome::SkippedDuplicate);
    assert_eq!(worker.store().tasks().len(), 2);
}

#[tokio::test]
async fn completing_the_successor_continues_the_chain() {
    let worker = worker(MemoryStore::with_tasks([rent()]));
    worker.run_at(at(3, 5, 12)).await.unwrap();

    let successor_id = worker.store().tasks()[1].id.clone();
    assert!(worker.store().complete(&successor_id, at(4, 1, 18)));

    let report = worker.run_at(at(4, 2, 8)).await.unwrap();
    assert_eq!(report.created, 1);
    assert_eq!(created_due(&report, "Pay rent"), at(5, 1, 9));

    let tasks = worker.store().tasks();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[2].parent_id.as_deref(), Some(successor_id.as_str()));
}

#[tokio::test]
async fn most_recent_completion_wins_per_name() {
    let store = MemoryStore::with_tasks([
        done_task("w-old", "Water plants", "Every 3 days", None, at(3, 3, 10)),
        done_task("w-new", "Water plants", "Every 3 days", None, at(3, 4, 10)),
    ]);
    let worker = worker(store);

    let report = worker.run_at(at(3, 5, 12)).await.unwrap();

    assert_eq!(report.found, 1);
    assert_eq!(report.tasks[0].source_id, "w-new");
    assert_eq!(created_due(&report, "Water plants"), at(3, 7, 10));

    let created: Vec<Task> = worker.store().tasks().into_iter().filter(|t| !t.done).collect();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].parent_id.as_deref(), Some("w-new"));
}

// ── Failures ──────────────────────────────────────────────────────

#[tokio::test]
async fn one_failing_task_does_not_stop_the_others() {
    let store = MemoryStore::with_tasks([
        done_task("a", "Stretch", "Every day, at 7am", None, at(3, 4, 12)),
        done_task("b", "Mystery", "whenever I feel like it", None, at(3, 4, 11)),
        done_task("c", "Taxes", "Every 1 years", Some(at(4, 15, 0)), at(3, 4, 10)),
    ]);
    store.fail_create_for("Taxes");
    let worker = worker(store);

    let report = worker.run_at(at(3, 5, 12)).await.unwrap();

    assert_eq!((report.found, report.created, report.failed), (3, 1, 2));
    let names: Vec<&str> = report.tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Stretch", "Mystery", "Taxes"]);
    assert_eq!(created_due(&report, "Stretch"), at(3, 6, 7));
    assert!(matches!(report.tasks[1].outcome, TaskOutcome::Failed { .. }));
    match &report.tasks[2].outcome {
        TaskOutcome::Failed { reason } => assert!(reason.contains("create failed"), "{reason}"),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(worker.store().checkpoint(), Some(at(3, 5, 12)));
}

#[tokio::test]
async fn crash_before_checkpoint_is_recovered_without_duplicates() {
    let store = MemoryStore::with_tasks([rent()]);
    store.fail_checkpoint_write(true);
    let worker = worker(store);

    let err = worker.run_at(at(3, 5, 12)).await.unwrap_err();
    assert!(matches!(err, WorkerError::Checkpoint(_)));
    assert_eq!(worker.store().checkpoint(), None);
    assert_eq!(worker.store().tasks().len(), 2);

    worker.store().fail_checkpoint_write(false);
    let report = worker.run_at(at(3, 5, 13)).await.unwrap();

    assert_eq!(report.checkpoint, DateTime::UNIX_EPOCH);
    assert_eq!(report.skipped_duplicate, 1);
    assert_eq!(worker.store().tasks().len(), 2);
    assert_eq!(worker.store().checkpoint(), Some(at(3, 5, 13)));
}

#[tokio::test]
async fn interrupted_creation_batch_is_finished_on_rerun() {
    let store = MemoryStore::with_tasks([
        done_task("a", "Stretch", "Every day", None, at(3, 4, 12)),
        done_task("b", "Read", "Every 2 days", None, at(3, 4, 11)),
    ]);
    store.limit_creates(Some(1));
    let worker = worker_with(store, |s| s.concurrency = 1);

    let first = worker.run_at(at(3, 5, 12)).await.unwrap();
    assert_eq!((first.created, first.failed), (1, 1));

    // Failed tasks are not retried from a later checkpoint; replay from the old one.
    worker.store().limit_creates(None);
    worker.store().set_checkpoint(Some(first.checkpoint));
    let second = worker.run_at(at(3, 5, 13)).await.unwrap();

    assert_eq!((second.created, second.skipped_duplicate), (1, 1));
    let open: Vec<String> = worker
        .store()
        .tasks()
        .into_iter()
        .filter(|t| !t.done)
        .map(|t| t.name)
        .collect();
    assert_eq!(open.len(), 2);
    assert!(open.contains(&"Stretch".to_string()));
    assert!(open.contains(&"Read".to_string()));
}

#[tokio::test]
async fn unreadable_checkpoint_aborts_the_run() {
    let store = MemoryStore::with_tasks([rent()]);
    store.fail_checkpoint_read(true);
    let worker = worker(store);

    let err = worker.run_at(at(3, 5, 12)).await.unwrap_err();
    assert!(matches!(err, WorkerError::Checkpoint(_)));
    assert_eq!(worker.store().tasks().len(), 1);
}

#[tokio::test]
async fn fetch_failure_aborts_without_advancing() {
    let store = MemoryStore::with_tasks([rent()]);
    store.set_checkpoint(Some(at(3, 1, 0)));
    store.fail_queries(true);
    let worker = worker(store);

    let err = worker.run_at(at(3, 5, 12)).await.unwrap_err();
    assert!(matches!(err, WorkerError::Fetch(_)));
    assert_eq!(worker.store().checkpoint(), Some(at(3, 1, 0)));
}

// ── Settings ──────────────────────────────────────────────────────

#[tokio::test]
async fn dry_run_writes_nothing() {
    let worker = worker_with(MemoryStore::with_tasks([rent()]), |s| s.dry_run = true);

    let report = worker.run_at(at(3, 5, 12)).await.unwrap();

    assert!(report.dry_run);
    assert_eq!(
        report.tasks[0].outcome,
        TaskOutcome::Created {
            task_id: None,
            due_date: at(4, 1, 9),
        }
    );
    assert_eq!(worker.store().tasks().len(), 1);
    assert_eq!(worker.store().checkpoint(), None);
}

#[tokio::test]
async fn interval_schedules_anchor_on_completion_by_default() {
    let task = done_task("p", "Water plants", "Every 3 days", Some(at(3, 1, 9)), at(3, 4, 10));
    let worker = worker(MemoryStore::with_tasks([task]));

    let report = worker.run_at(at(3, 5, 12)).await.unwrap();
    assert_eq!(created_due(&report, "Water plants"), at(3, 7, 10));
}

#[tokio::test]
async fn default_anchor_policy_can_pin_due_date() {
    let task = done_task("p", "Water plants", "Every 3 days", Some(at(3, 1, 9)), at(3, 4, 10));
    let worker = worker_with(MemoryStore::with_tasks([task]), |s| {
        s.default_anchor = AnchorPolicy::DueDate;
        s.catch_up = false;
    });

    let report = worker.run_at(at(3, 5, 12)).await.unwrap();
    assert_eq!(created_due(&report, "Water plants"), at(3, 4, 9));
}

#[tokio::test]
async fn schedule_anchor_clause_overrides_policy() {
    let task = done_task(
        "p",
        "Water plants",
        "Every 3 days, from completed date",
        Some(at(3, 1, 9)),
        at(3, 4, 10),
    );
    let worker = worker_with(MemoryStore::with_tasks([task]), |s| {
        s.default_anchor = AnchorPolicy::DueDate;
    });

    let report = worker.run_at(at(3, 5, 12)).await.unwrap();
    assert_eq!(created_due(&report, "Water plants"), at(3, 7, 10));
}

#[tokio::test]
async fn missing_due_date_falls_back_to_completion() {
    // 2024-03-06 is a Wednesday.
    let task = done_task("g", "Gym", "Every monday, at 8am", None, at(3, 6, 10));
    let worker = worker(MemoryStore::with_tasks([task]));

    let report = worker.run_at(at(3, 7, 0)).await.unwrap();
    assert_eq!(created_due(&report, "Gym"), at(3, 11, 8));
}

#[tokio::test]
async fn catch_up_skips_missed_occurrences() {
    let overdue = || {
        done_task(
            "o",
            "Backup",
            "Every 2 days, from due date",
            Some(at(2, 1, 9)),
            at(3, 4, 10),
        )
    };

    let lagging = worker_with(MemoryStore::with_tasks([overdue()]), |s| s.catch_up = false);
    let report = lagging.run_at(at(3, 5, 12)).await.unwrap();
    assert_eq!(created_due(&report, "Backup"), at(2, 3, 9));

    let current = worker(MemoryStore::with_tasks([overdue()]));
    let report = current.run_at(at(3, 5, 12)).await.unwrap();
    assert_eq!(created_due(&report, "Backup"), at(3, 6, 9));
}

#[tokio::test]
async fn report_order_is_independent_of_concurrency() {
    let tasks = || {
        (1..=6).map(|i| {
            done_task(
                &format!("t{i}"),
                &format!("Chore {i}"),
                "Every day",
                None,
                at(3, 4, i),
            )
        })
    };

    let serial = worker_with(MemoryStore::with_tasks(tasks()), |s| s.concurrency = 1);
    let parallel = worker_with(MemoryStore::with_tasks(tasks()), |s| s.concurrency = 8);

    let a = serial.run_at(at(3, 5, 12)).await.unwrap();
    let b = parallel.run_at(at(3, 5, 12)).await.unwrap();

    let order = |r: &RunReport| r.tasks.iter().map(|t| t.source_id.clone()).collect::<Vec<_>>();
    assert_eq!(order(&a), order(&b));
    assert_eq!(order(&a), vec!["t6", "t5", "t4", "t3", "t2", "t1"]);
    assert_eq!(b.created, 6);
}
