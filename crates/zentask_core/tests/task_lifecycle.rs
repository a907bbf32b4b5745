use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;
use zentask_core::alarm::AlarmScanner;
use zentask_core::ports::{CountingCelebration, RecordingNotifier};
use zentask_core::{is_overdue, FixedClock, MemoryTaskRepository, TaskFilter, TaskStore};

type Store = TaskStore<MemoryTaskRepository, FixedClock>;

fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
}

fn date(raw: &str) -> Option<NaiveDate> {
    Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap())
}

fn time(raw: &str) -> Option<NaiveTime> {
    Some(NaiveTime::parse_from_str(raw, "%H:%M").unwrap())
}

fn new_store(now: NaiveDateTime) -> (Store, MemoryTaskRepository, FixedClock) {
    let repo = MemoryTaskRepository::default();
    let clock = FixedClock::new(now);
    let store = TaskStore::load(repo.clone(), clock.clone()).unwrap();
    (store, repo, clock)
}

#[test]
fn created_task_is_first_in_all_filter() {
    let (mut store, _, _) = new_store(at("2024-01-01", "08:00:00"));
    store.create("older", None, None).unwrap();
    let newest = store.create("  newest  ", None, None).unwrap();

    let all: Vec<_> = store.filter(TaskFilter::All).collect();
    assert_eq!(all[0].id, newest.id);
    assert_eq!(all[0].text, "newest");
    assert!(!all[0].completed);
    assert!(!all[0].notified);
}

#[test]
fn blank_create_leaves_store_unchanged() {
    let (mut store, repo, _) = new_store(at("2024-01-01", "08:00:00"));
    store.create("keep", None, None).unwrap();
    let before = store.tasks().to_vec();

    assert!(store.create("", None, None).is_none());
    assert!(store.create("   ", date("2024-01-02"), time("10:00")).is_none());

    assert_eq!(store.tasks(), before.as_slice());
    assert_eq!(repo.save_count(), 1);
}

#[test]
fn toggle_twice_restores_completed_and_keeps_notified() {
    let (mut store, _, _) = new_store(at("2024-01-01", "09:00:00"));
    let task = store
        .create("alarm", date("2024-01-01"), time("09:00"))
        .unwrap();
    AlarmScanner::new(RecordingNotifier::granted()).tick(&mut store);
    assert!(store.get(task.id).unwrap().notified);

    assert!(store.toggle_complete(task.id));
    assert!(store.get(task.id).unwrap().completed);
    assert!(store.get(task.id).unwrap().notified);

    assert!(store.toggle_complete(task.id));
    assert!(!store.get(task.id).unwrap().completed);
    assert!(store.get(task.id).unwrap().notified);
}

#[test]
fn toggle_does_not_reorder() {
    let (mut store, _, _) = new_store(at("2024-01-01", "08:00:00"));
    let a = store.create("a", None, None).unwrap();
    let b = store.create("b", None, None).unwrap();
    store.toggle_complete(a.id);
    store.edit(b.id, "b2", None, None);

    let ids: Vec<_> = store.tasks().iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
}

#[test]
fn edit_preserves_notified_only_when_deadline_unchanged() {
    let (mut store, _, _) = new_store(at("2024-01-01", "09:00:00"));
    let task = store
        .create("call mom", date("2024-01-01"), time("09:00"))
        .unwrap();
    AlarmScanner::new(RecordingNotifier::granted()).tick(&mut store);

    assert!(store.edit(task.id, "call mom today", date("2024-01-01"), time("09:00")));
    let edited = store.get(task.id).unwrap();
    assert_eq!(edited.text, "call mom today");
    assert!(edited.notified);

    assert!(store.edit(task.id, "call mom today", date("2024-01-01"), time("10:00")));
    assert!(!store.get(task.id).unwrap().notified);
}

#[test]
fn edit_changing_only_date_rearms_alarm() {
    let (mut store, _, _) = new_store(at("2024-01-01", "09:00:00"));
    let task = store
        .create("dentist", date("2024-01-01"), time("09:00"))
        .unwrap();
    AlarmScanner::new(RecordingNotifier::granted()).tick(&mut store);

    assert!(store.edit(task.id, "dentist", date("2024-01-02"), time("09:00")));
    assert!(!store.get(task.id).unwrap().notified);
}

#[test]
fn edit_clearing_deadline_rearms_alarm() {
    let (mut store, _, _) = new_store(at("2024-01-01", "09:00:00"));
    let task = store
        .create("gym", date("2024-01-01"), time("09:00"))
        .unwrap();
    AlarmScanner::new(RecordingNotifier::granted()).tick(&mut store);

    assert!(store.edit(task.id, "gym", None, None));
    let edited = store.get(task.id).unwrap();
    assert_eq!(edited.due_date, None);
    assert!(!edited.notified);
}

#[test]
fn invalid_edit_is_a_full_noop() {
    let (mut store, repo, _) = new_store(at("2024-01-01", "08:00:00"));
    let task = store
        .create("original", date("2024-01-05"), time("12:00"))
        .unwrap();
    let saves = repo.save_count();

    assert!(!store.edit(task.id, "   ", None, None));
    assert!(!store.edit(Uuid::new_v4(), "new", None, None));

    assert_eq!(store.get(task.id), Some(&task));
    assert_eq!(repo.save_count(), saves);
}

#[test]
fn delete_removes_permanently() {
    let (mut store, repo, _) = new_store(at("2024-01-01", "08:00:00"));
    let task = store.create("temporary", None, None).unwrap();

    assert!(store.delete(task.id));
    assert!(store.get(task.id).is_none());
    assert!(repo.snapshot().is_empty());
    assert!(!store.delete(task.id));
}

#[test]
fn completion_rate_examples() {
    let (mut store, _, _) = new_store(at("2024-01-01", "08:00:00"));
    assert_eq!(store.completion_rate(), 0);

    let done = store.create("done", None, None).unwrap();
    store.create("open", None, None).unwrap();
    store.toggle_complete(done.id);
    assert_eq!(store.completion_rate(), 50);

    let stats = store.stats();
    assert_eq!((stats.total, stats.completed, stats.active), (2, 1, 1));
    assert_eq!(store.pending_count(), 1);
}

#[test]
fn celebration_only_on_completion() {
    let celebration = CountingCelebration::default();
    let (store, _, _) = new_store(at("2024-01-01", "08:00:00"));
    let mut store = store.with_celebration(celebration.clone());
    let task = store.create("party", None, None).unwrap();

    store.toggle_complete(task.id);
    assert_eq!(celebration.count(), 1);
    store.toggle_complete(task.id);
    assert_eq!(celebration.count(), 1);
    store.toggle_complete(task.id);
    assert_eq!(celebration.count(), 2);
}

#[test]
fn filters_are_pure_projections() {
    let (mut store, repo, _) = new_store(at("2024-01-01", "08:00:00"));
    let a = store.create("a", None, None).unwrap();
    let b = store.create("b", None, None).unwrap();
    store.toggle_complete(a.id);
    let saves = repo.save_count();

    let active: Vec<_> = store.filter(TaskFilter::Active).map(|t| t.id).collect();
    let completed: Vec<_> = store.filter(TaskFilter::Completed).map(|t| t.id).collect();
    assert_eq!(active, vec![b.id]);
    assert_eq!(completed, vec![a.id]);
    assert_eq!(store.filter(TaskFilter::All).count(), 2);
    assert_eq!(repo.save_count(), saves);
}

#[test]
fn past_due_task_is_overdue_but_never_fires() {
    let (mut store, repo, _) = new_store(at("2024-01-01", "10:00:00"));
    let task = store
        .create("Buy milk", date("2024-01-01"), time("09:00"))
        .unwrap();
    let saves = repo.save_count();

    assert!(is_overdue(&task, store.now()));

    let scanner = AlarmScanner::new(RecordingNotifier::granted());
    let report = scanner.tick(&mut store);
    assert!(report.is_idle());
    assert!(scanner.notifier().sent().is_empty());
    assert!(!store.get(task.id).unwrap().notified);
    assert_eq!(repo.save_count(), saves);

    let active: Vec<_> = store.filter(TaskFilter::Active).map(|t| t.id).collect();
    assert!(active.contains(&task.id));
    assert_eq!(store.filter(TaskFilter::Completed).count(), 0);
}
