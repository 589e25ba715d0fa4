// Integration tests for the filesystem snapshot store

use chrono::{TimeZone, Utc};
use pallada_core::model::{EntityType, LessonSlot, LessonTime, ScheduleModel};
use pallada_core::core_types::schema::EVENT_SKIP;
use pallada_core::logging_facility::test_capture::init_test_capture;
use pallada_store::{FsSnapshotStore, Snapshot, SnapshotLoad};
use std::sync::Arc;
use tempfile::TempDir;

// Helper to create a store in a scratch directory
fn setup_store() -> (FsSnapshotStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp snapshot directory");
    (FsSnapshotStore::new(dir.path().join("snapshots")), dir)
}

fn schedule() -> ScheduleModel {
    let mut model = ScheduleModel::new(EntityType::Group, "ИВ-21", "2 семестр 2024/2025");
    model.lessons.push(LessonSlot {
        day_name: "Понедельник".to_string(),
        lesson_time: LessonTime::new(1, "09:00-10:30"),
        subject: "Математический анализ".to_string(),
        lesson_type: Some("Лекция".to_string()),
        location: "Корпус Н / Н 101".to_string(),
        teacher_or_group: "Иванов И.И.".to_string(),
        subgroup: None,
        week_number: Some(1),
    });
    model
}

const KEY: &str = "https://timetable.pallada.sibsau.ru/timetable/group/3099";

#[test]
fn test_schedule_round_trip_keeps_capture_time() {
    // Given: a snapshot captured at a fixed time
    let (store, _dir) = setup_store();
    let captured_at = Utc.with_ymd_and_hms(2025, 2, 3, 8, 30, 0).unwrap();
    let snapshot = Snapshot::at(KEY, captured_at, schedule());

    // When: it is saved and loaded back
    store.save(&snapshot).unwrap();
    let loaded = store.load::<ScheduleModel>(KEY).found().unwrap();

    // Then: payload and capture time survive
    assert_eq!(loaded.captured_at, captured_at);
    assert_eq!(loaded.payload, schedule());
}

#[test]
fn test_last_writer_wins() {
    let (store, _dir) = setup_store();
    store.save(&Snapshot::new(KEY, schedule())).unwrap();

    let mut updated = schedule();
    updated.lessons[0].subject = "Физика".to_string();
    store.save(&Snapshot::new(KEY, updated.clone())).unwrap();

    let loaded = store.load::<ScheduleModel>(KEY).found().unwrap();
    assert_eq!(loaded.payload, updated);
}

#[test]
fn test_key_mismatch_is_corrupt() {
    // Given: a file under KEY's path that claims another key
    let (store, _dir) = setup_store();
    let foreign = Snapshot::new("catalog", schedule());
    std::fs::create_dir_all(store.root()).unwrap();
    std::fs::write(store.path_for(KEY), serde_json::to_vec(&foreign).unwrap()).unwrap();

    // Then: it is reported corrupt, not found
    match store.load::<ScheduleModel>(KEY) {
        SnapshotLoad::Corrupt(reason) => assert!(reason.contains("key mismatch")),
        other => panic!("expected Corrupt, got {:?}", other.label()),
    }
}

#[test]
fn test_wrong_payload_shape_is_corrupt() {
    let (store, _dir) = setup_store();
    store.save(&Snapshot::new(KEY, vec!["not", "a", "schedule"])).unwrap();
    let loaded = store.load::<ScheduleModel>(KEY);
    assert_eq!(loaded.label(), "corrupt");
    assert!(loaded.found().is_none());
}

#[test]
fn test_corrupt_load_logs_snapshot_corrupt_code() {
    let capture = init_test_capture();
    let (store, _dir) = setup_store();
    let key = "corrupt-load-logging-key";
    std::fs::create_dir_all(store.root()).unwrap();
    std::fs::write(store.path_for(key), b"{ truncated").unwrap();

    assert_eq!(store.load::<ScheduleModel>(key).label(), "corrupt");

    let skips: Vec<_> = capture
        .events_for_op("snapshot_load")
        .into_iter()
        .filter(|e| e.field("snapshot_key") == Some(key) && e.event.as_deref() == Some(EVENT_SKIP))
        .collect();
    assert_eq!(skips.len(), 1);
    assert_eq!(skips[0].level, tracing::Level::WARN);
    assert_eq!(skips[0].field("err.code"), Some("ERR_SNAPSHOT_CORRUPT"));
}

#[test]
fn test_concurrent_saves_leave_a_valid_snapshot() {
    let (store, _dir) = setup_store();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8u32)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let mut model = schedule();
                model.lessons[0].subject = format!("Subject {}", i);
                store.save(&Snapshot::new(KEY, model)).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let loaded = store.load::<ScheduleModel>(KEY).found().unwrap();
    assert!(loaded.payload.lessons[0].subject.starts_with("Subject "));

    let leftovers = std::fs::read_dir(store.root())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_async_round_trip_and_remove() {
    let (store, _dir) = setup_store();
    let snapshot = Snapshot::new(KEY, schedule());

    store.save_async(&snapshot).await.unwrap();
    let loaded = store.load_async::<ScheduleModel>(KEY).await;
    assert_eq!(loaded, SnapshotLoad::Found(snapshot));

    assert!(store.remove_async(KEY).await.unwrap());
    assert!(store.load_async::<ScheduleModel>(KEY).await.is_absent());
}

#[tokio::test]
async fn test_blocking_and_async_share_layout() {
    let (store, _dir) = setup_store();
    store.save(&Snapshot::new("catalog", 42u32)).unwrap();
    let loaded = store.load_async::<u32>("catalog").await.found().unwrap();
    assert_eq!(loaded.payload, 42);
}
