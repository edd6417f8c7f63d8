use taku_core::{NewWorkspace, Role, StoreError, TaskId, WorkspaceService};
use uuid::Uuid;

fn service_with_workspace() -> WorkspaceService {
    let mut service = WorkspaceService::open_in_memory().unwrap();
    service
        .create_workspace(NewWorkspace {
            name: "Tracking".to_string(),
            owner_name: "Aki".to_string(),
            role: Role::Developer,
        })
        .unwrap();
    service
}

fn task_ids(service: &WorkspaceService) -> Vec<TaskId> {
    service
        .current()
        .unwrap()
        .tasks
        .iter()
        .map(|task| task.uuid)
        .collect()
}

fn active_ids(service: &WorkspaceService) -> Vec<TaskId> {
    service
        .current()
        .unwrap()
        .tasks
        .iter()
        .filter(|task| task.is_active)
        .map(|task| task.uuid)
        .collect()
}

#[test]
fn start_timer_marks_single_task_active() {
    let mut service = service_with_workspace();
    let ids = task_ids(&service);

    service.start_timer_at(ids[0], 1_000_000).unwrap();

    assert_eq!(active_ids(&service), vec![ids[0]]);
    let task = &service.current().unwrap().tasks[0];
    assert_eq!(task.start_time, Some(1_000_000));
}

#[test]
fn starting_second_timer_preempts_first_without_entry() {
    let mut service = service_with_workspace();
    let ids = task_ids(&service);

    service.start_timer_at(ids[0], 1_000_000).unwrap();
    service.start_timer_at(ids[1], 1_300_000).unwrap();

    // Exclusivity: only the second task is running now.
    assert_eq!(active_ids(&service), vec![ids[1]]);

    let workspace = service.current().unwrap();
    let first = workspace.tasks.iter().find(|t| t.uuid == ids[0]).unwrap();
    assert!(!first.is_active);
    assert!(first.start_time.is_none());
    assert_eq!(first.time_spent, 0, "preempted session accrues nothing");
    assert!(
        workspace.time_entries.is_empty(),
        "preemption must not record a time entry"
    );
}

#[test]
fn preemption_survives_reload() {
    let mut service = service_with_workspace();
    let ids = task_ids(&service);
    let workspace_id = service.current().unwrap().uuid;

    service.start_timer_at(ids[0], 1_000_000).unwrap();
    service.start_timer_at(ids[2], 1_500_000).unwrap();

    service.load_workspace(workspace_id).unwrap();
    assert_eq!(active_ids(&service), vec![ids[2]]);
}

#[test]
fn start_timer_on_running_task_is_noop() {
    let mut service = service_with_workspace();
    let ids = task_ids(&service);

    service.start_timer_at(ids[0], 1_000_000).unwrap();
    service.start_timer_at(ids[0], 2_000_000).unwrap();

    let task = &service.current().unwrap().tasks[0];
    assert_eq!(
        task.start_time,
        Some(1_000_000),
        "restart must not reset the running session"
    );
}

#[test]
fn stop_timer_rounds_minutes_and_records_entry() {
    let mut service = service_with_workspace();
    let ids = task_ids(&service);

    let start = 1_000_000;
    service.start_timer_at(ids[0], start).unwrap();
    // 90 seconds of tracked time rounds up to 2 minutes.
    let entry = service
        .stop_timer_at(ids[0], start + 90_000)
        .unwrap()
        .unwrap();

    assert_eq!(entry.duration, 2);
    assert_eq!(entry.start_time, start);
    assert_eq!(entry.end_time, Some(start + 90_000));
    assert_eq!(entry.task_uuid, ids[0]);
    assert_eq!(entry.description.as_deref(), Some("Worked on Fix bug in login API"));

    let workspace = service.current().unwrap();
    let task = workspace.tasks.iter().find(|t| t.uuid == ids[0]).unwrap();
    assert!(!task.is_active);
    assert!(task.start_time.is_none());
    assert_eq!(task.time_spent, 2);
    assert_eq!(workspace.time_entries.len(), 1);
}

#[test]
fn stop_timer_accumulates_across_sessions() {
    let mut service = service_with_workspace();
    let ids = task_ids(&service);

    service.start_timer_at(ids[0], 0).unwrap();
    service.stop_timer_at(ids[0], 600_000).unwrap(); // 10 min
    service.start_timer_at(ids[0], 1_000_000).unwrap();
    service.stop_timer_at(ids[0], 1_300_000).unwrap(); // 5 min

    let workspace = service.current().unwrap();
    let task = workspace.tasks.iter().find(|t| t.uuid == ids[0]).unwrap();
    assert_eq!(task.time_spent, 15);
    assert_eq!(workspace.time_entries.len(), 2);
}

#[test]
fn stop_timer_on_idle_task_is_noop() {
    let mut service = service_with_workspace();
    let ids = task_ids(&service);

    let stopped = service.stop_timer_at(ids[0], 1_000_000).unwrap();
    assert!(stopped.is_none());
    assert!(service.current().unwrap().time_entries.is_empty());
}

#[test]
fn timer_ops_on_unknown_task_fail() {
    let mut service = service_with_workspace();
    let missing = Uuid::new_v4();

    let err = service.start_timer_at(missing, 0).unwrap_err();
    assert!(matches!(err, StoreError::TaskNotFound(id) if id == missing));

    let err = service.stop_timer_at(missing, 0).unwrap_err();
    assert!(matches!(err, StoreError::TaskNotFound(id) if id == missing));
}

#[test]
fn delete_task_cascades_to_its_entries() {
    let mut service = service_with_workspace();
    let ids = task_ids(&service);
    let workspace_id = service.current().unwrap().uuid;

    service.start_timer_at(ids[0], 0).unwrap();
    service.stop_timer_at(ids[0], 600_000).unwrap();
    service.start_timer_at(ids[1], 700_000).unwrap();
    service.stop_timer_at(ids[1], 1_300_000).unwrap();

    service.delete_task(ids[0]).unwrap();

    service.load_workspace(workspace_id).unwrap();
    let workspace = service.current().unwrap();
    assert_eq!(workspace.tasks.len(), 2);
    assert!(workspace.tasks.iter().all(|task| task.uuid != ids[0]));
    assert_eq!(workspace.time_entries.len(), 1);
    assert!(workspace
        .time_entries
        .iter()
        .all(|entry| entry.task_uuid != ids[0]));
}

#[test]
fn update_task_stamps_updated_at() {
    let mut service = service_with_workspace();
    let ids = task_ids(&service);

    let before = service.current().unwrap().tasks[0].updated_at;
    std::thread::sleep(std::time::Duration::from_millis(5));

    service.move_task(ids[0], "Done").unwrap();

    let task = &service.current().unwrap().tasks[0];
    assert_eq!(task.column, "Done");
    assert!(task.updated_at > before);
}
