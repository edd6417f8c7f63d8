use taku_core::{
    NewTask, NewWorkspace, Priority, Role, SettingsPatch, StoreError, Theme, ValidationError,
    WorkspaceService, WorkspaceUpdate,
};
use uuid::Uuid;

fn service() -> WorkspaceService {
    WorkspaceService::open_in_memory().unwrap()
}

fn create(service: &mut WorkspaceService, role: Role) -> taku_core::WorkspaceId {
    service
        .create_workspace(NewWorkspace {
            name: "Side projects".to_string(),
            owner_name: "Aki".to_string(),
            role,
        })
        .unwrap()
}

#[test]
fn create_developer_workspace_seeds_exact_starter_tasks() {
    let mut service = service();
    create(&mut service, Role::Developer);

    let workspace = service.current().unwrap();
    assert_eq!(workspace.tasks.len(), 3);

    let titles: Vec<&str> = workspace
        .tasks
        .iter()
        .map(|task| task.title.as_str())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Fix bug in login API",
            "Add dark mode support",
            "Refactor Kanban logic"
        ]
    );

    let priorities: Vec<Priority> = workspace.tasks.iter().map(|task| task.priority).collect();
    assert_eq!(
        priorities,
        vec![Priority::High, Priority::Medium, Priority::Medium]
    );

    // The dark mode seed starts in "In Progress" per the seed table; the
    // other two start in the first column.
    assert_eq!(workspace.tasks[0].column, "Todo");
    assert_eq!(workspace.tasks[1].column, "In Progress");
    assert_eq!(workspace.tasks[2].column, "Todo");

    for task in &workspace.tasks {
        assert_eq!(task.time_spent, 0);
        assert!(!task.is_active);
        assert!(task.start_time.is_none());
    }
}

#[test]
fn create_workspace_applies_defaults() {
    let mut service = service();
    create(&mut service, Role::Student);

    let workspace = service.current().unwrap();
    assert_eq!(workspace.columns, vec!["Todo", "In Progress", "Done"]);
    assert_eq!(workspace.weekly_goals, taku_core::DEFAULT_WEEKLY_GOALS);
    assert_eq!(workspace.theme, Theme::System);
    assert!(workspace.settings.heatmap);
    assert!(!workspace.settings.compact_mode);
}

#[test]
fn create_workspace_rejects_blank_name() {
    let mut service = service();
    let err = service
        .create_workspace(NewWorkspace {
            name: "   ".to_string(),
            owner_name: "Aki".to_string(),
            role: Role::Other,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyWorkspaceName)
    ));
}

#[test]
fn load_workspace_rebuilds_mirror_from_storage() {
    let mut service = service();
    let id = create(&mut service, Role::Designer);

    service
        .add_task(NewTask {
            title: "Ship style guide".to_string(),
            description: Some("v1 scope".to_string()),
            column: "Todo".to_string(),
            priority: Priority::High,
            due_date: None,
        })
        .unwrap()
        .unwrap();

    service.load_workspace(id).unwrap();

    let workspace = service.current().unwrap();
    assert_eq!(workspace.uuid, id);
    assert_eq!(workspace.tasks.len(), 4);
    assert!(workspace
        .tasks
        .iter()
        .any(|task| task.title == "Ship style guide"));
}

#[test]
fn load_missing_workspace_returns_not_found() {
    let mut service = service();
    let missing = Uuid::new_v4();

    let err = service.load_workspace(missing).unwrap_err();
    assert!(matches!(err, StoreError::WorkspaceNotFound(id) if id == missing));
}

#[test]
fn settings_patch_merges_shallowly_and_persists() {
    let mut service = service();
    let id = create(&mut service, Role::Other);

    service
        .update_workspace(WorkspaceUpdate::Settings(SettingsPatch {
            auto_backup: Some(true),
            ..SettingsPatch::default()
        }))
        .unwrap();

    let settings = service.current().unwrap().settings;
    assert!(settings.auto_backup);
    assert!(settings.heatmap, "untouched flags keep their value");
    assert!(settings.mascot);

    service.load_workspace(id).unwrap();
    assert!(service.current().unwrap().settings.auto_backup);
}

#[test]
fn weekly_goals_update_rejects_zero() {
    let mut service = service();
    create(&mut service, Role::Other);

    let err = service
        .update_workspace(WorkspaceUpdate::WeeklyGoals(0))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::InvalidWeeklyGoals(0))
    ));

    service
        .update_workspace(WorkspaceUpdate::WeeklyGoals(15))
        .unwrap();
    assert_eq!(service.current().unwrap().weekly_goals, 15);
}

#[test]
fn columns_update_replaces_list_and_persists() {
    let mut service = service();
    let id = create(&mut service, Role::Other);

    let columns = vec![
        "Todo".to_string(),
        "In Progress".to_string(),
        "Review".to_string(),
        "Done".to_string(),
    ];
    service
        .update_workspace(WorkspaceUpdate::Columns(columns.clone()))
        .unwrap();

    service.load_workspace(id).unwrap();
    assert_eq!(service.current().unwrap().columns, columns);
}

#[test]
fn workspace_update_noops_when_nothing_loaded() {
    let mut service = service();

    service
        .update_workspace(WorkspaceUpdate::WeeklyGoals(5))
        .unwrap();
    service.set_theme(Theme::Dark).unwrap();
    assert!(service.current().is_none());
}

#[test]
fn set_theme_persists_single_field() {
    let mut service = service();
    let id = create(&mut service, Role::Student);

    service.set_theme(Theme::Dark).unwrap();
    assert_eq!(service.current().unwrap().theme, Theme::Dark);

    service.load_workspace(id).unwrap();
    assert_eq!(service.current().unwrap().theme, Theme::Dark);
}

#[test]
fn add_task_without_workspace_is_noop() {
    let mut service = service();

    let created = service
        .add_task(NewTask {
            title: "orphan".to_string(),
            description: None,
            column: "Todo".to_string(),
            priority: Priority::Low,
            due_date: None,
        })
        .unwrap();
    assert!(created.is_none());
}

#[test]
fn add_task_rejects_blank_title() {
    let mut service = service();
    create(&mut service, Role::Other);

    let err = service
        .add_task(NewTask {
            title: "  ".to_string(),
            description: None,
            column: "Todo".to_string(),
            priority: Priority::Low,
            due_date: None,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyTaskTitle)
    ));
    assert_eq!(service.current().unwrap().tasks.len(), 3);
}
