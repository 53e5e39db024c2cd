use pawpal_core::error::AppError;
use pawpal_core::models::owner::{OwnerCreateInput, OwnerUpdateInput, WindowPreference};
use pawpal_core::models::pet::PetCreateInput;
use pawpal_core::models::task::{Priority, TaskCreateInput, TaskFilter, TaskUpdateInput};
use pawpal_core::services::roster_service::RosterService;
use pawpal_core::services::schedule_service::ScheduleService;
use pawpal_core::services::task_service::TaskService;
use pawpal_core::store::CareStore;

fn services() -> (RosterService, TaskService, ScheduleService) {
    let store = CareStore::new();
    (
        RosterService::new(store.clone()),
        TaskService::new(store.clone()),
        ScheduleService::new(store),
    )
}

#[test]
fn owner_and_pet_lifecycle() {
    let (roster, _tasks, _schedule) = services();

    let owner = roster
        .create_owner(OwnerCreateInput {
            name: "Alex".into(),
            contact_info: Some("alex@example.com".into()),
            available_time_minutes: Some(360),
            preferred_window: None,
        })
        .expect("owner");

    let dog = roster
        .add_pet(
            &owner.id,
            PetCreateInput {
                name: "Buddy".into(),
                species: "Dog".into(),
                age: 5,
            },
        )
        .expect("dog");
    roster
        .add_pet(
            &owner.id,
            PetCreateInput {
                name: "Whiskers".into(),
                species: "Cat".into(),
                age: 3,
            },
        )
        .expect("cat");

    let pets = roster.list_pets(&owner.id).expect("list pets");
    assert_eq!(pets.len(), 2);
    assert_eq!(pets[0].name, "Buddy");
    assert!(pets.iter().all(|pet| pet.owner_id == owner.id));

    roster.remove_pet(&dog.id).expect("remove dog");
    let pets = roster.list_pets(&owner.id).expect("list pets");
    assert_eq!(pets.len(), 1);
    assert_eq!(pets[0].name, "Whiskers");
}

#[test]
fn moving_a_task_relinks_exactly_one_pet() {
    let (roster, tasks, _schedule) = services();

    let owner = roster
        .create_owner(OwnerCreateInput {
            name: "Alex".into(),
            ..Default::default()
        })
        .expect("owner");
    let dog = roster
        .add_pet(
            &owner.id,
            PetCreateInput {
                name: "Buddy".into(),
                species: "Dog".into(),
                age: 5,
            },
        )
        .expect("dog");
    let cat = roster
        .add_pet(
            &owner.id,
            PetCreateInput {
                name: "Whiskers".into(),
                species: "Cat".into(),
                age: 3,
            },
        )
        .expect("cat");

    let brush = tasks
        .create_task(
            &dog.id,
            TaskCreateInput {
                description: "Brush coat".into(),
                duration_minutes: 20,
                priority: Some(Priority::Medium),
                ..Default::default()
            },
        )
        .expect("task");

    let moved = tasks.move_task(&brush.id, &cat.id).expect("move");
    assert_eq!(moved.pet_id, cat.id);

    let dog_tasks = tasks
        .list_tasks(&TaskFilter {
            pet_id: Some(dog.id.clone()),
            status: None,
        })
        .expect("dog tasks");
    assert!(dog_tasks.is_empty());

    let cat_tasks = tasks
        .list_tasks(&TaskFilter {
            pet_id: Some(cat.id.clone()),
            status: None,
        })
        .expect("cat tasks");
    assert_eq!(cat_tasks.len(), 1);
    assert_eq!(cat_tasks[0].id, brush.id);

    // Moving to a pet that does not exist fails and changes nothing.
    assert!(matches!(
        tasks.move_task(&brush.id, "missing"),
        Err(AppError::NotFound)
    ));
    assert_eq!(tasks.get_task(&brush.id).unwrap().pet_id, cat.id);
}

#[test]
fn partial_task_edits_keep_unspecified_fields() {
    let (roster, tasks, _schedule) = services();

    let owner = roster
        .create_owner(OwnerCreateInput {
            name: "Alex".into(),
            ..Default::default()
        })
        .expect("owner");
    let dog = roster
        .add_pet(
            &owner.id,
            PetCreateInput {
                name: "Buddy".into(),
                species: "Dog".into(),
                age: 5,
            },
        )
        .expect("dog");

    let walk = tasks
        .create_task(
            &dog.id,
            TaskCreateInput {
                description: "Morning walk".into(),
                duration_minutes: 30,
                priority: Some(Priority::High),
                time: Some("08:00".into()),
                ..Default::default()
            },
        )
        .expect("task");

    let updated = tasks
        .update_task(
            &walk.id,
            TaskUpdateInput {
                priority: Some(Priority::Medium),
                ..Default::default()
            },
        )
        .expect("update");

    assert_eq!(updated.priority, Priority::Medium);
    assert_eq!(updated.description, "Morning walk");
    assert_eq!(updated.duration_minutes, 30);
    assert_eq!(updated.time.as_deref(), Some("08:00"));
}

#[test]
fn owner_preference_changes_steer_the_next_plan() {
    let (roster, tasks, schedule) = services();

    let owner = roster
        .create_owner(OwnerCreateInput {
            name: "Alex".into(),
            available_time_minutes: Some(240),
            preferred_window: Some(WindowPreference::Morning),
            ..Default::default()
        })
        .expect("owner");
    let dog = roster
        .add_pet(
            &owner.id,
            PetCreateInput {
                name: "Buddy".into(),
                species: "Dog".into(),
                age: 5,
            },
        )
        .expect("dog");
    tasks
        .create_task(
            &dog.id,
            TaskCreateInput {
                description: "Play fetch".into(),
                duration_minutes: 30,
                priority: Some(Priority::Medium),
                ..Default::default()
            },
        )
        .expect("task");

    let morning_plan = schedule.generate_for_owner(&owner.id).expect("plan");
    assert_eq!(morning_plan.entries[0].start_minute, 6 * 60);

    roster
        .update_owner(
            &owner.id,
            OwnerUpdateInput {
                preferred_window: Some(Some(WindowPreference::Evening)),
                ..Default::default()
            },
        )
        .expect("update owner");

    let evening_plan = schedule.generate_for_owner(&owner.id).expect("plan");
    assert_eq!(evening_plan.entries[0].start_minute, 17 * 60);
}
