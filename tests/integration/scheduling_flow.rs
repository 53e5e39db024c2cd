use pawpal_core::models::owner::{OwnerCreateInput, WindowPreference};
use pawpal_core::models::pet::PetCreateInput;
use pawpal_core::models::task::{Frequency, Priority, TaskCreateInput, TaskStatus};
use pawpal_core::services::roster_service::RosterService;
use pawpal_core::services::schedule_service::ScheduleService;
use pawpal_core::services::task_service::TaskService;
use pawpal_core::store::CareStore;

fn task(
    description: &str,
    duration: i64,
    priority: Priority,
    time: Option<&str>,
) -> TaskCreateInput {
    TaskCreateInput {
        description: description.into(),
        duration_minutes: duration,
        priority: Some(priority),
        frequency: Some(Frequency::Once),
        time: time.map(|t| t.to_string()),
        due_date: None,
    }
}

#[test]
fn full_day_plan_honors_fixed_times_budget_and_conflicts() {
    let store = CareStore::new();
    let roster = RosterService::new(store.clone());
    let tasks = TaskService::new(store.clone());
    let schedule = ScheduleService::new(store.clone());

    let owner = roster
        .create_owner(OwnerCreateInput {
            name: "Alex".into(),
            contact_info: None,
            available_time_minutes: Some(360),
            preferred_window: Some(WindowPreference::Morning),
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

    // Added intentionally out of clock order, with a deliberate 07:00 clash.
    let walk = tasks
        .create_task(&dog.id, task("Morning walk", 30, Priority::High, Some("08:00")))
        .expect("walk");
    let breakfast = tasks
        .create_task(&dog.id, task("Feed breakfast", 15, Priority::High, Some("07:00")))
        .expect("breakfast");
    tasks
        .create_task(&dog.id, task("Play fetch", 20, Priority::Medium, Some("10:00")))
        .expect("fetch");
    let feed_cat = tasks
        .create_task(&cat.id, task("Feed cat", 10, Priority::High, Some("07:00")))
        .expect("feed cat");
    tasks
        .create_task(&cat.id, task("Clean litter box", 15, Priority::Medium, Some("09:00")))
        .expect("litter");
    let groom = tasks
        .create_task(&dog.id, task("Groom Buddy", 45, Priority::Low, None))
        .expect("groom");

    let plan = schedule.generate_for_owner(&owner.id).expect("plan");

    // Every task fit: five fixed plus the flexible groom.
    assert_eq!(plan.entries.len(), 6);
    assert!(plan.skipped.is_empty());

    // Fixed tasks sit at their exact clock times.
    let walk_entry = plan.entries.iter().find(|e| e.task_id == walk.id).unwrap();
    assert_eq!(walk_entry.start_minute, 8 * 60);
    assert_eq!(walk_entry.end_minute, 8 * 60 + 30);
    assert!(walk_entry.fixed);

    // Chronological output.
    for pair in plan.entries.windows(2) {
        assert!(pair[0].start_minute <= pair[1].start_minute);
    }

    // The 07:00 clash is flagged on both entries but removes neither.
    assert_eq!(plan.conflicts.len(), 1);
    let conflict = &plan.conflicts[0];
    let pair = [conflict.first_task_id.as_str(), conflict.second_task_id.as_str()];
    assert!(pair.contains(&breakfast.id.as_str()));
    assert!(pair.contains(&feed_cat.id.as_str()));
    for entry in &plan.entries {
        let clashing = entry.task_id == breakfast.id || entry.task_id == feed_cat.id;
        assert_eq!(entry.conflict, clashing);
    }

    // The flexible groom lands in the earliest free morning gap and overlaps
    // nothing that was placed.
    let groom_entry = plan.entries.iter().find(|e| e.task_id == groom.id).unwrap();
    assert!(!groom_entry.fixed);
    assert_eq!(groom_entry.start_minute, 6 * 60);
    for entry in plan.entries.iter().filter(|e| e.task_id != groom.id) {
        assert!(
            groom_entry.end_minute <= entry.start_minute
                || entry.end_minute <= groom_entry.start_minute
        );
    }

    assert_eq!(plan.total_minutes_used, 135);
    assert!(plan.explanation.contains("Scheduled 6 task(s)"));
    assert!(plan.explanation.contains("1 fixed-time conflict(s)"));

    // Identical snapshot, identical plan.
    let again = schedule.generate_for_owner(&owner.id).expect("second plan");
    assert_eq!(plan.entries, again.entries);
    assert_eq!(plan.skipped, again.skipped);
    assert_eq!(plan.conflicts, again.conflicts);
}

#[test]
fn fixed_task_outside_the_preferred_window_is_still_scheduled() {
    let store = CareStore::new();
    let roster = RosterService::new(store.clone());
    let tasks = TaskService::new(store.clone());
    let schedule = ScheduleService::new(store.clone());

    let owner = roster
        .create_owner(OwnerCreateInput {
            name: "Alex".into(),
            contact_info: None,
            available_time_minutes: Some(120),
            preferred_window: Some(WindowPreference::Morning),
        })
        .expect("owner");
    let cat = roster
        .add_pet(
            &owner.id,
            PetCreateInput {
                name: "Whiskers".into(),
                species: "Cat".into(),
                age: 2,
            },
        )
        .expect("cat");

    let late_feed = tasks
        .create_task(&cat.id, task("Late-night feed", 15, Priority::High, Some("22:00")))
        .expect("late feed");

    let plan = schedule.generate_for_owner(&owner.id).expect("plan");

    let entry = plan.entries.iter().find(|e| e.task_id == late_feed.id).unwrap();
    assert_eq!(entry.start_minute, 22 * 60);
    assert!(plan.skipped.is_empty());
}

#[test]
fn over_budget_flexible_tasks_are_skipped_lowest_priority_first() {
    let store = CareStore::new();
    let roster = RosterService::new(store.clone());
    let tasks = TaskService::new(store.clone());
    let schedule = ScheduleService::new(store.clone());

    let owner = roster
        .create_owner(OwnerCreateInput {
            name: "Alex".into(),
            contact_info: None,
            available_time_minutes: Some(30),
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

    let play = tasks
        .create_task(&dog.id, task("Play", 20, Priority::High, None))
        .expect("play");
    let groom = tasks
        .create_task(&dog.id, task("Groom", 20, Priority::Low, None))
        .expect("groom");

    let plan = schedule.generate_for_owner(&owner.id).expect("plan");

    assert_eq!(plan.entries.len(), 1);
    assert_eq!(plan.entries[0].task_id, play.id);
    assert_eq!(plan.skipped.len(), 1);
    assert_eq!(plan.skipped[0].task_id, groom.id);
}

#[test]
fn committing_a_plan_is_explicit_and_reversible() {
    let store = CareStore::new();
    let roster = RosterService::new(store.clone());
    let tasks = TaskService::new(store.clone());
    let schedule = ScheduleService::new(store.clone());

    let owner = roster
        .create_owner(OwnerCreateInput {
            name: "Alex".into(),
            contact_info: None,
            available_time_minutes: Some(240),
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
    let brush = tasks
        .create_task(&dog.id, task("Brush coat", 20, Priority::Medium, None))
        .expect("brush");

    let plan = schedule.generate_for_owner(&owner.id).expect("plan");

    // Generating alone never touches stored statuses.
    assert_eq!(tasks.get_task(&brush.id).unwrap().status, TaskStatus::Pending);

    assert_eq!(tasks.apply_plan(&plan).expect("apply"), 1);
    assert_eq!(
        tasks.get_task(&brush.id).unwrap().status,
        TaskStatus::Scheduled
    );

    // A committed task is no longer pending, so the next plan skips it...
    let empty_plan = schedule.generate_for_owner(&owner.id).expect("plan");
    assert!(empty_plan.entries.is_empty());

    // ...until the projection is cleared again.
    assert_eq!(tasks.clear_plan(&owner.id).expect("clear"), 1);
    let restored = schedule.generate_for_owner(&owner.id).expect("plan");
    assert_eq!(restored.entries.len(), 1);
}
