pub mod recurrence_service;
pub mod roster_service;
pub mod schedule_service;
pub mod schedule_utils;
pub mod task_service;
