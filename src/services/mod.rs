pub mod schedule_service;
pub mod status_service;
pub mod work_clock;
