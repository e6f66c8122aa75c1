pub mod history_service;
pub mod insights_service;
pub mod merge_service;
pub mod streak_service;
pub mod week_locator;
