pub mod content_service;
pub mod engagement_service;
pub mod notification_service;
pub mod profile_service;
