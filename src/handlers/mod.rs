pub mod auth;
pub mod categories;
pub mod engagement;
pub mod notifications;
pub mod posts;
