pub mod menu;
pub mod metrics;
pub mod notifications;
