pub mod menu;
pub mod notification;
