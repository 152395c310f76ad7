use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec};

lazy_static! {
    pub static ref MENU_FETCHES_COUNTER: CounterVec = register_counter_vec!(
        "menu_fetches_total",
        "Menu fetch invocations by menu type and outcome",
        &["menu_type", "outcome"]
    ).unwrap();

    pub static ref MENU_FALLBACKS_COUNTER: CounterVec = register_counter_vec!(
        "menu_fallbacks_total",
        "Placeholder menus served because upstream had no items for the day",
        &["menu_type"]
    ).unwrap();

    pub static ref NOTIFICATION_FAILURES_COUNTER: CounterVec = register_counter_vec!(
        "menu_notification_failures_total",
        "Menu notifications that failed or timed out",
        &["reason"]
    ).unwrap();
}
