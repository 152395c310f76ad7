use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Nutrislice nutrient codes and the display label each one is published under.
pub const NUTRIENT_KEYS: [(&str, &str); 16] = [
    ("calories", "Calories"),
    ("g_fat", "Total Fat (g)"),
    ("g_saturated_fat", "Saturated Fat (g)"),
    ("g_trans_fat", "Trans Fat (g)"),
    ("mg_cholesterol", "Cholesterol (mg)"),
    ("g_carbs", "Total Carbs (g)"),
    ("g_sugar", "Sugar (g)"),
    ("mg_sodium", "Sodium (mg)"),
    ("mg_potassium", "Potassium (mg)"),
    ("g_protein", "Protein (g)"),
    ("g_fiber", "Dietary Fiber (g)"),
    ("mg_iron", "Iron (mg)"),
    ("mg_calcium", "Calcium (mg)"),
    ("iu_vitamin_a", "Vitamin A (mg)"),
    ("mg_vitamin_c", "Vitamin C (mg)"),
    ("mg_vitamin_d", "Vitamin D (mg)"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuType {
    Breakfast,
    Lunch,
}

impl MenuType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuType::Breakfast => "breakfast",
            MenuType::Lunch => "lunch",
        }
    }
}

impl fmt::Display for MenuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MenuType::Breakfast),
            "lunch" => Ok(MenuType::Lunch),
            other => Err(other.to_string()),
        }
    }
}

/// Body for POST /invoke. Fields stay raw strings so validation can report
/// each failure with its own error kind.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuRequest {
    /// Requested day as `YYYY/MM/DD`, e.g. "2023/05/17".
    pub date: String,
    pub school_slug: String,
    pub menu_type: String,
}

// ─── Upstream (Nutrislice weeks API) ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WeekDocument {
    #[serde(default)]
    pub days: Vec<MenuDay>,
}

#[derive(Debug, Deserialize)]
pub struct MenuDay {
    /// ISO date, e.g. "2023-05-17".
    pub date: String,
    #[serde(default)]
    pub menu_items: Vec<DayMenuItem>,
}

#[derive(Debug, Deserialize)]
pub struct DayMenuItem {
    /// Kept untyped: section headers and text rows carry `null`, `false` or `{}` here.
    #[serde(default)]
    pub food: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct Food {
    pub name: Option<String>,
    #[serde(default)]
    pub rounded_nutrition_info: Option<Map<String, Value>>,
    #[serde(default)]
    pub serving_size_info: Option<ServingSizeInfo>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServingSizeInfo {
    #[serde(default)]
    pub serving_size_amount: Option<Value>,
    #[serde(default)]
    pub serving_size_unit: Option<Value>,
}

// ─── Normalized output ───────────────────────────────────────────────────────

/// One food item keyed by display labels. `nutrients` holds the 16 labels of
/// [`NUTRIENT_KEYS`] in table order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItem {
    pub name: String,
    #[serde(flatten)]
    pub nutrients: Map<String, Value>,
    #[serde(rename = "Serving Size")]
    pub serving_size: String,
    pub image_url: String,
}

impl MenuItem {
    pub fn nutrient(&self, label: &str) -> Option<&Value> {
        self.nutrients.get(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuResult {
    /// The request date exactly as given (`YYYY/MM/DD`).
    pub date: String,
    pub message: String,
    pub menu: Vec<MenuItem>,
}
