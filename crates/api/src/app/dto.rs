//! Form input and the JSON view documents handed to the external renderer.
//!
//! Every page response is `{ "view": <template>, ...values }`.

use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use hipnosis_habits::Habit;

/// Body of `POST /newhabit`. Missing fields arrive as empty strings and fail
/// validation like blank ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewHabitForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub behavior: String,
}

pub fn habit_to_json(habit: &Habit) -> JsonValue {
    json!({
        "id": habit.id,
        "title": habit.title,
        "behavior": habit.behavior,
        "created": habit.created,
        "last_modified": habit.last_modified,
    })
}

/// Landing page for anonymous visitors.
pub fn base_view(login_href: &str) -> JsonValue {
    json!({
        "view": "base",
        "login_href": login_href,
        "login_content": "Login",
    })
}

pub fn habits_view(habits: &[Habit], logout_href: &str) -> JsonValue {
    json!({
        "view": "habits",
        "habits": habits.iter().map(habit_to_json).collect::<Vec<_>>(),
        "login_href": logout_href,
        "login_content": "Logout",
    })
}

/// `habit` is `null` when the id is unknown or owned by someone else.
pub fn permalink_view(habit: Option<&Habit>) -> JsonValue {
    json!({
        "view": "permalink",
        "habit": habit.map(habit_to_json),
    })
}

pub fn new_habit_view(title: &str, behavior: &str, error: Option<&str>) -> JsonValue {
    json!({
        "view": "newhabit",
        "title": title,
        "behavior": behavior,
        "error": error,
    })
}
