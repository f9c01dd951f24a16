//! Static support resources surfaced next to screening and journal results.

use axum::routing::get;
use axum::{Json, Router};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmergencyContact {
    pub name: &'static str,
    pub number: &'static str,
    pub description: &'static str,
}

const EMERGENCY_CONTACTS: [EmergencyContact; 5] = [
    EmergencyContact {
        name: "National Suicide Prevention Lifeline",
        number: "988",
        description: "24/7 free and confidential support",
    },
    EmergencyContact {
        name: "Postpartum Support International",
        number: "1-800-944-4773",
        description: "Specialized postpartum support",
    },
    EmergencyContact {
        name: "Crisis Text Line",
        number: "Text HOME to 741741",
        description: "24/7 crisis support via text",
    },
    EmergencyContact {
        name: "Emergency Services",
        number: "911",
        description: "Immediate emergency assistance",
    },
    EmergencyContact {
        name: "National Maternal Mental Health Hotline",
        number: "1-833-943-5746",
        description: "24/7 professional support",
    },
];

const DAILY_TIPS: [&str; 4] = [
    "Remember to take deep breaths throughout the day",
    "Try to get 10 minutes of sunlight today",
    "Reach out to a friend or family member",
    "Practice gentle stretching or walking",
];

pub fn emergency_contacts() -> &'static [EmergencyContact] {
    &EMERGENCY_CONTACTS
}

/// Rotates through the tips by calendar day so every request on a date agrees.
pub fn daily_tip_for(date: NaiveDate) -> &'static str {
    let index = date.num_days_from_ce().rem_euclid(DAILY_TIPS.len() as i32) as usize;
    DAILY_TIPS[index]
}

#[derive(Debug, Serialize)]
struct DailyTipView {
    date: NaiveDate,
    tip: &'static str,
}

/// Public routes; none of these require a session.
pub fn support_router() -> Router {
    Router::new()
        .route(
            "/api/v1/support/emergency-contacts",
            get(emergency_contacts_handler),
        )
        .route("/api/v1/support/daily-tip", get(daily_tip_handler))
}

async fn emergency_contacts_handler() -> Json<&'static [EmergencyContact]> {
    Json(emergency_contacts())
}

async fn daily_tip_handler() -> Json<DailyTipView> {
    let date = Utc::now().date_naive();
    Json(DailyTipView {
        date,
        tip: daily_tip_for(date),
    })
}
