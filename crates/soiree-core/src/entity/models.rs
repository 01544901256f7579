use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How a subscription plan bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingInterval {
    Monthly,
    Yearly,
    OneOff,
}

impl fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::OneOff => "one_off",
        };
        f.write_str(s)
    }
}

impl FromStr for BillingInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "one_off" => Ok(Self::OneOff),
            other => Err(format!("invalid billing interval: {other:?}")),
        }
    }
}

/// Lifecycle status of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Scheduled,
    Confirmed,
    Cancelled,
    Completed,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(format!("invalid event status: {other:?}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A subscription plan shown on the public pricing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub billing_interval: BillingInterval,
    pub features: Vec<String>,
    pub is_active: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price_cents: i64,
        billing_interval: BillingInterval,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            name: name.into(),
            description: description.into(),
            price_cents,
            billing_interval,
            features: Vec::new(),
            is_active: true,
            is_archived: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Plan {
    const COLLECTION: &'static str = "plans";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A customer of the event-planning business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            name: name.into(),
            email: email.into(),
            phone: None,
            address: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Client {
    const COLLECTION: &'static str = "clients";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A booked event on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub client_id: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: Option<String>,
    pub status: EventStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            title: title.into(),
            client_id: None,
            starts_at,
            ends_at,
            location: None,
            status: EventStatus::Scheduled,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for CalendarEvent {
    const COLLECTION: &'static str = "calendar_events";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A reusable contract text with placeholder fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractTemplate {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub body: String,
    pub is_default: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContractTemplate {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            name: name.into(),
            body: body.into(),
            is_default: false,
            is_archived: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for ContractTemplate {
    const COLLECTION: &'static str = "contract_templates";

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_interval_roundtrip() {
        for s in ["monthly", "yearly", "one_off"] {
            let parsed: BillingInterval = s.parse().unwrap();
            assert_eq!(parsed.to_string(), s);
        }
        assert!("weekly".parse::<BillingInterval>().is_err());
    }

    #[test]
    fn event_status_roundtrip() {
        for s in ["scheduled", "confirmed", "cancelled", "completed"] {
            let parsed: EventStatus = s.parse().unwrap();
            assert_eq!(parsed.to_string(), s);
        }
        assert!("done".parse::<EventStatus>().is_err());
    }

    #[test]
    fn plan_serializes_with_snake_case_enum() {
        let plan = Plan::new("Basic", "Starter plan", 9900, BillingInterval::Monthly);
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["billing_interval"], "monthly");
        assert_eq!(value["is_active"], true);
        assert_eq!(value["is_archived"], false);
    }

    #[test]
    fn missing_id_defaults_to_empty() {
        // Records coming back from a REST backend may omit fields with
        // serde defaults; id must tolerate that during intermediate states.
        let json = serde_json::json!({
            "name": "Acme",
            "email": "ops@acme.test",
            "phone": null,
            "address": null,
            "is_active": true,
            "created_at": "2026-08-01T10:00:00Z",
            "updated_at": "2026-08-01T10:00:00Z",
        });
        let client: Client = serde_json::from_value(json).unwrap();
        assert_eq!(client.id(), "");
    }
}
