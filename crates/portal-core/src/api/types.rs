//! Request and response schemas for the school API.
//!
//! Optional fields default at the deserialization boundary; a body that is
//! not a JSON object of the expected shape is rejected as malformed by the
//! client.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Dashboard color used when the backend does not provide one.
pub const DEFAULT_COLOR: &str = "#667eea";

/// Number of digits in a one-time passcode.
pub const OTP_LENGTH: usize = 6;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub userid: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OtpRequest {
    pub userid: String,
    pub otp: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoginResponse {
    pub status: bool,
    #[serde(deserialize_with = "de_opt_string")]
    pub userid: Option<String>,
    pub msg: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OtpResponse {
    pub status: bool,
    #[serde(deserialize_with = "de_opt_string")]
    pub token: Option<String>,
    pub msg: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardResponse {
    pub status: bool,
    pub msg: Option<String>,
    pub user: Option<UserProfile>,
    pub dashboard: Option<DashboardPayload>,
}

/// Profile of the logged-in user.
///
/// Only `name` and `userid` are interpreted; everything else is kept so the
/// cached copy round-trips unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub userid: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Display name, `"User"` when unknown.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("User")
    }

    /// Uppercased first letter of the name, `'U'` when unknown.
    pub fn initial(&self) -> char {
        self.name
            .as_deref()
            .and_then(|n| n.trim().chars().next())
            .map_or('U', |c| c.to_uppercase().next().unwrap_or(c))
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardPayload {
    pub carousel: Vec<String>,
    pub student: Option<StudentCounts>,
    #[serde(deserialize_with = "de_opt_amount")]
    pub amount: Option<f64>,
    pub color: Option<ThemeColor>,
}

/// Enrollment breakdown.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentCounts {
    #[serde(rename = "Boy", default)]
    pub boys: u64,
    #[serde(rename = "Girl", default)]
    pub girls: u64,
}

impl StudentCounts {
    pub fn total(&self) -> u64 {
        self.boys.saturating_add(self.girls)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeColor {
    pub dynamic_color: Option<String>,
}

/// Accepts a string or a number, normalising to a string; null stays `None`.
fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Accepts a number or a numeric string.
fn de_opt_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| de::Error::custom("amount out of range")),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid amount: {s}"))),
        Some(other) => Err(de::Error::custom(format!("invalid amount: {other}"))),
    }
}

/// Formats an amount the way the Indian numbering system groups digits,
/// e.g. `1234567` → `₹12,34,567`.
pub fn format_rupees(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = (amount.abs() * 100.0).round() / 100.0;
    let whole = rounded.trunc() as u64;
    let paise = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{tail}", groups.join(","))
    };

    let sign = if negative { "-" } else { "" };
    if paise == 0 {
        format!("{sign}₹{grouped}")
    } else {
        format!("{sign}₹{grouped}.{paise:02}")
    }
}
