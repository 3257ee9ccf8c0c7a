//! Install survey schema
//!
//! The mobile app asks new users how they heard about it and records the
//! answer together with the device identifier.

use bson::{oid::ObjectId, Bson, DateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Collection name for install survey answers
pub const SURVEY_COLLECTION: &str = "qurandownloadsurvey";

/// Device platform inferred from the identifier shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// iOS identifiers (IDFV) start with eight hex digits and a hyphen
    pub fn from_device_id(device_id: &str) -> Self {
        let bytes = device_id.as_bytes();
        let is_ios = bytes.len() > 8
            && bytes[..8].iter().all(u8::is_ascii_hexdigit)
            && bytes[8] == b'-';
        if is_ios {
            Self::Ios
        } else {
            Self::Android
        }
    }
}

/// Survey answer stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// "agent", "social media", "friend" or "other"
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "lenient_agent_id")]
    pub agent_id: Option<i64>,

    #[serde(default)]
    pub device_id: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime>,
}

impl SurveyDoc {
    pub fn new(kind: &str, agent_id: Option<i64>, device_id: &str, created_at: DateTime) -> Self {
        Self {
            _id: Some(ObjectId::new()),
            kind: Some(kind.to_string()),
            agent_id,
            device_id: Some(device_id.to_string()),
            created_at: Some(created_at),
        }
    }

    pub fn platform(&self) -> Platform {
        Platform::from_device_id(self.device_id.as_deref().unwrap_or(""))
    }
}

/// Older app builds stored the agent code as a string or a double
fn lenient_agent_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Bson>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Bson::Int32(n) => Some(i64::from(n)),
        Bson::Int64(n) => Some(n),
        Bson::Double(f) if f.fract() == 0.0 => Some(f as i64),
        Bson::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}
