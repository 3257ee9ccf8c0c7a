//! User document schema
//!
//! Teachers and students share the `users` collection; `role` tells them apart.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::report::names::display_name;

/// Collection name for users
pub const USER_COLLECTION: &str = "users";

/// Role value identifying teachers
pub const TEACHER_ROLE: &str = "teacher";

/// User document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub middle_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,
}

impl UserDoc {
    /// Create a user with the given role and name parts
    pub fn new(role: &str, gender: &str, first: &str, middle: &str, last: &str) -> Self {
        Self {
            _id: Some(ObjectId::new()),
            role: Some(role.to_string()),
            gender: Some(gender.to_string()),
            first_name: Some(first.to_string()),
            middle_name: Some(middle.to_string()),
            last_name: Some(last.to_string()),
        }
    }

    /// Normalized first/middle/last name
    pub fn display_name(&self) -> String {
        display_name([
            self.first_name.as_deref(),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
        ])
    }

    pub fn is_teacher(&self) -> bool {
        self.role.as_deref() == Some(TEACHER_ROLE)
    }

    /// Case-insensitive exact gender match; users without a gender never match
    pub fn has_gender(&self, gender: &str) -> bool {
        self.gender
            .as_deref()
            .is_some_and(|g| g.to_lowercase() == gender.to_lowercase())
    }
}
