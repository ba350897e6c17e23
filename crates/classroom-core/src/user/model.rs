//! User domain model.
//!
//! Represents a classroom account as returned by the directory: the signed-in
//! identity as well as every entry of a class member listing.

use serde::{Deserialize, Serialize};

/// Education details attached to a student account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    /// Enrollment year in the Thai Buddhist calendar (e.g. "2565").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

/// A user record from the remote directory.
///
/// `id` and `email` are required; all name and profile fields default to
/// empty when the server omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default)]
    pub confirmed: bool,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Education>,
}

impl User {
    /// First and last name joined by a space, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }

    /// Name to show in listings: the full name, or the email when no name is set.
    pub fn display_name(&self) -> String {
        let name = self.full_name();
        if name.is_empty() {
            self.email.clone()
        } else {
            name
        }
    }

    /// Role for display; the directory's plain `user` role is a student.
    pub fn role_label(&self) -> &str {
        match self.role.as_str() {
            "user" => "Student",
            "" => "-",
            other => other,
        }
    }

    pub fn major(&self) -> Option<&str> {
        self.education.as_ref().and_then(|e| e.major.as_deref())
    }

    pub fn student_id(&self) -> Option<&str> {
        self.education.as_ref().and_then(|e| e.student_id.as_deref())
    }

    pub fn enrollment_year(&self) -> Option<&str> {
        self.education
            .as_ref()
            .and_then(|e| e.enrollment_year.as_deref())
    }
}
