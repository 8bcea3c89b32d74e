use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, models::trip::require};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDriver {
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl NewDriver {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)
    }
}

impl DriverPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.name {
            Some(name) => require("name", name),
            None => Ok(()),
        }
    }
}

impl Driver {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)
    }

    pub fn from_draft(id: String, created_at: DateTime<Utc>, draft: NewDriver) -> Self {
        Self {
            id,
            name: draft.name,
            phone: draft.phone,
            created_at,
        }
    }

    pub fn apply(&mut self, patch: DriverPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
    }
}

/// Roster used when no drivers have been stored yet.
pub fn default_drivers(created_at: DateTime<Utc>) -> Vec<Driver> {
    [
        ("1", "أحمد محمد", "0123456789"),
        ("2", "محمد علي", "0123456790"),
        ("3", "عبدالله أحمد", "0123456791"),
        ("4", "خالد محمود", "0123456792"),
        ("5", "يوسف إبراهيم", "0123456793"),
    ]
    .into_iter()
    .map(|(id, name, phone)| Driver {
        id: id.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        created_at,
    })
    .collect()
}
