//! Applicant profile models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::ids::AccountId;

/// Profile details kept alongside an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Profile {
    /// Owning account
    pub account_id: AccountId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifications: Option<String>,

    /// Stored path of the uploaded CV
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_path: Option<String>,

    /// Stored path of the uploaded identity document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_document_path: Option<String>,

    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// An empty profile for an account that has never saved one.
    pub fn empty(account_id: AccountId) -> Self {
        Self {
            account_id,
            phone: None,
            address: None,
            qualifications: None,
            cv_path: None,
            id_document_path: None,
            updated_at: Utc::now(),
        }
    }

    /// Apply an update. Fields absent from the update keep their value.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        if let Some(qualifications) = update.qualifications {
            self.qualifications = Some(qualifications);
        }
        self.updated_at = Utc::now();
    }

    /// Record the stored path for an uploaded document.
    pub fn set_document_path(&mut self, kind: DocumentKind, path: String) {
        match kind {
            DocumentKind::Cv => self.cv_path = Some(path),
            DocumentKind::IdDocument => self.id_document_path = Some(path),
        }
        self.updated_at = Utc::now();
    }
}

/// Editable profile fields. Ownership comes from the authenticated caller,
/// never from this body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub qualifications: Option<String>,
}

/// Kinds of documents an applicant can upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Cv,
    IdDocument,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Cv => "cv",
            DocumentKind::IdDocument => "id_document",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cv" => Ok(DocumentKind::Cv),
            "id_document" | "id" => Ok(DocumentKind::IdDocument),
            _ => Err(ModelError::UnknownDocumentKind(s.to_string())),
        }
    }
}
