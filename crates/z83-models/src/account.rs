//! Account and role models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::ids::AccountId;

/// Account role. Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Job seeker, identified by national ID number
    Applicant,
    /// Staff member, identified by employee number
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Applicant => "applicant",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "applicant" => Ok(Role::Applicant),
            "admin" => Ok(Role::Admin),
            _ => Err(ModelError::UnknownRole(s.to_string())),
        }
    }
}

/// Role-specific identifier. Exactly one is held per account and it always
/// matches the account role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoleIdentifier {
    IdNo(String),
    EmployeeNo(String),
}

impl RoleIdentifier {
    /// The role this identifier belongs to.
    pub fn role(&self) -> Role {
        match self {
            RoleIdentifier::IdNo(_) => Role::Applicant,
            RoleIdentifier::EmployeeNo(_) => Role::Admin,
        }
    }

    pub fn id_no(&self) -> Option<&str> {
        match self {
            RoleIdentifier::IdNo(v) => Some(v),
            RoleIdentifier::EmployeeNo(_) => None,
        }
    }

    pub fn employee_no(&self) -> Option<&str> {
        match self {
            RoleIdentifier::EmployeeNo(v) => Some(v),
            RoleIdentifier::IdNo(_) => None,
        }
    }

    /// Rebuild from the two nullable columns of a stored row.
    pub fn from_columns(
        role: Role,
        id_no: Option<String>,
        employee_no: Option<String>,
    ) -> ModelResult<Self> {
        match role {
            Role::Applicant => id_no
                .map(RoleIdentifier::IdNo)
                .ok_or(ModelError::MissingField("id_no")),
            Role::Admin => employee_no
                .map(RoleIdentifier::EmployeeNo)
                .ok_or(ModelError::MissingField("employee_no")),
        }
    }
}

/// Public view of an account. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(flatten)]
    pub identifier: RoleIdentifier,
    pub created_at: DateTime<Utc>,
}

/// Validated registration fields, ready to be stored alongside a password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub identifier: RoleIdentifier,
}

impl NewAccount {
    /// Validate raw registration input.
    ///
    /// Blank strings count as missing. The identifier belonging to the other
    /// role must be absent.
    pub fn new(
        name: &str,
        email: &str,
        role: Role,
        id_no: Option<&str>,
        employee_no: Option<&str>,
    ) -> ModelResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::MissingField("name"));
        }

        let email = normalize_email(email);
        if email.is_empty() {
            return Err(ModelError::MissingField("email"));
        }

        let id_no = non_blank(id_no);
        let employee_no = non_blank(employee_no);

        let identifier = match role {
            Role::Applicant => {
                if employee_no.is_some() {
                    return Err(ModelError::UnexpectedIdentifier {
                        field: "employee_no",
                        role: "applicant",
                    });
                }
                RoleIdentifier::IdNo(id_no.ok_or(ModelError::MissingField("id_no"))?)
            }
            Role::Admin => {
                if id_no.is_some() {
                    return Err(ModelError::UnexpectedIdentifier {
                        field: "id_no",
                        role: "admin",
                    });
                }
                RoleIdentifier::EmployeeNo(
                    employee_no.ok_or(ModelError::MissingField("employee_no"))?,
                )
            }
        };

        Ok(Self {
            name: name.to_string(),
            email,
            role,
            identifier,
        })
    }
}

/// Canonical form of an email address used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("Applicant".parse::<Role>().unwrap(), Role::Applicant);
        assert_eq!(" admin ".parse::<Role>().unwrap(), Role::Admin);
        assert!("superadmin".parse::<Role>().is_err());
    }

    #[test]
    fn test_applicant_requires_id_no() {
        let err = NewAccount::new("Jane", "jane@x.com", Role::Applicant, None, None).unwrap_err();
        assert_eq!(err, ModelError::MissingField("id_no"));

        let err = NewAccount::new("Jane", "jane@x.com", Role::Applicant, Some("  "), None).unwrap_err();
        assert_eq!(err, ModelError::MissingField("id_no"));
    }

    #[test]
    fn test_admin_requires_employee_no() {
        let err = NewAccount::new("Sam", "sam@x.com", Role::Admin, None, None).unwrap_err();
        assert_eq!(err, ModelError::MissingField("employee_no"));
    }

    #[test]
    fn test_other_role_identifier_rejected() {
        let err = NewAccount::new("Jane", "jane@x.com", Role::Applicant, Some("123"), Some("E1"))
            .unwrap_err();
        assert!(matches!(err, ModelError::UnexpectedIdentifier { field: "employee_no", .. }));
    }

    #[test]
    fn test_new_account_normalizes_email() {
        let account =
            NewAccount::new(" Jane ", " Jane@X.com ", Role::Applicant, Some("123"), None).unwrap();
        assert_eq!(account.name, "Jane");
        assert_eq!(account.email, "jane@x.com");
        assert_eq!(account.identifier, RoleIdentifier::IdNo("123".to_string()));
        assert_eq!(account.identifier.role(), account.role);
    }

    #[test]
    fn test_account_serializes_identifier_inline() {
        let account = Account {
            id: AccountId(1),
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            role: Role::Applicant,
            identifier: RoleIdentifier::IdNo("123".to_string()),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["role"], "applicant");
        assert_eq!(json["id_no"], "123");
        assert!(json.get("employee_no").is_none());
        assert!(json.get("password").is_none());
    }
}
