//! Integer identifiers for stored records.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Primary key of an account.
    AccountId
);
record_id!(
    /// Primary key of a job posting.
    JobId
);
record_id!(
    /// Primary key of a job application.
    ApplicationId
);
record_id!(NotificationId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_plain_integers() {
        assert_eq!(serde_json::to_string(&AccountId(7)).unwrap(), "7");
        let id: ApplicationId = serde_json::from_str("42").unwrap();
        assert_eq!(id, ApplicationId(42));
    }
}
