//! Authorization rules applied after authentication.

use tracing::warn;

use z83_models::{AccountId, Role};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};

/// Allow only the owner of a resource.
///
/// Admins are not exempt; cross-account access needs its own explicit rule.
pub fn authorize(user: &AuthUser, resource_owner: AccountId) -> ApiResult<()> {
    if user.account_id == resource_owner {
        return Ok(());
    }

    warn!(
        account_id = %user.account_id,
        resource_owner = %resource_owner,
        "Ownership check failed"
    );
    crate::metrics::record_auth_failure("not_owner");
    Err(ApiError::forbidden("You do not have access to this resource"))
}

/// Allow only callers holding `role`.
pub fn require_role(user: &AuthUser, role: Role) -> ApiResult<()> {
    if user.role == role {
        return Ok(());
    }

    warn!(
        account_id = %user.account_id,
        role = %user.role,
        required = %role,
        "Role check failed"
    );
    crate::metrics::record_auth_failure("wrong_role");
    Err(ApiError::forbidden(format!("{} access required", role)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: Role) -> AuthUser {
        AuthUser {
            account_id: AccountId(id),
            email: format!("user{}@x.com", id),
            role,
        }
    }

    #[test]
    fn test_owner_allowed() {
        assert!(authorize(&user(7, Role::Applicant), AccountId(7)).is_ok());
    }

    #[test]
    fn test_other_owner_forbidden() {
        for owner in [0, 6, 8, 9, -7, i64::MAX] {
            let err = authorize(&user(7, Role::Applicant), AccountId(owner)).unwrap_err();
            assert!(matches!(err, ApiError::Forbidden(_)));
        }
    }

    #[test]
    fn test_admin_not_elevated() {
        let err = authorize(&user(1, Role::Admin), AccountId(9)).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert!(authorize(&user(9, Role::Admin), AccountId(9)).is_ok());
    }

    #[test]
    fn test_require_role() {
        assert!(require_role(&user(1, Role::Admin), Role::Admin).is_ok());
        assert!(matches!(
            require_role(&user(2, Role::Applicant), Role::Admin),
            Err(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            require_role(&user(1, Role::Admin), Role::Applicant),
            Err(ApiError::Forbidden(_))
        ));
    }
}
