//! Ownership guard
//!
//! Pure decision. Callers run it before any write so a denied mutation
//! leaves the store untouched.

use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

/// Allow only when the authenticated subject owns the resource
pub fn check_ownership(subject: &UserId, owner: &UserId) -> AuthResult<()> {
    if subject == owner {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_allowed() {
        let user = UserId::new();
        assert!(check_ownership(&user, &user).is_ok());
    }

    #[test]
    fn test_other_user_forbidden() {
        let result = check_ownership(&UserId::new(), &UserId::new());
        assert!(matches!(result, Err(AuthError::Forbidden)));
    }
}
