mod tokens;

pub use tokens::{Claims, IssuedToken, TokenService, TokenType};

use crate::errors::{AuthError, CoreError};

/// The caller of a GraphQL operation.
///
/// Requests without a usable access token resolve to [`Actor::anonymous`];
/// guarded resolvers turn that into `UNAUTHORIZED` through [`Actor::require_user`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Actor {
    pub user_id: Option<i32>,
    is_staff: bool,
}

impl Actor {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(user_id: i32) -> Self {
        Self {
            user_id: Some(user_id),
            is_staff: false,
        }
    }

    pub fn with_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn is_staff(&self) -> bool {
        self.is_staff
    }

    pub fn require_user(&self) -> Result<i32, CoreError> {
        self.user_id.ok_or_else(|| AuthError::LoginRequired.into())
    }

    pub fn require_staff(&self) -> Result<i32, CoreError> {
        let user_id = self.require_user()?;
        if !self.is_staff {
            return Err(CoreError::forbidden("Staff privileges are required"));
        }
        Ok(user_id)
    }
}

/// Extracts the token from an `Authorization` header value.
///
/// Both `Bearer <token>` and the legacy `JWT <token>` prefixes are accepted.
pub fn bearer_token(header: &str) -> Option<&str> {
    let header = header.trim();
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("JWT "))?
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreErrorKind;

    #[test]
    fn anonymous_actor_is_rejected_by_guards() {
        let actor = Actor::anonymous();
        assert!(!actor.is_authenticated());
        assert_eq!(
            actor.require_user().unwrap_err().kind(),
            CoreErrorKind::Unauthorized
        );
    }

    #[test]
    fn staff_guard_needs_staff_flag() {
        let member = Actor::user(3);
        assert_eq!(member.require_user().unwrap(), 3);
        assert_eq!(
            member.require_staff().unwrap_err().kind(),
            CoreErrorKind::Forbidden
        );

        let staff = Actor::user(4).with_staff(true);
        assert_eq!(staff.require_staff().unwrap(), 4);
    }

    #[test]
    fn bearer_token_accepts_both_prefixes() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("JWT abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer   "), None);
    }
}
