use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::database::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Player,
    Organizer,
    Admin,
}

impl UserRole {
    /// Explicit rank table; a higher rank inherits every lower permission.
    pub fn rank(&self) -> u8 {
        match self {
            UserRole::Player => 1,
            UserRole::Organizer => 2,
            UserRole::Admin => 3,
        }
    }

    pub fn has_permission(&self, required: UserRole) -> bool {
        self.rank() >= required.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Player => "PLAYER",
            UserRole::Organizer => "ORGANIZER",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl FromStr for UserRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PLAYER" => Ok(UserRole::Player),
            "ORGANIZER" => Ok(UserRole::Organizer),
            "ADMIN" => Ok(UserRole::Admin),
            _ => Err(UnknownVariant { kind: "role", value: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_roles_inherit_lower_permissions() {
        assert!(UserRole::Admin.has_permission(UserRole::Organizer));
        assert!(UserRole::Admin.has_permission(UserRole::Player));
        assert!(UserRole::Organizer.has_permission(UserRole::Organizer));
        assert!(!UserRole::Player.has_permission(UserRole::Organizer));
        assert!(!UserRole::Organizer.has_permission(UserRole::Admin));
    }

    #[test]
    fn parses_header_values() {
        assert_eq!("organizer".parse::<UserRole>(), Ok(UserRole::Organizer));
        assert_eq!(" ADMIN ".parse::<UserRole>(), Ok(UserRole::Admin));
        assert!("owner".parse::<UserRole>().is_err());
    }
}
