pub mod roles;

pub use roles::UserRole;

use crate::database::UserId;

/// Who is calling, as asserted by the upstream identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Option<UserId>,
    pub role: UserRole,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            role: UserRole::Player,
        }
    }

    pub fn can(&self, required: UserRole) -> bool {
        self.role.has_permission(required)
    }
}
