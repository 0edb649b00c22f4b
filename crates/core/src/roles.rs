//! Role names stored in `users.role`.

/// Full access, including account bootstrap.
pub const ROLE_ADMIN: &str = "admin";

/// May edit site content and upload media.
pub const ROLE_EDITOR: &str = "editor";

/// Whether `role` is allowed to write site content.
pub fn can_edit_content(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_EDITOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_and_editor_can_edit() {
        assert!(can_edit_content(ROLE_ADMIN));
        assert!(can_edit_content(ROLE_EDITOR));
    }

    #[test]
    fn unknown_role_cannot_edit() {
        assert!(!can_edit_content("viewer"));
        assert!(!can_edit_content(""));
    }
}
