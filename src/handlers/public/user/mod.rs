pub mod login;
pub mod register;

pub use login::login_post;
pub use register::register_post;

/// Emails are compared case-insensitively and without surrounding whitespace.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_email;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  Donor@Example.ORG "), "donor@example.org");
    }
}
