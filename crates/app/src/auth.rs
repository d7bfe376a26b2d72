//! User authentication against the credential table.

use std::collections::HashMap;

/// One row of the credential table.
#[derive(Clone, Debug)]
pub struct Credential {
    pub password: String,
    /// Raw access-level text from the file; resolved via [`Role::parse`]
    /// only after a successful login.
    pub role: String,
}

pub type Credentials = HashMap<String, Credential>;

/// Access level gating the dashboards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Manager,
    Assistant,
}

impl Role {
    /// Resolves the credential table's `type` column. Unknown levels are
    /// `None`; the caller treats that as a startup failure.
    #[must_use]
    pub fn parse(text: &str) -> Option<Role> {
        match text.trim().to_lowercase().as_str() {
            "manager" => Some(Role::Manager),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// Checks one username/password pair against the table.
#[must_use]
pub fn verify<'a>(
    credentials: &'a Credentials,
    username: &str,
    password: &str,
) -> Option<&'a Credential> {
    credentials
        .get(username)
        .filter(|credential| credential.password == password)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Credentials {
        HashMap::from([
            (
                "ada".to_string(),
                Credential {
                    password: "secret".to_string(),
                    role: "manager".to_string(),
                },
            ),
            (
                "bo".to_string(),
                Credential {
                    password: "pass".to_string(),
                    role: "assistant".to_string(),
                },
            ),
        ])
    }

    #[test]
    fn verify_checks_both_fields() {
        let table = table();
        assert!(verify(&table, "ada", "secret").is_some());
        assert!(verify(&table, "ada", "wrong").is_none());
        assert!(verify(&table, "nobody", "secret").is_none());
    }

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!(Role::parse("Manager"), Some(Role::Manager));
        assert_eq!(Role::parse(" assistant "), Some(Role::Assistant));
        assert_eq!(Role::parse("intern"), None);
    }
}
