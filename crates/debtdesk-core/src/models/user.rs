use std::fmt;

use serde::{Deserialize, Serialize};

/// Profile of the signed-in user as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }

    /// Name plus email, for status lines
    pub fn display(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}

/// Login form input. Never persisted.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check the form rules before anything goes over the wire.
    /// Returns the message to show next to the form on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.email.trim().is_empty() {
            return Err("Email is required".to_string());
        }
        if !is_valid_email(self.email.trim()) {
            return Err("Invalid email address".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `local@domain.tld`, where the tld is at least two letters.
fn is_valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'));
    if !local_ok {
        return false;
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Success body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(is_valid_email("UPPER@EXAMPLE.IO"));

        assert!(!is_valid_email("")); // empty
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("@b.com")); // empty local part
        assert!(!is_valid_email("a@.com")); // empty host
        assert!(!is_valid_email("a@b")); // no tld
        assert!(!is_valid_email("a@b.c")); // tld too short
        assert!(!is_valid_email("a@b.c0m")); // digits in tld
        assert!(!is_valid_email("a@b@c.com")); // two @
        assert!(!is_valid_email("a b@c.com")); // space
    }

    #[test]
    fn test_credentials_validate() {
        assert!(Credentials::new("a@b.com", "x").validate().is_ok());
        assert_eq!(
            Credentials::new("", "x").validate().unwrap_err(),
            "Email is required"
        );
        assert_eq!(
            Credentials::new("nope", "x").validate().unwrap_err(),
            "Invalid email address"
        );
        assert_eq!(
            Credentials::new("a@b.com", "").validate().unwrap_err(),
            "Password is required"
        );
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("a@b.com", "hunter2");
        let dbg = format!("{:?}", creds);
        assert!(dbg.contains("a@b.com"));
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn test_parse_auth_response_minimal() {
        let json = r#"{"access_token":"T1",
            "user":{"id":1,"name":"A","email":"a@b.com","role":"admin"}}"#;
        let resp: AuthResponse = serde_json::from_str(json).expect("Failed to parse auth response");
        assert_eq!(resp.access_token, "T1");
        assert_eq!(resp.refresh_token, None);
        let user = resp.user.expect("user present");
        assert_eq!(user.id, 1);
        assert_eq!(user.company_id, None);
        assert!(user.is_admin());
    }

    #[test]
    fn test_parse_auth_response_full() {
        let json = r#"{
            "access_token": "T1",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "R1",
            "user": {"id": 7, "name": "Bo", "email": "bo@x.io", "role": "agent", "company_id": 3}
        }"#;
        let resp: AuthResponse = serde_json::from_str(json).expect("Failed to parse auth response");
        assert_eq!(resp.token_type, "Bearer");
        assert_eq!(resp.expires_in, 3600);
        assert_eq!(resp.refresh_token.as_deref(), Some("R1"));
        let user = resp.user.expect("user present");
        assert_eq!(user.company_id, Some(3));
        assert!(!user.is_admin());
        assert_eq!(user.display(), "Bo <bo@x.io>");
    }

    #[test]
    fn test_auth_response_requires_access_token() {
        let json = r#"{"token_type":"Bearer","expires_in":3600}"#;
        assert!(serde_json::from_str::<AuthResponse>(json).is_err());
    }
}
