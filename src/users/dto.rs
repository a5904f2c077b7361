use serde::{Deserialize, Serialize};

use super::repo::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Request body for the token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Request body for profile updates; omitted fields are untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// The fields a user may see of themselves. The password hash never leaves
/// the server.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_response_omits_password() {
        let response = UserResponse {
            email: "test@example.com".to_string(),
            name: "Test".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn update_request_fields_are_optional() {
        let req: UpdateMeRequest = serde_json::from_str(r#"{"name":"new name"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("new name"));
        assert!(req.password.is_none());
    }
}
