use base64::Engine;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::error;
use crate::modules::user::schema::UserEntity;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptchaResponse {
    #[serde(default)]
    pub captcha_id: String,
    #[serde(default)]
    pub captcha_b64: String,
    #[serde(default)]
    pub auth_token: String,
}

/// A captcha the user still has to solve. The provisional token that comes
/// with it is only checked for presence; verification issues the real one.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptchaChallenge {
    pub captcha_id: String,
    pub image_png: Vec<u8>,
}

fn decode_image(raw: &str) -> Result<Vec<u8>, error::SystemError> {
    let payload = match raw.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => raw,
    };
    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

impl TryFrom<CaptchaResponse> for CaptchaChallenge {
    type Error = error::SystemError;

    fn try_from(value: CaptchaResponse) -> Result<Self, Self::Error> {
        if value.captcha_id.trim().is_empty() {
            return Err(error::SystemError::MissingField("captcha_id"));
        }
        if value.auth_token.trim().is_empty() {
            return Err(error::SystemError::MissingField("auth_token"));
        }
        if value.captcha_b64.trim().is_empty() {
            return Err(error::SystemError::MissingField("captcha_b64"));
        }
        Ok(CaptchaChallenge {
            image_png: decode_image(&value.captcha_b64)?,
            captcha_id: value.captcha_id,
        })
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct VerifyCaptchaModel {
    pub captcha_id: String,
    #[validate(length(min = 1, message = "Captcha code cannot be empty"))]
    pub captcha_code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyCaptchaResponse {
    #[serde(default)]
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct SignInModel {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

#[derive(Debug, Clone, Validate)]
pub struct SignUpModel {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username must be between 3 and 50 characters long"
    ))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(length(min = 1, message = "Invite code cannot be empty"))]
    pub invite_code: String,
}

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub auth_token: &'a str,
}

#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub invite_code: &'a str,
    pub auth_token: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserEntity>,
}

impl AuthResponse {
    /// An empty token counts as a rejected login even on a 2xx response.
    pub fn into_session(self) -> Result<(String, UserEntity), error::SystemError> {
        let token = self
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or(error::SystemError::MissingField("token"))?;
        let user = self.user.ok_or(error::SystemError::MissingField("user"))?;
        Ok((token, user))
    }
}

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDraft {
    pub username: String,
    pub email: String,
}

impl From<&UserEntity> for ProfileDraft {
    fn from(user: &UserEntity) -> Self {
        ProfileDraft { username: user.username.clone(), email: user.email.clone() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct UpdateProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username must be between 3 and 50 characters long"
    ))]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl UpdateProfile {
    pub fn diff(original: &ProfileDraft, edited: &ProfileDraft) -> Self {
        UpdateProfile {
            username: (original.username != edited.username).then(|| edited.username.clone()),
            email: (original.email != edited.email).then(|| edited.email.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct ChangePasswordModel {
    #[validate(length(min = 1, message = "Current password cannot be empty"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters long"))]
    pub new_password: String,
}
