use crate::{
    api::error,
    modules::{
        auth::model::{
            AuthResponse, CaptchaResponse, ChangePasswordModel, LoginRequest, RegisterRequest,
            UpdateProfile, VerifyCaptchaModel, VerifyCaptchaResponse,
        },
        user::schema::UserEntity,
    },
};

#[async_trait::async_trait]
pub trait AuthRepository {
    async fn get_captcha(&self) -> Result<CaptchaResponse, error::SystemError>;

    async fn verify_captcha(
        &self,
        req: &VerifyCaptchaModel,
    ) -> Result<VerifyCaptchaResponse, error::SystemError>;

    async fn login(&self, req: &LoginRequest<'_>) -> Result<AuthResponse, error::SystemError>;

    async fn register(&self, req: &RegisterRequest<'_>) -> Result<AuthResponse, error::SystemError>;

    async fn get_profile(&self) -> Result<UserEntity, error::SystemError>;

    async fn update_profile(&self, req: &UpdateProfile) -> Result<UserEntity, error::SystemError>;

    async fn change_password(&self, req: &ChangePasswordModel) -> Result<(), error::SystemError>;
}
