use crate::{
    api::{client::ApiClient, error, success::MessageBody},
    modules::{
        auth::{
            model::{
                AuthResponse, CaptchaResponse, ChangePasswordModel, LoginRequest, RegisterRequest,
                UpdateProfile, VerifyCaptchaModel, VerifyCaptchaResponse,
            },
            repository::AuthRepository,
        },
        user::schema::UserEntity,
    },
};

#[derive(Clone)]
pub struct AuthRepositoryHttp {
    api: ApiClient,
}

impl AuthRepositoryHttp {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl AuthRepository for AuthRepositoryHttp {
    async fn get_captcha(&self) -> Result<CaptchaResponse, error::SystemError> {
        Ok(self.api.get::<CaptchaResponse>("auth/captcha").await?.into_data())
    }

    async fn verify_captcha(
        &self,
        req: &VerifyCaptchaModel,
    ) -> Result<VerifyCaptchaResponse, error::SystemError> {
        Ok(self.api.post::<_, VerifyCaptchaResponse>("auth/verify-captcha", req).await?.into_data())
    }

    async fn login(&self, req: &LoginRequest<'_>) -> Result<AuthResponse, error::SystemError> {
        Ok(self.api.post::<_, AuthResponse>("auth/login", req).await?.into_data())
    }

    async fn register(
        &self,
        req: &RegisterRequest<'_>,
    ) -> Result<AuthResponse, error::SystemError> {
        Ok(self.api.post::<_, AuthResponse>("auth/register", req).await?.into_data())
    }

    async fn get_profile(&self) -> Result<UserEntity, error::SystemError> {
        Ok(self.api.get::<UserEntity>("profile").await?.into_data())
    }

    async fn update_profile(&self, req: &UpdateProfile) -> Result<UserEntity, error::SystemError> {
        Ok(self.api.put::<_, UserEntity>("profile", req).await?.into_data())
    }

    async fn change_password(&self, req: &ChangePasswordModel) -> Result<(), error::SystemError> {
        let body = self.api.put::<_, MessageBody>("profile/password", req).await?.into_data();
        if let Some(message) = body.message {
            log::info!("password changed: {message}");
        }
        Ok(())
    }
}
