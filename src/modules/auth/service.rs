use log::info;
use std::sync::Arc;

use crate::api::error;
use crate::modules::auth::{
    handshake::CaptchaHandshake,
    model::{ChangePasswordModel, ProfileDraft, SignInModel, SignUpModel, UpdateProfile},
    repository::AuthRepository,
    session::SessionStore,
};
use crate::modules::user::schema::UserEntity;
use crate::utils::Validated;

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn AuthRepository + Send + Sync>,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn with_dependencies(
        repo: Arc<dyn AuthRepository + Send + Sync>,
        session: Arc<SessionStore>,
    ) -> Self {
        AuthService { repo, session }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn handshake(&self) -> CaptchaHandshake {
        CaptchaHandshake::new(self.repo.clone())
    }

    /// Validates the form, solves the pending captcha and signs in.
    /// The form is checked first so a typo does not burn the captcha.
    pub async fn sign_in(
        &self,
        handshake: &mut CaptchaHandshake,
        captcha_code: &str,
        model: SignInModel,
    ) -> Result<UserEntity, error::SystemError> {
        let model = Validated::new(model)?;
        handshake.verify(captcha_code).await?;
        let (token, user) = handshake.sign_in(&model).await?;
        self.session.establish(token, user.clone())?;
        Ok(user)
    }

    pub async fn sign_up(
        &self,
        handshake: &mut CaptchaHandshake,
        captcha_code: &str,
        model: SignUpModel,
    ) -> Result<UserEntity, error::SystemError> {
        let model = Validated::new(model)?;
        handshake.verify(captcha_code).await?;
        let (token, user) = handshake.sign_up(&model).await?;
        self.session.establish(token, user.clone())?;
        info!("registered new account {}", user.username);
        Ok(user)
    }

    pub fn sign_out(&self) -> Result<(), error::SystemError> {
        let who = self.session.user().map(|u| u.username);
        self.session.logout()?;
        if let Some(who) = who {
            info!("{who} signed out");
        }
        Ok(())
    }

    pub async fn fetch_profile(&self) -> Result<UserEntity, error::SystemError> {
        let user = self.repo.get_profile().await?;
        self.session.refresh_user(user.clone())?;
        Ok(user)
    }

    /// Submits only the profile fields that differ from the stored user.
    pub async fn update_profile(
        &self,
        edited: ProfileDraft,
    ) -> Result<UserEntity, error::SystemError> {
        let current = self
            .session
            .user()
            .ok_or_else(|| error::SystemError::unauthorized("Not signed in"))?;
        let changes = UpdateProfile::diff(&ProfileDraft::from(&current), &edited);
        if changes.is_empty() {
            info!("profile unchanged, nothing to submit");
            return Ok(current);
        }
        let changes = Validated::new(changes)?;
        let user = self.repo.update_profile(&changes).await?;
        self.session.refresh_user(user.clone())?;
        Ok(user)
    }

    pub async fn change_password(
        &self,
        model: ChangePasswordModel,
    ) -> Result<(), error::SystemError> {
        let model = Validated::new(model)?;
        if model.current_password == model.new_password {
            return Err(error::SystemError::bad_request(
                "New password must differ from the current one",
            ));
        }
        self.repo.change_password(&model).await
    }
}
