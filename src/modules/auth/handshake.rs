use std::sync::Arc;

use log::{info, warn};

use crate::{
    api::error,
    modules::{
        auth::{
            model::{
                CaptchaChallenge, LoginRequest, RegisterRequest, SignInModel, SignUpModel,
                VerifyCaptchaModel,
            },
            repository::AuthRepository,
        },
        user::schema::UserEntity,
    },
    utils::Validated,
};

#[derive(Debug, Clone, PartialEq)]
pub enum HandshakeState {
    Unchallenged,
    Challenged(CaptchaChallenge),
    Verified { auth_token: String },
    Authenticated,
}

/// Captcha-gated login/registration.
///
/// `Unchallenged -> Challenged -> Verified -> Authenticated`. Any failure after
/// the captcha was issued throws the captcha away and fetches a new one; a
/// captcha id or verified token is never reused.
pub struct CaptchaHandshake {
    repo: Arc<dyn AuthRepository + Send + Sync>,
    state: HandshakeState,
}

impl CaptchaHandshake {
    pub fn new(repo: Arc<dyn AuthRepository + Send + Sync>) -> Self {
        CaptchaHandshake { repo, state: HandshakeState::Unchallenged }
    }

    pub fn state(&self) -> &HandshakeState {
        &self.state
    }

    pub fn current_challenge(&self) -> Option<&CaptchaChallenge> {
        match &self.state {
            HandshakeState::Challenged(challenge) => Some(challenge),
            _ => None,
        }
    }

    /// Fetches a fresh captcha, discarding whatever the flow held before.
    pub async fn challenge(&mut self) -> Result<&CaptchaChallenge, error::SystemError> {
        self.state = HandshakeState::Unchallenged;
        let challenge = CaptchaChallenge::try_from(self.repo.get_captcha().await?)?;
        info!("captcha {} issued", challenge.captcha_id);
        self.state = HandshakeState::Challenged(challenge);
        match &self.state {
            HandshakeState::Challenged(challenge) => Ok(challenge),
            _ => Err(error::SystemError::bad_request("Captcha was not issued")),
        }
    }

    /// Restarts from a new captcha and hands back the error that caused it.
    async fn restart(&mut self, cause: error::SystemError) -> error::SystemError {
        warn!("authentication step failed, issuing a new captcha: {cause}");
        if let Err(e) = self.challenge().await {
            warn!("could not fetch a replacement captcha: {e}");
        }
        cause
    }

    pub async fn verify(&mut self, code: &str) -> Result<(), error::SystemError> {
        let HandshakeState::Challenged(challenge) = &self.state else {
            return Err(error::SystemError::bad_request("Request a captcha first"));
        };
        let model = Validated::new(VerifyCaptchaModel {
            captcha_id: challenge.captcha_id.clone(),
            captcha_code: code.trim().to_string(),
        })?;

        let result = self.repo.verify_captcha(&model).await.and_then(|res| {
            res.auth_token
                .filter(|t| !t.trim().is_empty())
                .ok_or(error::SystemError::MissingField("auth_token"))
        });

        match result {
            Ok(auth_token) => {
                info!("captcha {} verified", model.captcha_id);
                self.state = HandshakeState::Verified { auth_token };
                Ok(())
            }
            Err(e) => Err(self.restart(e).await),
        }
    }

    fn take_verified_token(&mut self) -> Result<String, error::SystemError> {
        match std::mem::replace(&mut self.state, HandshakeState::Unchallenged) {
            HandshakeState::Verified { auth_token } => Ok(auth_token),
            other => {
                self.state = other;
                Err(error::SystemError::bad_request("Solve the captcha first"))
            }
        }
    }

    pub async fn sign_in(
        &mut self,
        model: &Validated<SignInModel>,
    ) -> Result<(String, UserEntity), error::SystemError> {
        let auth_token = self.take_verified_token()?;
        let req = LoginRequest {
            username: &model.username,
            password: &model.password,
            auth_token: &auth_token,
        };
        let result = self.repo.login(&req).await.and_then(|res| res.into_session());
        self.finish(result).await
    }

    pub async fn sign_up(
        &mut self,
        model: &Validated<SignUpModel>,
    ) -> Result<(String, UserEntity), error::SystemError> {
        let auth_token = self.take_verified_token()?;
        let req = RegisterRequest {
            username: &model.username,
            email: &model.email,
            password: &model.password,
            invite_code: &model.invite_code,
            auth_token: &auth_token,
        };
        let result = self.repo.register(&req).await.and_then(|res| res.into_session());
        self.finish(result).await
    }

    async fn finish(
        &mut self,
        result: Result<(String, UserEntity), error::SystemError>,
    ) -> Result<(String, UserEntity), error::SystemError> {
        match result {
            Ok(session) => {
                self.state = HandshakeState::Authenticated;
                Ok(session)
            }
            Err(e) => Err(self.restart(e).await),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::modules::auth::model::{
        AuthResponse, CaptchaResponse, ChangePasswordModel, UpdateProfile, VerifyCaptchaResponse,
    };
    use crate::modules::user::schema::UserRole;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    // 1x1 transparent PNG
    pub(crate) const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    /// Server double: code "1234" solves any captcha, password "secret1" logs in.
    #[derive(Default)]
    pub(crate) struct FakeAuthRepo {
        pub issued: Mutex<u32>,
        pub verified: Mutex<Vec<String>>,
        pub login_token: Mutex<Option<String>>,
        pub captcha_down: Mutex<bool>,
    }

    impl FakeAuthRepo {
        pub(crate) fn new() -> Self {
            let repo = FakeAuthRepo::default();
            *repo.login_token.lock().unwrap() = Some("abc123".into());
            repo
        }

        pub(crate) fn admin() -> UserEntity {
            UserEntity {
                id: 1,
                username: "root".into(),
                email: "root@example.com".into(),
                role: UserRole::Admin,
                inviter_id: None,
                created_at: None,
                updated_at: None,
            }
        }
    }

    #[async_trait::async_trait]
    impl AuthRepository for FakeAuthRepo {
        async fn get_captcha(&self) -> Result<CaptchaResponse, error::SystemError> {
            if *self.captcha_down.lock().unwrap() {
                return Err(error::SystemError::http(StatusCode::SERVICE_UNAVAILABLE, ""));
            }
            let mut issued = self.issued.lock().unwrap();
            *issued += 1;
            Ok(CaptchaResponse {
                captcha_id: format!("captcha-{issued}"),
                captcha_b64: format!("data:image/png;base64,{PNG_B64}"),
                auth_token: format!("provisional-{issued}"),
            })
        }

        async fn verify_captcha(
            &self,
            req: &VerifyCaptchaModel,
        ) -> Result<VerifyCaptchaResponse, error::SystemError> {
            let mut verified = self.verified.lock().unwrap();
            if verified.contains(&req.captcha_id) {
                return Err(error::SystemError::http(
                    StatusCode::BAD_REQUEST,
                    "captcha already used",
                ));
            }
            verified.push(req.captcha_id.clone());
            if req.captcha_code != "1234" {
                return Err(error::SystemError::http(StatusCode::BAD_REQUEST, "wrong captcha"));
            }
            Ok(VerifyCaptchaResponse { auth_token: Some(format!("verified-{}", req.captcha_id)) })
        }

        async fn login(&self, req: &LoginRequest<'_>) -> Result<AuthResponse, error::SystemError> {
            if !req.auth_token.starts_with("verified-") {
                return Err(error::SystemError::unauthorized("bad auth token"));
            }
            if req.password != "secret1" {
                return Err(error::SystemError::unauthorized("wrong password"));
            }
            Ok(AuthResponse {
                token: self.login_token.lock().unwrap().clone(),
                user: Some(Self::admin()),
            })
        }

        async fn register(
            &self,
            req: &RegisterRequest<'_>,
        ) -> Result<AuthResponse, error::SystemError> {
            if req.invite_code != "INVITE" {
                return Err(error::SystemError::http(
                    StatusCode::BAD_REQUEST,
                    "invalid invite code",
                ));
            }
            let mut user = Self::admin();
            user.id = 2;
            user.username = req.username.to_string();
            user.role = UserRole::User;
            Ok(AuthResponse { token: Some("fresh".into()), user: Some(user) })
        }

        async fn get_profile(&self) -> Result<UserEntity, error::SystemError> {
            Ok(Self::admin())
        }

        async fn update_profile(
            &self,
            req: &UpdateProfile,
        ) -> Result<UserEntity, error::SystemError> {
            let mut user = Self::admin();
            if let Some(username) = &req.username {
                user.username = username.clone();
            }
            if let Some(email) = &req.email {
                user.email = email.clone();
            }
            Ok(user)
        }

        async fn change_password(
            &self,
            req: &ChangePasswordModel,
        ) -> Result<(), error::SystemError> {
            if req.current_password != "secret1" {
                return Err(error::SystemError::http(
                    StatusCode::BAD_REQUEST,
                    "wrong current password",
                ));
            }
            Ok(())
        }
    }

    fn sign_in_model(password: &str) -> Validated<SignInModel> {
        Validated::new(SignInModel { username: "root".into(), password: password.into() }).unwrap()
    }

    fn captcha_id(hs: &CaptchaHandshake) -> String {
        hs.current_challenge().unwrap().captcha_id.clone()
    }

    #[tokio::test]
    async fn test_full_handshake_succeeds() {
        let mut hs = CaptchaHandshake::new(Arc::new(FakeAuthRepo::new()));
        hs.challenge().await.unwrap();
        hs.verify("1234").await.unwrap();
        assert!(matches!(hs.state(), HandshakeState::Verified { .. }));

        let (token, user) = hs.sign_in(&sign_in_model("secret1")).await.unwrap();
        assert_eq!(token, "abc123");
        assert_eq!(user.id, 1);
        assert_eq!(hs.state(), &HandshakeState::Authenticated);
    }

    #[tokio::test]
    async fn test_wrong_code_issues_new_captcha() {
        let mut hs = CaptchaHandshake::new(Arc::new(FakeAuthRepo::new()));
        hs.challenge().await.unwrap();
        let first = captcha_id(&hs);

        assert!(hs.verify("0000").await.is_err());
        let second = captcha_id(&hs);
        assert_ne!(first, second);

        hs.verify("1234").await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_code_keeps_captcha_without_network() {
        let repo = Arc::new(FakeAuthRepo::new());
        let mut hs = CaptchaHandshake::new(repo.clone());
        hs.challenge().await.unwrap();
        let first = captcha_id(&hs);

        assert!(matches!(hs.verify("  ").await, Err(error::SystemError::Validation(_))));
        assert_eq!(captcha_id(&hs), first);
        assert!(repo.verified.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_login_restarts_from_new_captcha() {
        let mut hs = CaptchaHandshake::new(Arc::new(FakeAuthRepo::new()));
        hs.challenge().await.unwrap();
        let first = captcha_id(&hs);
        hs.verify("1234").await.unwrap();

        assert!(hs.sign_in(&sign_in_model("wrong-password")).await.is_err());
        assert_ne!(captcha_id(&hs), first);

        assert!(hs.sign_in(&sign_in_model("secret1")).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_session_token_counts_as_failure() {
        let repo = Arc::new(FakeAuthRepo::new());
        *repo.login_token.lock().unwrap() = Some(String::new());
        let mut hs = CaptchaHandshake::new(repo);
        hs.challenge().await.unwrap();
        hs.verify("1234").await.unwrap();

        let err = hs.sign_in(&sign_in_model("secret1")).await.unwrap_err();
        assert!(matches!(err, error::SystemError::MissingField("token")));
        assert!(matches!(hs.state(), HandshakeState::Challenged(_)));
    }

    #[tokio::test]
    async fn test_failed_restart_leaves_flow_unchallenged() {
        let repo = Arc::new(FakeAuthRepo::new());
        let mut hs = CaptchaHandshake::new(repo.clone());
        hs.challenge().await.unwrap();
        *repo.captcha_down.lock().unwrap() = true;

        let err = hs.verify("0000").await.unwrap_err();
        assert!(matches!(
            err,
            error::SystemError::Http { status, .. } if status == StatusCode::BAD_REQUEST
        ));
        assert_eq!(hs.state(), &HandshakeState::Unchallenged);
    }

    #[tokio::test]
    async fn test_steps_out_of_order_are_refused() {
        let mut hs = CaptchaHandshake::new(Arc::new(FakeAuthRepo::new()));
        assert!(hs.verify("1234").await.is_err());
        assert!(hs.sign_in(&sign_in_model("secret1")).await.is_err());
        assert_eq!(hs.state(), &HandshakeState::Unchallenged);

        hs.challenge().await.unwrap();
        assert!(hs.sign_in(&sign_in_model("secret1")).await.is_err());
        assert!(matches!(hs.state(), HandshakeState::Challenged(_)));
    }

    #[tokio::test]
    async fn test_sign_up_uses_invite_code() {
        let mut hs = CaptchaHandshake::new(Arc::new(FakeAuthRepo::new()));
        hs.challenge().await.unwrap();
        hs.verify("1234").await.unwrap();
        let model = Validated::new(SignUpModel {
            username: "newbie".into(),
            email: "newbie@example.com".into(),
            password: "secret1".into(),
            invite_code: "INVITE".into(),
        })
        .unwrap();

        let (token, user) = hs.sign_up(&model).await.unwrap();
        assert_eq!(token, "fresh");
        assert_eq!(user.username, "newbie");
    }
}
