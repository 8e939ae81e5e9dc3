use std::path::Path;

use log::info;
use tokio::io::AsyncBufRead;

use crate::api::error;
use crate::modules::auth::{
    model::{CaptchaChallenge, ChangePasswordModel, ProfileDraft, SignInModel, SignUpModel},
    route::AuthCommand,
    service::AuthService,
};
use crate::modules::user::schema::UserEntity;
use crate::utils::Prompt;
use crate::AppState;

/// Captchas presented per login or registration before giving up.
const CAPTCHA_ATTEMPTS: u32 = 3;

pub enum AuthForm {
    SignIn(SignInModel),
    SignUp(SignUpModel),
}

async fn present_captcha(
    challenge: &CaptchaChallenge,
    out: &Path,
) -> Result<(), error::SystemError> {
    tokio::fs::write(out, &challenge.image_png).await?;
    eprintln!("Captcha image written to {}", out.display());
    Ok(())
}

// Failures after which the handshake already holds a replacement captcha
// worth showing. Form errors and local IO are not among them.
fn retry_with_new_captcha(e: &error::SystemError) -> bool {
    matches!(
        e,
        error::SystemError::Http { .. }
            | error::SystemError::Unauthorized(_)
            | error::SystemError::MissingField(_)
    )
}

/// Runs the captcha handshake for `form`. After a rejected code or login the
/// replacement captcha is written to `out` and the code asked for again, up
/// to [`CAPTCHA_ATTEMPTS`] times. An empty answer gives up.
pub async fn authenticate<R: AsyncBufRead + Unpin>(
    auth: &AuthService,
    mut form: AuthForm,
    out: &Path,
    prompt: &mut Prompt<R>,
) -> Result<UserEntity, error::SystemError> {
    if auth.session().is_authenticated() {
        info!("already signed in, the new session will replace the current one");
    }
    let mut handshake = auth.handshake();
    handshake.challenge().await?;

    let mut attempt = 1;
    loop {
        let Some(challenge) = handshake.current_challenge() else {
            return Err(error::SystemError::bad_request("No captcha available, try again later"));
        };
        present_captcha(challenge, out).await?;
        let code = prompt.ask("Captcha code (empty to give up)").await?;
        if code.is_empty() {
            return Err(error::SystemError::bad_request("Captcha not solved"));
        }

        let result = match &form {
            AuthForm::SignIn(model) => auth.sign_in(&mut handshake, &code, model.clone()).await,
            AuthForm::SignUp(model) => auth.sign_up(&mut handshake, &code, model.clone()).await,
        };
        let e = match result {
            Ok(user) => return Ok(user),
            Err(e) => e,
        };
        if attempt >= CAPTCHA_ATTEMPTS
            || !retry_with_new_captcha(&e)
            || handshake.current_challenge().is_none()
        {
            return Err(e);
        }
        attempt += 1;
        let rejected_credentials = matches!(e, error::SystemError::Unauthorized(_));
        eprintln!("{}", error::Error::from(e).message());
        if rejected_credentials {
            if let AuthForm::SignIn(model) = &mut form {
                model.password = prompt.ask_required("Password").await?;
            }
        }
    }
}

pub fn print_user(user: &UserEntity) {
    println!("#{} {} <{}> [{}]", user.id, user.username, user.email, user.role);
    if let Some(created_at) = user.created_at {
        println!("  member since {}", created_at.format("%Y-%m-%d"));
    }
}

pub async fn handle(cmd: AuthCommand, state: &AppState) -> Result<(), error::Error> {
    let auth = &state.auth;
    match cmd {
        AuthCommand::Captcha { out } => {
            let mut handshake = auth.handshake();
            let challenge = handshake.challenge().await?;
            tokio::fs::write(&out, &challenge.image_png).await.map_err(error::SystemError::from)?;
            println!("captcha {} saved to {}", challenge.captcha_id, out.display());
        }
        AuthCommand::Login { username, captcha_out } => {
            let mut prompt = Prompt::stdin();
            let password = prompt.ask_required("Password").await?;
            let form = AuthForm::SignIn(SignInModel { username, password });
            let user = authenticate(auth, form, &captcha_out, &mut prompt).await?;
            println!("Signed in as {} ({})", user.username, user.role);
        }
        AuthCommand::Register { username, email, invite_code, captcha_out } => {
            let mut prompt = Prompt::stdin();
            let password = prompt.ask_required("Password").await?;
            if prompt.ask("Repeat password").await? != password {
                return Err(error::Error::bad_request("Passwords do not match"));
            }
            let form = AuthForm::SignUp(SignUpModel { username, email, password, invite_code });
            let user = authenticate(auth, form, &captcha_out, &mut prompt).await?;
            println!("Registered and signed in as {}", user.username);
        }
        AuthCommand::Logout => {
            auth.sign_out()?;
            println!("Signed out");
        }
        AuthCommand::Whoami => match auth.session().snapshot() {
            Some(session) => {
                print_user(&session.user);
                let shown: String = session.token.chars().take(8).collect();
                println!("  token {shown}...");
            }
            None => println!("Not signed in"),
        },
        AuthCommand::Profile { username, email } => {
            let current = auth.fetch_profile().await?;
            if username.is_none() && email.is_none() {
                print_user(&current);
                return Ok(());
            }
            let mut draft = ProfileDraft::from(&current);
            if let Some(username) = username {
                draft.username = username;
            }
            if let Some(email) = email {
                draft.email = email;
            }
            let user = auth.update_profile(draft).await?;
            print_user(&user);
        }
        AuthCommand::Password => {
            let mut prompt = Prompt::stdin();
            let current_password = prompt.ask_required("Current password").await?;
            let new_password = prompt.ask_required("New password").await?;
            if prompt.ask("Repeat new password").await? != new_password {
                return Err(error::Error::bad_request("Passwords do not match"));
            }
            auth.change_password(ChangePasswordModel { current_password, new_password }).await?;
            println!("Password changed");
        }
    }
    Ok(())
}
