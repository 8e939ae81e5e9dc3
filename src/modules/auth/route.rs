use clap::Subcommand;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Fetch a captcha and save it as a PNG
    Captcha {
        #[arg(long, default_value = "captcha.png")]
        out: PathBuf,
    },
    /// Sign in; the captcha image is written to disk and the code read from stdin
    Login {
        username: String,
        #[arg(long, default_value = "captcha.png")]
        captcha_out: PathBuf,
    },
    /// Create an account with an invite code
    Register {
        username: String,
        email: String,
        #[arg(long)]
        invite_code: String,
        #[arg(long, default_value = "captcha.png")]
        captcha_out: PathBuf,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user from the stored session
    Whoami,
    /// Show the profile, or change username/email
    Profile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Change the account password
    Password,
}
