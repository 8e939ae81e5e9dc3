use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::{Arc, LazyLock};

use crate::{
    api::{client::ApiClient, error},
    configs::{build_http_client, LocalStorage},
    modules::{
        auth::{
            repository_http::AuthRepositoryHttp, route::AuthCommand, service::AuthService,
            session::SessionStore,
        },
        invite_code::{
            repository_http::InviteCodeRepositoryHttp, route::InviteCommand,
            service::InviteCodeService,
        },
        material::{
            repository_http::MaterialRepositoryHttp, route::MaterialCommand,
            service::MaterialService,
        },
        tag::{repository_http::TagRepositoryHttp, route::TagCommand, service::TagService},
        user::{repository_http::UserRepositoryHttp, route::UserCommand, service::UserService},
        workflow::{
            repository_http::WorkflowRepositoryHttp, route::WorkflowCommand,
            service::WorkflowService,
        },
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[derive(Parser)]
#[command(name = "mediacloud", version, about = "Client for the media cloud asset library")]
struct Cli {
    /// API base URL, overrides API_BASE_URL
    #[arg(long, global = true)]
    api: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in, sign out and manage your profile
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Browse, upload and organise media files
    #[command(subcommand)]
    Material(MaterialCommand),
    #[command(subcommand)]
    Tag(TagCommand),
    #[command(subcommand)]
    Workflow(WorkflowCommand),
    #[command(subcommand)]
    User(UserCommand),
    #[command(subcommand)]
    Invite(InviteCommand),
}

/// Services shared by every command, all bound to one session.
pub struct AppState {
    pub auth: AuthService,
    pub materials: MaterialService,
    pub tags: TagService,
    pub workflows: WorkflowService,
    pub users: UserService,
    pub invites: InviteCodeService,
}

impl AppState {
    fn build(base_url: &str) -> Result<Self, error::SystemError> {
        let session = Arc::new(SessionStore::restore(LocalStorage::new(&ENV.session_file)));
        let http = build_http_client(ENV.request_timeout_secs)?;
        let api = ApiClient::new(http, base_url, session.clone())?;

        let auth_repo = AuthRepositoryHttp::new(api.clone());
        let material_repo = MaterialRepositoryHttp::new(api.clone(), ENV.upload_chunk_size);
        let tag_repo = TagRepositoryHttp::new(api.clone());
        let workflow_repo = WorkflowRepositoryHttp::new(api.clone());
        let user_repo = UserRepositoryHttp::new(api.clone());
        let invite_repo = InviteCodeRepositoryHttp::new(api.clone());

        Ok(AppState {
            auth: AuthService::with_dependencies(Arc::new(auth_repo), session.clone()),
            materials: MaterialService::with_dependencies(Arc::new(material_repo), api.origin()),
            tags: TagService::with_dependencies(Arc::new(tag_repo)),
            workflows: WorkflowService::with_dependencies(Arc::new(workflow_repo)),
            users: UserService::with_dependencies(Arc::new(user_repo), session.clone()),
            invites: InviteCodeService::with_dependencies(Arc::new(invite_repo), session),
        })
    }
}

async fn run(cli: Cli) -> Result<(), error::Error> {
    let base_url = cli.api.as_deref().unwrap_or(&ENV.api_base_url);
    let state = AppState::build(base_url)?;

    match cli.command {
        Command::Auth(cmd) => modules::auth::handle::handle(cmd, &state).await,
        Command::Material(cmd) => modules::material::handle::handle(cmd, &state).await,
        Command::Tag(cmd) => modules::tag::handle::handle(cmd, &state).await,
        Command::Workflow(cmd) => modules::workflow::handle::handle(cmd, &state).await,
        Command::User(cmd) => modules::user::handle::handle(cmd, &state).await,
        Command::Invite(cmd) => modules::invite_code::handle::handle(cmd, &state).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    LazyLock::force(&ENV);
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e.message());
            if e.requires_login() {
                eprintln!("run `mediacloud auth login <username>` to sign in again");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_nested_commands() {
        let cli = Cli::try_parse_from([
            "mediacloud",
            "material",
            "edit",
            "7",
            "--starred",
            "true",
            "--tags",
            "1,2",
            "--clear-workflow",
        ])
        .unwrap();
        match cli.command {
            Command::Material(MaterialCommand::Edit {
                id, starred, tags, clear_workflow, workflow, ..
            }) => {
                assert_eq!(id, 7);
                assert_eq!(starred, Some(true));
                assert_eq!(tags, Some(vec![1, 2]));
                assert!(clear_workflow);
                assert_eq!(workflow, None);
            }
            _ => panic!("parsed into the wrong command"),
        }

        let both = ["mediacloud", "material", "edit", "7", "--workflow", "3", "--clear-workflow"];
        assert!(Cli::try_parse_from(both).is_err());
        assert!(Cli::try_parse_from(["mediacloud", "material", "star"]).is_err());
        assert!(Cli::try_parse_from(["mediacloud", "user", "role", "4", "owner"]).is_err());
    }

    #[test]
    fn test_global_api_override() {
        let args = ["mediacloud", "tag", "list", "--api", "http://10.0.0.2:9000/api/v1"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.api.as_deref(), Some("http://10.0.0.2:9000/api/v1"));
        assert!(matches!(cli.command, Command::Tag(TagCommand::List)));
    }
}
