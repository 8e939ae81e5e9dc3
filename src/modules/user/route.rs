use clap::Subcommand;

use crate::modules::user::schema::UserRole;

/// Account administration (admin only)
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    List {
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        role: Option<UserRole>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Grant or revoke admin rights
    Role {
        id: u64,
        role: UserRole,
    },
    Delete {
        id: u64,
    },
}
