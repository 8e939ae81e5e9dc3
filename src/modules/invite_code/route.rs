use clap::Subcommand;

/// Registration invite codes (admin only)
#[derive(Debug, Subcommand)]
pub enum InviteCommand {
    Generate {
        #[arg(default_value_t = 1)]
        count: u32,
    },
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    Stats,
    Delete {
        id: u64,
    },
}
