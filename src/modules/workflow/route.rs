use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum WorkflowCommand {
    List {
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    Show {
        id: u64,
    },
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        inactive: bool,
        #[arg(long, default_value = "")]
        config: String,
        /// User ids to add as members
        #[arg(long = "member")]
        members: Vec<u64>,
    },
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        config: Option<String>,
    },
    Delete {
        id: u64,
    },
    AddMember {
        id: u64,
        user_id: u64,
        #[arg(long)]
        role: Option<String>,
    },
    RemoveMember {
        id: u64,
        user_id: u64,
    },
}
