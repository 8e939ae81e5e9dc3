use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum TagCommand {
    List,
    Create {
        name: String,
        /// #RRGGBB, defaults to #409EFF
        #[arg(long)]
        color: Option<String>,
    },
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    Delete {
        id: u64,
    },
    /// Put a tag on a material
    Attach {
        tag_id: u64,
        material_id: u64,
    },
    /// Take a tag off a material
    Detach {
        tag_id: u64,
        material_id: u64,
    },
}
