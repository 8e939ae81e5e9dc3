use clap::Subcommand;
use std::path::PathBuf;

use crate::modules::material::schema::FileType;

#[derive(Debug, Subcommand)]
pub enum MaterialCommand {
    /// List materials matching all given filters
    List {
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        file_type: Option<FileType>,
        #[arg(long)]
        workflow: Option<u64>,
        #[arg(long = "tag")]
        tags: Vec<u64>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    Show {
        id: u64,
    },
    /// Upload a file, optionally into a workflow
    Upload {
        path: PathBuf,
        #[arg(long)]
        workflow: Option<u64>,
    },
    Star {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    Unstar {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    Publish {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    Unpublish {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Change fields of one material; only changed fields are sent
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        starred: Option<bool>,
        #[arg(long)]
        public: Option<bool>,
        #[arg(long, conflicts_with = "clear_workflow")]
        workflow: Option<u64>,
        #[arg(long)]
        clear_workflow: bool,
        /// Replaces the tag set, comma separated
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<u64>>,
    },
    Delete {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
}
