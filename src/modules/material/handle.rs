use std::io::Write;

use crate::api::error;
use crate::modules::material::{
    model::{BatchAction, BatchOutcome, MaterialDraft, MaterialQuery, UploadProgress},
    route::MaterialCommand,
    schema::MaterialEntity,
};
use crate::{AppState, ENV};

fn print_row(m: &MaterialEntity) {
    let flags = format!(
        "{}{}",
        if m.is_starred { "*" } else { " " },
        if m.is_public { "P" } else { " " }
    );
    println!(
        "{:>6} {} {:<9} {:>10}  {}",
        m.id,
        flags,
        m.file_type.as_str(),
        m.file_size_formatted(),
        m.original_filename
    );
}

fn print_detail(m: &MaterialEntity) {
    println!("#{} {}", m.id, m.original_filename);
    println!("  type:      {} ({})", m.file_type.as_str(), m.mime_type);
    println!("  size:      {}", m.file_size_formatted());
    if let (Some(w), Some(h)) = (m.width, m.height) {
        println!("  pixels:    {w}x{h}");
    }
    if let Some(duration) = m.duration {
        println!("  duration:  {duration}s");
    }
    println!("  file:      {}", m.file_path);
    if let Some(thumb) = &m.thumbnail_path {
        println!("  thumbnail: {thumb}");
    }
    println!("  starred:   {}  public: {}", m.is_starred, m.is_public);
    if let Some(workflow_id) = m.workflow_id {
        println!("  workflow:  {workflow_id}");
    }
    let tags: Vec<&str> = m.tags().map(|t| t.name.as_str()).collect();
    if !tags.is_empty() {
        println!("  tags:      {}", tags.join(", "));
    }
    if let Some(uploader) = &m.uploader {
        println!("  uploader:  {}", uploader.username);
    }
    if let Some(at) = m.upload_time {
        println!("  uploaded:  {}", at.format("%Y-%m-%d %H:%M"));
    }
}

/// Prints per-item results and fails when any item failed.
fn report(outcome: BatchOutcome, verb: &str) -> Result<(), error::Error> {
    if !outcome.succeeded.is_empty() {
        let ids: Vec<String> = outcome.succeeded.iter().map(u64::to_string).collect();
        println!("{verb}: {}", ids.join(", "));
    }
    let failed = outcome.failed.len();
    for (id, e) in outcome.failed {
        eprintln!("material {id}: {}", error::Error::from(e).message());
    }
    if failed > 0 {
        return Err(error::Error::bad_request(format!("{failed} material(s) could not be {verb}")));
    }
    Ok(())
}

async fn batch(
    state: &AppState,
    ids: &[u64],
    action: BatchAction,
    verb: &str,
) -> Result<(), error::Error> {
    report(state.materials.batch(ids, action).await, verb)
}

pub async fn handle(cmd: MaterialCommand, state: &AppState) -> Result<(), error::Error> {
    let materials = &state.materials;
    match cmd {
        MaterialCommand::List { keyword, file_type, workflow, tags, page, page_size } => {
            let query = MaterialQuery { keyword, file_type, workflow_id: workflow, tag_ids: tags };
            let page = materials.list(&query, page, page_size.unwrap_or(ENV.page_size)).await?;
            page.items.iter().for_each(print_row);
            println!("{}", page.pager());
        }
        MaterialCommand::Show { id } => print_detail(&materials.get(id).await?),
        MaterialCommand::Upload { path, workflow } => {
            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<UploadProgress>();
            let bar = tokio::spawn(async move {
                while let Some(progress) = rx.recv().await {
                    eprint!("\ruploading... {:>3}%", progress.percentage());
                    let _ = std::io::stderr().flush();
                }
                eprintln!();
            });
            let result = materials.upload(&path, workflow, Some(tx)).await;
            let _ = bar.await;
            print_detail(&result?);
        }
        MaterialCommand::Star { ids } => batch(state, &ids, BatchAction::Star, "starred").await?,
        MaterialCommand::Unstar { ids } => {
            batch(state, &ids, BatchAction::Unstar, "unstarred").await?
        }
        MaterialCommand::Publish { ids } => {
            batch(state, &ids, BatchAction::Publish, "published").await?
        }
        MaterialCommand::Unpublish { ids } => {
            batch(state, &ids, BatchAction::Unpublish, "unpublished").await?
        }
        MaterialCommand::Edit { id, name, starred, public, workflow, clear_workflow, tags } => {
            let original = materials.get(id).await?;
            let mut draft = MaterialDraft::from(&original);
            if let Some(name) = name {
                draft.original_filename = name;
            }
            if let Some(starred) = starred {
                draft.is_starred = starred;
            }
            if let Some(public) = public {
                draft.is_public = public;
            }
            if clear_workflow {
                draft.workflow_id = None;
            } else if workflow.is_some() {
                draft.workflow_id = workflow;
            }
            if let Some(tags) = tags {
                draft.tag_ids = tags;
            }
            print_detail(&materials.update(&original, draft).await?);
        }
        MaterialCommand::Delete { ids } => {
            batch(state, &ids, BatchAction::Delete, "deleted").await?
        }
    }
    Ok(())
}
