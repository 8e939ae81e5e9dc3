use crate::api::error;
use crate::modules::tag::{
    model::{CreateTagModel, TagDraft},
    route::TagCommand,
    schema::TagEntity,
};
use crate::AppState;

fn print_tag(tag: &TagEntity) {
    let count = tag.material_count.map(|n| format!("  ({n} materials)")).unwrap_or_default();
    println!("{:>5} {} {}{count}", tag.id, tag.color, tag.name);
}

pub async fn handle(cmd: TagCommand, state: &AppState) -> Result<(), error::Error> {
    let tags = &state.tags;
    match cmd {
        TagCommand::List => {
            let all = tags.list().await?;
            if all.is_empty() {
                println!("No tags yet");
            }
            all.iter().for_each(print_tag);
        }
        TagCommand::Create { name, color } => {
            print_tag(&tags.create(CreateTagModel::new(&name, color.as_deref())).await?);
        }
        TagCommand::Edit { id, name, color } => {
            let original = tags.find(id).await?;
            let mut draft = TagDraft::from(&original);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(color) = color {
                draft.color = color;
            }
            print_tag(&tags.update(&original, draft).await?);
        }
        TagCommand::Delete { id } => {
            tags.delete(id).await?;
            println!("Tag {id} deleted");
        }
        TagCommand::Attach { tag_id, material_id } => {
            tags.attach(tag_id, material_id).await?;
            println!("Tag {tag_id} added to material {material_id}");
        }
        TagCommand::Detach { tag_id, material_id } => {
            tags.detach(tag_id, material_id).await?;
            println!("Tag {tag_id} removed from material {material_id}");
        }
    }
    Ok(())
}
