use crate::api::error;
use crate::modules::workflow::{
    model::{AddMemberModel, CreateWorkflowModel, WorkflowDraft, WorkflowQuery},
    route::WorkflowCommand,
    schema::WorkflowEntity,
};
use crate::{AppState, ENV};

fn print_row(wf: &WorkflowEntity) {
    println!(
        "{:>5} {} {:<8} {:<8} {}",
        wf.id,
        wf.color,
        wf.kind,
        if wf.is_active { "active" } else { "inactive" },
        wf.name
    );
}

fn print_detail(wf: &WorkflowEntity) {
    print_row(wf);
    if !wf.description.is_empty() {
        println!("  {}", wf.description);
    }
    if let Some(count) = wf.material_count {
        println!("  materials: {count}");
    }
    if let Some(creator) = &wf.creator {
        println!("  created by {}", creator.username);
    }
    for member in &wf.members {
        println!("  - {} ({})", member.display_name(), member.role);
    }
}

pub async fn handle(cmd: WorkflowCommand, state: &AppState) -> Result<(), error::Error> {
    let workflows = &state.workflows;
    match cmd {
        WorkflowCommand::List { keyword, page, page_size } => {
            let page = workflows
                .list(&WorkflowQuery { keyword }, page, page_size.unwrap_or(ENV.page_size))
                .await?;
            page.items.iter().for_each(print_row);
            println!("{}", page.pager());
        }
        WorkflowCommand::Show { id } => print_detail(&workflows.get(id).await?),
        WorkflowCommand::Create { name, description, kind, color, inactive, config, members } => {
            let mut model = CreateWorkflowModel::new(&name);
            model.description = description;
            if let Some(kind) = kind {
                model.kind = kind;
            }
            if let Some(color) = color {
                model.color = color;
            }
            model.is_active = !inactive;
            model.config = config;
            model.members = members;
            print_detail(&workflows.create(model).await?);
        }
        WorkflowCommand::Edit { id, name, description, kind, color, active, config } => {
            let original = workflows.get(id).await?;
            let mut draft = WorkflowDraft::from(&original);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(kind) = kind {
                draft.kind = kind;
            }
            if let Some(color) = color {
                draft.color = color;
            }
            if let Some(active) = active {
                draft.is_active = active;
            }
            if let Some(config) = config {
                draft.config = config;
            }
            print_detail(&workflows.update(&original, draft).await?);
        }
        WorkflowCommand::Delete { id } => {
            workflows.delete(id).await?;
            println!("Workflow {id} deleted");
        }
        WorkflowCommand::AddMember { id, user_id, role } => {
            workflows.add_member(id, AddMemberModel::new(user_id, role.as_deref())).await?;
            println!("User {user_id} added to workflow {id}");
        }
        WorkflowCommand::RemoveMember { id, user_id } => {
            workflows.remove_member(id, user_id).await?;
            println!("User {user_id} removed from workflow {id}");
        }
    }
    Ok(())
}
