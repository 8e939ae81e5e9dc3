use crate::api::error;
use crate::modules::invite_code::{route::InviteCommand, schema::InviteCodeEntity};
use crate::{AppState, ENV};

fn print_code(code: &InviteCodeEntity) {
    let marker = if code.is_available() { "+" } else { " " };
    let used_by = code.used_by.map(|id| format!("  used by #{id}")).unwrap_or_default();
    let created = code
        .created_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    println!(
        "{:>5} {marker} {:<16} {:<8} {created}{used_by}",
        code.id,
        code.code,
        code.status.to_string()
    );
}

pub async fn handle(cmd: InviteCommand, state: &AppState) -> Result<(), error::Error> {
    let invites = &state.invites;
    match cmd {
        InviteCommand::Generate { count } => {
            invites.generate(count).await?.iter().for_each(print_code)
        }
        InviteCommand::List { page, page_size } => {
            let page = invites.list(page, page_size.unwrap_or(ENV.page_size)).await?;
            page.items.iter().for_each(print_code);
            println!("{}", page.pager());
        }
        InviteCommand::Stats => {
            let stats = invites.stats().await?;
            println!(
                "total {}  unused {}  used {}  expired {}",
                stats.total, stats.unused, stats.used, stats.expired
            );
        }
        InviteCommand::Delete { id } => {
            invites.delete(id).await?;
            println!("Invite code {id} deleted");
        }
    }
    Ok(())
}
