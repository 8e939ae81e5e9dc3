use crate::api::error;
use crate::modules::auth::handle::print_user;
use crate::modules::user::{model::UserQuery, route::UserCommand};
use crate::{AppState, ENV};

pub async fn handle(cmd: UserCommand, state: &AppState) -> Result<(), error::Error> {
    let users = &state.users;
    match cmd {
        UserCommand::List { keyword, role, page, page_size } => {
            let page = users
                .list(&UserQuery { keyword, role }, page, page_size.unwrap_or(ENV.page_size))
                .await?;
            page.items.iter().for_each(print_user);
            println!("{}", page.pager());
        }
        UserCommand::Role { id, role } => match users.change_role(id, role).await? {
            Some(user) => print_user(&user),
            None => println!("User {id} is now {role}"),
        },
        UserCommand::Delete { id } => {
            users.delete(id).await?;
            println!("User {id} deleted");
        }
    }
    Ok(())
}
