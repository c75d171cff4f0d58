mod command;
mod config;
mod error;
mod render;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use todo_sync::{HttpGateway, Session, SyncCore};
use tracing_subscriber::EnvFilter;

use crate::command::{Command, HELP};
use crate::error::Result;

type Core = SyncCore<HttpGateway, Arc<Session>>;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    // stdout carries the rendered view.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_new(format!("todo={level},todo_sync={level}", level = config.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let session = Arc::new(Session::default());
    if let Some(user_id) = config.user_id {
        session.sign_in(user_id);
    }
    tracing::info!(base_url = %config.base_url, user_id = ?config.user_id, "starting");

    let (core, _scheduler) = SyncCore::spawn(
        HttpGateway::new(&config.base_url),
        Arc::clone(&session),
        config.sync_config(),
    );

    let mut views = core.subscribe();
    tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            println!("{}", render::render(&view));
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => dispatch(&core, &session, command),
            Err(err) => println!("{err}"),
        }
    }

    Ok(())
}

/// Forwards one command to the core. Gateway work runs in the background;
/// its outcome shows up in the next rendered frame.
fn dispatch(core: &Core, session: &Session, command: Command) {
    match command {
        Command::Add(title) => {
            core.set_draft_title(&title);
            if core.add_todo(&title).is_none() {
                println!("nothing to add (empty title or not signed in)");
            }
        }
        Command::Remove(id) => {
            if core.remove_todo(id).is_none() {
                println!("not signed in");
            }
        }
        Command::ClearCompleted => {
            if core.clear_completed().is_none() {
                println!("not signed in");
            }
        }
        Command::Filter(mode) => core.set_filter(mode),
        Command::Dismiss => core.dismiss_error(),
        Command::Refresh => core.request_refresh(),
        Command::Login(user_id) => {
            session.sign_in(user_id);
            core.request_refresh();
        }
        Command::Logout => session.sign_out(),
        Command::Show => println!("{}", render::render(&core.snapshot())),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}
