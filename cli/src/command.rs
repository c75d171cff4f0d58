use std::str::FromStr;

use todo_sync::{FilterMode, TodoId, UserId};

pub const HELP: &str = "\
commands:
  add <title>        create a todo
  rm <id>            delete a todo
  clear              delete all completed todos
  filter <mode>      all | active | completed
  dismiss            hide the current error
  refresh            re-fetch the list
  login <user-id>    sign in
  logout             sign out
  show               print the current view
  quit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Remove(TodoId),
    ClearCompleted,
    Filter(FilterMode),
    Dismiss,
    Refresh,
    Login(UserId),
    Logout,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let arg = rest.trim();

        match word.trim_end() {
            // The title is taken verbatim apart from the separating space.
            "add" => Ok(Command::Add(rest.trim_end_matches(['\r', '\n']).to_string())),
            "rm" => arg
                .parse()
                .map(Command::Remove)
                .map_err(|_| format!("invalid todo id: {arg:?}")),
            "clear" => Ok(Command::ClearCompleted),
            "filter" => arg.parse().map(Command::Filter),
            "dismiss" => Ok(Command::Dismiss),
            "refresh" => Ok(Command::Refresh),
            "login" => arg
                .parse()
                .map(Command::Login)
                .map_err(|_| format!("invalid user id: {arg:?}")),
            "logout" => Ok(Command::Logout),
            "show" | "" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command: {other} (try `help`)")),
        }
    }
}
