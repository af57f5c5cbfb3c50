//! Line-oriented commands typed at the prompt.

use todo_sync::{Event, TodoId};

use crate::error::CliError;

pub const HELP: &str = "\
Commands:
  add <title>      set the title and submit
  title <text>     set the title field
  due <date>       set the due date field (empty clears it)
  submit           submit the form
  toggle <id>      flip a todo's completed flag
  delete <id>      delete a todo (alias: rm)
  reload           fetch the list from the backend again
  offline | online simulate network presence changes
  help             show this text
  quit             exit (alias: q, Ctrl-D)";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Events(Vec<Event>),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Option<Command>, CliError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word {
        "add" => {
            if rest.is_empty() {
                return Err(CliError::MissingArgument("title"));
            }
            Command::Events(vec![Event::SetTitle(rest.to_string()), Event::Submit])
        }
        "title" => Command::Events(vec![Event::SetTitle(rest.to_string())]),
        "due" => Command::Events(vec![Event::SetDueDate(rest.to_string())]),
        "submit" => Command::Events(vec![Event::Submit]),
        "toggle" => Command::Events(vec![Event::Toggle(parse_id(rest)?)]),
        "delete" | "rm" => Command::Events(vec![Event::Delete(parse_id(rest)?)]),
        "reload" => Command::Events(vec![Event::Reload]),
        "offline" => Command::Events(vec![Event::NetworkOffline]),
        "online" => Command::Events(vec![Event::NetworkOnline]),
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(CliError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_id(arg: &str) -> Result<TodoId, CliError> {
    if arg.is_empty() {
        return Err(CliError::MissingArgument("id"));
    }
    arg.trim_start_matches('#')
        .parse()
        .map_err(|_| CliError::InvalidId(arg.to_string()))
}
