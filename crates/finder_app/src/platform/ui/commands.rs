//! Line commands typed on stdin and their translation into core messages.

use finder_core::{AppViewModel, Msg, SourceId, View};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  <text> | /search <text>   search offers (empty text clears results)
  /sites                    choose point sites
  /toggle <id>              flip a site on the sites view
  /check <id>               select a site
  /uncheck <id>             deselect a site
  /save                     save the site choice and return to search
  /back                     return to search without saving
  /help                     show this help
  /quit                     exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Sites,
    Toggle(SourceId),
    Check(SourceId),
    Uncheck(SourceId),
    Save,
    Back,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command /{0}; type /help for a list")]
    Unknown(String),
    #[error("/{0} needs a site id")]
    MissingId(&'static str),
    #[error("{0:?} is not a site id")]
    BadId(String),
}

/// What the front end should do with a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Dispatch(Vec<Msg>),
    Print(String),
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Search(line.to_string()));
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "search" | "s" => Ok(Command::Search(arg.to_string())),
        "sites" => Ok(Command::Sites),
        "toggle" => parse_id("toggle", arg).map(Command::Toggle),
        "check" => parse_id("check", arg).map(Command::Check),
        "uncheck" => parse_id("uncheck", arg).map(Command::Uncheck),
        "save" => Ok(Command::Save),
        "back" => Ok(Command::Back),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_id(command: &'static str, arg: &str) -> Result<SourceId, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingId(command));
    }
    arg.parse().map_err(|_| CommandError::BadId(arg.to_string()))
}

/// Resolves a command against what is currently on screen.
pub fn plan(command: Command, view: &AppViewModel) -> Action {
    match command {
        Command::Search(keyword) => {
            let mut msgs = Vec::new();
            if view.view != View::Search {
                msgs.push(Msg::ViewSwitched(View::Search));
            }
            msgs.push(Msg::KeywordChanged(keyword));
            msgs.push(Msg::SearchSubmitted);
            Action::Dispatch(msgs)
        }
        Command::Sites => Action::Dispatch(vec![Msg::ViewSwitched(View::Customize)]),
        Command::Back => Action::Dispatch(vec![Msg::ViewSwitched(View::Search)]),
        Command::Toggle(source_id) => {
            with_source(view, source_id, |checked| Msg::SourceToggled {
                source_id,
                checked: !checked,
            })
        }
        Command::Check(source_id) => with_source(view, source_id, |_| Msg::SourceToggled {
            source_id,
            checked: true,
        }),
        Command::Uncheck(source_id) => with_source(view, source_id, |_| Msg::SourceToggled {
            source_id,
            checked: false,
        }),
        Command::Save => {
            if view.view != View::Customize {
                Action::Print("Nothing to save; use /sites to choose point sites.".to_string())
            } else if !view.initialized {
                Action::Print("Point sites are still loading.".to_string())
            } else {
                Action::Dispatch(vec![Msg::SaveClicked])
            }
        }
        Command::Help => Action::Print(HELP.to_string()),
        Command::Quit => Action::Quit,
    }
}

fn with_source(
    view: &AppViewModel,
    source_id: SourceId,
    to_msg: impl FnOnce(bool) -> Msg,
) -> Action {
    if view.view != View::Customize {
        return Action::Print("Use /sites before changing the site choice.".to_string());
    }
    match view.sources.iter().find(|row| row.source_id == source_id) {
        Some(row) => Action::Dispatch(vec![to_msg(row.checked)]),
        None => Action::Print(format!("No point site with id {source_id}.")),
    }
}
