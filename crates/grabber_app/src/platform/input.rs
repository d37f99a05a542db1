//! Line commands typed by the user and their translation into core messages.

use grabber_core::{AppViewModel, DownloadFormat, Msg};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `fetch [url]`; without a URL the current input is used.
    Fetch(Option<String>),
    SetUrl(String),
    Toggle(usize),
    ToggleAll,
    /// Raw count text; validation belongs to the selection model.
    First(String),
    Format(DownloadFormat),
    Download,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command {0:?}, type `help` for a list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("{0:?} is not a row number")]
    InvalidPosition(String),
    #[error("unknown format {0:?}, use `video` or `mp3`")]
    UnknownFormat(String),
    #[error("there is no row {0}")]
    NoSuchRow(usize),
}

pub fn parse_command(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "fetch" | "f" => Command::Fetch(non_empty(rest)),
        "url" | "u" => Command::SetUrl(rest.to_string()),
        "toggle" | "t" => {
            if rest.is_empty() {
                return Err(InputError::MissingArgument("toggle"));
            }
            let position = rest
                .parse::<usize>()
                .map_err(|_| InputError::InvalidPosition(rest.to_string()))?;
            Command::Toggle(position)
        }
        "all" | "a" => Command::ToggleAll,
        "first" => Command::First(rest.to_string()),
        "format" => match rest.to_ascii_lowercase().as_str() {
            "" => return Err(InputError::MissingArgument("format")),
            "video" => Command::Format(DownloadFormat::Video),
            "mp3" => Command::Format(DownloadFormat::Mp3),
            _ => return Err(InputError::UnknownFormat(rest.to_string())),
        },
        "download" | "d" => Command::Download,
        "show" | "s" => Command::Show,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => return Err(InputError::Unknown(name.to_string())),
    };
    Ok(Some(command))
}

/// Messages for commands that drive the core. Front-end-only commands
/// (`show`, `help`, `quit`) produce none.
pub fn to_msgs(command: Command, view: &AppViewModel) -> Result<Vec<Msg>, InputError> {
    let msgs = match command {
        Command::Fetch(Some(url)) => vec![Msg::UrlInputChanged(url), Msg::FetchClicked],
        Command::Fetch(None) => vec![Msg::FetchClicked],
        Command::SetUrl(text) => vec![Msg::UrlInputChanged(text)],
        Command::Toggle(position) => {
            let row = view.row(position).ok_or(InputError::NoSuchRow(position))?;
            vec![Msg::ToggleEntry(row.key.clone())]
        }
        Command::ToggleAll => vec![Msg::ToggleAllClicked],
        Command::First(raw) => vec![Msg::SelectFirstN(raw)],
        Command::Format(format) => vec![Msg::FormatChosen(format)],
        Command::Download => vec![Msg::DownloadClicked],
        Command::Show | Command::Help | Command::Quit => Vec::new(),
    };
    Ok(msgs)
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grabber_core::{EntryKey, EntryRowView};
    use pretty_assertions::assert_eq;

    fn parse(line: &str) -> Command {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn parses_commands_and_arguments() {
        assert_eq!(parse("fetch"), Command::Fetch(None));
        assert_eq!(
            parse("fetch  https://yt/list?x=1 "),
            Command::Fetch(Some("https://yt/list?x=1".to_string()))
        );
        assert_eq!(parse("url"), Command::SetUrl(String::new()));
        assert_eq!(parse("toggle 3"), Command::Toggle(3));
        assert_eq!(parse("ALL"), Command::ToggleAll);
        assert_eq!(parse("first abc"), Command::First("abc".to_string()));
        assert_eq!(parse("format MP3"), Command::Format(DownloadFormat::Mp3));
        assert_eq!(parse("d"), Command::Download);
        assert_eq!(parse("q"), Command::Quit);
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!(
            parse_command("toggle"),
            Err(InputError::MissingArgument("toggle"))
        );
        assert_eq!(
            parse_command("toggle x"),
            Err(InputError::InvalidPosition("x".to_string()))
        );
        assert_eq!(
            parse_command("format flac"),
            Err(InputError::UnknownFormat("flac".to_string()))
        );
        assert_eq!(
            parse_command("dance"),
            Err(InputError::Unknown("dance".to_string()))
        );
    }

    #[test]
    fn toggle_resolves_row_key_from_view() {
        let view = AppViewModel {
            rows: vec![EntryRowView {
                position: 1,
                key: EntryKey::from("a1"),
                title: "One".to_string(),
                thumbnail: None,
                duration: None,
                selected: true,
                progress: None,
            }],
            ..AppViewModel::default()
        };

        assert_eq!(
            to_msgs(Command::Toggle(1), &view),
            Ok(vec![Msg::ToggleEntry(EntryKey::from("a1"))])
        );
        assert_eq!(
            to_msgs(Command::Toggle(2), &view),
            Err(InputError::NoSuchRow(2))
        );
        assert_eq!(
            to_msgs(Command::Toggle(0), &view),
            Err(InputError::NoSuchRow(0))
        );
    }

    #[test]
    fn fetch_with_url_sets_input_first() {
        let view = AppViewModel::default();
        assert_eq!(
            to_msgs(Command::Fetch(Some("https://yt/l".to_string())), &view),
            Ok(vec![
                Msg::UrlInputChanged("https://yt/l".to_string()),
                Msg::FetchClicked
            ])
        );
        assert_eq!(to_msgs(Command::Quit, &view), Ok(Vec::new()));
    }
}
