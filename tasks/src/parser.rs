//! User command parsing

use std::str::FromStr;

/// Leading word(s) of an input line, selecting the command
#[derive(Debug, Clone, Copy, Eq, PartialEq, strum::Display, strum::AsRefStr)]
pub enum Keyword {
    #[strum(serialize = "bye")]
    Bye,
    #[strum(serialize = "list")]
    List,
    #[strum(serialize = "done")]
    Done,
    #[strum(serialize = "todo")]
    ToDo,
    #[strum(serialize = "deadline")]
    Deadline,
    #[strum(serialize = "event")]
    Event,
    #[strum(serialize = "delete")]
    Delete,
    #[strum(serialize = "find")]
    Find,
    #[strum(serialize = "chrono deadlines")]
    ChronoDeadlines,
}

/// Match order, first wins
const KEYWORDS: [Keyword; 9] = [
    Keyword::Bye,
    Keyword::List,
    Keyword::Done,
    Keyword::ToDo,
    Keyword::Deadline,
    Keyword::Event,
    Keyword::Delete,
    Keyword::Find,
    Keyword::ChronoDeadlines,
];

impl Keyword {
    /// Does this keyword take text after it?
    const fn takes_argument(self) -> bool {
        !matches!(self, Self::Bye | Self::List | Self::ChronoDeadlines)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Command {
    Exit,
    ListAll,
    /// Zero based index
    Done {
        index: usize,
    },
    /// Zero based index
    Delete {
        index: usize,
    },
    ToDo {
        description: String,
    },
    Deadline {
        description: String,
        by: String,
    },
    Event {
        description: String,
        at: String,
    },
    Find {
        keyword: String,
    },
    SortDeadlines,
}

impl Command {
    /// Does executing this command change the task list?
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::Done { .. }
                | Self::Delete { .. }
                | Self::ToDo { .. }
                | Self::Deadline { .. }
                | Self::Event { .. }
        )
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("OOPS!!! I'm sorry, but I don't know what that means :-(")]
    UnknownInput,
    #[error("OOPS!!! The description of a {0} cannot be empty.")]
    EmptyTaskDescription(Keyword),
    #[error("OOPS!!! Please give a task number after \"{0}\".")]
    MissingIndex(Keyword),
    #[error("OOPS!!! {value:?} is not a valid task number for {keyword}.")]
    InvalidIndex { keyword: Keyword, value: String },
}

/// Parse a single input line into a command
///
/// Whitespace around the line is not normalized: the keyword must start at the first character.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let (keyword, rest) = KEYWORDS
        .iter()
        .find_map(|k| line.strip_prefix::<&str>(k.as_ref()).map(|r| (*k, r)))
        .ok_or(ParseError::UnknownInput)?;

    // "todos" is not "todo" followed by "s"
    if keyword.takes_argument() && rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
        return Err(ParseError::UnknownInput);
    }
    let rest = rest.trim();

    let command = match keyword {
        Keyword::Bye => Command::Exit,
        Keyword::List => Command::ListAll,
        Keyword::ChronoDeadlines => Command::SortDeadlines,
        Keyword::Done => Command::Done {
            index: parse_index(keyword, rest)?,
        },
        Keyword::Delete => Command::Delete {
            index: parse_index(keyword, rest)?,
        },
        Keyword::ToDo => Command::ToDo {
            description: non_empty(keyword, rest)?.to_owned(),
        },
        Keyword::Find => Command::Find {
            keyword: non_empty(keyword, rest)?.to_owned(),
        },
        Keyword::Deadline => {
            let (description, by) = split_marker(keyword, rest, "by")?;
            Command::Deadline {
                description: description.to_owned(),
                by: by.to_owned(),
            }
        }
        Keyword::Event => {
            let (description, at) = split_marker(keyword, rest, "at")?;
            Command::Event {
                description: description.to_owned(),
                at: at.to_owned(),
            }
        }
    };
    log::debug!("{line:?} -> {command:?}");
    Ok(command)
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

fn non_empty(keyword: Keyword, s: &str) -> Result<&str, ParseError> {
    if s.is_empty() {
        Err(ParseError::EmptyTaskDescription(keyword))
    } else {
        Ok(s)
    }
}

/// Convert user facing 1 based task number to index
fn parse_index(keyword: Keyword, s: &str) -> Result<usize, ParseError> {
    if s.is_empty() {
        return Err(ParseError::MissingIndex(keyword));
    }
    s.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| ParseError::InvalidIndex {
            keyword,
            value: s.to_owned(),
        })
}

/// Split "description /marker time" around the first slash
///
/// The marker word is optional, "event party /Friday" is accepted too.
fn split_marker<'a>(
    keyword: Keyword,
    s: &'a str,
    marker: &str,
) -> Result<(&'a str, &'a str), ParseError> {
    let (description, tail) = s
        .split_once('/')
        .ok_or(ParseError::EmptyTaskDescription(keyword))?;
    let tail = tail.trim_start();
    let time = match tail.split_once(char::is_whitespace) {
        Some((word, value)) if word == marker => value,
        None if tail == marker => "",
        _ => tail,
    };
    Ok((
        non_empty(keyword, description.trim())?,
        non_empty(keyword, time.trim())?,
    ))
}
