//! Task model and storage line format

use std::fmt;
use std::str::FromStr;

use regex::Regex;

pub type Date = chrono::naive::NaiveDate;
pub type DateTime = chrono::naive::NaiveDateTime;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Kind {
    ToDo,
    Deadline { by: String },
    Event { at: String },
}

/// Storage tag of each kind
#[derive(Debug, Clone, Copy, Eq, PartialEq, strum::EnumString, strum::AsRefStr)]
enum KindTag {
    #[strum(serialize = "T")]
    ToDo,
    #[strum(serialize = "D")]
    Deadline,
    #[strum(serialize = "E")]
    Event,
}

impl Kind {
    fn tag(&self) -> KindTag {
        match self {
            Self::ToDo => KindTag::ToDo,
            Self::Deadline { .. } => KindTag::Deadline,
            Self::Event { .. } => KindTag::Event,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Task {
    pub description: String,
    pub done: bool,
    pub kind: Kind,
}

/// Deadline date formats, tried in order
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H%M", "%d/%m/%Y %H%M"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

const DISPLAY_DATE_FORMAT: &str = "%b %d %Y";
const DISPLAY_TIME_FORMAT: &str = "%-I:%M %p";

/// Parsed deadline, time is unset if only a date was given
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct Due {
    pub date: Date,
    pub time: Option<chrono::naive::NaiveTime>,
}

impl Due {
    fn parse(s: &str) -> Option<Self> {
        DATE_TIME_FORMATS
            .iter()
            .find_map(|f| DateTime::parse_from_str(s, f).ok())
            .map(|dt| Self {
                date: dt.date(),
                time: Some(dt.time()),
            })
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|f| Date::parse_from_str(s, f).ok())
                    .map(|date| Self { date, time: None })
            })
    }
}

impl fmt::Display for Due {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format(DISPLAY_DATE_FORMAT))?;
        if let Some(time) = self.time {
            write!(f, " {}", time.format(DISPLAY_TIME_FORMAT))?;
        }
        Ok(())
    }
}

impl Task {
    pub fn todo(description: &str) -> Self {
        Self {
            description: description.to_owned(),
            done: false,
            kind: Kind::ToDo,
        }
    }

    pub fn deadline(description: &str, by: &str) -> Self {
        Self {
            description: description.to_owned(),
            done: false,
            kind: Kind::Deadline { by: by.to_owned() },
        }
    }

    pub fn event(description: &str, at: &str) -> Self {
        Self {
            description: description.to_owned(),
            done: false,
            kind: Kind::Event { at: at.to_owned() },
        }
    }

    /// Deadline date if the "by" text is a date we understand
    pub fn due(&self) -> Option<Due> {
        match &self.kind {
            Kind::Deadline { by } => Due::parse(by),
            Kind::ToDo | Kind::Event { .. } => None,
        }
    }

    pub fn is_deadline(&self) -> bool {
        matches!(self.kind, Kind::Deadline { .. })
    }

    /// Mark as done, return false if it already was
    pub fn set_done(&mut self) -> bool {
        !std::mem::replace(&mut self.done, true)
    }

    /// User facing representation, optionally styled for the terminal
    pub fn render(&self, today: Option<&Date>) -> String {
        let base_style = if today.is_some() {
            console::Style::new().for_stdout()
        } else {
            console::Style::new().force_styling(false)
        };

        let status = if self.done { "X" } else { " " };
        let mut line = format!("[{}][{status}] {}", self.kind.tag().as_ref(), self.description);
        match &self.kind {
            Kind::ToDo => {}
            Kind::Deadline { by } => {
                let due = self.due();
                let overdue = !self.done && today.zip(due).is_some_and(|(t, d)| d.date < *t);
                let by_style = if overdue {
                    base_style.clone().magenta()
                } else {
                    base_style.clone().green()
                };
                let by = due.map_or_else(|| by.clone(), |d| d.to_string());
                line.push_str(&format!(" (by: {})", by_style.apply_to(by)));
            }
            Kind::Event { at } => {
                line.push_str(&format!(" (at: {})", base_style.clone().cyan().apply_to(at)));
            }
        }

        if self.done {
            line = base_style.dim().strikethrough().apply_to(line).to_string();
        }
        line
    }
}

/// Escape field separators and line breaks for the storage line
fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '|' => escaped.push_str("\\|"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape(s: &str) -> String {
    let mut unescaped = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some(other) => unescaped.push(other),
            None => unescaped.push('\\'),
        }
    }
    unescaped
}

/// Storage line, see `FromStr` for the reverse operation
impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {}",
            self.kind.tag().as_ref(),
            u8::from(self.done),
            escape(&self.description)
        )?;
        match &self.kind {
            Kind::ToDo => Ok(()),
            Kind::Deadline { by: time } | Kind::Event { at: time } => {
                write!(f, " | {}", escape(time))
            }
        }
    }
}

// Fields never contain a bare '|', escaped characters are consumed in pairs
lazy_static::lazy_static! {
    static ref LINE_REGEX: Regex = Regex::new(
        r"^(?<kind>\w) \| (?<done>[01]) \| (?<description>(?:[^|\\]|\\.)*?)(?: \| (?<time>(?:[^|\\]|\\.)*))?$"
    ).unwrap();
}

impl FromStr for Task {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = LINE_REGEX
            .captures(s)
            .ok_or_else(|| anyhow::anyhow!("Unable to parse {s:?}"))?;
        let tag: KindTag = caps["kind"]
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid task kind in {s:?}"))?;
        let time = caps.name("time").map(|m| unescape(m.as_str()));
        let kind = match (tag, time) {
            (KindTag::ToDo, None) => Kind::ToDo,
            (KindTag::Deadline, Some(by)) => Kind::Deadline { by },
            (KindTag::Event, Some(at)) => Kind::Event { at },
            (KindTag::ToDo, Some(_)) => anyhow::bail!("Unexpected time for to-do in {s:?}"),
            (KindTag::Deadline | KindTag::Event, None) => {
                anyhow::bail!("Missing time in {s:?}")
            }
        };
        Ok(Self {
            description: unescape(&caps["description"]),
            done: &caps["done"] == "1",
            kind,
        })
    }
}
