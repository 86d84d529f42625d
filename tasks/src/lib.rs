//! Duke task manager core: command parsing, tasks and their storage

mod file;
mod list;
mod parser;
mod session;
mod task;

pub use file::TaskFile;
pub use list::{IndexError, TaskList};
pub use parser::{parse, Command, Keyword, ParseError};
pub use session::{Response, Session};
pub use task::{Date, DateTime, Due, Kind, Task};
