//! Command execution against the task list

use crate::file::TaskFile;
use crate::list::{IndexError, TaskList};
use crate::parser::{self, Command};
use crate::task::{Date, Task};

/// What to tell the user after a command
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Response {
    pub message: String,
    /// Message reports invalid input
    pub error: bool,
    pub exit: bool,
}

impl Response {
    fn reply(message: String) -> Self {
        Self {
            message,
            error: false,
            exit: false,
        }
    }

    fn error(message: String) -> Self {
        Self {
            message,
            error: true,
            exit: false,
        }
    }
}

pub struct Session {
    tasks: TaskList,
    file: Option<TaskFile>,
    /// Set to style output for the terminal, relative to that day
    today: Option<Date>,
}

impl Session {
    /// Start a session, loading tasks from file if any
    pub fn new(file: Option<TaskFile>) -> anyhow::Result<Self> {
        let tasks = match &file {
            Some(file) => {
                let tasks = file.load_tasks()?;
                log::info!("Loaded {} task(s) from {:?}", tasks.len(), file.path());
                TaskList::from(tasks)
            }
            None => TaskList::default(),
        };
        Ok(Self {
            tasks,
            file,
            today: None,
        })
    }

    #[must_use]
    pub fn with_styling(mut self, today: Date) -> Self {
        self.today = Some(today);
        self
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    fn render(&self, task: &Task) -> String {
        task.render(self.today.as_ref())
    }

    fn numbered<'a, I>(&self, header: &str, empty: &str, tasks: I) -> String
    where
        I: IntoIterator<Item = (usize, &'a Task)>,
    {
        let mut message = header.to_owned();
        let mut count = 0;
        for (number, task) in tasks {
            message.push_str(&format!("\n{number}.{}", self.render(task)));
            count += 1;
        }
        if count == 0 {
            message = empty.to_owned();
        }
        message
    }

    fn count_line(&self) -> String {
        format!("Now you have {} task(s) in the list.", self.tasks.len())
    }

    fn add(&mut self, task: Task) -> String {
        let rendered = self.render(&task);
        self.tasks.add(task);
        format!(
            "Got it. I've added this task:\n  {rendered}\n{}",
            self.count_line()
        )
    }

    /// Apply command to the task list, saving it if it changed
    pub fn execute(&mut self, command: Command) -> anyhow::Result<Response> {
        let mut changed = command.is_mutating();
        let response = match command {
            Command::Exit => Response {
                message: "Bye. Hope to see you again soon!".to_owned(),
                error: false,
                exit: true,
            },
            Command::ListAll => Response::reply(self.numbered(
                "Here are the tasks in your list:",
                "Your list is empty.",
                self.tasks.iter().enumerate().map(|(i, t)| (i + 1, t)),
            )),
            Command::Find { keyword } => Response::reply(self.numbered(
                "Here are the matching tasks in your list:",
                "No task matches your search.",
                self.tasks.find(&keyword),
            )),
            Command::SortDeadlines => Response::reply(self.numbered(
                "Here are your deadlines in chronological order:",
                "You have no deadlines.",
                self.tasks.deadlines_chronological(),
            )),
            Command::ToDo { description } => Response::reply(self.add(Task::todo(&description))),
            Command::Deadline { description, by } => {
                Response::reply(self.add(Task::deadline(&description, &by)))
            }
            Command::Event { description, at } => {
                Response::reply(self.add(Task::event(&description, &at)))
            }
            Command::Done { index } => {
                let today = self.today;
                let (task, newly_done) = self.tasks.mark_done(index)?;
                let rendered = task.render(today.as_ref());
                changed = newly_done;
                Response::reply(if newly_done {
                    format!("Nice! I've marked this task as done:\n  {rendered}")
                } else {
                    format!("This task was already done:\n  {rendered}")
                })
            }
            Command::Delete { index } => {
                let task = self.tasks.delete(index)?;
                Response::reply(format!(
                    "Noted. I've removed this task:\n  {}\n{}",
                    self.render(&task),
                    self.count_line()
                ))
            }
        };

        if changed {
            if let Some(file) = &self.file {
                file.save_tasks(self.tasks.as_slice())?;
            }
        }
        Ok(response)
    }

    /// Parse and execute a line of user input
    ///
    /// Invalid input and unknown task numbers are reported in the response, other errors are returned.
    pub fn handle_line(&mut self, line: &str) -> anyhow::Result<Response> {
        let command = match parser::parse(line) {
            Ok(c) => c,
            Err(e) => {
                log::debug!("{e:?}");
                return Ok(Response::error(e.to_string()));
            }
        };
        match self.execute(command) {
            Err(e) if e.is::<IndexError>() => Ok(Response::error(e.to_string())),
            r => r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(session: &mut Session, line: &str) -> String {
        session.handle_line(line).unwrap().message
    }

    #[test]
    fn test_add_and_list() {
        let mut session = Session::new(None).unwrap();
        assert_eq!(run(&mut session, "list"), "Your list is empty.");
        assert_eq!(
            run(&mut session, "todo read book"),
            "Got it. I've added this task:\n  [T][ ] read book\nNow you have 1 task(s) in the list."
        );
        assert_eq!(
            run(&mut session, "event exam /at Friday 2pm"),
            "Got it. I've added this task:\n  [E][ ] exam (at: Friday 2pm)\nNow you have 2 task(s) in the list."
        );
        assert_eq!(
            run(&mut session, "list"),
            "Here are the tasks in your list:\n1.[T][ ] read book\n2.[E][ ] exam (at: Friday 2pm)"
        );
    }

    #[test]
    fn test_done_and_delete() {
        let mut session = Session::new(None).unwrap();
        run(&mut session, "todo read book");
        run(&mut session, "deadline return book /by Sunday");
        assert_eq!(
            run(&mut session, "done 2"),
            "Nice! I've marked this task as done:\n  [D][X] return book (by: Sunday)"
        );
        assert_eq!(
            run(&mut session, "done 2"),
            "This task was already done:\n  [D][X] return book (by: Sunday)"
        );
        assert_eq!(
            run(&mut session, "delete 1"),
            "Noted. I've removed this task:\n  [T][ ] read book\nNow you have 1 task(s) in the list."
        );
        assert_eq!(
            run(&mut session, "delete 2"),
            "OOPS!!! There is no task number 2, the list has 1 task(s)."
        );
    }

    #[test]
    fn test_find() {
        let mut session = Session::new(None).unwrap();
        run(&mut session, "todo read book");
        run(&mut session, "todo buy milk");
        run(&mut session, "deadline return book /by Sunday");
        assert_eq!(
            run(&mut session, "find book"),
            "Here are the matching tasks in your list:\n1.[T][ ] read book\n3.[D][ ] return book (by: Sunday)"
        );
        assert_eq!(run(&mut session, "find cheese"), "No task matches your search.");
    }

    #[test]
    fn test_sort_deadlines() {
        let mut session = Session::new(None).unwrap();
        assert_eq!(run(&mut session, "chrono deadlines"), "You have no deadlines.");
        run(&mut session, "deadline return book /by Sunday");
        run(&mut session, "todo read book");
        run(&mut session, "deadline submit report /by 2019-12-02");
        run(&mut session, "deadline pay rent /by 2019-11-30");
        assert_eq!(
            run(&mut session, "chrono deadlines"),
            "Here are your deadlines in chronological order:\n\
             4.[D][ ] pay rent (by: Nov 30 2019)\n\
             3.[D][ ] submit report (by: Dec 02 2019)\n\
             1.[D][ ] return book (by: Sunday)"
        );
    }

    #[test]
    fn test_parse_errors() {
        let mut session = Session::new(None).unwrap();
        assert_eq!(
            run(&mut session, "blah"),
            "OOPS!!! I'm sorry, but I don't know what that means :-("
        );
        assert_eq!(
            run(&mut session, "todo"),
            "OOPS!!! The description of a todo cannot be empty."
        );
        assert!(session.tasks().is_empty());
    }

    #[test]
    fn test_exit() {
        let mut session = Session::new(None).unwrap();
        let response = session.handle_line("bye").unwrap();
        assert!(response.exit);
        assert!(!response.error);
        assert!(!session.handle_line("list").unwrap().exit);
        assert!(session.handle_line("done 1").unwrap().error);
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duke.txt");

        let mut session = Session::new(Some(TaskFile::new(&path).unwrap())).unwrap();
        run(&mut session, "todo read book");
        run(&mut session, "event exam /at Friday 2pm");
        run(&mut session, "done 1");
        run(&mut session, "list");

        let session = Session::new(Some(TaskFile::new(&path).unwrap())).unwrap();
        let mut done = Task::todo("read book");
        done.done = true;
        assert_eq!(
            session.tasks().as_slice(),
            &[done, Task::event("exam", "Friday 2pm")]
        );
    }

    #[test]
    fn test_persistence_special_chars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duke.txt");

        let mut session = Session::new(Some(TaskFile::new(&path).unwrap())).unwrap();
        run(&mut session, "todo a | b");
        run(&mut session, "deadline x | y /by Sunday");
        run(&mut session, "todo a\nb");

        let session = Session::new(Some(TaskFile::new(&path).unwrap())).unwrap();
        assert_eq!(
            session.tasks().as_slice(),
            &[
                Task::todo("a | b"),
                Task::deadline("x | y", "Sunday"),
                Task::todo("a\nb")
            ]
        );
    }

    #[test]
    fn test_done_again_does_not_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duke.txt");

        let mut session = Session::new(Some(TaskFile::new(&path).unwrap())).unwrap();
        run(&mut session, "todo read book");
        run(&mut session, "todo buy milk");
        run(&mut session, "done 1");
        assert!(dir.path().join("duke.txt.bak.2").is_file());
        run(&mut session, "done 1");
        run(&mut session, "done 1");
        assert!(!dir.path().join("duke.txt.bak.3").exists());
    }
}
