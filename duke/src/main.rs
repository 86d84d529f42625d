use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

mod cl;

use tasks::{Date, Response, Session, TaskFile};

const LOGO: &str = r" ____        _
|  _ \ _   _| | _____
| | | | | | | |/ / _ \
| |_| | |_| |   <  __/
|____/ \__,_|_|\_\___|";

fn today() -> Date {
    chrono::Local::now().date_naive()
}

fn print_response(response: &Response) {
    if response.error {
        println!("{}", console::style(&response.message).red());
    } else {
        println!("{}", response.message);
    }
}

fn interactive(session: &mut Session) -> anyhow::Result<()> {
    println!("{LOGO}\nHello! I'm Duke\nWhat can I do for you?");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let response = session.handle_line(line)?;
        print_response(&response);
        if response.exit {
            return Ok(());
        }
    }
    log::debug!("End of input");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Init logger
    simple_logger::SimpleLogger::new()
        .with_level(if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .env()
        .init()
        .context("Failed to setup logger")?;

    // Parse CL args
    let cl_args = cl::Args::parse();
    let task_path = cl_args
        .file
        .or_else(|| env::var_os("DUKE_FILE").map(PathBuf::from));
    let task_file = match task_path {
        Some(path) => Some(TaskFile::new(&path)?),
        None => {
            log::warn!("DUKE_FILE environment variable is not set, tasks will not be saved");
            None
        }
    };
    let mut session = Session::new(task_file)?.with_styling(today());

    match cl_args.action.unwrap_or(cl::Action::Interactive) {
        cl::Action::Interactive => interactive(&mut session)?,
        cl::Action::Exec { args } => {
            let response = session.handle_line(&args.join(" "))?;
            print_response(&response);
        }
    }

    Ok(())
}
