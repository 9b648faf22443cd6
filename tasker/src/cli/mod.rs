//! Command-line front end: resolves a command, runs the matching use-case
//! and turns the outcome into a message and an exit status.

mod messages;

use crate::repository::TaskRepository;
use crate::task::Status;
use crate::usecases::{self, UseCases};
use chrono::Utc;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use log::error;
use std::fmt::Display;
use std::io::Write;

const BIN_NAME: &str = "tasker";

/// Every command the dispatcher knows about.
const COMMANDS: [&str; 8] = [
    "add", "update", "delete", "mark", "work", "done", "list", "help",
];

/// Process exit status reported by [`Cli::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    /// The request was understood but could not be carried out.
    Failure = 1,
    Invalid = 2,
    Unexpected = 3,
    NoArgs = 4,
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "tasker", disable_help_flag = true, disable_help_subcommand = true)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    Add {
        description: String,
    },
    Update {
        id: String,
        description: String,
    },
    Delete {
        id: String,
    },
    Mark {
        id: String,
        status: String,
    },
    Work {
        id: String,
    },
    Done {
        id: String,
    },
    List {
        status: Option<String>,
    },
    Help,
}

struct Reply {
    status: ExitStatus,
    text: String,
}

impl Reply {
    fn success(text: impl Into<String>) -> Self {
        Self {
            status: ExitStatus::Success,
            text: text.into(),
        }
    }

    fn with_status(status: ExitStatus, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }
}

impl From<usecases::Error> for Reply {
    fn from(err: usecases::Error) -> Self {
        use usecases::Error::*;
        match err {
            EmptyDescription => {
                Reply::with_status(ExitStatus::Invalid, messages::INVALID_DESCRIPTION)
            }
            InvalidTaskId(_) => Reply::with_status(ExitStatus::Invalid, messages::INVALID_TASK_ID),
            InvalidStatus(_) => Reply::with_status(ExitStatus::Invalid, messages::invalid_status()),
            TaskNotFound(id) => {
                Reply::with_status(ExitStatus::Failure, messages::task_not_found(id))
            }
            TaskAlreadyDone(_) => {
                Reply::with_status(ExitStatus::Failure, messages::TASK_ALREADY_DONE)
            }
            EmptyTasks => Reply::with_status(ExitStatus::Failure, messages::TASK_LIST_IS_EMPTY),
            err @ Store { .. } => {
                error!("{err}");
                Reply::with_status(ExitStatus::Unexpected, messages::unexpected(&err))
            }
        }
    }
}

pub struct Cli<R, W> {
    use_cases: UseCases<R>,
    output: W,
}

impl<R: TaskRepository, W: Write> Cli<R, W> {
    pub fn new(repository: R, output: W) -> Self {
        Self {
            use_cases: UseCases::new(repository),
            output,
        }
    }

    /// Runs one command. `args` excludes the program name.
    pub fn dispatch<I, S>(&mut self, args: I) -> ExitStatus
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let reply = match args.first() {
            None => Reply::with_status(ExitStatus::NoArgs, messages::HELP),
            Some(command) if !COMMANDS.contains(&command.as_str()) => {
                Reply::with_status(ExitStatus::Failure, messages::unknown_command(command))
            }
            Some(command) => {
                // Everything after the command name is positional, `-h` and `--` included.
                let argv = [BIN_NAME, command.as_str(), "--"]
                    .into_iter()
                    .chain(args[1..].iter().map(String::as_str));
                match Args::try_parse_from(argv) {
                    Ok(parsed) => self.run(parsed.command),
                    Err(err) => parse_failure(command, err.kind()),
                }
            }
        };
        write_reply(&mut self.output, &reply.text);
        reply.status
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn run(&mut self, command: Command) -> Reply {
        match command {
            Command::Add { description } => self.add(&description),
            Command::Update { id, description } => self.update(&id, &description),
            Command::Delete { id } => self.delete(&id),
            Command::Mark { id, status } => self.mark(&id, &status),
            Command::Work { id } => self.mark(&id, Status::Progress.as_str()),
            Command::Done { id } => self.mark(&id, Status::Done.as_str()),
            Command::List { status } => self.list(status.as_deref()),
            Command::Help => Reply::success(messages::HELP),
        }
    }

    fn add(&mut self, description: &str) -> Reply {
        match self.use_cases.add_task(description) {
            Ok(task) => Reply::success(messages::task_added(task.id)),
            Err(err) => err.into(),
        }
    }

    fn update(&self, id: &str, description: &str) -> Reply {
        match self.use_cases.update_task(id, description) {
            Ok(_) => Reply::success(messages::TASK_UPDATED),
            Err(err) => err.into(),
        }
    }

    fn delete(&self, id: &str) -> Reply {
        match self.use_cases.delete_task(id) {
            Ok(()) => Reply::success(messages::TASK_DELETED),
            Err(err) => err.into(),
        }
    }

    fn mark(&self, id: &str, status: &str) -> Reply {
        match self.use_cases.mark_task(id, status) {
            Ok(_) => Reply::success(messages::TASK_MARKED),
            Err(err) => err.into(),
        }
    }

    fn list(&self, status: Option<&str>) -> Reply {
        match self.use_cases.list_tasks(status) {
            Ok(tasks) => Reply::success(messages::task_list(tasks, Utc::now())),
            Err(err) => err.into(),
        }
    }
}

/// Reports a failure that happened before any command could run, such as
/// an unreadable task file.
pub fn report_unexpected<W: Write>(output: &mut W, err: &dyn Display) -> ExitStatus {
    error!("{err}");
    write_reply(output, &messages::unexpected(err));
    ExitStatus::Unexpected
}

fn parse_failure(command: &str, kind: ErrorKind) -> Reply {
    match kind {
        ErrorKind::MissingRequiredArgument => {
            Reply::with_status(ExitStatus::NoArgs, messages::not_enough_args(command))
        }
        _ => Reply::with_status(ExitStatus::Invalid, messages::invalid_args(command)),
    }
}

fn write_reply<W: Write>(output: &mut W, text: &str) {
    if let Err(err) = writeln!(output, "{text}").and_then(|_| output.flush()) {
        error!("cannot write output: {err}");
    }
}
