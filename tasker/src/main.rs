use log::{LevelFilter, debug};
use log4rs::Config;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Logger, Root};
use std::process::ExitCode;
use tasker::cli::{self, Cli};
use tasker::repository::JsonTaskRepository;

fn init_logging(level: LevelFilter) -> anyhow::Result<()> {
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .logger(Logger::builder().build("tasker", level))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let config = tasker::config::Config::from_env()?;
    init_logging(config.level_filter())?;
    debug!("using task file {}", config.path().display());

    let mut stdout = std::io::stdout();
    let repository = match JsonTaskRepository::open(config.path()) {
        Ok(repository) => repository,
        Err(err) => return Ok(cli::report_unexpected(&mut stdout, &err).into()),
    };

    let mut app = Cli::new(repository, stdout);
    Ok(app.dispatch(std::env::args().skip(1)).into())
}
