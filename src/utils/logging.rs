// Algo Bench - Free and Open Source Software Statement
//
// This project, algo-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/logging.rs
// Version: 0.3.0
//
// This file initializes log4rs for the harness binary. A YAML configuration
// (see log4rs_sample.yml) takes precedence; otherwise logs go to stderr and
// to a file under the log directory.
//
// Tree Location:
// - src/utils/logging.rs (logger setup)
// - Depends on: log, log4rs, anyhow

use anyhow::Context;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

pub const LOG_FILE_NAME: &str = "algo-bench.log";

const CONSOLE_PATTERN: &str = "{d(%H:%M:%S)} {h({l:5})} {m}{n}";
const FILE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l:5} [{t}] {m}{n}";

/// Build the default console + file configuration
pub fn default_config(level: LevelFilter, log_dir: &Path) -> anyhow::Result<Config> {
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();
    let log_path = log_dir.join(LOG_FILE_NAME);
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
        .build(&log_path)
        .with_context(|| format!("could not open log file {:?}", log_path))?;

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .appender(Appender::builder().build("file", Box::new(file)))
        .logger(Logger::builder().build("reqwest", LevelFilter::Warn))
        .logger(Logger::builder().build("hyper_util", LevelFilter::Warn))
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(level),
        )?;
    Ok(config)
}

/// Install the global logger
pub fn init_logging(
    level: LevelFilter,
    log_dir: &Path,
    config_file: Option<&Path>,
) -> anyhow::Result<()> {
    if let Some(path) = config_file {
        log4rs::init_file(path, Default::default())
            .with_context(|| format!("could not load log config {:?}", path))?;
        return Ok(());
    }
    log4rs::init_config(default_config(level, log_dir)?)?;
    Ok(())
}
