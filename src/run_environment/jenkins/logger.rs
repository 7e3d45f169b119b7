use console::style;
use log::*;
use simplelog::SharedLogger;
use std::io::Write;

use crate::logger::{GroupEvent, get_group_event, get_log_level_from_env};
use crate::run_environment::logger::print_with_level_prefix;

/// A logger writing plain lines to the Jenkins console output.
///
/// The console has no collapsible sections, groups are rendered as a highlighted header line.
pub struct JenkinsLogger {
    log_level: LevelFilter,
}

impl JenkinsLogger {
    pub fn new() -> Self {
        Self {
            log_level: get_log_level_from_env(),
        }
    }
}

impl Log for JenkinsLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Some(group_event) = get_group_event(record) {
            match group_event {
                GroupEvent::Start(name) | GroupEvent::StartOpened(name) => {
                    println!("{}", style(format!("[QA Matrix] {name}")).bold());
                }
                GroupEvent::End => {}
            }
            return;
        }

        if record.level() > self.log_level {
            return;
        }

        print_with_level_prefix(record.level(), record.args());
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

impl SharedLogger for JenkinsLogger {
    fn level(&self) -> LevelFilter {
        self.log_level
    }

    fn config(&self) -> Option<&simplelog::Config> {
        None
    }

    fn as_log(self: Box<Self>) -> Box<dyn Log> {
        Box::new(*self)
    }
}
