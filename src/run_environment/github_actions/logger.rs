use crate::logger::{GroupEvent, get_group_event, get_log_level_from_env};
use log::*;
use simplelog::SharedLogger;
use std::{env, io::Write};

/// A logger that prints logs in the format expected by GitHub Actions, with grouping support.
///
/// See https://docs.github.com/en/actions/using-workflows/workflow-commands-for-github-actions
pub struct GithubActionLogger {
    log_level: LevelFilter,
}

impl GithubActionLogger {
    pub fn new() -> Self {
        // Only enable debug logging if it's enabled in GitHub Actions.
        // See: https://docs.github.com/en/actions/reference/workflows-and-actions/variables
        let log_level = if env::var("RUNNER_DEBUG").unwrap_or_default() == "1" {
            LevelFilter::Trace
        } else {
            get_log_level_from_env()
        };

        Self { log_level }
    }
}

impl Log for GithubActionLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let level = record.level();
        let message = record.args();

        if let Some(group_event) = get_group_event(record) {
            match group_event {
                GroupEvent::Start(name) | GroupEvent::StartOpened(name) => {
                    println!("::group::{name}");
                }
                GroupEvent::End => {
                    println!("::endgroup::");
                }
            }
            return;
        }

        if level > self.log_level {
            return;
        }

        let prefix = match level {
            Level::Error => "::error::",
            Level::Warn => "::warning::",
            Level::Info => "",
            Level::Debug => "::debug::",
            Level::Trace => "::debug::[TRACE]",
        };
        let message_string = escape_multiline_message(&message.to_string());
        println!("{prefix}{message_string}");
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

impl SharedLogger for GithubActionLogger {
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

/// Escapes newlines in a message for GitHub Actions logging.
/// GitHub Actions requires newlines to be replaced with `%0A` to be interpreted correctly.
///
/// See https://github.com/actions/toolkit/issues/193#issuecomment-605394935
///
/// Trailing newlines are kept as actual newlines, otherwise the message is displayed with a
/// dangling `%0A`.
fn escape_multiline_message(message: &str) -> String {
    let trailing_newlines = message.len() - message.trim_end_matches('\n').len();
    let stripped = &message[..message.len() - trailing_newlines];
    format!(
        "{}{}",
        stripped.replace('\n', "%0A"),
        "\n".repeat(trailing_newlines)
    )
}
