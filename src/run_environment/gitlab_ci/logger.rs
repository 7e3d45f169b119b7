use console::style;
use lazy_static::lazy_static;
use log::{Level, LevelFilter, Log};
use regex::Regex;
use simplelog::SharedLogger;
use std::{
    io::Write,
    sync::Mutex,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::logger::{GroupEvent, get_group_event, get_log_level_from_env};

lazy_static! {
    static ref GITLAB_SECTION_ID_SANITIZE_REGEX: Regex =
        Regex::new(r"[^\d\w\-_]").expect("Failed to compile GitLab SectionId regex");
}

/// Unicode Escape character
///
/// https://gist.github.com/fnky/458719343aabd01cfb17a3a4f7296797#general-ascii-codes
const U_ESC: char = '\x1B';

/// Unicode Carriage Return character
///
/// https://gist.github.com/fnky/458719343aabd01cfb17a3a4f7296797#general-ascii-codes
const U_CR: char = '\x0D';

/// Reset color mode
const COLOR_RESET: &str = "\x1B[0m";

/// Erase cursor till end of line
const ERASE_CURSOR: &str = "\x1B[0K";

/// A logger that prints log in the format expected by GitLab CI
///
/// See https://docs.gitlab.com/ee/ci/yaml/script.html
pub struct GitLabCILogger {
    log_level: LevelFilter,
    section_id: Mutex<Option<String>>,
}

impl GitLabCILogger {
    pub fn new() -> Self {
        // force activation of colors, because GitlabCI does not
        // respect the CLICOLORS spec.
        // https://gitlab.com/gitlab-org/gitlab/-/issues/28598
        console::set_colors_enabled(true);

        Self {
            log_level: get_log_level_from_env(),
            section_id: Mutex::new(None),
        }
    }
}

fn section_id_for(name: &str) -> String {
    GITLAB_SECTION_ID_SANITIZE_REGEX
        .replace_all(name, "_")
        .to_ascii_lowercase()
}

impl Log for GitLabCILogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let level = record.level();
        let message = record.args();

        if let Some(group_event) = get_group_event(record) {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default();
            let Ok(mut section_id) = self.section_id.lock() else {
                return;
            };

            let section_start = match group_event {
                GroupEvent::Start(name) => Some((name, "[collapsed=true]")),
                GroupEvent::StartOpened(name) => Some((name, "")),
                GroupEvent::End => None,
            };

            match section_start {
                Some((name, options)) => {
                    let new_section_id = section_id_for(&name);

                    // https://docs.gitlab.com/ee/ci/yaml/script.html#custom-collapsible-sections
                    println!(
                        "{ERASE_CURSOR}section_start:{timestamp}:{new_section_id}{options}{U_CR}{ERASE_CURSOR}{U_ESC}[36;1m{name}{COLOR_RESET}"
                    );
                    *section_id = Some(new_section_id);
                }
                None => {
                    // do not fail if there is no current section
                    let current_section_id = section_id.take().unwrap_or_default();

                    println!(
                        "{ERASE_CURSOR}section_end:{timestamp}:{current_section_id}{U_CR}{ERASE_CURSOR}"
                    );
                }
            }
            return;
        }

        if level > self.log_level {
            return;
        }

        // set log colors. See https://gist.github.com/fnky/458719343aabd01cfb17a3a4f7296797#colors--graphics-mode
        match level {
            Level::Error => println!("{}", style(message).red()),
            Level::Warn => println!("{}", style(message).yellow()),
            Level::Info => println!("{message}"),
            Level::Debug => println!("{}", style(message).cyan()),
            Level::Trace => println!("{}", style(message).magenta()),
        };
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

impl SharedLogger for GitLabCILogger {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_id_for() {
        assert_eq!(section_id_for("Uploading report"), "uploading_report");
        assert_eq!(section_id_for("Report: junit/e2e"), "report__junit_e2e");
    }
}
