use std::fmt::Arguments;

use log::Level;

/// Print a record for CIs that have no notion of log levels, the level is spelled out in
/// front of the message instead.
pub(super) fn print_with_level_prefix(level: Level, message: &Arguments) {
    match level {
        Level::Error => println!("[ERROR] {message}"),
        Level::Warn => println!("[WARN] {message}"),
        Level::Info => println!("{message}"),
        Level::Debug => println!("[DEBUG] {message}"),
        Level::Trace => println!("[TRACE] {message}"),
    }
}
