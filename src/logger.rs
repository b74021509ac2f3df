//! Logging utilities with colored module prefixes.
//!
//! Provides the `log!` and `warn!` macros for formatted terminal output:
//!
//! ```ignore
//! log!("source"; "trying {} for {}", name, path);
//! warn!("registry"; "folder '{}' not found", folder);
//! ```
//!
//! Output can be silenced globally (used by the test suite and by hosts
//! that embed the engine as a library).

use colored::{ColoredString, Colorize};
use std::{
    io::{Write, stderr, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global quiet flag. When set, `log!` and `warn!` become no-ops.
static QUIET: AtomicBool = AtomicBool::new(false);

/// Silence (or re-enable) all diagnostic output.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::SeqCst);
}

fn is_quiet() -> bool {
    QUIET.load(Ordering::SeqCst)
}

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a warning with a yellow prefix to stderr.
#[macro_export]
macro_rules! warn {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::warn($module, &format!($($arg)*))
    }};
}

/// Log a message with a colored module prefix.
#[inline]
pub fn log(module: &str, message: &str) {
    if is_quiet() {
        return;
    }
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());
    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Log a warning to stderr, always with the warning color.
#[inline]
pub fn warn(module: &str, message: &str) {
    if is_quiet() {
        return;
    }
    let prefix = format!("[{module}]").yellow().bold();
    let mut stderr = stderr().lock();
    writeln!(stderr, "{prefix} {message}").ok();
    stderr.flush().ok();
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "source" => prefix.bright_blue().bold(),
        "registry" => prefix.bright_green().bold(),
        "page" => prefix.bright_cyan().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}
