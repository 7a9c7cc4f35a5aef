//! Terminal logging with colored module prefixes.
//!
//! Everything goes to stderr so that `manref query` can keep stdout for JSON.
//!
//! - `log!` prints `[module] message`
//! - `debug!` / `debug_do!` only run with `--verbose`
//! - `ProgressLine` redraws one line of per-kind counters while sources load
//!
//! ```ignore
//! log!("check"; "validating {} documents", count);
//!
//! let progress = ProgressLine::new("load", &[("markdown", 42), ("tree", 3)]);
//! progress.inc("markdown");
//! progress.finish();
//! ```

use crossterm::{
    cursor, queue,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

// ============================================================================
// Macros
// ============================================================================

/// Log a message with a colored module prefix
///
/// ```ignore
/// log!("resolve"; "wrote {} files", count);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, but only with `--verbose`
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Run a block only with `--verbose`, for debug output that is costly to
/// compute.
///
/// ```ignore
/// debug_do! {
///     let total = store.anchor_count();
///     debug!("collect"; "{} anchors", total);
/// }
/// ```
#[macro_export]
macro_rules! debug_do {
    ($($body:tt)*) => {{
        if $crate::logger::is_verbose() {
            $($body)*
        }
    }};
}

// ============================================================================
// Output
// ============================================================================

/// Print `[module] message` over the current line.
///
/// An active progress line is overwritten and comes back on its next `inc`.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut err = stderr().lock();
    clear_line(&mut err);
    writeln!(err, "{prefix} {message}").ok();
    err.flush().ok();
}

fn clear_line(err: &mut impl Write) {
    queue!(err, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
}

/// `[module]` colored by what kind of message it introduces.
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "check" | "resolve" | "query" => prefix.bright_blue().bold().to_string(),
        "ok" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Progress line
// ============================================================================

/// One line of counters, e.g. `[load] markdown(12/40) tree(1/3)`.
///
/// `inc` is called from rayon workers. Redraws use `try_lock`, so a worker
/// never waits on the terminal; a skipped redraw is caught up by the next.
pub struct ProgressLine {
    module: &'static str,
    counters: Vec<(&'static str, usize, AtomicUsize)>,
    redraw: Mutex<()>,
}

impl ProgressLine {
    /// Kinds with a total of zero are left out of the line.
    pub fn new(module: &'static str, items: &[(&'static str, usize)]) -> Self {
        let counters = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|&(name, total)| (name, total, AtomicUsize::new(0)))
            .collect();

        let progress = Self {
            module,
            counters,
            redraw: Mutex::new(()),
        };
        progress.draw(false);
        progress
    }

    pub fn inc(&self, name: &str) {
        let Some((_, _, done)) = self.counters.iter().find(|(n, ..)| *n == name) else {
            return;
        };
        done.fetch_add(1, Ordering::Relaxed);
        if let Some(_guard) = self.redraw.try_lock() {
            self.draw(false);
        }
    }

    fn render(&self) -> String {
        let counts: Vec<_> = self
            .counters
            .iter()
            .map(|(name, total, done)| format!("{name}({}/{total})", done.load(Ordering::Relaxed)))
            .collect();
        format!("{} {}", colorize_prefix(self.module), counts.join(" "))
    }

    fn draw(&self, keep: bool) {
        let line = self.render();
        let mut err = stderr().lock();
        clear_line(&mut err);
        if keep {
            writeln!(err, "{line}").ok();
        } else {
            write!(err, "{line}").ok();
        }
        err.flush().ok();
    }

    /// Leave the final counts on screen.
    pub fn finish(self) {
        {
            let _guard = self.redraw.lock();
            self.draw(true);
        }
        std::mem::forget(self);
    }
}

impl Drop for ProgressLine {
    /// Dropped without `finish` (an error while loading): erase the line.
    fn drop(&mut self) {
        let mut err = stderr().lock();
        clear_line(&mut err);
        err.flush().ok();
    }
}
