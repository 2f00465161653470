//! Terminal progress indicator for running jobs.
//!
//! On a terminal the current progress line is redrawn in place with a
//! spinner and elapsed time. Elsewhere each new line is printed once.
//!
//! # Examples
//!
//! ```no_run
//! use pdfsplice::output::TerminalProgress;
//! use pdfsplice::job::MonitorSink;
//!
//! let mut progress = TerminalProgress::stdout(false);
//! progress.progress("Merging progress: appended 1 of 2...");
//! ```

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use crate::job::{JobResult, MonitorSink};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Renders monitor output to a writer.
pub struct TerminalProgress<W: Write> {
    out: W,
    /// Redraw in place instead of printing one line per update.
    redraw: bool,
    /// Suppress everything except failures.
    quiet: bool,
    start_time: Instant,
    spinner_frame: usize,
    drawn: bool,
}

impl TerminalProgress<io::Stdout> {
    /// Render to stdout, redrawing in place when stdout is a terminal.
    pub fn stdout(quiet: bool) -> Self {
        let redraw = io::stdout().is_terminal();
        Self::new(io::stdout(), redraw, quiet)
    }
}

impl<W: Write> TerminalProgress<W> {
    /// Render to `out`.
    pub fn new(out: W, redraw: bool, quiet: bool) -> Self {
        Self {
            out,
            redraw,
            quiet,
            start_time: Instant::now(),
            spinner_frame: 0,
            drawn: false,
        }
    }

    /// Time since the indicator was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// The underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn clear_line(&mut self) {
        if self.drawn {
            write!(self.out, "\r\x1b[K").ok();
            self.drawn = false;
        }
    }
}

impl<W: Write> MonitorSink for TerminalProgress<W> {
    fn progress(&mut self, message: &str) {
        if self.quiet {
            return;
        }
        if self.redraw {
            let frame = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
            self.spinner_frame += 1;
            let elapsed = format_duration(self.elapsed());
            write!(self.out, "\r\x1b[K{frame} {message} {elapsed}").ok();
            self.drawn = true;
        } else {
            writeln!(self.out, "{message}").ok();
        }
        self.out.flush().ok();
    }

    fn finished(&mut self, result: &JobResult) {
        self.clear_line();
        match result {
            JobResult::Succeeded => {
                if !self.quiet {
                    writeln!(
                        self.out,
                        "Done in {}",
                        format_duration(self.elapsed())
                    )
                    .ok();
                }
            }
            JobResult::Failed(message) => {
                writeln!(self.out, "Warning: {message}").ok();
            }
        }
        self.out.flush().ok();
    }
}

/// Format a duration as a human-readable string.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
