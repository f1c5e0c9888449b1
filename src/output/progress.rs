//! Progress reporting functionality
//!
//! This module provides progress reporting for scans and pipeline runs
//! with support for quiet and verbose modes. Everything is drawn on stderr
//! so stdout stays reserved for results.

use crate::core::scanner::ProgressUpdate;
use crate::models::deployment::PipelineEvent;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Progress reporter for long-running operations
pub struct ProgressReporter {
    quiet: bool,
    verbose: bool,
    multi_progress: MultiProgress,
    main_progress_bar: Option<ProgressBar>,
    message_bar: Option<ProgressBar>,
    current_operation: Mutex<String>,
}

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::stderr());

        // Don't create progress bars in quiet mode
        let (main_progress_bar, message_bar) = if quiet {
            (None, None)
        } else {
            let main_bar = multi_progress.add(ProgressBar::new(100));
            main_bar.set_style(bar_style(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            ));

            let msg_bar = multi_progress.add(ProgressBar::new(1));
            msg_bar.set_style(bar_style("{wide_msg}"));

            (Some(main_bar), Some(msg_bar))
        };

        Self {
            quiet,
            verbose,
            multi_progress,
            main_progress_bar,
            message_bar,
            current_operation: Mutex::new(String::new()),
        }
    }

    /// Reporter that draws nothing
    pub fn hidden() -> Self {
        Self::new(true, false)
    }

    /// Start a new progress operation
    pub fn start(&self, total: usize, operation: &str) {
        if self.quiet {
            return;
        }

        if let Some(bar) = &self.main_progress_bar {
            bar.reset();
            bar.set_length(total as u64);
            bar.set_position(0);
            bar.set_message(operation.to_string());
        }

        if let Some(msg_bar) = &self.message_bar {
            msg_bar.set_message(operation.to_string());
        }

        *self.current_operation.lock() = operation.to_string();

        if self.verbose {
            self.print(&format!("Starting: {}", operation));
        }
    }

    /// Update progress
    pub fn update(&self, current: usize, total: usize, message: &str) {
        if self.quiet {
            return;
        }

        if let Some(bar) = &self.main_progress_bar {
            bar.set_length(total as u64);
            bar.set_position(current as u64);

            // Only update the message if it's different from the current operation
            if message != *self.current_operation.lock() {
                if let Some(msg_bar) = &self.message_bar {
                    msg_bar.set_message(message.to_string());
                }
            }
        }
    }

    /// Update progress from a scanner update
    pub fn update_from(&self, progress: ProgressUpdate) {
        self.update(progress.current, progress.total, &progress.message);
    }

    /// Show a pipeline event as a percentage of the whole run
    pub fn update_event(&self, event: &PipelineEvent) {
        self.update(event.progress.round() as usize, 100, &event.message);
    }

    /// Finish the progress operation
    pub fn finish(&self, message: &str) {
        if self.quiet {
            return;
        }

        if let Some(bar) = &self.main_progress_bar {
            bar.finish_with_message(message.to_string());
        }

        if let Some(msg_bar) = &self.message_bar {
            msg_bar.finish_with_message(message.to_string());
        }

        if self.verbose {
            self.print(&format!("Finished: {}", message));
        }
    }

    /// Create a spinner for an operation of unknown length
    pub fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if self.quiet {
            return None;
        }

        let spinner = self.multi_progress.add(ProgressBar::new_spinner());
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        Some(spinner)
    }

    /// Print a line above the bars (respects quiet mode)
    pub fn print(&self, message: &str) {
        if !self.quiet {
            let _ = self.multi_progress.println(message);
        }
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Create a progress callback function that updates a ProgressReporter
pub fn create_progress_callback(reporter: Arc<ProgressReporter>) -> impl Fn(ProgressUpdate) + Send + Sync {
    move |progress: ProgressUpdate| {
        reporter.update_from(progress);
    }
}
