use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::common::constants::{
    LogLevel, FAILURE_GLYPH, SPINNER_FRAMES, SPINNER_TICK_MS, SUCCESS_GLYPH,
};
use crate::common::logger::Logger;
use crate::services::timer::InactivityTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Default)]
struct SpinnerState {
    bar: Option<ProgressBar>,
    // Last bar frozen by success or fail, kept until the next start.
    resolved: Option<ProgressBar>,
    // Bumped by every transition; a timer only acts on the epoch it was armed for.
    epoch: u64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns at most one live spinner and at most one pending inactivity timer.
#[derive(Default)]
pub struct SpinnerController {
    state: Arc<Mutex<SpinnerState>>,
    timer: Mutex<InactivityTimer>,
}

impl SpinnerController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any live spinner with a new one showing `message`.
    pub fn start(&self, message: String, target: ProgressDrawTarget, timeout: Option<Duration>) {
        self.transition(timeout, move |state| {
            if let Some(previous) = state.bar.take() {
                previous.finish_and_clear();
            }
            state.resolved = None;
            state.bar = Some(spawn_bar(message, target));
            tracing::trace!("spinner started");
            true
        });
    }

    pub fn update(&self, message: String, timeout: Option<Duration>) {
        self.transition(timeout, move |state| match &state.bar {
            Some(bar) => {
                bar.set_message(message);
                true
            }
            None => false,
        });
    }

    /// Freeze the spinner into a success or failure glyph followed by `message`.
    pub fn resolve(&self, outcome: Outcome, message: String, timeout: Option<Duration>) {
        self.transition(timeout, move |state| match state.bar.take() {
            Some(bar) => {
                bar.set_style(resolved_style());
                bar.set_prefix(glyph(outcome));
                bar.finish_with_message(message);
                tracing::trace!(?outcome, "spinner resolved");
                state.resolved = Some(bar);
                true
            }
            None => false,
        });
    }

    /// Cancel the timer and clear the spinner, if any. Safe when idle.
    pub fn stop(&self) {
        let mut timer = lock(&self.timer);
        timer.cancel();

        let mut state = lock(&self.state);
        state.epoch += 1;
        if let Some(bar) = state.bar.take() {
            bar.finish_and_clear();
            tracing::trace!("spinner stopped");
        }
    }

    pub fn is_spinning(&self) -> bool {
        lock(&self.state).bar.is_some()
    }

    /// Text of the live spinner.
    pub fn message(&self) -> Option<String> {
        lock(&self.state).bar.as_ref().map(ProgressBar::message)
    }

    /// Frozen line left by the last `resolve`, as drawn: glyph, space, message.
    pub fn resolution(&self) -> Option<String> {
        lock(&self.state)
            .resolved
            .as_ref()
            .map(|bar| format!("{} {}", bar.prefix(), bar.message()))
    }

    /// Run `f` with the live spinner (if any) hidden, so output written by `f`
    /// is not drawn over by the next tick.
    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let live = lock(&self.state).bar.clone();
        match live {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    pub fn timer_armed(&self) -> bool {
        lock(&self.timer).is_armed()
    }

    // `apply` returns false when the operation does not apply to the current
    // state; the timer is then left untouched.
    fn transition<F>(&self, timeout: Option<Duration>, apply: F)
    where
        F: FnOnce(&mut SpinnerState) -> bool,
    {
        let mut timer = lock(&self.timer);
        let epoch = {
            let mut state = lock(&self.state);
            if !apply(&mut state) {
                return;
            }
            state.epoch += 1;
            state.epoch
        };

        timer.cancel();
        if let Some(after) = timeout {
            let state = Arc::clone(&self.state);
            timer.arm(after, move || expire(&state, epoch));
        }
    }
}

impl Drop for SpinnerController {
    fn drop(&mut self) {
        self.stop();
    }
}

fn expire(state: &Mutex<SpinnerState>, epoch: u64) {
    let mut state = lock(state);
    if state.epoch != epoch {
        return;
    }
    if let Some(bar) = state.bar.take() {
        bar.finish_and_clear();
        tracing::debug!("spinner stopped after inactivity");
    }
}

fn glyph(outcome: Outcome) -> String {
    match outcome {
        Outcome::Success => SUCCESS_GLYPH.green().to_string(),
        Outcome::Failure => FAILURE_GLYPH.red().to_string(),
    }
}

fn spawn_bar(message: String, target: ProgressDrawTarget) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(None, target);
    bar.set_style(spinner_style());
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
    bar
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .map(|style| style.tick_strings(SPINNER_FRAMES))
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn resolved_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Spinner operations for one [`Logger`]. Text goes through the logger's
/// info prefix (error prefix for [`Spinner::fail`]).
pub struct Spinner<'a> {
    logger: &'a Logger,
}

impl<'a> Spinner<'a> {
    pub(crate) fn new(logger: &'a Logger) -> Self {
        Self { logger }
    }

    pub fn start(&self, text: &str, timeout: Option<Duration>) {
        let message = self.logger.format_line(LogLevel::Info, text);
        self.controller()
            .start(message, self.logger.sink().spinner_target(), timeout);
    }

    pub fn update(&self, text: &str, timeout: Option<Duration>) {
        let message = self.logger.format_line(LogLevel::Info, text);
        self.controller().update(message, timeout);
    }

    pub fn success(&self, text: Option<&str>, timeout: Option<Duration>) {
        let message = self.logger.format_line(LogLevel::Info, text.unwrap_or_default());
        self.controller().resolve(Outcome::Success, message, timeout);
    }

    pub fn fail(&self, text: Option<&str>, timeout: Option<Duration>) {
        let message = self.logger.format_line(LogLevel::Error, text.unwrap_or_default());
        self.controller().resolve(Outcome::Failure, message, timeout);
    }

    pub fn stop(&self) {
        self.controller().stop();
    }

    pub fn is_spinning(&self) -> bool {
        self.controller().is_spinning()
    }

    /// Text currently shown next to the spinner, prefix included.
    pub fn message(&self) -> Option<String> {
        self.controller().message()
    }

    /// Line left behind by the last [`Spinner::success`] or [`Spinner::fail`].
    pub fn resolution(&self) -> Option<String> {
        self.controller().resolution()
    }

    fn controller(&self) -> &SpinnerController {
        self.logger.spinner_controller()
    }
}
