//! Quiz countdown timer.
//!
//! The remaining time lives in the page, not here: every tick re-reads the
//! authoritative source element, decrements it, and writes the result back to
//! the source, to every mirrored field, and (formatted) to the display
//! container. Reaching zero submits the timeout form once.
//!
//! This module holds the engine and the sink traits it drives; `dom` binds
//! them to real elements and schedules the ticks.

use serde::Deserialize;

use crate::error::{PageError, Result};

pub mod dom;

/// Shown in the display container when the timer hits a configuration error.
pub const ERROR_DISPLAY: &str = "--時--分--秒";

// --- Sinks -------------------------------------------------------------------

/// An element holding a numeric value (hidden `secs_left` inputs).
pub trait FieldSink {
    fn set_value(&mut self, value: i64) -> Result<()>;
}

/// An element whose whole content is one line of text.
pub trait DisplaySink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The authoritative remaining-seconds element. Writable like any field.
pub trait RemainingSource: FieldSink {
    /// Identifier used in error messages.
    fn key(&self) -> &str;
    /// Raw stored value, `None` when the attribute is absent.
    fn raw_value(&self) -> Option<String>;
}

/// Terminal action fired on expiry.
pub trait FormSubmitter {
    fn submit(&mut self) -> Result<()>;
}

// --- Formatting --------------------------------------------------------------

/// Renders seconds as `<h>時<m>分<s>秒`. Negative input renders as zero.
pub fn format_remaining(seconds: i64) -> String {
    let (h, m, s) = split_hms(seconds);
    format!("{}時{}分{}秒", h, m, s)
}

/// Hours / minutes / seconds decomposition, clamped at zero.
pub fn split_hms(seconds: i64) -> (i64, i64, i64) {
    let secs = seconds.max(0);
    (secs / 3600, (secs % 3600) / 60, (secs % 3600) % 60)
}

// --- Engine ------------------------------------------------------------------

/// What happens to ticks once the timer has expired.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ExpiryPolicy {
    /// Expiry is absorbing: ticking stops and the counter stays put.
    #[default]
    Halt,
    /// Historical page behaviour: keep decrementing below zero every tick.
    /// The form is still submitted only once.
    KeepTicking,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownState {
    Running,
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continued(i64),
    Expired,
}

pub struct Countdown {
    source: Box<dyn RemainingSource>,
    fields: Vec<Box<dyn FieldSink>>,
    display: Box<dyn DisplaySink>,
    form: Box<dyn FormSubmitter>,
    policy: ExpiryPolicy,
    state: CountdownState,
    submitted: bool,
}

impl Countdown {
    pub fn new(
        source: Box<dyn RemainingSource>,
        fields: Vec<Box<dyn FieldSink>>,
        display: Box<dyn DisplaySink>,
        form: Box<dyn FormSubmitter>,
        policy: ExpiryPolicy,
    ) -> Self {
        Self {
            source,
            fields,
            display,
            form,
            policy,
            state: CountdownState::Running,
            submitted: false,
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    /// Parses the current value of the source element.
    pub fn remaining(&self) -> Result<i64> {
        let raw = self.source.raw_value().ok_or_else(|| PageError::MalformedValue {
            key: self.source.key().to_string(),
            value: String::new(),
        })?;
        raw.trim().parse::<i64>().map_err(|_| PageError::MalformedValue {
            key: self.source.key().to_string(),
            value: raw.clone(),
        })
    }

    /// Overwrites the source and every mirror, then re-renders the display.
    pub fn set_remaining(&mut self, value: i64) -> Result<()> {
        self.source.set_value(value)?;
        for field in self.fields.iter_mut() {
            field.set_value(value)?;
        }
        self.display.set_text(&format_remaining(value))
    }

    /// Whether the scheduler should arm another tick.
    pub fn wants_next_tick(&self) -> bool {
        match self.state {
            CountdownState::Running => true,
            CountdownState::Expired => self.policy == ExpiryPolicy::KeepTicking,
        }
    }

    /// One countdown step: read, decrement, write back, render, and submit on expiry.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if self.state == CountdownState::Expired && self.policy == ExpiryPolicy::Halt {
            return Ok(TickOutcome::Expired);
        }
        let current = self.remaining()?;
        let remaining = current.checked_sub(1).ok_or_else(|| PageError::MalformedValue {
            key: self.source.key().to_string(),
            value: current.to_string(),
        })?;
        // Mirrors are updated before submitting so the form carries the final value.
        self.set_remaining(remaining)?;
        log::debug!("countdown tick: {} left", remaining);

        if remaining > 0 && self.state == CountdownState::Running {
            return Ok(TickOutcome::Continued(remaining));
        }
        if !self.submitted {
            self.submitted = true;
            self.state = CountdownState::Expired;
            log::info!("countdown expired, submitting timeout form");
            self.form.submit()?;
        }
        Ok(TickOutcome::Expired)
    }

    /// Replaces the countdown text with a visible error marker.
    pub fn show_error(&mut self) {
        if let Err(e) = self.display.set_text(ERROR_DISPLAY) {
            log::error!("could not render timer error marker: {}", e);
        }
    }
}

/// The quiz server renders zero or a negative value when the quiz is untimed.
pub fn is_untimed(remaining: i64) -> bool {
    remaining <= 0
}
