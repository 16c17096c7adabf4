//! Browser side of the countdown: binds the engine to page elements and
//! drives it from a self re-arming `setTimeout` chain.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use super::{Countdown, FieldSink, FormSubmitter, TickOutcome, is_untimed};
use crate::config::TimerConfig;
use crate::error::{PageError, Result};
use crate::page::PageElements;

type TickCallback = RefCell<Option<Closure<dyn FnMut()>>>;

struct TaskInner {
    interval_ms: i32,
    timeout_id: Cell<Option<i32>>,
    cancelled: Cell<bool>,
    callback: TickCallback,
}

impl TaskInner {
    fn arm(&self) -> Result<()> {
        let win = window().ok_or(PageError::NoWindow)?;
        let cb = self.callback.borrow();
        let Some(cb) = cb.as_ref() else {
            return Ok(());
        };
        let id = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                self.interval_ms,
            )
            .map_err(PageError::dom)?;
        self.timeout_id.set(Some(id));
        Ok(())
    }

    fn cancel(&self) {
        self.cancelled.set(true);
        if let Some(id) = self.timeout_id.take() {
            if let Some(win) = window() {
                win.clear_timeout_with_handle(id);
            }
        }
    }
}

/// Handle on a repeating task. Exactly one tick is pending while active.
///
/// The closure stays owned by the task after cancellation so a tick can stop
/// its own chain without freeing the code that is running.
#[wasm_bindgen]
#[derive(Clone)]
pub struct TimerHandle {
    inner: Rc<TaskInner>,
}

#[wasm_bindgen]
impl TimerHandle {
    /// Stops the chain. Safe to call repeatedly.
    pub fn cancel(&self) {
        if !self.inner.cancelled.get() {
            log::info!("timer cancelled");
        }
        self.inner.cancel();
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        !self.inner.cancelled.get()
    }
}

impl TimerHandle {
    /// A handle that never ticks (untimed quiz pages).
    pub fn inert() -> Self {
        Self {
            inner: Rc::new(TaskInner {
                interval_ms: 0,
                timeout_id: Cell::new(None),
                cancelled: Cell::new(true),
                callback: RefCell::new(None),
            }),
        }
    }

    /// Calls `step` every `interval_ms` until it returns `false` or the handle is cancelled.
    /// The next tick is armed only after `step` has returned.
    pub fn repeat(interval_ms: i32, mut step: impl FnMut() -> bool + 'static) -> Result<Self> {
        let inner = Rc::new(TaskInner {
            interval_ms,
            timeout_id: Cell::new(None),
            cancelled: Cell::new(false),
            callback: RefCell::new(None),
        });
        let weak: Weak<TaskInner> = Rc::downgrade(&inner);
        *inner.callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let Some(task) = weak.upgrade() else {
                return;
            };
            task.timeout_id.set(None);
            if task.cancelled.get() {
                return;
            }
            if !step() {
                task.cancel();
                return;
            }
            if let Err(e) = task.arm() {
                log::error!("could not schedule next tick: {}", e);
                task.cancel();
            }
        }) as Box<dyn FnMut()>));
        inner.arm()?;
        Ok(Self { inner })
    }
}

// The page runs a single countdown; starting another replaces it.
thread_local! {
    static ACTIVE_TIMER: RefCell<Option<TimerHandle>> = const { RefCell::new(None) };
}

fn replace_active(handle: Option<TimerHandle>) {
    let previous = ACTIVE_TIMER.with(|slot| slot.replace(handle));
    if let Some(prev) = previous {
        prev.cancel();
    }
}

/// Cancels whatever countdown is running on this page.
pub fn stop_active() {
    replace_active(None);
}

/// Binds the countdown to the page and schedules its first tick.
pub fn start(config: TimerConfig) -> Result<TimerHandle> {
    let form = PageElements::current()?.form(&config.form_name)?;
    start_with_form(config, Box::new(form))
}

/// Like `start`, with the expiry action supplied by the caller instead of
/// the page's timeout form.
pub fn start_with_form(config: TimerConfig, form: Box<dyn FormSubmitter>) -> Result<TimerHandle> {
    let interval_ms = config.tick_interval()?;
    let page = PageElements::current()?;
    let source = page.by_name(&config.source_name)?;
    let display = page.by_id(&config.display_id)?;
    let fields: Vec<Box<dyn FieldSink>> = page
        .all_by_name(&config.field_name)
        .into_iter()
        .map(|f| Box::new(f) as Box<dyn FieldSink>)
        .collect();
    log::debug!(
        "countdown bound: source={} fields={} display={} form={}",
        config.source_name,
        fields.len(),
        config.display_id,
        config.form_name
    );

    let mut countdown =
        Countdown::new(Box::new(source), fields, Box::new(display), form, config.expiry);
    let remaining = match config.initial_seconds {
        Some(initial) => initial,
        None => countdown.remaining().inspect_err(|_| countdown.show_error())?,
    };
    if is_untimed(remaining) {
        log::info!("untimed quiz ({}s), countdown not started", remaining);
        replace_active(None);
        return Ok(TimerHandle::inert());
    }
    countdown
        .set_remaining(remaining)
        .inspect_err(|_| countdown.show_error())?;

    log::info!(
        "countdown started at {}s, tick every {}ms ({:?} on expiry)",
        remaining,
        interval_ms,
        config.expiry
    );
    let handle = TimerHandle::repeat(interval_ms, move || run_tick(&mut countdown))?;
    replace_active(Some(handle.clone()));
    Ok(handle)
}

fn run_tick(countdown: &mut Countdown) -> bool {
    match countdown.tick() {
        Ok(TickOutcome::Continued(_)) => true,
        Ok(TickOutcome::Expired) => countdown.wants_next_tick(),
        Err(e) => {
            log::error!("countdown stopped: {}", e);
            countdown.show_error();
            false
        }
    }
}
