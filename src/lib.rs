//! Tsukuyomi quiz page behaviours.
//!
//! Compiled to WASM and loaded by the flashcard quiz pages. Exposes the quiz
//! countdown (`start_page_timer` and friends), the furigana toggle, and the
//! kanji stroke order viewer. The page owns the markup; this crate only finds
//! its elements and mutates them.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod countdown;
pub mod error;
pub mod furigana;
pub mod logging;
pub mod page;
pub mod stroke_order;

pub use config::TimerConfig;
pub use countdown::dom::TimerHandle;
pub use countdown::{Countdown, ExpiryPolicy, TickOutcome};
pub use error::PageError;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(logging::default_level());
}

// -----------------------------------------------------------------------------
// Countdown
// -----------------------------------------------------------------------------

/// Starts the countdown. `initial_seconds` overwrites the page value when given.
#[wasm_bindgen]
pub fn start_timer(initial_seconds: Option<i32>, tick_interval_ms: u32) -> Result<TimerHandle, JsValue> {
    let config = TimerConfig::with_start(initial_seconds.map(i64::from), tick_interval_ms)?;
    Ok(countdown::dom::start(config)?)
}

/// Starts the countdown from a JSON `TimerConfig`; missing keys take page defaults.
#[wasm_bindgen]
pub fn start_timer_with_config(json: &str) -> Result<TimerHandle, JsValue> {
    let config = TimerConfig::from_json(json)?;
    Ok(countdown::dom::start(config)?)
}

/// What the quiz page calls on load: page value, one tick per second.
#[wasm_bindgen]
pub fn start_page_timer() -> Result<TimerHandle, JsValue> {
    Ok(countdown::dom::start(TimerConfig::default())?)
}

#[wasm_bindgen]
pub fn stop_timer(handle: &TimerHandle) {
    handle.cancel();
}

/// Stops the page's countdown without needing its handle.
#[wasm_bindgen]
pub fn stop_page_timer() {
    countdown::dom::stop_active();
}

#[wasm_bindgen]
pub fn format_remaining(seconds: i32) -> String {
    countdown::format_remaining(i64::from(seconds))
}

// -----------------------------------------------------------------------------
// Furigana / stroke order
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn toggle_visibility(furigana_class: &str) -> Result<(), JsValue> {
    furigana::toggle_on_page(furigana_class)?;
    Ok(())
}

#[wasm_bindgen(js_name = enableKanjiView)]
pub fn enable_kanji_view() -> Result<(), JsValue> {
    Ok(stroke_order::enable_on_page()?)
}

#[wasm_bindgen(js_name = showKanjiImage)]
pub fn show_kanji_image(kanji: &str) -> Result<(), JsValue> {
    stroke_order::show_on_page(kanji)?;
    Ok(())
}

#[wasm_bindgen(js_name = hideKanjiImage)]
pub fn hide_kanji_image(kanji: &str) -> Result<(), JsValue> {
    stroke_order::hide_on_page(kanji)?;
    Ok(())
}
