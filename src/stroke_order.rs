//! Kanji stroke order diagrams.
//!
//! Each kanji on a card has an `<img name="漢字diagram字">` hidden by default.
//! Nothing is shown until the `show_kanji` button enables the viewer; after
//! that, hovering a kanji shows its diagram.

use std::cell::RefCell;

use crate::error::Result;
use crate::page::{PageElements, StyleSink};

pub const ENABLE_BUTTON_NAME: &str = "show_kanji";
pub const IMAGE_NAME_PREFIX: &str = "漢字diagram";
pub const SHOWN_STYLE: &str = "display: block; max-width: 100%; margin-left: auto; margin-right: auto";
pub const HIDDEN_STYLE: &str = "display: none;";

pub fn image_name(kanji: &str) -> String {
    format!("{}{}", IMAGE_NAME_PREFIX, kanji)
}

#[derive(Debug, Default)]
pub struct StrokeOrderViewer {
    enabled: bool,
}

impl StrokeOrderViewer {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turns the viewer on and hides the button that did it.
    pub fn enable<B: StyleSink + ?Sized>(&mut self, button: &mut B) -> Result<()> {
        self.enabled = true;
        button.set_style(HIDDEN_STYLE)
    }

    /// Shows the diagram found by `lookup`. Returns whether anything changed;
    /// `lookup` is not called while disabled.
    pub fn show<S, F>(&self, lookup: F) -> Result<bool>
    where
        S: StyleSink,
        F: FnOnce() -> Result<S>,
    {
        self.apply(lookup, SHOWN_STYLE)
    }

    pub fn hide<S, F>(&self, lookup: F) -> Result<bool>
    where
        S: StyleSink,
        F: FnOnce() -> Result<S>,
    {
        self.apply(lookup, HIDDEN_STYLE)
    }

    fn apply<S, F>(&self, lookup: F, css: &str) -> Result<bool>
    where
        S: StyleSink,
        F: FnOnce() -> Result<S>,
    {
        if !self.enabled {
            return Ok(false);
        }
        lookup()?.set_style(css)?;
        Ok(true)
    }
}

// --- DOM binding -------------------------------------------------------------

thread_local! {
    static VIEWER: RefCell<StrokeOrderViewer> = RefCell::new(StrokeOrderViewer::default());
}

pub fn enable_on_page() -> Result<()> {
    let page = PageElements::current()?;
    let mut button = page.by_name(ENABLE_BUTTON_NAME)?;
    VIEWER.with(|v| v.borrow_mut().enable(&mut button))?;
    log::info!("stroke order diagrams enabled");
    Ok(())
}

pub fn show_on_page(kanji: &str) -> Result<bool> {
    VIEWER.with(|v| {
        v.borrow()
            .show(|| PageElements::current()?.by_name(&image_name(kanji)))
    })
}

pub fn hide_on_page(kanji: &str) -> Result<bool> {
    VIEWER.with(|v| {
        v.borrow()
            .hide(|| PageElements::current()?.by_name(&image_name(kanji)))
    })
}
