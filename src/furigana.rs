//! Furigana (ruby annotation) visibility toggle.
//!
//! Quiz pages render readings in `rp`/`rt` tags hidden by default, plus a
//! button named `振り仮名を見せて` that calls `toggle_visibility`.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::Result;
use crate::page::{ElementSink, LabelSink, PageElements, StyleSink};

pub const TOGGLE_BUTTON_NAME: &str = "振り仮名を見せて";
pub const SHOW_LABEL: &str = "振り仮名を見せて";
pub const HIDE_LABEL: &str = "Hide 振り仮名";
const ANNOTATION_TAGS: [&str; 2] = ["rp", "rt"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn css(self) -> &'static str {
        match self {
            Visibility::Visible => "visibility:visible",
            Visibility::Hidden => "visibility:hidden",
        }
    }

    /// Label for the toggle button while annotations are in this state.
    pub fn button_label(self) -> &'static str {
        match self {
            Visibility::Visible => HIDE_LABEL,
            Visibility::Hidden => SHOW_LABEL,
        }
    }
}

/// Per-page toggle state. Annotations start hidden.
#[derive(Debug)]
pub struct FuriganaToggle {
    visibility: Visibility,
}

impl Default for FuriganaToggle {
    fn default() -> Self {
        Self { visibility: Visibility::Hidden }
    }
}

impl FuriganaToggle {
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Flips the state and applies it to the annotations and the button.
    pub fn toggle<'a, S, L>(
        &mut self,
        annotations: impl IntoIterator<Item = &'a mut S>,
        button: &mut L,
    ) -> Result<Visibility>
    where
        S: StyleSink + 'a,
        L: LabelSink + ?Sized,
    {
        self.visibility = match self.visibility {
            Visibility::Visible => Visibility::Hidden,
            Visibility::Hidden => Visibility::Visible,
        };
        for node in annotations {
            node.set_style(self.visibility.css())?;
        }
        button.set_label(self.visibility.button_label())?;
        Ok(self.visibility)
    }
}

// --- DOM binding -------------------------------------------------------------

#[derive(Default)]
struct FuriganaPage {
    toggle: FuriganaToggle,
    // annotations per marker class, located on first use
    annotations: HashMap<String, Vec<ElementSink>>,
}

thread_local! {
    static FURIGANA: RefCell<FuriganaPage> = RefCell::new(FuriganaPage::default());
}

pub fn toggle_on_page(marker_class: &str) -> Result<Visibility> {
    let page = PageElements::current()?;
    let mut button = page.by_name(TOGGLE_BUTTON_NAME)?;
    FURIGANA.with(|cell| {
        let mut state = cell.borrow_mut();
        let FuriganaPage { toggle, annotations } = &mut *state;
        let nodes = annotations
            .entry(marker_class.to_string())
            .or_insert_with(|| page.by_tags_with_class(&ANNOTATION_TAGS, marker_class));
        let vis = toggle.toggle(nodes.iter_mut(), &mut button)?;
        log::debug!("furigana '{}' now {:?} ({} nodes)", marker_class, vis, nodes.len());
        Ok(vis)
    })
}
