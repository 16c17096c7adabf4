//! Element lookup and the web-sys adapter behind every sink trait.
//!
//! Lookups happen once, when a behaviour binds to the page; afterwards the
//! behaviours hold `ElementSink`s directly.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlFormElement, window};

use crate::countdown::{DisplaySink, FieldSink, FormSubmitter, RemainingSource};
use crate::error::{PageError, Result};

// --- Style / label sinks (peripheral behaviours) -----------------------------

/// An element whose inline `style` is rewritten wholesale.
pub trait StyleSink {
    fn set_style(&mut self, css: &str) -> Result<()>;
}

/// A button whose visible label lives in its `value` attribute.
pub trait LabelSink {
    fn set_label(&mut self, label: &str) -> Result<()>;
}

// --- Lookup ------------------------------------------------------------------

pub struct PageElements {
    doc: Document,
}

impl PageElements {
    pub fn current() -> Result<Self> {
        let win = window().ok_or(PageError::NoWindow)?;
        let doc = win.document().ok_or(PageError::NoDocument)?;
        Ok(Self { doc })
    }

    /// First element carrying `name`.
    pub fn by_name(&self, name: &str) -> Result<ElementSink> {
        self.all_by_name(name)
            .into_iter()
            .next()
            .ok_or_else(|| PageError::missing_name(name))
    }

    pub fn all_by_name(&self, name: &str) -> Vec<ElementSink> {
        let list = self.doc.get_elements_by_name(name);
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| ElementSink::new(el, name))
            .collect()
    }

    pub fn by_id(&self, id: &str) -> Result<ElementSink> {
        self.doc
            .get_element_by_id(id)
            .map(|el| ElementSink::new(el, id))
            .ok_or_else(|| PageError::missing_id(id))
    }

    /// Elements of any of `tags` whose `class` attribute is exactly `class`.
    pub fn by_tags_with_class(&self, tags: &[&str], class: &str) -> Vec<ElementSink> {
        let mut found = Vec::new();
        for tag in tags {
            let coll = self.doc.get_elements_by_tag_name(tag);
            for i in 0..coll.length() {
                if let Some(el) = coll.item(i) {
                    if el.get_attribute("class").as_deref() == Some(class) {
                        found.push(ElementSink::new(el, class));
                    }
                }
            }
        }
        found
    }

    pub fn form(&self, name: &str) -> Result<FormSink> {
        let form = self
            .doc
            .forms()
            .named_item(name)
            .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
            .ok_or_else(|| PageError::missing_name(name))?;
        Ok(FormSink(form))
    }
}

// --- Adapters ----------------------------------------------------------------

/// A captured page element plus the key it was found under.
#[derive(Clone, Debug)]
pub struct ElementSink {
    el: Element,
    key: String,
}

impl ElementSink {
    pub fn new(el: Element, key: &str) -> Self {
        Self { el, key: key.to_string() }
    }

    pub fn element(&self) -> &Element {
        &self.el
    }

    fn set_attr(&self, attr: &str, value: &str) -> Result<()> {
        self.el.set_attribute(attr, value).map_err(PageError::dom)
    }
}

impl FieldSink for ElementSink {
    fn set_value(&mut self, value: i64) -> Result<()> {
        self.set_attr("value", &value.to_string())
    }
}

impl RemainingSource for ElementSink {
    fn key(&self) -> &str {
        &self.key
    }

    fn raw_value(&self) -> Option<String> {
        self.el.get_attribute("value")
    }
}

impl DisplaySink for ElementSink {
    // textContent replaces every child with a single text node
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.el.set_text_content(Some(text));
        Ok(())
    }
}

impl StyleSink for ElementSink {
    fn set_style(&mut self, css: &str) -> Result<()> {
        self.set_attr("style", css)
    }
}

impl LabelSink for ElementSink {
    fn set_label(&mut self, label: &str) -> Result<()> {
        self.set_attr("value", label)
    }
}

pub struct FormSink(HtmlFormElement);

impl FormSubmitter for FormSink {
    fn submit(&mut self) -> Result<()> {
        self.0.submit().map_err(PageError::dom)
    }
}
