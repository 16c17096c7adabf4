// Browser tests (wasm-pack test --headless --firefox).
// They build the quiz markup in the test document and drive the page bindings.
#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use tsukuyomi_page::countdown::dom::start_with_form;
use tsukuyomi_page::countdown::{Countdown, ERROR_DISPLAY, FieldSink, FormSubmitter};
use tsukuyomi_page::error::Result;
use tsukuyomi_page::page::PageElements;
use tsukuyomi_page::{ExpiryPolicy, TickOutcome, TimerConfig};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Element, window};

wasm_bindgen_test_configure!(run_in_browser);

fn add_html(html: &str) -> Element {
    let doc = window().unwrap().document().unwrap();
    let div = doc.create_element("div").unwrap();
    div.set_inner_html(html);
    doc.body().unwrap().append_child(&div).unwrap();
    div
}

async fn sleep_ms(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn source_value(name: &str) -> Option<String> {
    PageElements::current().unwrap().by_name(name).unwrap().element().get_attribute("value")
}

struct CountingForm(Rc<Cell<u32>>);

impl FormSubmitter for CountingForm {
    fn submit(&mut self) -> Result<()> {
        self.0.set(self.0.get() + 1);
        Ok(())
    }
}

#[wasm_bindgen_test]
fn countdown_updates_page_elements() {
    let root = add_html(
        r#"<span name="rts_t1" value="3"></span>
           <input type="hidden" name="secs_left_t1" value="3"/>
           <input type="hidden" name="secs_left_t1" value="3"/>
           <div id="time_left_t1"><b>stale</b> text</div>"#,
    );
    let page = PageElements::current().unwrap();
    let submits = Rc::new(Cell::new(0));
    let fields: Vec<Box<dyn FieldSink>> = page
        .all_by_name("secs_left_t1")
        .into_iter()
        .map(|f| Box::new(f) as Box<dyn FieldSink>)
        .collect();
    assert_eq!(fields.len(), 2);
    let mut countdown = Countdown::new(
        Box::new(page.by_name("rts_t1").unwrap()),
        fields,
        Box::new(page.by_id("time_left_t1").unwrap()),
        Box::new(CountingForm(submits.clone())),
        ExpiryPolicy::Halt,
    );

    assert_eq!(countdown.tick().unwrap(), TickOutcome::Continued(2));
    let display = page.by_id("time_left_t1").unwrap();
    assert_eq!(display.element().text_content().as_deref(), Some("0時0分2秒"));
    assert_eq!(display.element().child_nodes().length(), 1);
    for field in page.all_by_name("secs_left_t1") {
        assert_eq!(field.element().get_attribute("value").as_deref(), Some("2"));
    }

    countdown.tick().unwrap();
    assert_eq!(countdown.tick().unwrap(), TickOutcome::Expired);
    assert_eq!(submits.get(), 1);
    assert_eq!(
        page.by_name("rts_t1").unwrap().element().get_attribute("value").as_deref(),
        Some("0")
    );
    root.remove();
}

#[wasm_bindgen_test]
fn untimed_page_gets_inert_handle() {
    let root = add_html(
        r#"<span name="rts" value="0"></span>
           <div id="time_left"></div>
           <form name="timeout" action="javascript:void(0)"></form>"#,
    );
    let handle = tsukuyomi_page::start_page_timer().unwrap();
    assert!(!handle.is_active());
    root.remove();
}

#[wasm_bindgen_test]
fn missing_display_fails_fast() {
    let root = add_html(r#"<span name="rts_t3" value="30"></span>"#);
    let err = tsukuyomi_page::start_timer_with_config(
        r#"{"sourceName": "rts_t3", "displayId": "nowhere_t3"}"#,
    );
    assert!(err.is_err());
    root.remove();
}

#[wasm_bindgen_test]
fn started_timer_can_be_cancelled() {
    let root = add_html(
        r#"<span name="rts_t4" value="100"></span>
           <div id="time_left_t4"></div>
           <form name="timeout_t4" action="javascript:void(0)"></form>"#,
    );
    let handle = tsukuyomi_page::start_timer_with_config(
        r#"{"sourceName": "rts_t4", "displayId": "time_left_t4", "formName": "timeout_t4", "initialSeconds": 90}"#,
    )
    .unwrap();
    assert!(handle.is_active());
    let display = PageElements::current().unwrap().by_id("time_left_t4").unwrap();
    assert_eq!(display.element().text_content().as_deref(), Some("0時1分30秒"));
    tsukuyomi_page::stop_timer(&handle);
    assert!(!handle.is_active());
    handle.cancel();
    root.remove();
}

#[wasm_bindgen_test]
fn furigana_toggle_touches_matching_class_only() {
    let root = add_html(
        r#"<ruby>漢<rp class="furi_t5">(</rp><rt class="furi_t5">かん</rt><rt class="other">x</rt></ruby>
           <input type="button" name="振り仮名を見せて" value="振り仮名を見せて"/>"#,
    );
    tsukuyomi_page::toggle_visibility("furi_t5").unwrap();
    let page = PageElements::current().unwrap();
    let matching = page.by_tags_with_class(&["rp", "rt"], "furi_t5");
    assert_eq!(matching.len(), 2);
    for node in &matching {
        assert_eq!(node.element().get_attribute("style").as_deref(), Some("visibility:visible"));
    }
    let other = page.by_tags_with_class(&["rt"], "other");
    assert_eq!(other[0].element().get_attribute("style"), None);
    let button = page.by_name("振り仮名を見せて").unwrap();
    assert_eq!(button.element().get_attribute("value").as_deref(), Some("Hide 振り仮名"));

    tsukuyomi_page::toggle_visibility("furi_t5").unwrap();
    assert_eq!(button.element().get_attribute("value").as_deref(), Some("振り仮名を見せて"));
    root.remove();
}

#[wasm_bindgen_test]
fn stroke_order_images_wait_for_enable() {
    let root = add_html(
        r#"<input type="button" name="show_kanji" value="漢字の書き方を見せて"/>
           <img name="漢字diagram猫" style="display: none"/>"#,
    );
    let page = PageElements::current().unwrap();
    let img = page.by_name("漢字diagram猫").unwrap();

    tsukuyomi_page::show_kanji_image("猫").unwrap();
    assert_eq!(img.element().get_attribute("style").as_deref(), Some("display: none"));

    tsukuyomi_page::enable_kanji_view().unwrap();
    let button = page.by_name("show_kanji").unwrap();
    assert_eq!(button.element().get_attribute("style").as_deref(), Some("display: none;"));

    tsukuyomi_page::show_kanji_image("猫").unwrap();
    assert_eq!(
        img.element().get_attribute("style").as_deref(),
        Some(tsukuyomi_page::stroke_order::SHOWN_STYLE)
    );
    tsukuyomi_page::hide_kanji_image("猫").unwrap();
    assert_eq!(img.element().get_attribute("style").as_deref(), Some("display: none;"));
    assert!(tsukuyomi_page::show_kanji_image("犬").is_err());
    root.remove();
}

#[wasm_bindgen_test]
fn malformed_source_marks_display_at_start() {
    let root = add_html(
        r#"<span name="rts_t7" value="abc"></span>
           <div id="time_left_t7">0時5分0秒</div>
           <form name="timeout_t7" action="javascript:void(0)"></form>"#,
    );
    let result = tsukuyomi_page::start_timer_with_config(
        r#"{"sourceName": "rts_t7", "displayId": "time_left_t7", "formName": "timeout_t7"}"#,
    );
    assert!(result.is_err());
    let display = PageElements::current().unwrap().by_id("time_left_t7").unwrap();
    assert_eq!(display.element().text_content().as_deref(), Some(ERROR_DISPLAY));
    root.remove();
}

#[wasm_bindgen_test]
async fn halting_timer_stops_itself_after_expiry() {
    let root = add_html(
        r#"<span name="rts_t8" value="50"></span>
           <input type="hidden" name="secs_left_t8" value="50"/>
           <div id="time_left_t8"></div>"#,
    );
    let config = TimerConfig::from_json(
        r#"{"sourceName": "rts_t8", "fieldName": "secs_left_t8", "displayId": "time_left_t8",
            "initialSeconds": 2, "tickIntervalMs": 10}"#,
    )
    .unwrap();
    let submits = Rc::new(Cell::new(0));
    let handle = start_with_form(config, Box::new(CountingForm(submits.clone()))).unwrap();
    assert!(handle.is_active());

    sleep_ms(100).await;
    assert_eq!(source_value("rts_t8").as_deref(), Some("0"));
    assert_eq!(source_value("secs_left_t8").as_deref(), Some("0"));
    assert_eq!(submits.get(), 1);
    assert!(!handle.is_active());

    // no further ticks once stopped
    sleep_ms(50).await;
    assert_eq!(source_value("rts_t8").as_deref(), Some("0"));
    assert_eq!(submits.get(), 1);
    root.remove();
}

#[wasm_bindgen_test]
async fn keep_ticking_timer_runs_past_zero() {
    let root = add_html(
        r#"<span name="rts_t9" value="2"></span>
           <div id="time_left_t9"></div>"#,
    );
    let config = TimerConfig::from_json(
        r#"{"sourceName": "rts_t9", "displayId": "time_left_t9",
            "tickIntervalMs": 10, "expiry": "keepTicking"}"#,
    )
    .unwrap();
    let submits = Rc::new(Cell::new(0));
    let handle = start_with_form(config, Box::new(CountingForm(submits.clone()))).unwrap();

    sleep_ms(100).await;
    let value: i64 = source_value("rts_t9").unwrap().parse().unwrap();
    assert!(value < 0, "expected a negative count, got {}", value);
    assert!(handle.is_active());
    assert_eq!(submits.get(), 1);

    handle.cancel();
    let stopped_at = source_value("rts_t9");
    sleep_ms(50).await;
    assert_eq!(source_value("rts_t9"), stopped_at);
    root.remove();
}
