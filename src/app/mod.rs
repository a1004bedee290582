//! Browser glue: canvas and control elements, keyboard and button events,
//! the 1-second interval timer and redraw scheduling. All game rules live
//! in [`crate::session`]; this module only forwards input events, repaints
//! and mirrors session state into the DOM.

use std::cell::RefCell;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlButtonElement, HtmlCanvasElement,
    HtmlElement, HtmlInputElement, window,
};

mod render;

use crate::grid::Direction;
use crate::session::{DEFAULT_MAZE_SIZE, GameSession, MoveOutcome, RunRecord};

/// Edge length of one maze cell on the canvas, in pixels.
const CELL_SIZE: u32 = 25;

const CANVAS_STYLE: &str = "position:fixed; left:50%; top:54%; transform:translate(-50%,-50%); box-shadow:0 0 24px 0 rgba(0,0,0,0.25); z-index:20;";
const CONTROLS_STYLE: &str = "position:fixed; top:12px; left:50%; transform:translateX(-50%); display:flex; gap:8px; align-items:center; font-family:'Fira Code', monospace; font-size:14px; z-index:30;";
const TIMER_STYLE: &str = "position:fixed; top:12px; left:12px; font-family:'Fira Code', monospace; font-size:15px; padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:30;";
const WARNING_STYLE: &str = "position:fixed; top:52px; left:12px; font-family:'Fira Code', monospace; font-size:13px; color:#ff6b6b; z-index:30;";
const BANNER_STYLE: &str = "position:fixed; left:50%; top:12%; transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:17px; padding:8px 14px; background:rgba(20,80,20,0.75); border:1px solid #2a2; border-radius:8px; color:#c8ffc8; z-index:35;";
const HISTORY_PANEL_STYLE: &str = "position:fixed; top:12px; right:12px; max-width:260px; font-family:'Fira Code', monospace; font-size:13px; padding:6px 10px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ddd; z-index:30;";
const HISTORY_HINT_STYLE: &str = "color:#888; font-size:12px;";

/// Everything the event handlers need, behind one thread-local cell.
struct App {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    session: GameSession,
    rng: SmallRng,
    /// Handle of the active `setInterval`, if the timer is running.
    timer_handle: Option<i32>,
}

thread_local! {
    static APP_STATE: RefCell<Option<App>> = RefCell::new(None);
}

fn clog(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

/// Build the DOM surface, wire up all listeners and draw the initial maze.
/// Invoked once from `start_game()`.
pub fn start_maze_mode() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // Create / reuse the maze canvas.
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("mz-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("mz-canvas");
        c.set_attribute("style", CANVAS_STYLE)?;
        body(&doc)?.append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let mut rng = SmallRng::from_entropy();
    let session = GameSession::new(&mut rng);

    build_controls(&doc)?;
    ensure_overlay(&doc, "mz-timer", &with_display(TIMER_STYLE, "block"))?
        .set_text_content(Some(&session.elapsed_string()));
    ensure_overlay(&doc, "mz-warning", WARNING_STYLE)?;
    ensure_overlay(&doc, "mz-banner", &with_display(BANNER_STYLE, "none"))?;
    build_history_panel(&doc)?;
    set_button_disabled(&doc, "mz-reset", true);

    // Keyboard listener for the arrow keys.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            handle_key(&evt.key());
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    wire_click(&doc, "mz-generate", handle_generate)?;
    wire_click(&doc, "mz-start", handle_start)?;
    wire_click(&doc, "mz-reset", handle_reset)?;

    let app = App {
        canvas,
        ctx,
        session,
        rng,
        timer_handle: None,
    };
    render::resize_canvas(&app.canvas, app.session.grid(), CELL_SIZE);
    render::render(
        &app.ctx,
        app.session.grid(),
        app.session.player(),
        CELL_SIZE as f64,
    );
    APP_STATE.with(|cell| cell.replace(Some(app)));

    clog(&format!(
        "maze-dash ready: {DEFAULT_MAZE_SIZE}x{DEFAULT_MAZE_SIZE} maze generated"
    ));
    Ok(())
}

// --- Event handlers ----------------------------------------------------------

fn handle_generate() {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let Some(value) = doc
        .get_element_by_id("mz-size")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
    else {
        return;
    };
    // Non-numeric input gets the same silent treatment as any other invalid
    // command; numbers, however far out, go through the range check so the
    // user sees the min/max message.
    let Ok(size) = value.trim().parse::<i64>() else {
        return;
    };
    let size = size.clamp(0, i64::from(u32::MAX)) as u32;

    APP_STATE.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            match app.session.regenerate(size, &mut app.rng) {
                Ok(()) => {
                    cancel_timer(app);
                    set_text(&doc, "mz-warning", "");
                    render::resize_canvas(&app.canvas, app.session.grid(), CELL_SIZE);
                    apply_reset_ui(&doc, app);
                    redraw(app);
                    clog(&format!("generated {size}x{size} maze"));
                }
                // Rejected: no session change, just the warning text.
                Err(err) => set_text(&doc, "mz-warning", &err.to_string()),
            }
        }
    });
}

fn handle_start() {
    APP_STATE.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            if !app.session.start() {
                return;
            }
            if let Some(win) = window() {
                // A fresh forgotten closure per run, like the listener
                // closures; the cleared handle keeps stale ticks away.
                let tick = Closure::wrap(Box::new(move || {
                    let display = APP_STATE
                        .with(|cell| cell.borrow_mut().as_mut().and_then(|a| a.session.tick()));
                    if let Some(display) = display {
                        if let Some(doc) = window().and_then(|w| w.document()) {
                            set_text(&doc, "mz-timer", &display);
                        }
                    }
                }) as Box<dyn FnMut()>);
                match win.set_interval_with_callback_and_timeout_and_arguments_0(
                    tick.as_ref().unchecked_ref(),
                    1000,
                ) {
                    Ok(handle) => {
                        app.timer_handle = Some(handle);
                        tick.forget();
                    }
                    Err(_) => clog("failed to register the timer interval"),
                }
            }
            if let Some(doc) = window().and_then(|w| w.document()) {
                set_button_disabled(&doc, "mz-start", true);
                set_button_disabled(&doc, "mz-reset", false);
            }
        }
    });
}

fn handle_reset() {
    APP_STATE.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            cancel_timer(app);
            app.session.reset();
            if let Some(doc) = window().and_then(|w| w.document()) {
                apply_reset_ui(&doc, app);
            }
            redraw(app);
        }
    });
}

fn handle_key(key: &str) {
    let Some(direction) = Direction::from_key(key) else {
        return;
    };
    APP_STATE.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            match app.session.try_move(direction) {
                MoveOutcome::Ignored => {}
                MoveOutcome::Moved => redraw(app),
                MoveOutcome::Completed => {
                    cancel_timer(app);
                    redraw(app);
                    if let Some(doc) = window().and_then(|w| w.document()) {
                        show_completion(&doc, app);
                    }
                }
            }
        }
    });
}

// --- DOM mirroring -----------------------------------------------------------

fn redraw(app: &App) {
    render::render(
        &app.ctx,
        app.session.grid(),
        app.session.player(),
        CELL_SIZE as f64,
    );
}

/// Timer back to zero and visible, banner hidden, start clickable. Shared
/// by the reset button and a successful generate.
fn apply_reset_ui(doc: &Document, app: &App) {
    set_text(doc, "mz-timer", &app.session.elapsed_string());
    set_display(doc, "mz-timer", TIMER_STYLE, "block");
    set_display(doc, "mz-banner", BANNER_STYLE, "none");
    set_button_disabled(doc, "mz-start", false);
    set_button_disabled(doc, "mz-reset", true);
}

fn show_completion(doc: &Document, app: &App) {
    let Some(record) = app.session.history().last() else {
        return;
    };
    set_text(
        doc,
        "mz-banner",
        &format!("You have completed the maze in {}", record.time),
    );
    set_display(doc, "mz-banner", BANNER_STYLE, "flex");
    set_display(doc, "mz-timer", TIMER_STYLE, "none");
    append_history_row(doc, record);
    clog(&format!(
        "maze completed: size {} in {}",
        record.size, record.time
    ));
}

fn append_history_row(doc: &Document, record: &RunRecord) {
    let Some(list) = doc.get_element_by_id("mz-history") else {
        return;
    };
    let Ok(item) = doc.create_element("li") else {
        return;
    };
    item.set_text_content(Some(&format!(
        "Maze size: {} - Time taken: {}",
        record.size, record.time
    )));
    list.append_child(&item).ok();
    set_display(doc, "mz-history-hint", HISTORY_HINT_STYLE, "none");
}

fn cancel_timer(app: &mut App) {
    if let Some(handle) = app.timer_handle.take() {
        if let Some(win) = window() {
            win.clear_interval_with_handle(handle);
        }
    }
}

// --- DOM construction helpers ------------------------------------------------

fn body(doc: &Document) -> Result<HtmlElement, JsValue> {
    doc.body().ok_or_else(|| JsValue::from_str("no body"))
}

fn with_display(base: &str, display: &str) -> String {
    format!("{base} display:{display};")
}

/// Create / reuse a floating `<div>` overlay appended to the body.
fn ensure_overlay(doc: &Document, id: &str, style: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element("div")?;
    el.set_id(id);
    el.set_attribute("style", style)?;
    body(doc)?.append_child(&el)?;
    Ok(el)
}

fn create_child(doc: &Document, parent: &Element, tag: &str, id: &str) -> Result<Element, JsValue> {
    let el = doc.create_element(tag)?;
    if !id.is_empty() {
        el.set_id(id);
    }
    parent.append_child(&el)?;
    Ok(el)
}

/// The control bar: size input plus the generate / start / reset buttons.
fn build_controls(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id("mz-controls").is_some() {
        return Ok(());
    }
    let bar = ensure_overlay(doc, "mz-controls", CONTROLS_STYLE)?;

    let input: HtmlInputElement = create_child(doc, &bar, "input", "mz-size")?.dyn_into()?;
    input.set_attribute("type", "number")?;
    input.set_attribute("min", "5")?;
    input.set_attribute("max", "30")?;
    input.set_value(&DEFAULT_MAZE_SIZE.to_string());

    for (id, label) in [
        ("mz-generate", "Generate"),
        ("mz-start", "Start"),
        ("mz-reset", "Reset"),
    ] {
        let button: HtmlButtonElement = create_child(doc, &bar, "button", id)?.dyn_into()?;
        button.set_text_content(Some(label));
    }
    Ok(())
}

fn build_history_panel(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id("mz-history").is_some() {
        return Ok(());
    }
    let panel = ensure_overlay(doc, "mz-history-panel", HISTORY_PANEL_STYLE)?;
    create_child(doc, &panel, "div", "")?.set_text_content(Some("Previous runs"));
    let hint = create_child(doc, &panel, "div", "mz-history-hint")?;
    hint.set_attribute("style", &with_display(HISTORY_HINT_STYLE, "block"))?;
    hint.set_text_content(Some("Complete a maze to record a time."));
    create_child(doc, &panel, "ul", "mz-history")?;
    Ok(())
}

fn wire_click(doc: &Document, id: &str, handler: fn()) -> Result<(), JsValue> {
    let Some(el) = doc.get_element_by_id(id) else {
        return Ok(());
    };
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        handler();
    }) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn set_text(doc: &Document, id: &str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn set_display(doc: &Document, id: &str, base: &str, display: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_attribute("style", &with_display(base, display)).ok();
    }
}

fn set_button_disabled(doc: &Document, id: &str, disabled: bool) {
    if let Some(button) = doc
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
    {
        button.set_disabled(disabled);
    }
}
