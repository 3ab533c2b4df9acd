//! Browser mount for the caterpillar table.
//!
//! `mount` builds the canvas and DOM overlays, wires pointer listeners and
//! starts the render loop; the running session lives in the `TABLE`
//! thread-local so timer, pointer and frame callbacks can all reach it.
//! `unmount` reverses every step: timers cancelled, frame loop cancelled,
//! listeners removed, elements detached.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, MouseEvent, window};

use crate::config::GameConfig;
use crate::game::Game;
use crate::sound::WebAudioSound;
use crate::timers::TimerHandle;

mod render;
mod sprite;
mod timers;

use timers::BrowserTimers;

const CANVAS_ID: &str = "cb-table-canvas";
const OVERLAY_IDS: [&str; 3] = ["cb-status", "cb-gauge", "cb-hint"];

type PointerListener = Closure<dyn FnMut(MouseEvent)>;

struct Table {
    game: Game<BrowserTimers, WebAudioSound>,
    canvas: HtmlCanvasElement,
    owns_canvas: bool,
    ctx: CanvasRenderingContext2d,
    doc: Document,
    // Pointer is over the caterpillar; enlarges it and shows a hand cursor.
    hover: bool,
    listeners: Vec<(&'static str, PointerListener)>,
}

thread_local! {
    static TABLE: RefCell<Option<Table>> = const { RefCell::new(None) };
    static FRAME_LOOP: RefCell<Option<FrameLoop>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct FrameLoop {
    callback: FrameCallback,
    request_id: Rc<Cell<i32>>,
}

pub(crate) fn dispatch_timer(handle: TimerHandle) {
    TABLE.with(|cell| {
        if let Some(table) = cell.borrow_mut().as_mut() {
            table.game.on_timer(handle);
        }
    });
}

pub fn mount(mut config: GameConfig, seed: u64) -> Result<(), JsValue> {
    unmount();

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    // A canvas supplied by the host page keeps its size and stays on unmount.
    let (canvas, owns_canvas): (HtmlCanvasElement, bool) = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        let c: HtmlCanvasElement = el.dyn_into()?;
        config.surface_px = (c.width() as f64, c.height() as f64);
        (c, false)
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        c.set_width(config.surface_px.0 as u32);
        c.set_height(config.surface_px.1 as u32);
        c.set_attribute("style", "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); box-shadow:0 0 32px 0 rgba(0,0,0,0.18); border-radius:18px; z-index:10;").ok();
        body.append_child(&c)?;
        (c, true)
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    ctx.set_text_align("center");

    build_overlays(&doc, &body)?;

    let game = Game::new(config, BrowserTimers::new(), WebAudioSound::new(), seed);
    let mut table = Table {
        game,
        canvas: canvas.clone(),
        owns_canvas,
        ctx,
        doc,
        hover: false,
        listeners: Vec::new(),
    };

    // Click: squash when it lands on the caterpillar.
    {
        let canvas_click = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let (x, y) = to_percent(&canvas_click, &evt);
            TABLE.with(|cell| {
                if let Some(t) = cell.borrow_mut().as_mut() {
                    t.game.click_at(x, y);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        table.listeners.push(("click", closure));
    }
    // Hover tracking over the caterpillar.
    {
        let canvas_move = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let (x, y) = to_percent(&canvas_move, &evt);
            TABLE.with(|cell| {
                if let Some(t) = cell.borrow_mut().as_mut() {
                    t.hover = t.game.is_over_caterpillar(x, y);
                    let cursor = if t.hover { "pointer" } else { "default" };
                    t.canvas.style().set_property("cursor", cursor).ok();
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        table.listeners.push(("mousemove", closure));
    }
    // Mouse leave clears hover
    {
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            TABLE.with(|cell| {
                if let Some(t) = cell.borrow_mut().as_mut() {
                    t.hover = false;
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())?;
        table.listeners.push(("mouseleave", closure));
    }

    TABLE.with(|cell| cell.replace(Some(table)));
    start_frame_loop();
    log::info!("caterpillar table mounted");
    Ok(())
}

/// Tear the session down. Safe to call when nothing is mounted.
pub fn unmount() {
    if let Some(lp) = FRAME_LOOP.with(|cell| cell.borrow_mut().take()) {
        if let Some(w) = window() {
            w.cancel_animation_frame(lp.request_id.get()).ok();
        }
        // Break the self-referencing cycle so the closure is freed.
        lp.callback.borrow_mut().take();
    }
    let Some(mut table) = TABLE.with(|cell| cell.borrow_mut().take()) else {
        return;
    };
    table.game.shutdown();
    for (kind, listener) in table.listeners.drain(..) {
        table
            .canvas
            .remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())
            .ok();
    }
    if table.owns_canvas {
        table.canvas.remove();
    } else {
        let (w, h) = (table.canvas.width() as f64, table.canvas.height() as f64);
        table.ctx.clear_rect(0.0, 0.0, w, h);
        table.canvas.style().remove_property("cursor").ok();
    }
    for id in OVERLAY_IDS {
        if let Some(el) = table.doc.get_element_by_id(id) {
            el.remove();
        }
    }
    log::info!("caterpillar table unmounted");
}

#[cfg(feature = "serde_json")]
pub fn snapshot() -> Option<crate::session::SessionState> {
    TABLE.with(|cell| cell.borrow().as_ref().map(|t| t.game.state().clone()))
}

fn to_percent(canvas: &HtmlCanvasElement, evt: &MouseEvent) -> (f64, f64) {
    // offset_x/offset_y are canvas-local; client size accounts for CSS scaling.
    let w = canvas.client_width().max(1) as f64;
    let h = canvas.client_height().max(1) as f64;
    (evt.offset_x() as f64 / w * 100.0, evt.offset_y() as f64 / h * 100.0)
}

fn overlay(doc: &Document, id: &str, style: &str, html: &str) -> Result<Element, JsValue> {
    let div = match doc.get_element_by_id(id) {
        Some(el) => el,
        None => doc.create_element("div")?,
    };
    div.set_id(id);
    div.set_attribute("style", style)?;
    div.set_inner_html(html);
    Ok(div)
}

fn build_overlays(doc: &Document, body: &web_sys::HtmlElement) -> Result<(), JsValue> {
    let status = overlay(
        doc,
        "cb-status",
        "position:fixed; top:16px; left:16px; background:#fff; padding:12px 16px; border-radius:16px; border:4px solid #d8b4fe; box-shadow:0 10px 25px rgba(0,0,0,0.15); z-index:30; font-family:sans-serif;",
        "<div style='font-size:12px;color:#4b5563;font-weight:bold;'>💚 つぶした回数</div>\
         <div id='cb-count' style='font-size:30px;color:#9333ea;font-weight:bold;'>0</div>\
         <div id='cb-status-label' style='font-size:12px;color:#db2777;font-weight:bold;border-top:1px solid #fbcfe8;padding-top:4px;'></div>",
    )?;
    let gauge = overlay(
        doc,
        "cb-gauge",
        "position:fixed; top:16px; left:50%; transform:translateX(-50%); width:160px; background:#fff; padding:8px 12px; border-radius:16px; border:4px solid #f9a8d4; box-shadow:0 10px 25px rgba(0,0,0,0.15); z-index:30; font-family:sans-serif;",
        "<div style='font-size:12px;color:#4b5563;font-weight:bold;text-align:center;margin-bottom:4px;'>💖 満足度</div>\
         <div style='width:100%;height:16px;background:#e5e7eb;border-radius:9999px;overflow:hidden;'><div id='cb-gauge-fill' style='height:100%;width:0%;'></div></div>",
    )?;
    let hint = overlay(
        doc,
        "cb-hint",
        "position:fixed; bottom:16px; left:50%; transform:translateX(-50%); background:rgba(255,255,255,0.9); padding:8px 16px; border-radius:9999px; font-size:12px; color:#4b5563; z-index:30; font-family:sans-serif;",
        "🐛 何度でも戻ってくる青虫くん",
    )?;
    for el in [status, gauge, hint] {
        body.append_child(&el)?;
    }
    Ok(())
}

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    let request_id = Rc::new(Cell::new(0));
    let next_id = request_id.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let mounted = TABLE.with(|cell| {
            let guard = cell.borrow();
            let Some(t) = guard.as_ref() else { return false };
            draw(t, ts);
            true
        });
        if !mounted {
            return;
        }
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            if let Ok(id) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                next_id.set(id);
            }
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => request_id.set(id),
            Err(e) => log::warn!("no animation frame: {:?}", e),
        }
    }
    FRAME_LOOP.with(|cell| cell.replace(Some(FrameLoop { callback: g, request_id })));
}

fn draw(t: &Table, now: f64) {
    let level = t.game.relationship_level();
    let frame = render::Frame {
        ctx: &t.ctx,
        width: t.canvas.width() as f64,
        height: t.canvas.height() as f64,
        now,
    };
    render::render(&frame, t.game.state(), level, t.hover);
    render::update_overlays(&t.doc, t.game.state(), level);
}
