//! Presentation: draws a session snapshot. Holds no state of its own.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Document};

use super::sprite::{SpritePose, sprite_pose};
use crate::dialogue::status_label;
use crate::session::{BOUNCE_PX, Caterpillar, HOVER_SCALE, OUTLINE_PX, SessionState, segment_layout};

const SPRITE_W: f64 = 112.0;
const SPRITE_H: f64 = 144.0;
const HEART_LEVEL: u32 = 2; // 💕 shows from "親しい仲" on

pub struct Frame<'a> {
    pub ctx: &'a CanvasRenderingContext2d,
    pub width: f64,
    pub height: f64,
    pub now: f64,
}

pub fn render(frame: &Frame, state: &SessionState, level: u32, hover: bool) {
    draw_backdrop(frame, state.slow_motion);
    if let Some(c) = state.caterpillar {
        if state.is_squashing {
            draw_squashed(frame, c);
        } else {
            draw_caterpillar(frame, c, hover, level >= HEART_LEVEL);
        }
    }
    for t in &state.floating_text {
        // ping: grow and fade on a short loop
        let phase = (frame.now / 1000.0).fract();
        let ctx = frame.ctx;
        ctx.set_global_alpha(1.0 - phase * 0.75);
        ctx.set_font(&format!("{}px sans-serif", 36.0 + phase * 18.0));
        ctx.fill_text(t.text, pct_x(frame, t.x), pct_y(frame, t.y)).ok();
        ctx.set_global_alpha(1.0);
    }
    let pose = sprite_pose(state.animation, state.sprite_frame);
    draw_sprite(frame, pose, frame.width - SPRITE_W - 16.0, 32.0);
    if state.show_dialogue {
        draw_bubble(frame, &state.dialogue);
    }
}

fn pct_x(frame: &Frame, x: f64) -> f64 {
    frame.width * x / 100.0
}

fn pct_y(frame: &Frame, y: f64) -> f64 {
    frame.height * y / 100.0
}

fn fill(ctx: &CanvasRenderingContext2d, color: &str) {
    ctx.set_fill_style(&JsValue::from_str(color));
}

fn circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64) {
    ctx.begin_path();
    ctx.arc(x, y, r, 0.0, TAU).ok();
    ctx.fill();
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.arc_to(x + w, y, x + w, y + h, r).ok();
    ctx.arc_to(x + w, y + h, x, y + h, r).ok();
    ctx.arc_to(x, y + h, x, y, r).ok();
    ctx.arc_to(x, y, x + w, y, r).ok();
    ctx.close_path();
}

fn draw_backdrop(frame: &Frame, slow_motion: bool) {
    let ctx = frame.ctx;
    let (w, h) = (frame.width, frame.height);

    let wall = ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
    wall.add_color_stop(0.0, "#faf5ff").ok();
    wall.add_color_stop(0.5, "#fdf2f8").ok();
    wall.add_color_stop(1.0, "#fffbeb").ok();
    ctx.set_fill_style(&wall);
    ctx.fill_rect(0.0, 0.0, w, h);

    // Table: lower half with a wood grain.
    let top = h / 2.0;
    let table = ctx.create_linear_gradient(0.0, top, 0.0, h);
    table.add_color_stop(0.0, "#fef3c7").ok();
    table.add_color_stop(0.5, "#fde68a").ok();
    table.add_color_stop(1.0, "#fcd34d").ok();
    ctx.set_fill_style(&table);
    ctx.fill_rect(0.0, top, w, h - top);
    fill(ctx, "rgba(139,69,19,0.03)");
    let mut gx = 35.0;
    while gx < w {
        ctx.fill_rect(gx, top, 2.0, h - top);
        gx += 37.0;
    }
    fill(ctx, "rgba(255,255,255,0.3)");
    ctx.fill_rect(0.0, top, w, 16.0);

    if slow_motion {
        let pulse = ((frame.now / 1000.0 * TAU).sin() * 0.5 + 0.5) * 0.18;
        fill(ctx, &format!("rgba(192,132,252,{pulse:.3})"));
        ctx.fill_rect(0.0, 0.0, w, h);
    }
}

fn draw_caterpillar(frame: &Frame, c: Caterpillar, hover: bool, heart: bool) {
    let ctx = frame.ctx;
    let scale = if hover { HOVER_SCALE } else { 1.0 };
    // bounce: 1s period
    let bounce = ((frame.now / 1000.0 * TAU).sin().abs()) * BOUNCE_PX;
    let cx = pct_x(frame, c.x);
    let cy = pct_y(frame, c.y) - bounce;

    fill(ctx, "rgba(0,0,0,0.2)");
    ctx.begin_path();
    ctx.ellipse(cx, pct_y(frame, c.y) + 18.0 * scale, 48.0 * scale, 4.0 * scale, 0.0, 0.0, TAU)
        .ok();
    ctx.fill();

    // Head on the left, segments shrinking to the right.
    let layout = segment_layout(scale);
    for (dx, r) in layout {
        let x = cx + dx;
        fill(ctx, "#15803d");
        circle(ctx, x, cy, r + OUTLINE_PX);
        let body = ctx.create_radial_gradient(x - r / 3.0, cy - r / 3.0, 1.0, x, cy, r);
        if let Ok(g) = body {
            g.add_color_stop(0.0, "#86efac").ok();
            g.add_color_stop(0.5, "#4ade80").ok();
            g.add_color_stop(1.0, "#16a34a").ok();
            ctx.set_fill_style(&g);
        } else {
            fill(ctx, "#4ade80");
        }
        circle(ctx, x, cy, r);
    }
    let head_x = cx + layout[0].0;
    fill(ctx, "#000");
    circle(ctx, head_x - 6.0 * scale, cy - 5.0 * scale, 4.0 * scale);
    fill(ctx, "#fff");
    circle(ctx, head_x - 7.0 * scale, cy - 6.5 * scale, 1.2 * scale);
    fill(ctx, "#f472b6");
    rounded_rect(ctx, head_x - 6.0 * scale, cy + 6.0 * scale, 12.0 * scale, 4.0 * scale, 2.0 * scale);
    ctx.fill();

    if heart {
        let pulse = (frame.now / 500.0 * TAU).sin() * 0.25 + 0.75;
        ctx.set_global_alpha(pulse);
        ctx.set_font("20px sans-serif");
        ctx.fill_text("💕", cx + layout[layout.len() - 1].0, cy - 28.0 * scale).ok();
        ctx.set_global_alpha(1.0);
    }
}

fn draw_squashed(frame: &Frame, c: Caterpillar) {
    let ctx = frame.ctx;
    let (cx, cy) = (pct_x(frame, c.x), pct_y(frame, c.y));
    ctx.set_global_alpha(0.7);
    fill(ctx, "#14532d");
    ctx.begin_path();
    ctx.ellipse(cx, cy, 40.0, 12.0, 0.0, 0.0, TAU).ok();
    ctx.fill();
    ctx.set_global_alpha(1.0);

    ctx.save();
    ctx.translate(cx - 24.0, cy - 16.0).ok();
    ctx.rotate((frame.now / 1000.0 * TAU) % TAU).ok();
    ctx.set_font("36px sans-serif");
    ctx.fill_text("💥", 0.0, 12.0).ok();
    ctx.restore();
    ctx.set_font("24px sans-serif");
    ctx.fill_text("💚", cx, cy - 8.0).ok();
}

fn draw_sprite(frame: &Frame, pose: &SpritePose, left: f64, top: f64) {
    let ctx = frame.ctx;
    let h = SPRITE_H * pose.scale_y;
    let y = top + pose.lift + (SPRITE_H - h);
    ctx.set_global_alpha(pose.alpha);

    let body = ctx.create_linear_gradient(0.0, y, 0.0, y + h);
    body.add_color_stop(0.0, "#c084fc").ok();
    body.add_color_stop(1.0, "#9333ea").ok();
    ctx.set_fill_style(&body);
    rounded_rect(ctx, left, y, SPRITE_W, h, 16.0);
    ctx.fill();

    let eye_y = y + pose.eye_top * pose.scale_y;
    for ex in [left + 30.0, left + SPRITE_W - 30.0] {
        fill(ctx, "#581c87");
        circle(ctx, ex, eye_y, pose.eye_r + 2.0);
        fill(ctx, "#fff");
        circle(ctx, ex, eye_y, pose.eye_r);
        fill(ctx, "#581c87");
        circle(ctx, ex + pose.eye_r / 3.0, eye_y - pose.eye_r / 3.0, pose.pupil_r);
    }

    fill(ctx, pose.mouth_color);
    let mouth_y = y + h - 48.0 * pose.scale_y;
    rounded_rect(ctx, left + (SPRITE_W - pose.mouth_w) / 2.0, mouth_y, pose.mouth_w, pose.mouth_h, pose.mouth_h / 2.0);
    ctx.fill();

    ctx.set_font(&format!("{}px sans-serif", pose.hand_px));
    ctx.fill_text(pose.hand, left + SPRITE_W / 2.0, y + pose.hand_y).ok();
    ctx.set_global_alpha(1.0);
}

fn draw_bubble(frame: &Frame, text: &str) {
    let ctx = frame.ctx;
    ctx.set_font("bold 16px 'Hiragino Sans', 'Noto Sans JP', sans-serif");
    let text_w = ctx.measure_text(text).map(|m| m.width()).unwrap_or(160.0);
    let (bw, bh) = (text_w + 48.0, 44.0);
    let bounce = ((frame.now / 1000.0 * TAU).sin().abs()) * 10.0;
    let x = frame.width / 2.0 - bw / 2.0;
    let y = frame.height / 3.0 - bh - bounce;

    fill(ctx, "#f9a8d4");
    rounded_rect(ctx, x - 4.0, y - 4.0, bw + 8.0, bh + 8.0, 18.0);
    ctx.fill();
    ctx.begin_path();
    ctx.move_to(frame.width / 2.0 - 8.0, y + bh + 4.0);
    ctx.line_to(frame.width / 2.0 + 8.0, y + bh + 4.0);
    ctx.line_to(frame.width / 2.0, y + bh + 12.0);
    ctx.close_path();
    ctx.fill();
    fill(ctx, "#fff");
    rounded_rect(ctx, x, y, bw, bh, 16.0);
    ctx.fill();
    fill(ctx, "#9333ea");
    ctx.fill_text(text, frame.width / 2.0, y + 28.0).ok();
}

/// Refresh the DOM overlays (counter, status label, gauge).
pub fn update_overlays(doc: &Document, state: &SessionState, level: u32) {
    if let Some(el) = doc.get_element_by_id("cb-count") {
        el.set_text_content(Some(&state.total_squashes.to_string()));
    }
    if let Some(el) = doc.get_element_by_id("cb-status-label") {
        el.set_text_content(Some(status_label(level)));
    }
    if let Some(el) = doc.get_element_by_id("cb-gauge-fill") {
        el.set_attribute("style", &gauge_style(state.satisfaction)).ok();
    }
}

fn gauge_style(satisfaction: u32) -> String {
    format!(
        "height:100%; width:{}%; background:linear-gradient(90deg,#f472b6,#c084fc,#ec4899); transition:width 0.5s;",
        satisfaction.min(100)
    )
}
