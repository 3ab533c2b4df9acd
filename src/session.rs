//! Session state: everything the renderer draws, nothing more.
//!
//! Only `Game` mutates this; the presentation layer reads a shared borrow
//! each frame.

/// Which sprite sequence the character is playing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AnimationState {
    #[default]
    Idle,
    Attack,
}

/// Frames in the attack sequence; the driver returns to idle on the tick
/// that would produce this index.
pub const ATTACK_FRAMES: u8 = 3;
pub const IDLE_FRAMES: u8 = 2;

/// The interactive target, positioned in percent of the play surface.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Caterpillar {
    pub x: f64,
    pub y: f64,
}

/// Body segment radii in pixels, head first.
pub const SEGMENT_RADII_PX: [f64; 4] = [16.0, 14.0, 12.0, 10.0];
pub const SEGMENT_GAP_PX: f64 = 2.0;
pub const OUTLINE_PX: f64 = 2.0;
/// Peak upward bounce of the idle caterpillar.
pub const BOUNCE_PX: f64 = 8.0;
pub const HOVER_SCALE: f64 = 1.25;

/// Segment centres as `(dx, r)` from the caterpillar's anchor at `scale`.
/// The body is centred horizontally on the anchor.
pub fn segment_layout(scale: f64) -> [(f64, f64); 4] {
    let span: f64 =
        SEGMENT_RADII_PX.iter().map(|r| 2.0 * r).sum::<f64>() + SEGMENT_GAP_PX * (SEGMENT_RADII_PX.len() - 1) as f64;
    let mut out = [(0.0, 0.0); 4];
    let mut left = -span / 2.0 * scale;
    for (slot, r) in out.iter_mut().zip(SEGMENT_RADII_PX) {
        *slot = (left + r * scale, r * scale);
        left += (2.0 * r + SEGMENT_GAP_PX) * scale;
    }
    out
}

impl Caterpillar {
    /// Whether a pointer at `(x, y)` percent lands on the drawn body, on a
    /// surface of `surface_px` pixels.
    pub fn covers(&self, x_pct: f64, y_pct: f64, surface_px: (f64, f64)) -> bool {
        let dx = (x_pct - self.x) / 100.0 * surface_px.0;
        let dy = (y_pct - self.y) / 100.0 * surface_px.1;
        body_covers(dx, dy)
    }
}

// Hovered size and the full bounce range: a pointer over the body always sees
// it enlarged, and the bounce moves it under the pointer.
fn body_covers(dx_px: f64, dy_px: f64) -> bool {
    let layout = segment_layout(HOVER_SCALE);
    let (first, last) = (layout[0], layout[layout.len() - 1]);
    let left = first.0 - first.1 - OUTLINE_PX;
    let right = last.0 + last.1 + OUTLINE_PX;
    let half_h = first.1 + OUTLINE_PX;
    (left..=right).contains(&dx_px) && (-half_h - BOUNCE_PX..=half_h).contains(&dy_px)
}

/// Transient glyph shown where a caterpillar was squashed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FloatingText {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub text: &'static str,
}

pub const FLOATING_HEART: &str = "💚";

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SessionState {
    pub total_squashes: u32,
    pub satisfaction: u32,
    pub animation: AnimationState,
    pub sprite_frame: u8,
    pub slow_motion: bool,
    pub caterpillar: Option<Caterpillar>,
    pub is_squashing: bool,
    pub dialogue: String,
    pub show_dialogue: bool,
    pub floating_text: Vec<FloatingText>,
    #[cfg_attr(feature = "serde", serde(skip))]
    next_floating_id: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `floor(total_squashes / squashes_per_level)`; callers clamp per use.
    pub fn relationship_level(&self, squashes_per_level: u32) -> u32 {
        self.total_squashes / squashes_per_level.max(1)
    }

    pub fn say(&mut self, line: &str) {
        self.dialogue.clear();
        self.dialogue.push_str(line);
        self.show_dialogue = true;
    }

    /// Append a floating text and return its id. Ids never repeat within a
    /// session.
    pub fn push_floating_text(&mut self, x: f64, y: f64, text: &'static str) -> u64 {
        let id = self.next_floating_id;
        self.next_floating_id += 1;
        self.floating_text.push(FloatingText { id, x, y, text });
        id
    }

    /// Remove by id; returns whether an entry was removed.
    pub fn remove_floating_text(&mut self, id: u64) -> bool {
        let before = self.floating_text.len();
        self.floating_text.retain(|t| t.id != id);
        self.floating_text.len() != before
    }

    pub fn add_satisfaction(&mut self, step: u32, max: u32) {
        self.satisfaction = self.satisfaction.saturating_add(step).min(max);
    }

    pub fn decay_satisfaction(&mut self) {
        self.satisfaction = self.satisfaction.saturating_sub(1);
    }

    /// Advance the sprite one tick. Attack falls back to idle (frame 0, slow
    /// motion off) on the tick that would reach `ATTACK_FRAMES`.
    pub fn advance_sprite(&mut self) {
        match self.animation {
            AnimationState::Idle => {
                self.sprite_frame = (self.sprite_frame + 1) % IDLE_FRAMES;
            }
            AnimationState::Attack => {
                let next = self.sprite_frame + 1;
                if next >= ATTACK_FRAMES {
                    self.animation = AnimationState::Idle;
                    self.slow_motion = false;
                    self.sprite_frame = 0;
                } else {
                    self.sprite_frame = next;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_is_empty() {
        let s = SessionState::new();
        assert_eq!(s.total_squashes, 0);
        assert_eq!(s.satisfaction, 0);
        assert_eq!(s.animation, AnimationState::Idle);
        assert!(s.caterpillar.is_none());
        assert!(!s.is_squashing && !s.show_dialogue && !s.slow_motion);
        assert!(s.floating_text.is_empty());
    }

    #[test]
    fn test_relationship_level_floors() {
        let mut s = SessionState::new();
        for (n, lvl) in [(0, 0), (4, 0), (5, 1), (9, 1), (10, 2), (27, 5)] {
            s.total_squashes = n;
            assert_eq!(s.relationship_level(5), lvl, "n={n}");
        }
    }

    #[test]
    fn test_gauge_bounds() {
        let mut s = SessionState::new();
        s.decay_satisfaction();
        assert_eq!(s.satisfaction, 0);
        for _ in 0..7 {
            s.add_satisfaction(20, 100);
        }
        assert_eq!(s.satisfaction, 100);
        s.decay_satisfaction();
        assert_eq!(s.satisfaction, 99);
    }

    #[test]
    fn test_floating_text_ids_unique_and_removed_once() {
        let mut s = SessionState::new();
        let a = s.push_floating_text(30.0, 60.0, FLOATING_HEART);
        let b = s.push_floating_text(30.0, 60.0, FLOATING_HEART);
        assert_ne!(a, b);
        assert!(s.remove_floating_text(a));
        assert!(!s.remove_floating_text(a));
        assert_eq!(s.floating_text.len(), 1);
        assert_eq!(s.floating_text[0].id, b);
    }

    #[test]
    fn test_idle_cycles_two_frames() {
        let mut s = SessionState::new();
        s.advance_sprite();
        assert_eq!(s.sprite_frame, 1);
        s.advance_sprite();
        assert_eq!(s.sprite_frame, 0);
    }

    #[test]
    fn test_attack_returns_to_idle_on_third_tick() {
        let mut s = SessionState::new();
        s.animation = AnimationState::Attack;
        s.slow_motion = true;
        s.advance_sprite();
        s.advance_sprite();
        assert_eq!((s.animation, s.sprite_frame), (AnimationState::Attack, 2));
        s.advance_sprite();
        assert_eq!(s.animation, AnimationState::Idle);
        assert_eq!(s.sprite_frame, 0);
        assert!(!s.slow_motion);
    }

    #[test]
    fn test_segment_layout_is_centred() {
        let layout = segment_layout(1.0);
        let (head, tail) = (layout[0], layout[3]);
        assert_eq!(head, (-39.0, 16.0));
        assert_eq!(tail, (45.0, 10.0));
        assert_eq!(head.0 - head.1, -(tail.0 + tail.1));
    }

    #[test]
    fn test_body_covers_head_to_tail() {
        assert!(body_covers(0.0, 0.0));
        for scale in [1.0, HOVER_SCALE] {
            let layout = segment_layout(scale);
            assert!(body_covers(layout[0].0, 0.0));
            assert!(body_covers(layout[3].0, 0.0));
        }
        assert!(body_covers(64.0, 0.0));
        assert!(body_covers(-64.0, 0.0));
        // top of a bounce
        assert!(body_covers(0.0, -28.0));
        assert!(!body_covers(80.0, 0.0));
        assert!(!body_covers(0.0, 40.0));
        assert!(!body_covers(0.0, -40.0));
    }

    #[test]
    fn test_covers_converts_percent_per_axis() {
        let c = Caterpillar { x: 50.0, y: 70.0 };
        let surface = (720.0, 540.0);
        // 64px right is 8.9% of the width
        assert!(c.covers(50.0 + 64.0 / 720.0 * 100.0, 70.0, surface));
        // 8% of the height is 43px, below the body
        assert!(!c.covers(50.0, 78.0, surface));
        assert!(!c.covers(60.0, 70.0, surface));
    }
}
