//! Character sprite poses, one per (animation, frame). Offsets are in pixels
//! relative to the sprite's 112x144 body box.

use crate::session::{ATTACK_FRAMES, AnimationState, IDLE_FRAMES};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpritePose {
    /// Vertical offset of the whole body (+ = down).
    pub lift: f64,
    /// Body squash factor.
    pub scale_y: f64,
    /// Sclera radius.
    pub eye_r: f64,
    pub pupil_r: f64,
    /// Eye centre distance from body top.
    pub eye_top: f64,
    pub mouth_w: f64,
    pub mouth_h: f64,
    pub mouth_color: &'static str,
    pub hand: &'static str,
    pub hand_px: u32,
    /// Hand glyph baseline relative to body top.
    pub hand_y: f64,
    pub alpha: f64,
}

const PINK: &str = "#f472b6";

#[rustfmt::skip]
static IDLE: [SpritePose; IDLE_FRAMES as usize] = [
    SpritePose {
        lift: 0.0, scale_y: 1.0, eye_r: 10.0, pupil_r: 4.0, eye_top: 34.0,
        mouth_w: 40.0, mouth_h: 12.0, mouth_color: PINK,
        hand: "👆", hand_px: 30, hand_y: 12.0, alpha: 1.0,
    },
    SpritePose {
        lift: 4.0, scale_y: 1.0, eye_r: 10.0, pupil_r: 4.0, eye_top: 34.0,
        mouth_w: 40.0, mouth_h: 8.0, mouth_color: PINK,
        hand: "👆", hand_px: 30, hand_y: 12.0, alpha: 1.0,
    },
];

#[rustfmt::skip]
static ATTACK: [SpritePose; ATTACK_FRAMES as usize] = [
    // wind-up
    SpritePose {
        lift: -12.0, scale_y: 1.0, eye_r: 12.0, pupil_r: 5.0, eye_top: 32.0,
        mouth_w: 48.0, mouth_h: 16.0, mouth_color: PINK,
        hand: "👇", hand_px: 36, hand_y: 18.0, alpha: 1.0,
    },
    SpritePose {
        lift: 24.0, scale_y: 0.9, eye_r: 14.0, pupil_r: 6.0, eye_top: 26.0,
        mouth_w: 56.0, mouth_h: 20.0, mouth_color: "#facc15",
        hand: "👇", hand_px: 48, hand_y: 40.0, alpha: 1.0,
    },
    // full press
    SpritePose {
        lift: 40.0, scale_y: 0.75, eye_r: 16.0, pupil_r: 7.0, eye_top: 24.0,
        mouth_w: 72.0, mouth_h: 24.0, mouth_color: "#ef4444",
        hand: "👇", hand_px: 60, hand_y: 60.0, alpha: 0.9,
    },
];

/// Pose for a frame; out-of-range frames hold the last pose of the sequence.
pub fn sprite_pose(animation: AnimationState, frame: u8) -> &'static SpritePose {
    let frames: &'static [SpritePose] = match animation {
        AnimationState::Idle => &IDLE,
        AnimationState::Attack => &ATTACK,
    };
    &frames[(frame as usize).min(frames.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_reachable_frame_has_a_pose() {
        for f in 0..IDLE_FRAMES {
            assert_eq!(sprite_pose(AnimationState::Idle, f).hand, "👆");
        }
        for f in 0..ATTACK_FRAMES {
            assert_eq!(sprite_pose(AnimationState::Attack, f).hand, "👇");
        }
    }

    #[test]
    fn test_attack_presses_deeper_each_frame() {
        let lifts: Vec<f64> = (0..ATTACK_FRAMES).map(|f| sprite_pose(AnimationState::Attack, f).lift).collect();
        assert!(lifts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_out_of_range_frame_clamps() {
        assert_eq!(sprite_pose(AnimationState::Attack, 9), sprite_pose(AnimationState::Attack, 2));
        assert_eq!(sprite_pose(AnimationState::Idle, 200), sprite_pose(AnimationState::Idle, 1));
    }
}
