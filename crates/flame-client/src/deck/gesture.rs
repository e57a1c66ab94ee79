use std::time::{Duration, Instant};

use crate::config::DeckConfig;

/// A like or a pass on the current card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Like,
    Pass,
}

impl Decision {
    pub fn liked(self) -> bool {
        matches!(self, Decision::Like)
    }
}

/// Horizontal state of a drag at the moment it is released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRelease {
    pub offset_x: f32,
    pub velocity_x: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Decide(Decision),
    SnapBack,
}

impl DragRelease {
    pub fn swipe_power(&self) -> f32 {
        self.offset_x.abs() * self.velocity_x
    }

    pub fn classify(&self, threshold: f32) -> DragOutcome {
        let power = self.swipe_power();
        if power > threshold {
            DragOutcome::Decide(Decision::Like)
        } else if power < -threshold {
            DragOutcome::Decide(Decision::Pass)
        } else {
            DragOutcome::SnapBack
        }
    }
}

/// Card rotation in degrees for a given drag offset, clamped to the max tilt.
pub fn tilt_degrees(offset_x: f32, cfg: &DeckConfig) -> f32 {
    if cfg.tilt_range <= 0.0 {
        return 0.0;
    }
    let ratio = (offset_x / cfg.tilt_range).clamp(-1.0, 1.0);
    ratio * cfg.max_tilt_degrees
}

/// Keyboard input the deck understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckKey {
    Left,
    Right,
    Up,
    Down,
}

/// Drops wheel noise and rate-limits the rest.
#[derive(Debug, Clone)]
pub struct WheelGate {
    min_delta: f32,
    interval: Duration,
    last: Option<Instant>,
}

impl WheelGate {
    pub fn new(cfg: &DeckConfig) -> Self {
        Self {
            min_delta: cfg.wheel_min_delta,
            interval: cfg.wheel_throttle,
            last: None,
        }
    }

    /// Page step for this input, if accepted: `1` down, `-1` up.
    pub fn accept(&mut self, delta_y: f32, now: Instant) -> Option<i32> {
        if delta_y.abs() < self.min_delta {
            return None;
        }
        if self
            .last
            .is_some_and(|last| now.saturating_duration_since(last) < self.interval)
        {
            return None;
        }
        self.last = Some(now);
        Some(if delta_y > 0.0 { 1 } else { -1 })
    }
}
