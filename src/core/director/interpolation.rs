//=========================================================================
// Interpolation Transition
//=========================================================================
//
// Time-based transition that interpolates world-node properties of the
// outgoing and incoming scenes.
//
// Timing:
//   remaining ← duration                          (start)
//   remaining ← remaining - delta                 (update)
//   theta     = 1 - remaining / duration          (clamped to [0, 1])
//   eased     = easing(theta)
//   local     = clamp((eased - delay) / window, 0, 1)   per range
//   value     = from + (to - from) * local
//
// Range delay and window are fractions of the total duration; a window
// running past the end is clamped to `1 - delay`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::fmt;

use log::warn;

//=== Internal Dependencies ===============================================

use super::easing::Easing;
use super::transition::{Transition, TransitionError};
use crate::core::scene::SceneHandle;
use crate::core::stage::WorldNode;

//=== PropertyRange =======================================================

/// A set of property animations sharing one timing window.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRange {
    delay: f64,
    duration: f64,
    properties: BTreeMap<String, (f64, f64)>,
}

impl PropertyRange {
    /// A range spanning the whole transition with no properties yet.
    pub fn new() -> Self {
        Self {
            delay: 0.0,
            duration: 1.0,
            properties: BTreeMap::new(),
        }
    }

    /// Start of the window, as a fraction of the total duration.
    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    /// Length of the window, as a fraction of the total duration.
    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Animates the property at dotted `path` from `from` to `to`.
    pub fn property(mut self, path: impl Into<String>, from: f64, to: f64) -> Self {
        self.properties.insert(path.into(), (from, to));
        self
    }

    pub fn properties(&self) -> &BTreeMap<String, (f64, f64)> {
        &self.properties
    }

    /// Effective `(delay, window)` after clamping the window to the end.
    ///
    /// Non-finite fractions count as 0.
    pub fn window(&self) -> (f64, f64) {
        let delay = finite_or_zero(self.delay).clamp(0.0, 1.0);
        let window = finite_or_zero(self.duration).clamp(0.0, 1.0 - delay);
        (delay, window)
    }

    /// Local progress of this range for eased transition progress `eased`.
    pub fn progress(&self, eased: f64) -> f64 {
        let (delay, window) = self.window();
        if window <= 0.0 {
            return if eased >= delay { 1.0 } else { 0.0 };
        }
        ((eased - delay) / window).clamp(0.0, 1.0)
    }

    /// Value of `path` at eased progress `eased`.
    pub fn value_at(&self, path: &str, eased: f64) -> Option<f64> {
        let (from, to) = *self.properties.get(path)?;
        Some(from + (to - from) * self.progress(eased))
    }

    fn validate(&self) -> Result<(), TransitionError> {
        let in_unit = |value: f64| value.is_finite() && (0.0..=1.0).contains(&value);
        if !in_unit(self.delay) || !in_unit(self.duration) {
            return Err(TransitionError::InvalidWindow {
                delay: self.delay,
                duration: self.duration,
            });
        }
        for (path, (from, to)) in &self.properties {
            if path.is_empty() || path.split('.').any(str::is_empty) {
                return Err(TransitionError::EmptyPath);
            }
            if !from.is_finite() || !to.is_finite() {
                return Err(TransitionError::InvalidRange { path: path.clone() });
            }
        }
        Ok(())
    }

    fn apply(&self, node: &mut WorldNode, eased: f64) {
        let local = self.progress(eased);
        for (path, (from, to)) in &self.properties {
            if !node.set(path, from + (to - from) * local) {
                warn!("Transition could not write '{}' on {}", path, node.id());
            }
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl Default for PropertyRange {
    fn default() -> Self {
        Self::new()
    }
}

//=== InterpolationTransition =============================================

/// Transition driving one range on the current scene and/or one on the
/// next scene over a fixed duration.
#[derive(Clone)]
pub struct InterpolationTransition {
    duration: f64,
    easing: Easing,
    current_range: Option<PropertyRange>,
    next_range: Option<PropertyRange>,
    swap_scenes: bool,
    remaining: f64,
    scenes: Option<(SceneHandle, SceneHandle)>,
}

impl InterpolationTransition {
    /// Creates a transition lasting `duration` milliseconds.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            easing: Easing::Linear,
            current_range: None,
            next_range: None,
            swap_scenes: false,
            remaining: duration,
            scenes: None,
        }
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Range applied to the outgoing scene's world node.
    pub fn current(mut self, range: PropertyRange) -> Self {
        self.current_range = Some(range);
        self
    }

    /// Range applied to the incoming scene's world node.
    pub fn next(mut self, range: PropertyRange) -> Self {
        self.next_range = Some(range);
        self
    }

    /// Renders the incoming scene beneath the outgoing one.
    pub fn swap_scenes(mut self, swap: bool) -> Self {
        self.swap_scenes = swap;
        self
    }

    //--- Presets ----------------------------------------------------------

    /// Fades the current scene out during the first half, then the next
    /// scene in during the second half.
    pub fn fade(duration: f64) -> Self {
        Self::new(duration)
            .current(PropertyRange::new().duration(0.5).property("alpha", 1.0, 0.0))
            .next(
                PropertyRange::new()
                    .delay(0.5)
                    .duration(0.5)
                    .property("alpha", 0.0, 1.0),
            )
    }

    /// Fades the current scene out over the incoming one.
    pub fn cross_fade(duration: f64) -> Self {
        Self::new(duration)
            .current(PropertyRange::new().property("alpha", 1.0, 0.0))
            .swap_scenes(true)
    }

    /// Pushes the current scene out by `distance` while the next scene
    /// slides in from the opposite side.
    pub fn slide(duration: f64, distance: f64) -> Self {
        Self::new(duration)
            .easing(Easing::QuadInOut)
            .current(PropertyRange::new().property("position.x", 0.0, -distance))
            .next(PropertyRange::new().property("position.x", distance, 0.0))
    }

    //--- Progress ---------------------------------------------------------

    pub fn total_duration(&self) -> f64 {
        self.duration
    }

    pub fn remaining(&self) -> f64 {
        self.remaining.max(0.0)
    }

    /// Normalized, un-eased progress in `[0, 1]`.
    pub fn theta(&self) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining / self.duration).clamp(0.0, 1.0)
    }

    fn apply(&self) {
        let Some((current, next)) = &self.scenes else {
            return;
        };
        let eased = self.easing.apply(self.theta());
        if let Some(range) = &self.current_range {
            range.apply(current.borrow_mut().world_mut(), eased);
        }
        if let Some(range) = &self.next_range {
            range.apply(next.borrow_mut().world_mut(), eased);
        }
    }
}

impl Transition for InterpolationTransition {
    fn validate(&self) -> Result<(), TransitionError> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(TransitionError::InvalidDuration(self.duration));
        }
        for range in self.current_range.iter().chain(self.next_range.iter()) {
            range.validate()?;
        }
        Ok(())
    }

    fn swap_scenes(&self) -> bool {
        self.swap_scenes
    }

    fn setup(&mut self, current: SceneHandle, next: SceneHandle) {
        self.scenes = Some((current, next));
    }

    fn start(&mut self) {
        self.remaining = self.duration;
        self.apply();
    }

    fn update(&mut self, delta: f64) {
        self.remaining -= delta;
        self.apply();
    }

    fn stop(&mut self) {
        self.remaining = 0.0;
        self.apply();
    }

    fn has_finished(&self) -> bool {
        self.remaining <= 0.0
    }
}

impl fmt::Debug for InterpolationTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpolationTransition")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("current_range", &self.current_range)
            .field("next_range", &self.next_range)
            .field("swap_scenes", &self.swap_scenes)
            .field("remaining", &self.remaining)
            .field("attached", &self.scenes.is_some())
            .finish()
    }
}

//=== Tests ===============================================================
