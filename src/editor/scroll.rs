//! Downward-only scroll maintenance for the editing surface.

/// Scroll bar state for the block list viewport.
///
/// The view never scrolls upward on its own: after a structural change
/// it advances the scroll value only when the focus target would fall
/// below the visible viewport.
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    value: i64,
    maximum: i64,
    viewport_height: i64,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the visible viewport height, as reported by the host.
    pub fn set_viewport_height(&mut self, height: i64) {
        self.viewport_height = height.max(0);
    }

    /// Returns the current scroll value.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Returns the current scroll range maximum.
    pub fn maximum(&self) -> i64 {
        self.maximum
    }

    /// Host-driven scroll (e.g. the user dragging the bar).
    pub fn set_value(&mut self, value: i64) {
        self.value = value.clamp(0, self.maximum);
    }

    /// Ensures the target offset (cumulative height of preceding rows
    /// plus an offset within the focused row) is inside the viewport.
    ///
    /// Advances the value only when the target sits below the visible
    /// area; a target above the viewport leaves the value unchanged.
    pub fn ensure_visible(&mut self, target: i64) {
        if target > self.value + self.viewport_height {
            let value = target - self.viewport_height;
            if self.maximum < value {
                self.maximum = value;
            }
            self.value = value;
        }
    }
}
