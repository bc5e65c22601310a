//! Placement scale and preview offset bookkeeping.
//!
//! The offset decides which way a multi-voxel placement grows from the anchor cell. It follows
//! the camera: every frame a *cached* offset is derived from the view direction, and whenever
//! the preview is generated that cached offset is *locked* in. A scale adjustment made after
//! the player turned away only refreshes the preview; scale changes apply to a preview whose
//! offset is current.

use cgmath::Vector3;

/// Largest extent a placement may have along any axis.
pub const MAX_SCALE: u32 = 5;

/// Placement axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Width
    X,
    /// Height
    Y,
    /// Depth
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Whether the preview was generated with the current facing offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOffset {
    /// The preview matches the facing offset.
    Locked,
    /// The player turned since the preview was generated.
    Stale,
}

impl PreviewOffset {
    /// Compares the offset the preview was built with against the current facing offset.
    pub fn between(locked: Vector3<i32>, cached: Vector3<i32>) -> Self {
        if locked == cached {
            PreviewOffset::Locked
        } else {
            PreviewOffset::Stale
        }
    }
}

/// What a scale adjustment asks of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleChange {
    /// Nothing changed.
    Ignored,
    /// The preview must be regenerated.
    Regenerate,
}

/// Scale, offsets and edit mode of the placement tool.
#[derive(Debug, Clone)]
pub struct PlacementState {
    scale: Vector3<u32>,
    cached_offset: Vector3<i32>,
    preview_offset: Vector3<i32>,
    edit_mode: bool,
}

impl Default for PlacementState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementState {
    /// Unit scale facing positive x and z, edit mode off.
    pub fn new() -> Self {
        PlacementState {
            scale: Vector3::new(1, 1, 1),
            cached_offset: Vector3::new(1, 1, 1),
            preview_offset: Vector3::new(1, 1, 1),
            edit_mode: false,
        }
    }

    /// Placement extent in cells along each axis.
    pub fn scale(&self) -> Vector3<u32> {
        self.scale
    }

    /// Offset derived from the latest view direction.
    pub fn cached_offset(&self) -> Vector3<i32> {
        self.cached_offset
    }

    /// Offset the preview was last generated with; placements use it.
    pub fn preview_offset(&self) -> Vector3<i32> {
        self.preview_offset
    }

    /// Whether scale adjustments and the preview are enabled.
    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Flips edit mode and returns the new value.
    pub fn toggle_edit_mode(&mut self) -> bool {
        self.edit_mode = !self.edit_mode;
        self.edit_mode
    }

    /// Refreshes the cached offset from a view direction.
    ///
    /// x and z follow the sign of the direction (zero counts as positive), y is always up.
    pub fn face(&mut self, forward: Vector3<f32>) {
        self.cached_offset = Vector3::new(
            if forward.x >= 0.0 { 1 } else { -1 },
            1,
            if forward.z >= 0.0 { 1 } else { -1 },
        );
    }

    /// Locks the cached offset in for a freshly generated preview.
    pub fn lock(&mut self) {
        self.preview_offset = self.cached_offset;
    }

    /// Whether the preview matches the facing offset.
    pub fn preview_state(&self) -> PreviewOffset {
        PreviewOffset::between(self.preview_offset, self.cached_offset)
    }

    /// Grows or shrinks one axis of the placement.
    ///
    /// Ignored outside edit mode. A stale preview is only regenerated. Otherwise the axis is
    /// changed by `delta` as long as it is below [`MAX_SCALE`], never leaving `1..=MAX_SCALE`.
    pub fn adjust(&mut self, axis: Axis, delta: i32) -> ScaleChange {
        if !self.edit_mode {
            return ScaleChange::Ignored;
        }
        match self.preview_state() {
            PreviewOffset::Stale => ScaleChange::Regenerate,
            PreviewOffset::Locked => {
                let current = self.scale[axis.index()];
                if current >= MAX_SCALE {
                    return ScaleChange::Ignored;
                }
                let next = (current as i32 + delta).clamp(1, MAX_SCALE as i32);
                self.scale[axis.index()] = next as u32;
                ScaleChange::Regenerate
            }
        }
    }

    /// Sets every axis at once, clamped to `1..=MAX_SCALE`.
    pub fn set_scale(&mut self, scale: Vector3<u32>) {
        self.scale = Vector3::new(
            scale.x.clamp(1, MAX_SCALE),
            scale.y.clamp(1, MAX_SCALE),
            scale.z.clamp(1, MAX_SCALE),
        );
    }

    /// Restores unit scale.
    pub fn reset_scale(&mut self) {
        self.scale = Vector3::new(1, 1, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustments_need_edit_mode() {
        let mut placement = PlacementState::new();
        assert_eq!(placement.adjust(Axis::X, 1), ScaleChange::Ignored);
        assert_eq!(placement.scale(), Vector3::new(1, 1, 1));
    }

    #[test]
    fn scale_saturates_at_max() {
        let mut placement = PlacementState::new();
        placement.toggle_edit_mode();
        for _ in 0..10 {
            placement.adjust(Axis::X, 1);
        }
        assert_eq!(placement.scale().x, MAX_SCALE);
        assert_eq!(placement.adjust(Axis::X, 1), ScaleChange::Ignored);

        placement.reset_scale();
        placement.adjust(Axis::Y, 7);
        assert_eq!(placement.scale().y, MAX_SCALE);
    }

    #[test]
    fn turning_makes_the_preview_stale() {
        let mut placement = PlacementState::new();
        placement.toggle_edit_mode();
        placement.face(Vector3::new(-1.0, 0.0, 0.5));
        assert_eq!(placement.cached_offset(), Vector3::new(-1, 1, 1));
        assert_eq!(placement.preview_state(), PreviewOffset::Stale);

        // A stale adjustment regenerates without scaling
        assert_eq!(placement.adjust(Axis::Z, 1), ScaleChange::Regenerate);
        assert_eq!(placement.scale().z, 1);

        placement.lock();
        assert_eq!(placement.preview_state(), PreviewOffset::Locked);
        placement.adjust(Axis::Z, 1);
        assert_eq!(placement.scale().z, 2);
    }

    #[test]
    fn facing_zero_counts_as_positive() {
        let mut placement = PlacementState::new();
        placement.face(Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(placement.cached_offset(), Vector3::new(1, 1, 1));
    }
}
