//! Input state tracking for editing.
//!
//! The windowing layer feeds raw press/release/scroll events in; the session
//! reads edge-triggered edit requests and the continuous brush size out.

use std::collections::HashSet;

use crate::voxel::voxel::VoxelState;

/// Buttons that trigger a block edit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditButton {
    /// Place blocks (left click)
    Place,
    /// Break blocks (right click)
    Break,
}

/// Smallest brush size reachable by scrolling
pub const MIN_BRUSH_SIZE: f32 = 0.0;
/// Largest brush size reachable by scrolling
pub const MAX_BRUSH_SIZE: f32 = 64.0;

/// Tracks edit button and brush state between frames
pub struct InputState {
    /// Currently held buttons
    buttons_pressed: HashSet<EditButton>,
    /// Buttons that went down this frame
    buttons_just_pressed: HashSet<EditButton>,
    /// Continuous brush size, adjusted by scrolling
    brush_size: f32,
    /// Block placed by `Place`
    selected_block: VoxelState,
    /// Physics toggle requested this frame
    physics_toggled: bool,
}

impl InputState {
    /// Create new input state with a brush of the given size
    pub fn new(brush_size: f32) -> Self {
        Self {
            buttons_pressed: HashSet::new(),
            buttons_just_pressed: HashSet::new(),
            brush_size: brush_size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE),
            selected_block: VoxelState::Stone,
            physics_toggled: false,
        }
    }

    /// Record a button going down. Holding a button does not re-trigger.
    pub fn press(&mut self, button: EditButton) {
        if self.buttons_pressed.insert(button) {
            self.buttons_just_pressed.insert(button);
        }
    }

    /// Record a button going up
    pub fn release(&mut self, button: EditButton) {
        self.buttons_pressed.remove(&button);
    }

    /// Apply a scroll delta to the brush size
    pub fn scroll(&mut self, delta: f32) {
        self.brush_size = (self.brush_size + delta).clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    /// Select the block placed by subsequent edits. Number keys 1..=6 map
    /// onto the placeable states in order; other keys are ignored.
    pub fn select_number_key(&mut self, key: u8) {
        if let Some(state) = key
            .checked_sub(1)
            .and_then(|i| VoxelState::PLACEABLE.get(i as usize))
        {
            self.selected_block = *state;
        }
    }

    /// Request a physics on/off toggle
    pub fn toggle_physics(&mut self) {
        self.physics_toggled = true;
    }

    /// Call at end of frame to reset per-frame state
    pub fn end_frame(&mut self) {
        self.buttons_just_pressed.clear();
        self.physics_toggled = false;
    }

    /// Check if button is currently held
    pub fn is_pressed(&self, button: EditButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    /// Check if button went down this frame
    pub fn is_just_pressed(&self, button: EditButton) -> bool {
        self.buttons_just_pressed.contains(&button)
    }

    /// Current brush size in voxels (rounded down)
    pub fn brush_size(&self) -> u32 {
        self.brush_size as u32
    }

    /// Block placed by `Place`
    pub fn selected_block(&self) -> VoxelState {
        self.selected_block
    }

    /// Whether a physics toggle was requested this frame
    pub fn physics_toggled(&self) -> bool {
        self.physics_toggled
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(4.0)
    }
}
