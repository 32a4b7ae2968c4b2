//! One open world and the order its passes run in each frame.

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};

use crate::core::config::{Settings, WorldConfig};
use crate::core::input::{EditButton, InputState};
use crate::core::types::Vec3;
use crate::core::Result;
use crate::math::{Aabb, Ray};
use crate::persist::{self, LoadOutcome};
use crate::physics::PhysicsAutomaton;
use crate::render::RenderContext;
use crate::terrain::{TerrainGenerator, TerrainParams};
use crate::voxel::{
    raycast, BlockEditor, Brush, BrushShape, EditMode, OccupancyHierarchy, RayHit, VoxelStore,
    WorldDims,
};

/// Initial window size until the driver reports one
const DEFAULT_EXTENT: (u32, u32) = (800, 600);

/// A pass that ran during a frame, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    /// Block edit over the given box
    Edit(Aabb),
    /// Physics tick over the given window
    Physics(Aabb),
    /// Occupancy rebuilt over the given box
    OccupancyRebuild(Aabb),
    /// Read-only queries against the settled state
    Query,
}

/// What a frame did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub passes: Vec<Pass>,
    /// Voxel under the crosshair after all writes
    pub target: Option<RayHit>,
}

/// An open world: the store, its derived indices and the passes that
/// mutate them.
pub struct Session {
    name: String,
    path: PathBuf,
    store: VoxelStore,
    occupancy: OccupancyHierarchy,
    editor: BlockEditor,
    physics: PhysicsAutomaton,
    physics_enabled: bool,
    brush_shape: BrushShape,
    settings: Settings,
    render: RenderContext,
    frame: u64,
}

impl Session {
    /// Load the named world from `worlds_dir`, or generate it if there is
    /// no such file or `new_world` is set.
    pub fn open(
        worlds_dir: &Path,
        name: &str,
        new_world: bool,
        world: &WorldConfig,
        settings: Settings,
    ) -> Result<Self> {
        let dims = WorldDims::from_config(world)?;
        let path = persist::world_path(worlds_dir, name);

        let store = if !new_world && path.is_file() {
            let (store, outcome) = persist::load(&path, dims)?;
            if let LoadOutcome::Truncated { read, expected } = outcome {
                warn!("World '{}' loaded partially ({} of {} bytes)", name, read, expected);
            }
            store
        } else {
            info!("Generating world '{}' ({}³ voxels)", name, dims.axis());
            let mut store = VoxelStore::new(dims);
            TerrainGenerator::new(TerrainParams::for_axis(dims.axis())).generate(&mut store);
            store
        };
        Ok(Self::with_store(name, path, store, settings))
    }

    /// Wrap an existing store. Runs the full occupancy rebuild.
    pub fn with_store(name: &str, path: PathBuf, store: VoxelStore, settings: Settings) -> Self {
        let start = Instant::now();
        let occupancy = OccupancyHierarchy::from_store(&store);
        info!(
            "Occupancy built in {:.2?}: {} of {} chunks occupied",
            start.elapsed(),
            occupancy.occupied_count(),
            store.dims().chunk_count()
        );

        let (width, height) = DEFAULT_EXTENT;
        Self {
            name: name.to_string(),
            path,
            occupancy,
            editor: BlockEditor::new(),
            physics: PhysicsAutomaton::new(settings.sim_extent),
            physics_enabled: true,
            brush_shape: BrushShape::Cube,
            render: RenderContext::new(width, height, &settings),
            settings,
            store,
            frame: 0,
        }
    }

    /// Run one frame's passes in order: edit, physics ticks, then queries.
    ///
    /// Every writer is followed by an occupancy rebuild over the box it
    /// touched before anything reads again.
    pub fn frame(&mut self, input: &InputState, observer: Vec3, look: &Ray) -> FrameReport {
        let start = Instant::now();
        let mut report = FrameReport::default();

        if input.physics_toggled() {
            self.physics_enabled = !self.physics_enabled;
            info!("Physics {}", if self.physics_enabled { "enabled" } else { "disabled" });
        }

        if let Some(region) = self.edit_pass(input, look) {
            report.passes.push(Pass::Edit(region));
            report.passes.push(Pass::OccupancyRebuild(region));
        }

        if self.physics_enabled {
            for tick in 0..self.settings.ticks_per_frame {
                let seed = tick_seed(self.frame, tick);
                let window = self
                    .physics
                    .tick(&mut self.store, &mut self.occupancy, observer, seed);
                if window.is_empty() {
                    break;
                }
                report.passes.push(Pass::Physics(window.bounds()));
                report.passes.push(Pass::OccupancyRebuild(window.bounds()));
            }
        }

        report.target = raycast(&self.store, &self.occupancy, look, self.settings.render_distance);
        report.passes.push(Pass::Query);

        self.frame += 1;
        debug!("Frame {} took {:.2?}", self.frame, start.elapsed());
        report
    }

    /// Fire an edit if a button went down this frame
    fn edit_pass(&mut self, input: &InputState, look: &Ray) -> Option<Aabb> {
        let (mode, place) = if input.is_just_pressed(EditButton::Place) {
            (EditMode::Add(input.selected_block()), true)
        } else if input.is_just_pressed(EditButton::Break) {
            (EditMode::Remove, false)
        } else {
            return None;
        };

        let hit = raycast(&self.store, &self.occupancy, look, self.settings.render_distance)?;
        let target = if place { hit.previous } else { hit.voxel };
        let brush = Brush::new(self.brush_shape, input.brush_size(), target);
        self.editor
            .apply(&mut self.store, &mut self.occupancy, &brush, mode)
    }

    /// Replace the settings, updating everything derived from them
    pub fn apply_settings(&mut self, settings: Settings) {
        self.physics.set_extent(settings.sim_extent);
        self.render.on_settings_changed(&settings);
        self.settings = settings;
    }

    /// Window resized
    pub fn resize(&mut self, width: u32, height: u32) {
        self.render.on_resize(width, height);
    }

    pub fn set_brush_shape(&mut self, shape: BrushShape) {
        self.brush_shape = shape;
    }

    /// Write the world to its file
    pub fn save(&self) -> Result<()> {
        persist::save(&self.path, &self.store)
    }

    /// Save and close. A failed save is logged; returns whether it succeeded.
    pub fn close(self) -> bool {
        match self.save() {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save world '{}' to {}: {}", self.name, self.path.display(), e);
                false
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &VoxelStore {
        &self.store
    }

    pub fn occupancy(&self) -> &OccupancyHierarchy {
        &self.occupancy
    }

    pub fn render(&self) -> &RenderContext {
        &self.render
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn physics_enabled(&self) -> bool {
        self.physics_enabled
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }
}

/// Seed for one physics tick, varied per frame and tick
fn tick_seed(frame: u64, tick: u32) -> u32 {
    let mixed = frame.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (tick as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    (mixed >> 32) as u32
}
