//! Render-side state derived from the window size and settings.

use log::debug;

use super::ao::AoTable;
use crate::core::config::Settings;

/// Owns the tables the renderer derives from external events.
///
/// Resizes and settings changes go through [`on_resize`](Self::on_resize) and
/// [`on_settings_changed`](Self::on_settings_changed); nothing else rebinds
/// them.
#[derive(Clone, Debug)]
pub struct RenderContext {
    width: u32,
    height: u32,
    resolution_divisor: f32,
    render_distance: f32,
    ao: AoTable,
}

impl RenderContext {
    pub fn new(width: u32, height: u32, settings: &Settings) -> Self {
        Self {
            width,
            height,
            resolution_divisor: settings.resolution_divisor,
            render_distance: settings.render_distance,
            ao: AoTable::build(settings.ao_diameter, settings.ao_skip),
        }
    }

    /// Window resized
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        let (cw, ch) = self.coarse_extent();
        debug!("Resized to {}x{} (coarse pass {}x{})", width, height, cw, ch);
    }

    /// Settings edited. Returns true if the AO table was rebuilt.
    pub fn on_settings_changed(&mut self, settings: &Settings) -> bool {
        self.resolution_divisor = settings.resolution_divisor;
        self.render_distance = settings.render_distance;
        let rebuilt = self.ao.rebuild_if_changed(settings.ao_diameter, settings.ao_skip);
        if rebuilt {
            debug!("AO table rebuilt: {} samples", self.ao.count());
        }
        rebuilt
    }

    /// Full-resolution size
    pub fn extent(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size of the reduced-resolution pass, at least 1x1
    pub fn coarse_extent(&self) -> (u32, u32) {
        let divisor = self.resolution_divisor.max(1.0);
        let scale = |v: u32| ((v as f32 / divisor).ceil() as u32).max(1);
        (scale(self.width), scale(self.height))
    }

    pub fn render_distance(&self) -> f32 {
        self.render_distance
    }

    pub fn ao(&self) -> &AoTable {
        &self.ao
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coarse_extent() {
        let settings = Settings::default();
        let mut ctx = RenderContext::new(1920, 1080, &settings);
        assert_eq!(ctx.coarse_extent(), (480, 270));
        ctx.on_resize(1001, 3);
        assert_eq!(ctx.coarse_extent(), (251, 1));
        ctx.on_resize(0, 0);
        assert_eq!(ctx.coarse_extent(), (1, 1));
    }

    #[test]
    fn test_settings_change_rebuilds_ao_only_when_needed() {
        let mut settings = Settings::default();
        let mut ctx = RenderContext::new(800, 600, &settings);
        let before = ctx.ao().clone();

        settings.resolution_divisor = 2.0;
        assert!(!ctx.on_settings_changed(&settings));
        assert_eq!(ctx.coarse_extent(), (400, 300));
        assert_eq!(ctx.ao(), &before);

        settings.ao_diameter = 12;
        assert!(ctx.on_settings_changed(&settings));
        assert_eq!(ctx.ao().diameter(), 12);
    }
}
