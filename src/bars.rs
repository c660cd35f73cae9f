//! Spectrum bars: one scaled unit cube per bar, laid out along +X.

use glam::{Mat4, Quat, Vec3};

use crate::params::BarLayout;
use crate::util::map_range;

/// Placement of a single bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub position: Vec3,
    pub scale: Vec3,
}

impl Bar {
    /// Model matrix (scale, then translate)
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, Quat::IDENTITY, self.position)
    }

    pub fn height(&self) -> f32 {
        self.scale.y
    }
}

/// Row of bars whose heights follow the audible spectrum block
#[derive(Debug, Clone)]
pub struct BarField {
    layout: BarLayout,
    bars: Vec<Bar>,
}

impl BarField {
    pub fn new(num_bars: usize, layout: BarLayout) -> Self {
        let width = layout.scaling * layout.width_multiplier;
        let rest_height = layout.min_height * layout.scaling;

        let bars = (0..num_bars)
            .map(|i| Bar {
                position: Vec3::new(layout.spacing_m * i as f32, 0.0, 0.0),
                scale: Vec3::new(width, rest_height, width),
            })
            .collect();

        Self { layout, bars }
    }

    /// Set bar heights from one block of 0-255 magnitudes
    pub fn update(&mut self, block: &[u8]) {
        for (bar, magnitude) in self.bars.iter_mut().zip(block) {
            let height = map_range(
                0.0,
                255.0,
                self.layout.min_height as f64,
                self.layout.max_height as f64,
                *magnitude as f64,
            );
            bar.scale.y = height as f32 * self.layout.scaling;
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.bars.iter().map(Bar::height)
    }

    pub fn model_matrices(&self) -> impl Iterator<Item = Mat4> + '_ {
        self.bars.iter().map(Bar::model_matrix)
    }

    /// Midpoint of the row on the ground plane
    pub fn center(&self) -> Vec3 {
        let span = self.layout.spacing_m * self.bars.len().saturating_sub(1) as f32;
        Vec3::new(span / 2.0, 0.0, 0.0)
    }
}
