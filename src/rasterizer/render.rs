//! Pixel output and per-row projection tables

use serde::{Deserialize, Serialize};

use super::fixed::{Real, Scalar};
use super::types::Rgb555;

/// Anything the scene can be written into, one pixel at a time
pub trait PixelSink {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn put_pixel(&mut self, x: usize, y: usize, color: Rgb555);

    /// Ask the surface to magnify its top-left region by `factor`.
    /// Surfaces without hardware scaling can ignore this.
    fn set_magnification(&mut self, _factor: u8) {}
}

/// Framebuffer for software rendering, row-major RGB555
pub struct Framebuffer {
    pub pixels: Vec<Rgb555>,
    pub width: usize,
    pub height: usize,
    /// Integer scale the presenter applies to the top-left region
    pub magnification: u8,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![Rgb555::BLACK; width * height],
            width,
            height,
            magnification: 1,
        }
    }

    pub fn clear(&mut self, color: Rgb555) {
        self.pixels.fill(color);
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb555) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Rgb555 {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Rgb555::BLACK
        }
    }

    /// Size of the region that ends up on screen after magnification
    pub fn visible_size(&self) -> (usize, usize) {
        let m = self.magnification.max(1) as usize;
        (self.width / m, self.height / m)
    }

    /// Expand to RGBA8, flipping nothing; row 0 is the top of the screen
    pub fn to_rgba8(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.pixels.len() * 4);
        for p in &self.pixels {
            out.extend_from_slice(&p.to_rgba8());
        }
    }
}

impl PixelSink for Framebuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn put_pixel(&mut self, x: usize, y: usize, color: Rgb555) {
        self.set_pixel(x, y, color);
    }

    fn set_magnification(&mut self, factor: u8) {
        self.magnification = factor.max(1);
    }
}

/// Virtual screen placed in front of the camera, in cell units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Horizontal extent of the screen plane
    pub plane_width: f32,
    /// Vertical extent of the screen plane
    pub plane_height: f32,
    /// Distance from the eye to the screen plane
    pub plane_distance: f32,
    /// Screen-plane height of the top row; eye height is where this reaches zero
    pub horizon: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            plane_width: 1.0,
            plane_height: 1.0,
            plane_distance: 0.5,
            horizon: 0.3,
        }
    }
}

/// One projection slope per screen row, built once
#[derive(Debug, Clone)]
pub struct SlopeTable {
    slopes: Vec<Real>,
}

impl SlopeTable {
    pub fn new(view: &ViewConfig, rows: usize) -> Self {
        let h = Real::from_f32(view.plane_height);
        let d = Real::from_f32(view.plane_distance);
        let dy = -(h / Real::from_int(rows as i32));

        let mut y = Real::from_f32(view.horizon);
        let mut slopes = Vec::with_capacity(rows);
        for _ in 0..rows {
            slopes.push(y / d);
            y += dy;
        }

        Self { slopes }
    }

    #[inline]
    pub fn get(&self, row: usize) -> Real {
        self.slopes[row]
    }

    pub fn len(&self) -> usize {
        self.slopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slopes.is_empty()
    }
}

/// What a single screen row shows in a given column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowSample {
    Floor,
    Ceiling,
    /// Wall face at vertical texture coordinate `v`
    Wall { v: Real },
}

impl RowSample {
    /// `h = 0.5 + depth * slope` is the struck height on the wall face,
    /// 0 at the floor and 1 at the ceiling.
    #[inline]
    pub fn classify(depth: Real, slope: Real, half: Real) -> RowSample {
        let h = half + depth * slope;
        if h < Real::ZERO {
            RowSample::Floor
        } else if h >= Real::ONE {
            RowSample::Ceiling
        } else {
            RowSample::Wall { v: h }
        }
    }
}
