//! Column-by-column scene rendering
//!
//! One ray per screen column gives the perpendicular depth to the wall it
//! strikes. Each row then compares that depth against its projection slope
//! to decide between floor, ceiling and a texel of the wall face.

use crate::camera::CameraPose;
use crate::rasterizer::{
    PixelSink, Real, RenderSettings, Rgb555, RowSample, Scalar, SlopeTable, Texture, Vec2, ViewConfig,
    WallTextures,
};
use crate::world::{cast_ray, CellFlags, MazeGrid};

pub struct SceneRenderer {
    width: usize,
    height: usize,
    slopes: SlopeTable,
    /// Camera-space x of column 0
    column_start: Real,
    /// Camera-space x step between adjacent columns
    column_step: Real,
    plane_distance: Real,
    half: Real,
    floor: Rgb555,
    ceiling: Rgb555,
    low_resolution: bool,
    textures: WallTextures,
}

impl SceneRenderer {
    pub fn new(
        view: &ViewConfig,
        settings: &RenderSettings,
        width: usize,
        height: usize,
        textures: WallTextures,
    ) -> Self {
        let plane_width = Real::from_f32(view.plane_width);
        Self {
            width,
            height,
            slopes: SlopeTable::new(view, height),
            column_start: -(plane_width / Real::from_int(2)),
            column_step: plane_width / Real::from_int(width.max(1) as i32),
            plane_distance: Real::from_f32(view.plane_distance),
            half: Real::from_ratio(1, 2),
            floor: settings.floor_color.into(),
            ceiling: settings.ceiling_color.into(),
            low_resolution: settings.low_resolution,
            textures,
        }
    }

    /// Integer scale the sink should apply to what this renderer writes
    pub fn magnification(&self) -> u8 {
        if self.low_resolution { 2 } else { 1 }
    }

    /// Draw the view from `pose` into `sink`. Reads the grid and pose only.
    pub fn render<S: PixelSink + ?Sized>(&self, sink: &mut S, grid: &MazeGrid, pose: &CameraPose) {
        debug_assert!(
            sink.width() >= self.width && sink.height() >= self.height,
            "sink smaller than the renderer's screen"
        );
        sink.set_magnification(self.magnification());

        let stride = self.magnification() as usize;
        let columns = self.width.min(sink.width());
        let rows = self.height.min(sink.height());
        let visible_rows = rows / stride;

        for sample_x in (0..columns).step_by(stride) {
            let column = self.cast_column(grid, pose, sample_x);
            let out_x = sample_x / stride;

            for sample_y in (0..rows).step_by(stride) {
                let color = match RowSample::classify(column.depth, self.slopes.get(sample_y), self.half) {
                    RowSample::Floor => self.floor,
                    RowSample::Ceiling => self.ceiling,
                    RowSample::Wall { v } => column.texture.sample(column.u, v),
                };

                if stride == 1 {
                    sink.put_pixel(out_x, sample_y, color);
                } else {
                    let out_y = sample_y / stride;
                    sink.put_pixel(out_x, out_y, color);
                    if out_y + 1 < visible_rows {
                        sink.put_pixel(out_x, out_y + 1, color);
                    }
                }
            }
        }
    }

    fn cast_column(&self, grid: &MazeGrid, pose: &CameraPose, column: usize) -> Column<'_> {
        let x = self.column_start + self.column_step * Real::from_int(column as i32);
        let dir = Vec2::new(x, self.plane_distance).rotate(pose.yaw);
        let hit = cast_ray(grid, pose.position, dir);

        // Forward component in camera space is the perpendicular depth
        let depth = (hit.point - pose.position).rotate(-pose.yaw).y;

        let cell = grid.lookup(hit.point.x.int_part(), hit.point.y.int_part());
        let texture = if cell.contains(CellFlags::FEATURE) {
            &self.textures.feature
        } else {
            &self.textures.wall
        };

        Column { depth, u: hit.point.x + hit.point.y, texture }
    }
}

struct Column<'a> {
    depth: Real,
    u: Real,
    texture: &'a Texture,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{Angle, ColorConfig, Framebuffer, HEIGHT, WIDTH};
    use crate::world::Facing;

    const FLOOR: Rgb555 = Rgb555(0x7FFF);
    const CEILING: Rgb555 = Rgb555(0x7C00);

    fn settings(low_resolution: bool) -> RenderSettings {
        RenderSettings {
            low_resolution,
            floor_color: ColorConfig(31, 31, 31),
            ceiling_color: ColorConfig(0, 0, 31),
        }
    }

    fn solid(color: Rgb555) -> Texture {
        let mut tex = Texture::new(8);
        tex.pixels.fill(color);
        tex
    }

    /// Each texel's color is its row index, so v can be read back
    fn row_coded() -> Texture {
        let mut tex = Texture::new(128);
        for y in 0..128 {
            for x in 0..128 {
                tex.pixels[y * 128 + x] = Rgb555(y as u16);
            }
        }
        tex
    }

    fn pose_at(x: i32, y: i32, facing: Facing) -> CameraPose {
        let half = Real::from_ratio(1, 2);
        CameraPose {
            position: Vec2::new(Real::from_int(x) + half, Real::from_int(y) + half),
            yaw: facing.yaw(),
        }
    }

    #[test]
    fn test_column_runs_ceiling_then_wall_then_floor() {
        let textures = WallTextures { wall: row_coded(), feature: row_coded() };
        let renderer = SceneRenderer::new(&ViewConfig::default(), &settings(false), WIDTH, HEIGHT, textures);
        let mut fb = Framebuffer::new(WIDTH, HEIGHT);
        let grid = MazeGrid::classic();
        renderer.render(&mut fb, &grid, &pose_at(4, 0, Facing::Left));

        for x in (0..WIDTH).step_by(7) {
            let mut stage = 0;
            let mut last_v = u16::MAX;
            for y in 0..HEIGHT {
                let p = fb.get_pixel(x, y);
                let this_stage = match p {
                    CEILING => 0,
                    FLOOR => 2,
                    _ => {
                        assert!(p.0 < 128, "column {} row {} not a texel: {:?}", x, y, p);
                        // v falls as rows go down the screen
                        assert!(p.0 <= last_v, "column {} row {}: v rose", x, y);
                        last_v = p.0;
                        1
                    }
                };
                assert!(this_stage >= stage, "column {} row {} went back to stage {}", x, y, this_stage);
                stage = this_stage;
            }
        }
    }

    #[test]
    fn test_feature_cells_use_feature_texture() {
        let wall = Rgb555::new(1, 2, 3);
        let feature = Rgb555::new(3, 2, 1);
        let textures = WallTextures { wall: solid(wall), feature: solid(feature) };
        let renderer = SceneRenderer::new(&ViewConfig::default(), &settings(false), WIDTH, HEIGHT, textures);

        let mut grid = MazeGrid::open(3, 1);
        grid.set(2, 0, CellFlags::WALL_X | CellFlags::WALL_Y | CellFlags::FEATURE);
        let mut fb = Framebuffer::new(WIDTH, HEIGHT);
        renderer.render(&mut fb, &grid, &pose_at(0, 0, Facing::Right));

        let centre: Vec<Rgb555> = (0..HEIGHT).map(|y| fb.get_pixel(WIDTH / 2, y)).collect();
        assert!(centre.contains(&feature));
        assert!(!centre.contains(&wall));

        grid.set(2, 0, CellFlags::WALL_X | CellFlags::WALL_Y);
        renderer.render(&mut fb, &grid, &pose_at(0, 0, Facing::Right));
        let centre: Vec<Rgb555> = (0..HEIGHT).map(|y| fb.get_pixel(WIDTH / 2, y)).collect();
        assert!(centre.contains(&wall));
        assert!(!centre.contains(&feature));
    }

    #[test]
    fn test_reduced_mode_subsamples_full_render() {
        let grid = MazeGrid::classic();
        let pose = CameraPose {
            position: Vec2::new(Real::from_ratio(37, 8), Real::from_ratio(5, 8)),
            yaw: Angle(0x2345_6789),
        };

        let full = SceneRenderer::new(&ViewConfig::default(), &settings(false), WIDTH, HEIGHT, WallTextures::builtin());
        let mut full_fb = Framebuffer::new(WIDTH, HEIGHT);
        full.render(&mut full_fb, &grid, &pose);
        assert_eq!(full_fb.magnification, 1);

        let reduced = SceneRenderer::new(&ViewConfig::default(), &settings(true), WIDTH, HEIGHT, WallTextures::builtin());
        let mut reduced_fb = Framebuffer::new(WIDTH, HEIGHT);
        let sentinel = Rgb555::new(1, 1, 1);
        reduced_fb.clear(sentinel);
        reduced.render(&mut reduced_fb, &grid, &pose);
        assert_eq!(reduced_fb.magnification, 2);

        let (vw, vh) = reduced_fb.visible_size();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let p = reduced_fb.get_pixel(x, y);
                if x < vw && y < vh {
                    assert_eq!(p, full_fb.get_pixel(x * 2, y * 2), "at {},{}", x, y);
                } else {
                    assert_eq!(p, sentinel, "wrote outside the visible region at {},{}", x, y);
                }
            }
        }
    }

    #[test]
    fn test_render_leaves_inputs_untouched() {
        let grid = MazeGrid::classic();
        let before = grid.clone();
        let pose = pose_at(2, 3, Facing::Down);
        let renderer = SceneRenderer::new(&ViewConfig::default(), &RenderSettings::default(), WIDTH, HEIGHT, WallTextures::builtin());
        let mut a = Framebuffer::new(WIDTH, HEIGHT);
        let mut b = Framebuffer::new(WIDTH, HEIGHT);
        renderer.render(&mut a, &grid, &pose);
        renderer.render(&mut b, &grid, &pose);
        assert_eq!(grid, before);
        assert_eq!(a.pixels, b.pixels);
    }
}
