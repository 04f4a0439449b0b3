//! Core types for the rasterizer

use serde::{Deserialize, Serialize};

use super::fixed::{Real, Scalar};

/// Edge length of every wall texture, in texels
pub const TEXTURE_SIZE: usize = 128;

/// Packed 15-bit color: red in bits 0-4, green in 5-9, blue in 10-14
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb555(pub u16);

impl Rgb555 {
    pub const BLACK: Rgb555 = Rgb555(0);
    pub const WHITE: Rgb555 = Rgb555::new(31, 31, 31);

    /// Build from 5-bit channels (0-31); higher bits are dropped
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self((r as u16 & 0x1F) | ((g as u16 & 0x1F) << 5) | ((b as u16 & 0x1F) << 10))
    }

    /// Quantize 8-bit channels down to 5 bits
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r >> 3, g >> 3, b >> 3)
    }

    pub const fn r(self) -> u8 {
        (self.0 & 0x1F) as u8
    }

    pub const fn g(self) -> u8 {
        ((self.0 >> 5) & 0x1F) as u8
    }

    pub const fn b(self) -> u8 {
        ((self.0 >> 10) & 0x1F) as u8
    }

    /// Expand to RGBA8 for display surfaces
    pub fn to_rgba8(self) -> [u8; 4] {
        let expand = |c: u8| (c << 3) | (c >> 2);
        [expand(self.r()), expand(self.g()), expand(self.b()), 255]
    }
}

/// 5-bit-per-channel color as written in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorConfig(pub u8, pub u8, pub u8);

impl From<ColorConfig> for Rgb555 {
    fn from(c: ColorConfig) -> Self {
        Rgb555::new(c.0, c.1, c.2)
    }
}

/// Square wall texture in packed 15-bit color
#[derive(Debug, Clone)]
pub struct Texture {
    pub size: usize,
    pub pixels: Vec<Rgb555>,
    pub name: String,
}

impl Texture {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            pixels: vec![Rgb555::WHITE; size * size],
            name: String::new(),
        }
    }

    /// Load a texture from an image file.
    ///
    /// Rows are flipped so texel row 0 is the bottom of the wall, then the
    /// image is resized (nearest) to [`TEXTURE_SIZE`] and quantized.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self::from_image(img, name))
    }

    fn from_image(img: image::DynamicImage, name: String) -> Self {
        let size = TEXTURE_SIZE as u32;
        let rgb = img
            .flipv()
            .resize_exact(size, size, image::imageops::FilterType::Nearest)
            .to_rgb8();

        let pixels = rgb
            .pixels()
            .map(|p| Rgb555::from_rgb8(p[0], p[1], p[2]))
            .collect();

        Self { size: TEXTURE_SIZE, pixels, name }
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(size: usize, color1: Rgb555, color2: Rgb555) -> Self {
        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let checker = ((x / 16) + (y / 16)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { size, pixels, name: "checkerboard".to_string() }
    }

    /// Running-bond brick pattern, used when no wall image is available
    pub fn bricks(size: usize, brick: Rgb555, mortar: Rgb555) -> Self {
        let course = (size / 8).max(2);
        let brick_len = course * 2;
        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size {
            let row = y / course;
            let shift = if row % 2 == 0 { 0 } else { brick_len / 2 };
            for x in 0..size {
                let joint = y % course == 0 || (x + shift) % brick_len == 0;
                pixels.push(if joint { mortar } else { brick });
            }
        }
        Self { size, pixels, name: "bricks".to_string() }
    }

    /// Sample at texture coordinates; both wrap modulo 1
    #[inline]
    pub fn sample(&self, u: Real, v: Real) -> Rgb555 {
        let tx = u.scale_index(self.size);
        let ty = v.scale_index(self.size);
        self.pixels[ty * self.size + tx]
    }

    /// Get pixel at x,y coordinates
    pub fn get_pixel(&self, x: usize, y: usize) -> Rgb555 {
        if x < self.size && y < self.size {
            self.pixels[y * self.size + x]
        } else {
            Rgb555::BLACK
        }
    }
}

/// The two wall textures a maze uses
#[derive(Debug, Clone)]
pub struct WallTextures {
    /// Default wall face
    pub wall: Texture,
    /// Face used for cells carrying the feature flag
    pub feature: Texture,
}

impl WallTextures {
    /// Procedural textures, for when no image assets are present
    pub fn builtin() -> Self {
        Self {
            wall: Texture::bricks(TEXTURE_SIZE, Rgb555::new(22, 8, 5), Rgb555::new(18, 18, 16)),
            feature: Texture::checkerboard(TEXTURE_SIZE, Rgb555::new(4, 10, 28), Rgb555::new(28, 26, 8)),
        }
    }
}

/// Rasterizer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Cast every other column and double rows; the surface is magnified 2x
    pub low_resolution: bool,
    /// Below-horizon fill
    pub floor_color: ColorConfig,
    /// Above-wall fill
    pub ceiling_color: ColorConfig,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            low_resolution: false,
            floor_color: ColorConfig(30, 15, 0),
            ceiling_color: ColorConfig(20, 20, 20),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb555_packing() {
        let c = Rgb555::new(30, 15, 0);
        assert_eq!(c.0, 30 | (15 << 5));
        assert_eq!((c.r(), c.g(), c.b()), (30, 15, 0));
        assert_eq!(Rgb555::new(0, 0, 31).0, 31 << 10);
    }

    #[test]
    fn test_rgb8_quantize_and_expand() {
        let c = Rgb555::from_rgb8(255, 128, 7);
        assert_eq!((c.r(), c.g(), c.b()), (31, 16, 0));
        assert_eq!(Rgb555::WHITE.to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(Rgb555::BLACK.to_rgba8(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_sample_wraps_coordinates() {
        let mut tex = Texture::new(4);
        tex.pixels[2 * 4 + 1] = Rgb555::new(1, 2, 3);
        let u = Real::from_ratio(1, 4);
        let v = Real::from_ratio(1, 2);
        assert_eq!(tex.sample(u, v), Rgb555::new(1, 2, 3));
        assert_eq!(tex.sample(u + Real::from_int(3), v - Real::ONE), Rgb555::new(1, 2, 3));
    }

    #[test]
    fn test_builtin_textures_are_full_size() {
        let t = WallTextures::builtin();
        assert_eq!(t.wall.pixels.len(), TEXTURE_SIZE * TEXTURE_SIZE);
        assert_eq!(t.feature.pixels.len(), TEXTURE_SIZE * TEXTURE_SIZE);
        assert_ne!(t.wall.get_pixel(5, 5), t.wall.get_pixel(0, 0));
    }

    #[test]
    fn test_from_file_puts_image_bottom_at_row_zero() {
        let path = std::env::temp_dir().join(format!("maze3d-tex-{}.png", std::process::id()));
        let img = image::RgbImage::from_fn(2, 2, |_, y| {
            if y == 0 { image::Rgb([255, 0, 0]) } else { image::Rgb([0, 0, 255]) }
        });
        img.save(&path).expect("write png");

        let tex = Texture::from_file(&path).expect("load png");
        let _ = std::fs::remove_file(&path);
        assert_eq!(tex.size, TEXTURE_SIZE);
        assert_eq!(tex.get_pixel(0, 0), Rgb555::new(0, 0, 31));
        assert_eq!(tex.get_pixel(0, TEXTURE_SIZE - 1), Rgb555::new(31, 0, 0));
        assert!(tex.name.starts_with("maze3d-tex-"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Texture::from_file("no/such/texture.png").is_err());
    }

    #[test]
    fn test_get_pixel_out_of_range() {
        let tex = Texture::new(8);
        assert_eq!(tex.get_pixel(8, 0), Rgb555::BLACK);
    }
}
