//! RGBA fragment colors.
//!
//! [`Color`] is the sole output of every color stage. Channels are plain `f32`
//! values: they are conventionally in `[0, 1]`, but nothing in this crate clamps
//! or remaps them. Out-of-range channels (for example a negative normal
//! component visualized as red) are handed to the framebuffer as-is.

use glam::Vec4;

/// RGBA color with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    /// Background used by the demo host when nothing else is configured.
    pub const CLEAR: Color = Color::rgba(0.08, 0.08, 0.1, 1.0);

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Vec4> for Color {
    fn from(v: Vec4) -> Self {
        Self::rgba(v.x, v.y, v.z, v.w)
    }
}

impl From<Color> for Vec4 {
    fn from(c: Color) -> Self {
        Vec4::new(c.r, c.g, c.b, c.a)
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}
