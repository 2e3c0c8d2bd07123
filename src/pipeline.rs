//! Pipeline selection and the binding contract.
//!
//! There are exactly two pipelines, and they never branch into each other:
//!
//! | Variant | Uniform block (group 0, binding 0) | Vertex attributes |
//! |---------|------------------------------------|-------------------|
//! | [`PipelineVariant::Flat`] | `transform` | location 0: position |
//! | [`PipelineVariant::Normals`] | `transform`, `transform_for_normals` | location 0: position, location 1: normal |
//!
//! The host picks a variant when it configures a draw. Uniforms travel as a
//! tagged [`UniformBlock`] value and are checked against the variant before
//! anything runs, so a flat block can never be reinterpreted as the first half
//! of a normals block (or the other way round).

use std::fmt;
use std::str::FromStr;

use glam::{Vec3, Vec4};

use crate::color::Color;
use crate::error::{BindingMismatch, ParseVariantError};
use crate::flat::{self, FlatUniforms, FlatVarying, PositionVertex};
use crate::normals::{self, NormalUniforms, NormalVarying, PositionNormalVertex};
use crate::varying::Interpolate;

/// Which of the two pipelines a draw goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PipelineVariant {
    /// Solid red, positions only.
    Flat,
    /// Transformed normals written out as color.
    #[default]
    Normals,
}

impl PipelineVariant {
    pub const ALL: [PipelineVariant; 2] = [PipelineVariant::Flat, PipelineVariant::Normals];

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            PipelineVariant::Flat => "flat",
            PipelineVariant::Normals => "normals",
        }
    }

    /// The other variant.
    pub fn toggled(self) -> Self {
        match self {
            PipelineVariant::Flat => PipelineVariant::Normals,
            PipelineVariant::Normals => PipelineVariant::Flat,
        }
    }

    /// WGSL source with `vs_main` / `fs_main` entry points.
    pub fn shader_source(self) -> &'static str {
        match self {
            PipelineVariant::Flat => flat::SHADER,
            PipelineVariant::Normals => normals::SHADER,
        }
    }

    pub fn uniform_layout(self) -> UniformLayout {
        match self {
            PipelineVariant::Flat => UniformLayout {
                label: "Flat Uniforms",
                size: std::mem::size_of::<FlatUniforms>() as u64,
                fields: &["transform"],
            },
            PipelineVariant::Normals => UniformLayout {
                label: "Normal Uniforms",
                size: std::mem::size_of::<NormalUniforms>() as u64,
                fields: &["transform", "transform_for_normals"],
            },
        }
    }

    pub fn vertex_layout(self) -> VertexLayout {
        match self {
            PipelineVariant::Flat => VertexLayout::Position,
            PipelineVariant::Normals => VertexLayout::PositionNormal,
        }
    }

    /// Checks a uniform block and a vertex layout against this variant.
    pub fn check_bindings(
        self,
        uniforms: &UniformBlock,
        vertices: VertexLayout,
    ) -> Result<(), BindingMismatch> {
        if uniforms.variant() != self {
            return Err(BindingMismatch::Uniforms {
                expected: self,
                found: uniforms.variant(),
            });
        }
        if vertices != self.vertex_layout() {
            return Err(BindingMismatch::Vertices {
                variant: self,
                expected: self.vertex_layout(),
                found: vertices,
            });
        }
        Ok(())
    }

    /// Runs one complete pass of this pipeline on the CPU for a single sample
    /// inside a triangle.
    ///
    /// Every binding is checked first. Then the position stage runs once per
    /// corner, the outputs are blended with barycentric `weights`, and the
    /// color stage runs on the result.
    pub fn shade_triangle(
        self,
        uniforms: &UniformBlock,
        corners: &[VertexInput; 3],
        weights: Vec3,
    ) -> Result<ShadedSample, BindingMismatch> {
        match (self, uniforms) {
            (PipelineVariant::Flat, UniformBlock::Flat(uniforms)) => {
                let corners = self.position_corners(corners)?;
                let varyings = corners.map(|v| flat::vertex(uniforms, &v));
                let color = flat::fragment(&FlatVarying::interpolate(&varyings, weights));

                Ok(ShadedSample {
                    clip_positions: varyings.map(|v| v.clip_position),
                    color,
                })
            }
            (PipelineVariant::Normals, UniformBlock::Normals(uniforms)) => {
                let corners = self.position_normal_corners(corners)?;
                let varyings = corners.map(|v| normals::vertex(uniforms, &v));
                let color = normals::fragment(&NormalVarying::interpolate(&varyings, weights));

                Ok(ShadedSample {
                    clip_positions: varyings.map(|v| v.clip_position),
                    color,
                })
            }
            (expected, found) => Err(BindingMismatch::Uniforms {
                expected,
                found: found.variant(),
            }),
        }
    }

    fn position_corners(
        self,
        corners: &[VertexInput; 3],
    ) -> Result<[PositionVertex; 3], BindingMismatch> {
        let mut out = [PositionVertex::new([0.0; 3]); 3];
        for (slot, corner) in out.iter_mut().zip(corners) {
            match corner {
                VertexInput::Position(v) => *slot = *v,
                other => return Err(self.vertex_mismatch(other.layout())),
            }
        }
        Ok(out)
    }

    fn position_normal_corners(
        self,
        corners: &[VertexInput; 3],
    ) -> Result<[PositionNormalVertex; 3], BindingMismatch> {
        let mut out = [PositionNormalVertex::new([0.0; 3], [0.0; 3]); 3];
        for (slot, corner) in out.iter_mut().zip(corners) {
            match corner {
                VertexInput::PositionNormal(v) => *slot = *v,
                other => return Err(self.vertex_mismatch(other.layout())),
            }
        }
        Ok(out)
    }

    fn vertex_mismatch(self, found: VertexLayout) -> BindingMismatch {
        BindingMismatch::Vertices {
            variant: self,
            expected: self.vertex_layout(),
            found,
        }
    }
}

impl fmt::Display for PipelineVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PipelineVariant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(PipelineVariant::Flat),
            "normals" | "normal" => Ok(PipelineVariant::Normals),
            _ => Err(ParseVariantError(s.to_string())),
        }
    }
}

/// Describes the uniform block a variant expects at group 0, binding 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLayout {
    pub label: &'static str,
    /// Exact size in bytes. Also used as the binding's minimum size.
    pub size: u64,
    /// Field names in declaration order. Every field is a `mat4x4<f32>`.
    pub fields: &'static [&'static str],
}

/// Vertex attribute layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexLayout {
    /// location 0: position
    Position,
    /// location 0: position, location 1: normal
    PositionNormal,
}

impl VertexLayout {
    pub fn buffer_layout(self) -> wgpu::VertexBufferLayout<'static> {
        match self {
            VertexLayout::Position => PositionVertex::LAYOUT,
            VertexLayout::PositionNormal => PositionNormalVertex::LAYOUT,
        }
    }
}

impl fmt::Display for VertexLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexLayout::Position => f.write_str("position-only"),
            VertexLayout::PositionNormal => f.write_str("position+normal"),
        }
    }
}

/// A uniform block tagged with the variant it was built for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformBlock {
    Flat(FlatUniforms),
    Normals(NormalUniforms),
}

impl UniformBlock {
    pub fn variant(&self) -> PipelineVariant {
        match self {
            UniformBlock::Flat(_) => PipelineVariant::Flat,
            UniformBlock::Normals(_) => PipelineVariant::Normals,
        }
    }

    /// The exact bytes to upload to the uniform buffer.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            UniformBlock::Flat(u) => bytemuck::bytes_of(u),
            UniformBlock::Normals(u) => bytemuck::bytes_of(u),
        }
    }
}

impl From<FlatUniforms> for UniformBlock {
    fn from(u: FlatUniforms) -> Self {
        UniformBlock::Flat(u)
    }
}

impl From<NormalUniforms> for UniformBlock {
    fn from(u: NormalUniforms) -> Self {
        UniformBlock::Normals(u)
    }
}

/// One vertex, tagged with its attribute layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VertexInput {
    Position(PositionVertex),
    PositionNormal(PositionNormalVertex),
}

impl VertexInput {
    pub fn layout(&self) -> VertexLayout {
        match self {
            VertexInput::Position(_) => VertexLayout::Position,
            VertexInput::PositionNormal(_) => VertexLayout::PositionNormal,
        }
    }
}

impl From<PositionVertex> for VertexInput {
    fn from(v: PositionVertex) -> Self {
        VertexInput::Position(v)
    }
}

impl From<PositionNormalVertex> for VertexInput {
    fn from(v: PositionNormalVertex) -> Self {
        VertexInput::PositionNormal(v)
    }
}

/// Result of [`PipelineVariant::shade_triangle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedSample {
    /// Position-stage output for each corner.
    pub clip_positions: [Vec4; 3],
    pub color: Color,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Mat4;

    fn flat_triangle() -> [VertexInput; 3] {
        [
            PositionVertex::new([0.0, 0.0, 0.0]).into(),
            PositionVertex::new([1.0, 0.0, 0.0]).into(),
            PositionVertex::new([0.0, 1.0, 0.0]).into(),
        ]
    }

    fn normal_triangle(normals: [[f32; 3]; 3]) -> [VertexInput; 3] {
        [
            PositionNormalVertex::new([0.0, 0.0, 0.0], normals[0]).into(),
            PositionNormalVertex::new([1.0, 0.0, 0.0], normals[1]).into(),
            PositionNormalVertex::new([0.0, 1.0, 0.0], normals[2]).into(),
        ]
    }

    fn flat_block() -> UniformBlock {
        FlatUniforms::new(Mat4::IDENTITY).into()
    }

    fn normal_block() -> UniformBlock {
        NormalUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY).into()
    }

    #[test]
    fn variant_names_round_trip() {
        for variant in PipelineVariant::ALL {
            assert_eq!(variant.to_string().parse::<PipelineVariant>(), Ok(variant));
        }
        assert_eq!(" Normal ".parse::<PipelineVariant>(), Ok(PipelineVariant::Normals));
        assert_eq!(
            "phong".parse::<PipelineVariant>(),
            Err(ParseVariantError("phong".to_string()))
        );
    }

    #[test]
    fn toggling_visits_both_variants() {
        assert_eq!(PipelineVariant::Flat.toggled(), PipelineVariant::Normals);
        assert_eq!(PipelineVariant::Normals.toggled().toggled(), PipelineVariant::Normals);
    }

    #[test]
    fn layouts_describe_the_contract() {
        let flat = PipelineVariant::Flat.uniform_layout();
        assert_eq!(flat.size, 64);
        assert_eq!(flat.fields, &["transform"]);

        let normals = PipelineVariant::Normals.uniform_layout();
        assert_eq!(normals.size, 128);
        assert_eq!(normals.fields, &["transform", "transform_for_normals"]);

        assert_eq!(PipelineVariant::Flat.vertex_layout(), VertexLayout::Position);
        assert_eq!(
            PipelineVariant::Normals.vertex_layout().buffer_layout().array_stride,
            24
        );
    }

    #[test]
    fn uniform_bytes_match_layout_size() {
        for (variant, block) in [
            (PipelineVariant::Flat, flat_block()),
            (PipelineVariant::Normals, normal_block()),
        ] {
            assert_eq!(block.as_bytes().len() as u64, variant.uniform_layout().size);
        }
    }

    #[test]
    fn matching_bindings_are_accepted() {
        assert_eq!(
            PipelineVariant::Flat.check_bindings(&flat_block(), VertexLayout::Position),
            Ok(())
        );
        assert_eq!(
            PipelineVariant::Normals.check_bindings(&normal_block(), VertexLayout::PositionNormal),
            Ok(())
        );
    }

    #[test]
    fn swapped_uniform_blocks_are_rejected() {
        assert_eq!(
            PipelineVariant::Normals.check_bindings(&flat_block(), VertexLayout::PositionNormal),
            Err(BindingMismatch::Uniforms {
                expected: PipelineVariant::Normals,
                found: PipelineVariant::Flat,
            })
        );
        assert_eq!(
            PipelineVariant::Flat.check_bindings(&normal_block(), VertexLayout::Position),
            Err(BindingMismatch::Uniforms {
                expected: PipelineVariant::Flat,
                found: PipelineVariant::Normals,
            })
        );
    }

    #[test]
    fn swapped_vertex_layouts_are_rejected() {
        assert_eq!(
            PipelineVariant::Flat.check_bindings(&flat_block(), VertexLayout::PositionNormal),
            Err(BindingMismatch::Vertices {
                variant: PipelineVariant::Flat,
                expected: VertexLayout::Position,
                found: VertexLayout::PositionNormal,
            })
        );
    }

    #[test]
    fn shade_triangle_rejects_mismatched_uniforms() {
        let result = PipelineVariant::Normals.shade_triangle(
            &flat_block(),
            &normal_triangle([[0.0, 1.0, 0.0]; 3]),
            Vec3::splat(1.0 / 3.0),
        );
        assert!(matches!(result, Err(BindingMismatch::Uniforms { .. })));

        let result = PipelineVariant::Flat.shade_triangle(
            &normal_block(),
            &flat_triangle(),
            Vec3::X,
        );
        assert!(matches!(result, Err(BindingMismatch::Uniforms { .. })));
    }

    #[test]
    fn shade_triangle_rejects_any_mismatched_corner() {
        let mut corners = flat_triangle();
        corners[2] = PositionNormalVertex::new([0.0; 3], [0.0, 0.0, 1.0]).into();

        let result = PipelineVariant::Flat.shade_triangle(&flat_block(), &corners, Vec3::X);
        assert_eq!(
            result,
            Err(BindingMismatch::Vertices {
                variant: PipelineVariant::Flat,
                expected: VertexLayout::Position,
                found: VertexLayout::PositionNormal,
            })
        );
    }

    #[test]
    fn flat_pass_is_solid_red() {
        let transform = Mat4::from_scale(Vec3::new(3.0, 0.5, 2.0));
        let sample = PipelineVariant::Flat
            .shade_triangle(
                &FlatUniforms::new(transform).into(),
                &flat_triangle(),
                Vec3::new(0.2, 0.3, 0.5),
            )
            .unwrap();

        assert_eq!(sample.color, Color::rgba(1.0, 0.0, 0.0, 1.0));
        assert_eq!(sample.clip_positions[1], Vec4::new(3.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn normals_pass_shows_unrenormalized_blend() {
        let sample = PipelineVariant::Normals
            .shade_triangle(
                &normal_block(),
                &normal_triangle([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0]]),
                Vec3::new(0.5, 0.25, 0.25),
            )
            .unwrap();

        assert_relative_eq!(Vec4::from(sample.color), Vec4::new(0.5, 0.5, 0.0, 1.0));
    }

    #[test]
    fn normals_pass_at_corner_shows_negative_channel() {
        let sample = PipelineVariant::Normals
            .shade_triangle(
                &normal_block(),
                &normal_triangle([[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]),
                Vec3::X,
            )
            .unwrap();

        assert_eq!(sample.color, Color::rgba(-1.0, 0.0, 0.0, 1.0));
    }
}
