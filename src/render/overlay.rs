//! Line overlays drawn after the chunk pass: the outline around the targeted
//! block and the camera axis gizmo.

use glam::{IVec3, Vec3, Vec4};

use super::camera::Camera;
use super::context::{Capability, GraphicsContext, ShaderKind};
use super::line_batch::LineBatch;
use crate::world::block::BlockModel;

pub const SELECTION_COLOR: Vec4 = Vec4::new(0.0, 0.0, 0.0, 0.5);
pub const SELECTION_LINE_WIDTH: f32 = 2.0;

/// Length of each gizmo axis.
pub const AXIS_LENGTH: f32 = 0.1;
pub const AXIS_OUTLINE_WIDTH: f32 = 4.0;
pub const AXIS_LINE_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineBox {
    pub center: Vec3,
    /// Full edge lengths.
    pub size: Vec3,
}

/// Outline for a block of the given model whose minimum corner sits at
/// `position`. Models that are not drawn get no outline.
pub fn selection_outline(model: BlockModel, position: IVec3) -> Option<OutlineBox> {
    let base = position.as_vec3();
    match model {
        BlockModel::Block => Some(OutlineBox {
            center: base + Vec3::new(0.5, 0.5, 0.5),
            size: Vec3::new(1.005, 1.005, 1.005),
        }),
        BlockModel::XSprite => Some(OutlineBox {
            center: base + Vec3::new(0.5, 0.35, 0.5),
            size: Vec3::new(0.805, 0.705, 0.805),
        }),
        BlockModel::None => None,
    }
}

/// Binds the line shader with the camera's combined matrix.
pub fn bind_lines_shader<G: GraphicsContext>(gfx: &mut G, camera: &Camera) {
    gfx.use_shader(ShaderKind::Lines);
    gfx.uniform_matrix("u_projview", &camera.projection_view());
}

pub fn draw_selection<G: GraphicsContext>(
    gfx: &mut G,
    batch: &mut LineBatch,
    camera: &Camera,
    model: BlockModel,
    position: IVec3,
) {
    bind_lines_shader(gfx, camera);
    gfx.line_width(SELECTION_LINE_WIDTH);
    if let Some(outline) = selection_outline(model, position) {
        batch.box_outline(outline.center, outline.size, SELECTION_COLOR);
    }
    batch.render(gfx);
}

/// Three short axes one unit in front of the camera: a thick black pass,
/// then X red, Z blue, Y green on top. Depth testing is off for the whole
/// gizmo and back on afterwards.
pub fn draw_debug_axes<G: GraphicsContext>(gfx: &mut G, batch: &mut LineBatch, camera: &Camera) {
    bind_lines_shader(gfx, camera);

    let point = camera.position + camera.front();
    let axes = [Vec3::X, Vec3::Z, Vec3::Y];

    gfx.set_capability(Capability::DepthTest, false);

    gfx.line_width(AXIS_OUTLINE_WIDTH);
    for axis in axes {
        batch.line(point, point + axis * AXIS_LENGTH, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }
    batch.render(gfx);

    gfx.line_width(AXIS_LINE_WIDTH);
    let colors = [
        Vec4::new(1.0, 0.0, 0.0, 1.0),
        Vec4::new(0.0, 0.0, 1.0, 1.0),
        Vec4::new(0.0, 1.0, 0.0, 1.0),
    ];
    for (axis, color) in axes.into_iter().zip(colors) {
        batch.line(point, point + axis * AXIS_LENGTH, color);
    }
    batch.render(gfx);

    gfx.set_capability(Capability::DepthTest, true);
}
