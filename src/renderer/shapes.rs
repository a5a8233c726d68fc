//! Flatten a scene frame into point-sprite instances

use glam::{Mat4, Vec3};

use super::vertex::{CameraUniform, StarInstance};
use crate::consts::*;
use crate::sim::{FieldMaterial, SceneFrame};

#[inline]
fn sprite(p: Vec3, material: &FieldMaterial) -> StarInstance {
    StarInstance::new(
        p.to_array(),
        material.size,
        material.rgba(),
        material.size_attenuation,
    )
}

/// Instances for one frame, back to front by layer: field, trails, heads.
///
/// Reuses `out`'s allocation.
pub fn build_instances(frame: &SceneFrame<'_>, out: &mut Vec<StarInstance>) {
    out.clear();
    let trail_points: usize = frame.stars.iter().map(|s| s.trail.len()).sum();
    out.reserve(frame.field_points.len() + trail_points + frame.stars.len());

    let rotation = frame.field_rotation_matrix();
    out.extend(
        frame
            .field_points
            .iter()
            .map(|p| sprite(rotation * *p, &frame.field_material)),
    );

    for star in &frame.stars {
        out.extend(star.trail.iter().map(|p| sprite(*p, &frame.trail_material)));
    }
    for star in &frame.stars {
        out.push(sprite(star.head, &frame.head_material));
    }
}

/// Perspective camera looking down -z from (0, 0, CAMERA_Z)
pub fn camera_uniform(width: u32, height: u32) -> CameraUniform {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, CAMERA_Z), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(
        CAMERA_FOV_Y_DEG.to_radians(),
        w / h,
        CAMERA_NEAR,
        CAMERA_FAR,
    );
    CameraUniform {
        view_proj: (proj * view).to_cols_array_2d(),
        view: view.to_cols_array_2d(),
        viewport: [w, h],
        point_scale: h * 0.5,
        _pad: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ParticleScene, SceneConfig, Viewport, seeded};

    #[test]
    fn test_instance_count_and_order() {
        let mut scene = ParticleScene::new(SceneConfig::hero(), &mut seeded(1));
        scene.tick(0.016);
        let frame = scene.frame();
        let mut out = Vec::new();
        build_instances(&frame, &mut out);

        let expected = HERO_STAR_COUNT + SHOOTING_STAR_COUNT * (TRAIL_LENGTH + 1);
        assert_eq!(out.len(), expected);
        assert_eq!(out[0].color, FieldMaterial::HERO.rgba());
        assert_eq!(out[HERO_STAR_COUNT].color, FieldMaterial::TRAIL.rgba());
        let last = out.last().unwrap();
        assert_eq!(last.color, FieldMaterial::HEAD.rgba());
        assert_eq!(last.position, scene.stars().last().unwrap().position.to_array());
    }

    #[test]
    fn test_field_rotation_applied() {
        let mut scene = ParticleScene::new(SceneConfig::hero(), &mut seeded(2));
        scene.on_pointer_move(0.0, 0.0, Viewport::new(100.0, 100.0));
        let frame = scene.frame();
        let m = frame.field_rotation_matrix();
        let mut out = Vec::new();
        build_instances(&frame, &mut out);
        let p = frame.field_points[7];
        assert_eq!(out[7].position, (m * p).to_array());
        // Rotation preserves the shell radius
        assert!((Vec3::from(out[7].position).length() - p.length()).abs() < 1e-5);
    }

    #[test]
    fn test_reuses_buffer() {
        let scene = ParticleScene::new(SceneConfig::subtle(), &mut seeded(3));
        let mut out = vec![StarInstance::new([9.0; 3], 1.0, [1.0; 4], false); 4];
        build_instances(&scene.frame(), &mut out);
        assert_eq!(out.len(), SUBTLE_STAR_COUNT);
    }

    #[test]
    fn test_camera_projects_origin_to_center() {
        let cam = camera_uniform(800, 600);
        let vp = Mat4::from_cols_array_2d(&cam.view_proj);
        let clip = vp * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-6);
        assert!((clip.y / clip.w).abs() < 1e-6);
        assert_eq!(cam.point_scale, 300.0);
        assert_eq!(cam.viewport, [800.0, 600.0]);
    }

    #[test]
    fn test_camera_zero_size() {
        let cam = camera_uniform(0, 0);
        assert_eq!(cam.viewport, [1.0, 1.0]);
    }
}
