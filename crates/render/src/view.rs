use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use tessera_input::Action;

/// Orientation a new view starts with: w=0, x=0, y=1, z=0.
///
/// This is a half turn about +Y, not the identity rotation. Scenes authored
/// against this engine assume it, so it is kept as is.
pub const DEFAULT_ORIENTATION: Quat = Quat::from_xyzw(0.0, 1.0, 0.0, 0.0);

/// Orientation change for a rotation of `pitch`, `yaw`, `roll` degrees about
/// the X, Y and Z axes.
///
/// The result is always `qX * qY * qZ`. This is not a general Euler-angle
/// conversion; other orders give different results and existing input
/// bindings depend on this one.
pub fn delta_quaternion(pitch: f32, yaw: f32, roll: f32) -> Quat {
    let qx = Quat::from_axis_angle(Vec3::X, pitch.to_radians());
    let qy = Quat::from_axis_angle(Vec3::Y, yaw.to_radians());
    let qz = Quat::from_axis_angle(Vec3::Z, roll.to_radians());
    qx * qy * qz
}

/// Camera transform: an orientation, a translation and the view matrix
/// derived from them.
///
/// The view matrix is cached. [`View::translate`] and [`View::rotate`] only
/// touch the orientation and translation; the matrix stays stale until
/// [`View::update_view_matrix`] is called. Renderers refresh it once per
/// frame before reading it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    translation: Vec3,
    orientation: Quat,
    view_matrix: Mat4,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    /// A view at the origin with [`DEFAULT_ORIENTATION`].
    pub fn new() -> Self {
        Self::from_parts(Vec3::ZERO, DEFAULT_ORIENTATION)
    }

    /// A view with the given state and a matrix built from it.
    pub fn from_parts(translation: Vec3, orientation: Quat) -> Self {
        Self {
            translation,
            orientation,
            view_matrix: compose(orientation, translation),
        }
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// The cached view matrix, as of the last refresh.
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    /// Replace the orientation as is. The matrix is not refreshed.
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    /// Rebuild the cached matrix as `rotation(Q) * translation(T)`.
    ///
    /// The translation is applied in the rotated frame.
    pub fn update_view_matrix(&mut self) {
        self.view_matrix = compose(self.orientation, self.translation);
    }

    /// Scale the orientation back to unit length.
    pub fn normalize(&mut self) {
        debug_assert!(
            self.orientation.length_squared() > 0.0,
            "cannot normalize a zero-length orientation"
        );
        self.orientation = self.orientation.normalize();
    }

    /// Inverse of the cached matrix. Does not touch any state.
    pub fn inverse(&self) -> Mat4 {
        self.view_matrix.inverse()
    }

    /// Normalize the orientation, then return the inverse of the cached
    /// matrix.
    ///
    /// This mutates the orientation. The matrix is not rebuilt, so the result
    /// reflects the state at the last [`View::update_view_matrix`], before
    /// normalization.
    pub fn view_inverse(&mut self) -> Mat4 {
        self.normalize();
        self.inverse()
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.translation.x += x;
        self.translation.y += y;
        self.translation.z += z;
    }

    pub fn translate_by(&mut self, delta: Vec3) {
        self.translate(delta.x, delta.y, delta.z);
    }

    /// Rotate by `x`, `y`, `z` degrees about the X, Y and Z axes.
    ///
    /// The change from [`delta_quaternion`] is applied on the left of the
    /// current orientation. No normalization happens here.
    pub fn rotate(&mut self, x: f32, y: f32, z: f32) {
        self.orientation = delta_quaternion(x, y, z) * self.orientation;
    }

    pub fn rotate_by(&mut self, degrees: Vec3) {
        self.rotate(degrees.x, degrees.y, degrees.z);
    }

    /// Apply a camera action. Like the calls it maps to, this leaves the
    /// matrix stale.
    pub fn apply(&mut self, action: &Action) {
        match *action {
            Action::Translate(delta) => self.translate_by(delta),
            Action::Rotate(degrees) => self.rotate_by(degrees),
            Action::Noop => {}
        }
    }
}

fn compose(orientation: Quat, translation: Vec3) -> Mat4 {
    Mat4::from_quat(orientation) * Mat4::from_translation(translation)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn default_view_state() {
        let view = View::new();
        assert_eq!(view.translation(), Vec3::ZERO);
        assert_eq!(view.orientation(), DEFAULT_ORIENTATION);
        assert_eq!(view.orientation().w, 0.0);
        assert_eq!(view.orientation().y, 1.0);
        assert_eq!(view.view_matrix(), Mat4::from_quat(DEFAULT_ORIENTATION));
    }

    #[test]
    fn default_orientation_is_half_turn_about_y() {
        let view = View::new();
        let forward = view.view_matrix().transform_vector3(Vec3::Z);
        assert!(forward.abs_diff_eq(Vec3::NEG_Z, EPS));
    }

    #[test]
    fn translations_accumulate_as_a_sum() {
        let deltas = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-0.5, 2.0, 0.25),
            Vec3::new(3.0, -1.0, 4.0),
        ];
        let mut view = View::new();
        for d in deltas {
            view.translate_by(d);
        }
        let mut reversed = View::new();
        for d in deltas.iter().rev() {
            reversed.translate(d.x, d.y, d.z);
        }
        let sum: Vec3 = deltas.iter().copied().sum();
        assert!(view.translation().abs_diff_eq(sum, EPS));
        assert!(reversed.translation().abs_diff_eq(sum, EPS));
    }

    #[test]
    fn translate_and_rotate_leave_matrix_stale() {
        let mut view = View::new();
        let before = view.view_matrix();
        view.translate(1.0, 2.0, 3.0);
        view.rotate(10.0, 20.0, 30.0);
        assert_eq!(view.view_matrix(), before);

        view.update_view_matrix();
        assert_ne!(view.view_matrix(), before);
    }

    #[test]
    fn delta_quaternion_order_is_x_then_y_then_z() {
        let qx = Quat::from_axis_angle(Vec3::X, 30f32.to_radians());
        let qy = Quat::from_axis_angle(Vec3::Y, 45f32.to_radians());
        let qz = Quat::from_axis_angle(Vec3::Z, 60f32.to_radians());
        let q = delta_quaternion(30.0, 45.0, 60.0);
        assert!(q.abs_diff_eq(qx * qy * qz, EPS));
        assert!(!q.abs_diff_eq(qz * qy * qx, EPS));
    }

    #[test]
    fn rotate_left_multiplies_existing_orientation() {
        let mut view = View::new();
        let start = view.orientation();
        view.rotate(30.0, 45.0, 60.0);
        let expected = delta_quaternion(30.0, 45.0, 60.0) * start;
        assert!(view.orientation().abs_diff_eq(expected, EPS));
    }

    #[test]
    fn single_axis_rotations_compose_in_fixed_order() {
        let (x, y, z) = (30.0, 45.0, 60.0);
        let mut combined = View::new();
        combined.rotate(x, y, z);

        // Each call left-multiplies, so Z, then Y, then X yields qX*qY*qZ*Q.
        let mut zyx = View::new();
        zyx.rotate(0.0, 0.0, z);
        zyx.rotate(0.0, y, 0.0);
        zyx.rotate(x, 0.0, 0.0);
        assert!(zyx.orientation().abs_diff_eq(combined.orientation(), EPS));

        let mut xyz = View::new();
        xyz.rotate_by(Vec3::new(x, 0.0, 0.0));
        xyz.rotate_by(Vec3::new(0.0, y, 0.0));
        xyz.rotate_by(Vec3::new(0.0, 0.0, z));
        assert!(!xyz.orientation().abs_diff_eq(combined.orientation(), EPS));
    }

    #[test]
    fn rotate_does_not_normalize() {
        let mut view = View::new();
        view.set_orientation(DEFAULT_ORIENTATION * 2.0);
        view.rotate(0.0, 90.0, 0.0);
        assert!((view.orientation().length() - 2.0).abs() < EPS);
    }

    #[test]
    fn update_view_matrix_is_idempotent() {
        let mut view = View::new();
        view.translate(0.3, -1.7, 2.9);
        view.rotate(13.0, 57.0, -21.0);
        view.update_view_matrix();
        let first = view.view_matrix();
        view.update_view_matrix();
        assert_eq!(view.view_matrix(), first);
    }

    #[test]
    fn translation_is_applied_in_rotated_frame() {
        let mut view = View::new();
        view.translate(1.0, 0.0, 0.0);
        view.update_view_matrix();
        let column = view.view_matrix().w_axis;
        assert!(column.truncate().abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), EPS));
        assert_eq!(column.w, 1.0);
    }

    #[test]
    fn view_inverse_normalizes_orientation() {
        let mut view = View::new();
        view.set_orientation(Quat::from_xyzw(0.3, 1.2, -0.4, 2.0));
        view.view_inverse();
        assert!((view.orientation().length() - 1.0).abs() < EPS);

        view.rotate(10.0, 0.0, 0.0);
        view.view_inverse();
        assert!((view.orientation().length() - 1.0).abs() < EPS);
    }

    #[test]
    fn view_inverse_of_default_view_is_identity_round_trip() {
        let mut view = View::new();
        let m = view.view_matrix();
        let inv = view.view_inverse();
        assert!((inv * m).abs_diff_eq(Mat4::IDENTITY, EPS));
    }

    #[test]
    fn view_inverse_uses_matrix_from_before_normalization() {
        let mut view = View::new();
        view.set_orientation(DEFAULT_ORIENTATION * 2.0);
        view.update_view_matrix();
        let stale = view.view_matrix();

        let inv = view.view_inverse();
        // The orientation is now unit length, but the cached matrix was not rebuilt.
        assert_eq!(view.view_matrix(), stale);
        assert!((inv * stale).abs_diff_eq(Mat4::IDENTITY, EPS));

        view.update_view_matrix();
        let rebuilt = view.view_matrix();
        assert!(!rebuilt.abs_diff_eq(stale, EPS));
        assert!(!view.inverse().abs_diff_eq(inv, EPS));
        assert!((view.inverse() * rebuilt).abs_diff_eq(Mat4::IDENTITY, EPS));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "zero-length orientation")]
    fn zero_length_orientation_panics_in_debug() {
        let mut view = View::new();
        view.set_orientation(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0));
        view.view_inverse();
    }

    #[test]
    fn apply_matches_direct_calls() {
        let mut applied = View::new();
        applied.apply(&Action::translate(1.0, -2.0, 0.5));
        applied.apply(&Action::rotate(10.0, 20.0, 30.0));
        applied.apply(&Action::Noop);

        let mut direct = View::new();
        direct.translate(1.0, -2.0, 0.5);
        direct.rotate(10.0, 20.0, 30.0);
        assert_eq!(applied, direct);
        assert_eq!(applied.view_matrix(), View::new().view_matrix());
    }

    #[test]
    fn inverse_is_pure() {
        let mut view = View::new();
        view.set_orientation(DEFAULT_ORIENTATION * 3.0);
        let _ = view.inverse();
        assert!((view.orientation().length() - 3.0).abs() < EPS);
    }

    #[test]
    fn inverse_maps_eye_space_origin_to_camera_position() {
        let mut view = View::from_parts(Vec3::new(2.0, -1.0, 5.0), Quat::IDENTITY);
        view.rotate(0.0, 30.0, 0.0);
        view.update_view_matrix();
        let inv = view.view_inverse();
        // V = R * T(t), so the camera sits at -t in world space.
        let eye = inv.transform_point3(Vec3::ZERO);
        assert!(eye.abs_diff_eq(Vec3::new(-2.0, 1.0, -5.0), 1e-4));
    }
}
