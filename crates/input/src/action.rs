use glam::Vec3;

/// A high-level camera action produced by input devices or scripts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Move the camera by a world-space delta.
    Translate(Vec3),
    /// Rotate the camera by Euler angles in degrees (x, y, z).
    Rotate(Vec3),
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}

impl Action {
    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        Self::Translate(Vec3::new(x, y, z))
    }

    pub fn rotate(x: f32, y: f32, z: f32) -> Self {
        Self::Rotate(Vec3::new(x, y, z))
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Noop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_pack_components() {
        assert_eq!(
            Action::translate(1.0, 2.0, 3.0),
            Action::Translate(Vec3::new(1.0, 2.0, 3.0))
        );
        assert_eq!(Action::rotate(0.0, 90.0, 0.0), Action::Rotate(Vec3::Y * 90.0));
    }

    #[test]
    fn noop_is_noop() {
        assert!(Action::Noop.is_noop());
        assert!(!Action::translate(0.0, 0.0, 0.0).is_noop());
    }
}
