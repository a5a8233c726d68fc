//! Fixed-length position history for one moving point

use glam::Vec3;

/// Trail history, newest first.
///
/// Always holds exactly `len()` entries; pushes shift in place and never
/// reallocate.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBuffer {
    points: Box<[Vec3]>,
}

impl TrailBuffer {
    /// Create a trail of `len` points, all at `fill`.
    ///
    /// `len` is clamped to at least 1 so the head slot always exists.
    pub fn new(len: usize, fill: Vec3) -> Self {
        Self {
            points: vec![fill; len.max(1)].into_boxed_slice(),
        }
    }

    /// Shift every entry one slot toward the tail (dropping the last) and
    /// write `p` at the head
    pub fn push(&mut self, p: Vec3) {
        let n = self.points.len();
        self.points.copy_within(0..n - 1, 1);
        self.points[0] = p;
    }

    /// Current history, newest first
    #[inline]
    pub fn read(&self) -> &[Vec3] {
        &self.points
    }

    /// Most recently pushed point
    #[inline]
    pub fn head(&self) -> Vec3 {
        self.points[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true; kept for the `len`/`is_empty` pair
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_filled() {
        let trail = TrailBuffer::new(10, Vec3::ZERO);
        assert_eq!(trail.len(), 10);
        assert!(trail.read().iter().all(|p| *p == Vec3::ZERO));
    }

    #[test]
    fn test_push_shifts_toward_tail() {
        let mut trail = TrailBuffer::new(3, Vec3::ZERO);
        trail.push(Vec3::X);
        trail.push(Vec3::Y);
        assert_eq!(trail.read(), &[Vec3::Y, Vec3::X, Vec3::ZERO]);

        trail.push(Vec3::Z);
        trail.push(Vec3::ONE);
        // Oldest entries fall off the end
        assert_eq!(trail.read(), &[Vec3::ONE, Vec3::Z, Vec3::Y]);
    }

    #[test]
    fn test_single_slot_trail() {
        let mut trail = TrailBuffer::new(0, Vec3::ZERO);
        assert_eq!(trail.len(), 1);
        trail.push(Vec3::X);
        trail.push(Vec3::Y);
        assert_eq!(trail.read(), &[Vec3::Y]);
    }

    fn any_point() -> impl Strategy<Value = Vec3> {
        (-100.0f32..100.0, -100.0f32..100.0, -100.0f32..100.0)
            .prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn length_fixed_and_head_is_latest(
            k in 1usize..32,
            pushes in prop::collection::vec(any_point(), 1..128),
        ) {
            let mut trail = TrailBuffer::new(k, Vec3::ZERO);
            for p in &pushes {
                trail.push(*p);
                prop_assert_eq!(trail.read().len(), k);
                prop_assert_eq!(trail.head(), *p);
            }
            // Tail mirrors the last k pushes in reverse order
            let expected: Vec<Vec3> = pushes.iter().rev().take(k).copied().collect();
            prop_assert_eq!(&trail.read()[..expected.len()], expected.as_slice());
        }
    }
}
