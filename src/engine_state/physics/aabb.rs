//! Axis-aligned bounding boxes.

use cgmath::{InnerSpace, Point3, Vector3};

/// Tolerance used when deciding whether a point lies on a face.
const FACE_EPSILON: f32 = 1e-5;

/// An axis-aligned box stored as a center point and half extents.
///
/// The half extents (`dimensions`) are never negative; constructors take their absolute
/// value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    /// Center of the box.
    pub position: Point3<f32>,
    /// Half extents along each axis.
    pub dimensions: Vector3<f32>,
}

impl Aabb {
    /// Creates a box centered on `position` with the given half extents.
    pub fn new(position: Point3<f32>, dimensions: Vector3<f32>) -> Self {
        Self {
            position,
            dimensions: Vector3::new(dimensions.x.abs(), dimensions.y.abs(), dimensions.z.abs()),
        }
    }

    /// Returns the same box moved so that its center is `position`.
    pub fn centered_at(&self, position: Point3<f32>) -> Self {
        Self {
            position,
            dimensions: self.dimensions,
        }
    }

    /// Lowest corner.
    pub fn min(&self) -> Point3<f32> {
        self.position - self.dimensions
    }

    /// Highest corner.
    pub fn max(&self) -> Point3<f32> {
        self.position + self.dimensions
    }

    /// Returns true if the interiors of both boxes intersect on all three axes.
    ///
    /// Boxes that merely touch along a face do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let distance = self.position - other.position;
        let reach = self.dimensions + other.dimensions;
        distance.x.abs() < reach.x && distance.y.abs() < reach.y && distance.z.abs() < reach.z
    }

    /// Returns true if `point` lies inside the box or on its boundary.
    pub fn contains(&self, point: Point3<f32>) -> bool {
        let (min, max) = (self.min(), self.max());
        (min.x..=max.x).contains(&point.x)
            && (min.y..=max.y).contains(&point.y)
            && (min.z..=max.z).contains(&point.z)
    }

    /// Clamps each coordinate of `point` into the box.
    pub fn closest_point_to(&self, point: Point3<f32>) -> Point3<f32> {
        let (min, max) = (self.min(), self.max());
        Point3::new(
            point.x.clamp(min.x, max.x),
            point.y.clamp(min.y, max.y),
            point.z.clamp(min.z, max.z),
        )
    }

    /// Center of the face whose outward normal is `normal`.
    pub fn center_point_for_normal(&self, normal: Vector3<f32>) -> Point3<f32> {
        Point3::new(
            self.position.x + normal.x * self.dimensions.x,
            self.position.y + normal.y * self.dimensions.y,
            self.position.z + normal.z * self.dimensions.z,
        )
    }

    /// Returns the outward normal of the face nearest to `origin` among the faces that
    /// `point_on_aabb` lies on.
    ///
    /// Only axes enabled by the mask are considered, which keeps vertical and horizontal
    /// collision handling apart. Returns the zero vector when the point lies on no enabled
    /// face (for example when it is strictly inside the box).
    pub fn normal_for_closest_face(
        &self,
        point_on_aabb: Point3<f32>,
        origin: Point3<f32>,
        test_x: bool,
        test_y: bool,
        test_z: bool,
    ) -> Vector3<f32> {
        let (min, max) = (self.min(), self.max());
        let on = |a: f32, b: f32| (a - b).abs() <= FACE_EPSILON;

        let candidates = [
            (test_z && on(point_on_aabb.z, min.z), Vector3::new(0.0, 0.0, -1.0)),
            (test_z && on(point_on_aabb.z, max.z), Vector3::new(0.0, 0.0, 1.0)),
            (test_x && on(point_on_aabb.x, min.x), Vector3::new(-1.0, 0.0, 0.0)),
            (test_x && on(point_on_aabb.x, max.x), Vector3::new(1.0, 0.0, 0.0)),
            (test_y && on(point_on_aabb.y, min.y), Vector3::new(0.0, -1.0, 0.0)),
            (test_y && on(point_on_aabb.y, max.y), Vector3::new(0.0, 1.0, 0.0)),
        ];

        let mut closest = Vector3::new(0.0, 0.0, 0.0);
        let mut min_distance = f32::MAX;
        for (_, normal) in candidates.iter().filter(|(enabled, _)| *enabled) {
            let distance = (self.center_point_for_normal(*normal) - origin).magnitude2();
            if distance < min_distance {
                min_distance = distance;
                closest = *normal;
            }
        }
        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn dimensions_are_never_negative() {
        let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(-1.0, 2.0, -3.0));
        assert_eq!(aabb.dimensions, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = unit_box();
        let touching = unit_box().centered_at(Point3::new(1.0, 0.0, 0.0));
        let overlapping = unit_box().centered_at(Point3::new(0.9, 0.3, -0.2));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&overlapping));
        assert!(overlapping.overlaps(&a));
    }

    #[test]
    fn containment_includes_the_boundary() {
        let a = unit_box();
        assert!(a.contains(Point3::new(0.5, -0.5, 0.0)));
        assert!(!a.contains(Point3::new(0.51, 0.0, 0.0)));
    }

    #[test]
    fn closest_point_clamps_per_axis() {
        let a = unit_box();
        assert_eq!(
            a.closest_point_to(Point3::new(3.0, 0.2, -9.0)),
            Point3::new(0.5, 0.2, -0.5)
        );
        assert_eq!(a.closest_point_to(Point3::new(0.1, 0.1, 0.1)), Point3::new(0.1, 0.1, 0.1));
    }

    #[test]
    fn closest_face_normal_respects_the_axis_mask() {
        let a = unit_box();
        let origin = Point3::new(2.0, 3.0, 0.0);
        let point = a.closest_point_to(origin);

        assert_eq!(
            a.normal_for_closest_face(point, origin, true, true, true),
            Vector3::new(0.0, 1.0, 0.0)
        );
        assert_eq!(
            a.normal_for_closest_face(point, origin, true, false, true),
            Vector3::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn interior_point_has_no_face() {
        let a = unit_box();
        let inside = Point3::new(0.1, 0.0, 0.1);
        assert_eq!(
            a.normal_for_closest_face(inside, inside, true, true, true),
            Vector3::new(0.0, 0.0, 0.0)
        );
    }
}
