use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Default tolerances used when comparing floating point geometry.
pub struct Precision;

impl Precision {
    /// Two points closer than this are considered coincident.
    pub const DISTANCE: f64 = 1e-6;
    /// Angles (in radians) smaller than this are considered zero.
    pub const ANGLE: f64 = 1e-8;
}

/// Returns `true` if the length of `vector` is below `tolerance`.
#[must_use]
pub fn is_zero(vector: DVec3, tolerance: f64) -> bool {
    vector.length() < tolerance
}

/// Returns `true` if the distance between `a` and `b` is below `tolerance`.
#[must_use]
pub fn is_equal(a: DVec3, b: DVec3, tolerance: f64) -> bool {
    is_zero(a - b, tolerance)
}

/// A located, right-handed coordinate frame.
///
/// The local y axis is derived as `normal × x_dir`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: DVec3,
    pub normal: DVec3,
    pub x_dir: DVec3,
}

impl Plane {
    pub const XY: Self = Self {
        origin: DVec3::ZERO,
        normal: DVec3::Z,
        x_dir: DVec3::X,
    };
    pub const YZ: Self = Self {
        origin: DVec3::ZERO,
        normal: DVec3::X,
        x_dir: DVec3::Y,
    };
    pub const ZX: Self = Self {
        origin: DVec3::ZERO,
        normal: DVec3::Y,
        x_dir: DVec3::Z,
    };

    /// Creates a plane, normalizing `normal` and projecting `x_dir` into the plane.
    ///
    /// Returns `None` if either direction is degenerate or both are parallel.
    #[must_use]
    pub fn new(origin: DVec3, normal: DVec3, x_dir: DVec3) -> Option<Self> {
        let normal = normal.try_normalize()?;
        let x_dir = (x_dir - normal * x_dir.dot(normal)).try_normalize()?;
        Some(Self {
            origin,
            normal,
            x_dir,
        })
    }

    /// Creates a plane through `origin` with an arbitrary in-plane x axis.
    #[must_use]
    pub fn from_normal(origin: DVec3, normal: DVec3) -> Option<Self> {
        let normal = normal.try_normalize()?;
        Some(Self {
            origin,
            normal,
            x_dir: normal.any_orthonormal_vector(),
        })
    }

    #[must_use]
    pub fn y_dir(&self) -> DVec3 {
        self.normal.cross(self.x_dir)
    }

    /// Maps local plane coordinates to world space.
    #[must_use]
    pub fn point_at(&self, u: f64, v: f64) -> DVec3 {
        self.origin + self.x_dir * u + self.y_dir() * v
    }

    /// Returns the local `(u, v)` coordinates of the projection of `point`.
    #[must_use]
    pub fn project(&self, point: DVec3) -> (f64, f64) {
        let d = point - self.origin;
        (d.dot(self.x_dir), d.dot(self.y_dir()))
    }

    /// Signed distance of `point` from the plane along its normal.
    #[must_use]
    pub fn distance(&self, point: DVec3) -> f64 {
        (point - self.origin).dot(self.normal)
    }
}

/// A half line, used as the axis of revolutions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub location: DVec3,
    pub direction: DVec3,
}

impl Ray {
    #[must_use]
    pub const fn new(location: DVec3, direction: DVec3) -> Self {
        Self {
            location,
            direction,
        }
    }
}

/// An axis aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoundingBox {
    /// Returns the smallest box containing all `points`, or `None` if there are none.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let init = Self {
            min: first,
            max: first,
        };
        Some(points.fold(init, |bb, p| Self {
            min: bb.min.min(p),
            max: bb.max.max(p),
        }))
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns `true` if the boxes intersect, enlarged by `tolerance`.
    #[must_use]
    pub fn overlaps(&self, other: &Self, tolerance: f64) -> bool {
        (self.min - tolerance).cmple(other.max).all()
            && (other.min - tolerance).cmple(self.max).all()
    }

    #[must_use]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }
}
