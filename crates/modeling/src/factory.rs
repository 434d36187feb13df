use glam::DVec3;
use kernel::geom::{self, Plane, Precision, Ray};
use kernel::{BooleanOp, Kernel};

use crate::convert::convert_shape_result;
use crate::guard::{ensure_occ_shape, ensure_occ_shapes};
use crate::settings::ModelingSettings;
use crate::shape::{
    Edge, Face, OccCompound, OccEdge, OccFace, OccSolid, OccVertex, OccWire, Session, SessionId,
    Shape, Wire,
};
use crate::{ModelingError, Result};

/// Creates shapes through a kernel session.
///
/// Each operation validates its input first and only calls the kernel for valid input. Angles
/// are given in degrees. Shapes passed in must have been created by this factory.
pub struct ShapeFactory<K: Kernel> {
    kernel: K,
    settings: ModelingSettings,
    session: Session,
}

fn reject<T>(operation: &str, err: ModelingError) -> Result<T> {
    log::trace!("{operation} rejected: {err}");
    Err(err)
}

fn check_finite(operation: &str, values: &[(&'static str, f64)]) -> Result<()> {
    match values.iter().find(|(_, v)| !v.is_finite()) {
        Some(&(name, _)) => reject(operation, ModelingError::NotFinite(name)),
        None => Ok(()),
    }
}

fn check_finite_vectors(operation: &str, vectors: &[(&'static str, DVec3)]) -> Result<()> {
    match vectors.iter().find(|(_, v)| !v.is_finite()) {
        Some(&(name, _)) => reject(operation, ModelingError::NotFinite(name)),
        None => Ok(()),
    }
}

/// Degrees to radians, rejecting angles that are not finite or too small.
fn check_angle(operation: &str, degrees: f64) -> Result<f64> {
    check_finite(operation, &[("angle", degrees)])?;
    let radians = degrees.to_radians();
    if radians.abs() < Precision::ANGLE {
        return reject(operation, ModelingError::AngleTooSmall);
    }
    Ok(radians)
}

impl<K: Kernel> ShapeFactory<K> {
    pub fn new(kernel: K, settings: ModelingSettings) -> Self {
        let session = Session::new(settings.mesh.clone());
        Self {
            kernel,
            settings,
            session,
        }
    }

    pub const fn kernel(&self) -> &K {
        &self.kernel
    }

    pub const fn settings(&self) -> &ModelingSettings {
        &self.settings
    }

    pub const fn session(&self) -> SessionId {
        self.session.id()
    }

    const fn tolerance(&self) -> f64 {
        self.settings.linear_tolerance
    }

    fn is_zero(&self, vector: DVec3) -> bool {
        geom::is_zero(vector, self.tolerance())
    }

    fn native<'a, S: Shape + ?Sized>(&self, shape: &'a S) -> &'a K::Shape {
        ensure_occ_shape::<K, S>(self.session.id(), shape)
    }

    fn natives<'a, S: Shape + ?Sized>(&self, shapes: &[&'a S]) -> Vec<&'a K::Shape> {
        ensure_occ_shapes::<K, S>(self.session.id(), shapes)
    }

    /// # Errors
    ///
    /// Returns [`ModelingError::NotFinite`] for a point with infinite or NaN coordinates.
    pub fn point(&self, point: DVec3) -> Result<OccVertex<K>> {
        check_finite_vectors("point", &[("point", point)])?;
        convert_shape_result::<K, _>(&self.session, self.kernel.make_vertex(point))
    }

    /// A straight edge between two points.
    ///
    /// # Errors
    ///
    /// Returns [`ModelingError::PointsTooClose`] if the points coincide.
    pub fn line(&self, start: DVec3, end: DVec3) -> Result<OccEdge<K>> {
        check_finite_vectors("line", &[("start point", start), ("end point", end)])?;
        if geom::is_equal(start, end, self.tolerance()) {
            return reject("line", ModelingError::PointsTooClose);
        }
        convert_shape_result::<K, _>(&self.session, self.kernel.make_line(start, end))
    }

    /// An arc around `center`, starting at `start` and turning `angle` degrees about `normal`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero normal, a zero radius, a zero angle or values that
    /// are not finite.
    pub fn arc(
        &self,
        normal: DVec3,
        center: DVec3,
        start: DVec3,
        angle: f64,
    ) -> Result<OccEdge<K>> {
        check_finite_vectors(
            "arc",
            &[
                ("normal", normal),
                ("center", center),
                ("start point", start),
            ],
        )?;
        if self.is_zero(normal) {
            return reject("arc", ModelingError::ZeroVector("normal"));
        }
        if geom::is_equal(start, center, self.tolerance()) {
            return reject("arc", ModelingError::RadiusTooSmall);
        }
        let angle = check_angle("arc", angle)?;
        let arc = self.kernel.make_arc(normal, center, start, angle);
        convert_shape_result::<K, _>(&self.session, arc)
    }

    /// # Errors
    ///
    /// Returns a validation error for a zero normal, a radius below the tolerance or values that
    /// are not finite.
    pub fn circle(&self, normal: DVec3, center: DVec3, radius: f64) -> Result<OccEdge<K>> {
        check_finite_vectors("circle", &[("normal", normal), ("center", center)])?;
        check_finite("circle", &[("radius", radius)])?;
        if self.is_zero(normal) {
            return reject("circle", ModelingError::ZeroVector("normal"));
        }
        if radius < self.tolerance() {
            return reject("circle", ModelingError::RadiusTooSmall);
        }
        let circle = self.kernel.make_circle(normal, center, radius);
        convert_shape_result::<K, _>(&self.session, circle)
    }

    /// A bezier curve with the given poles. Weights make it rational.
    ///
    /// # Errors
    ///
    /// Returns a validation error for less than two poles, or for weights that do not match the
    /// poles or are not positive.
    pub fn bezier(&self, points: &[DVec3], weights: Option<&[f64]>) -> Result<OccEdge<K>> {
        if points.len() < 2 {
            return reject(
                "bezier",
                ModelingError::NotEnoughPoints {
                    min: 2,
                    found: points.len(),
                },
            );
        }
        if !points.iter().all(|p| p.is_finite()) {
            return reject("bezier", ModelingError::NotFinite("pole"));
        }
        if let Some(weights) = weights {
            if weights.len() != points.len() {
                return reject(
                    "bezier",
                    ModelingError::WeightCountMismatch {
                        expected: points.len(),
                        found: weights.len(),
                    },
                );
            }
            if let Some(&w) = weights.iter().find(|w| !w.is_finite() || **w <= 0.0) {
                return reject("bezier", ModelingError::InvalidWeight(w));
            }
        }
        convert_shape_result::<K, _>(&self.session, self.kernel.make_bezier(points, weights))
    }

    /// A wire of straight edges through `points`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelingError::NotEnoughPoints`] for less than two points, or a kernel error if
    /// consecutive points coincide.
    pub fn polygon(&self, points: &[DVec3]) -> Result<OccWire<K>> {
        if points.len() < 2 {
            return reject(
                "polygon",
                ModelingError::NotEnoughPoints {
                    min: 2,
                    found: points.len(),
                },
            );
        }
        if !points.iter().all(|p| p.is_finite()) {
            return reject("polygon", ModelingError::NotFinite("point"));
        }
        convert_shape_result::<K, _>(&self.session, self.kernel.make_polygon(points))
    }

    /// # Errors
    ///
    /// Returns [`ModelingError::EmptyInput`] without edges, or a kernel error if the edges are
    /// not connected.
    ///
    /// # Panics
    ///
    /// Panics if an edge was not created by this factory.
    pub fn wire(&self, edges: &[&dyn Edge]) -> Result<OccWire<K>> {
        if edges.is_empty() {
            return reject("wire", ModelingError::EmptyInput("edges"));
        }
        let edges = self.natives(edges);
        convert_shape_result::<K, _>(&self.session, self.kernel.make_wire(&edges))
    }

    /// A planar face bounded by the first wire. Further wires are holes.
    ///
    /// # Errors
    ///
    /// Returns [`ModelingError::EmptyInput`] without wires, or a kernel error if the outer wire
    /// is open or not planar.
    ///
    /// # Panics
    ///
    /// Panics if a wire was not created by this factory.
    pub fn face(&self, wires: &[&dyn Wire]) -> Result<OccFace<K>> {
        if wires.is_empty() {
            return reject("face", ModelingError::EmptyInput("wires"));
        }
        let wires = self.natives(wires);
        convert_shape_result::<K, _>(&self.session, self.kernel.make_face(&wires))
    }

    /// A rectangle spanning `dx` along the x direction and `dy` along the y direction of `plane`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelingError::SizeTooSmall`] if a side is shorter than the tolerance, or
    /// [`ModelingError::InvalidPlane`] if the plane has no valid frame.
    pub fn rect(&self, plane: &Plane, dx: f64, dy: f64) -> Result<OccFace<K>> {
        let plane = Self::check_plane("rect", plane)?;
        self.check_sizes("rect", &[("dx", dx), ("dy", dy)])?;
        convert_shape_result::<K, _>(&self.session, self.kernel.make_rect(&plane, dx, dy))
    }

    /// A box with a corner at the origin of `plane`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelingError::SizeTooSmall`] if a side is shorter than the tolerance, or
    /// [`ModelingError::InvalidPlane`] if the plane has no valid frame.
    pub fn box_(&self, plane: &Plane, dx: f64, dy: f64, dz: f64) -> Result<OccSolid<K>> {
        let plane = Self::check_plane("box", plane)?;
        self.check_sizes("box", &[("dx", dx), ("dy", dy), ("dz", dz)])?;
        convert_shape_result::<K, _>(&self.session, self.kernel.make_box(&plane, dx, dy, dz))
    }

    /// Normalizes the frame of `plane`.
    fn check_plane(operation: &str, plane: &Plane) -> Result<Plane> {
        check_finite_vectors(
            operation,
            &[
                ("plane origin", plane.origin),
                ("plane normal", plane.normal),
                ("plane x direction", plane.x_dir),
            ],
        )?;
        match Plane::new(plane.origin, plane.normal, plane.x_dir) {
            Some(plane) => Ok(plane),
            None => reject(operation, ModelingError::InvalidPlane),
        }
    }

    fn check_sizes(&self, operation: &str, sizes: &[(&'static str, f64)]) -> Result<()> {
        check_finite(operation, sizes)?;
        match sizes.iter().find(|(_, d)| d.abs() < self.tolerance()) {
            Some(&(name, value)) => reject(operation, ModelingError::SizeTooSmall { name, value }),
            None => Ok(()),
        }
    }

    /// Extrudes `shape` along `vector`, raising its dimension by one.
    ///
    /// # Errors
    ///
    /// Returns [`ModelingError::ZeroVector`] for a zero vector, or a kernel error.
    ///
    /// # Panics
    ///
    /// Panics if `shape` was not created by this factory.
    pub fn prism(&self, shape: &dyn Shape, vector: DVec3) -> Result<Box<dyn Shape>> {
        check_finite_vectors("prism", &[("vector", vector)])?;
        if self.is_zero(vector) {
            return reject("prism", ModelingError::ZeroVector("vector"));
        }
        let shape = self.native(shape);
        convert_shape_result::<K, _>(&self.session, self.kernel.prism(shape, vector))
    }

    /// Sweeps `profile` along `path`.
    ///
    /// # Errors
    ///
    /// Returns a kernel error if the profile can not be swept.
    ///
    /// # Panics
    ///
    /// Panics if a shape was not created by this factory.
    pub fn sweep(&self, profile: &dyn Shape, path: &dyn Wire) -> Result<Box<dyn Shape>> {
        let profile = self.native(profile);
        let path = self.native(path);
        convert_shape_result::<K, _>(&self.session, self.kernel.sweep(profile, path))
    }

    /// Revolves `profile` by `angle` degrees around `axis`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero axis direction, a zero angle or values that are not
    /// finite.
    ///
    /// # Panics
    ///
    /// Panics if `profile` was not created by this factory.
    pub fn revolve(&self, profile: &dyn Shape, axis: &Ray, angle: f64) -> Result<Box<dyn Shape>> {
        check_finite_vectors(
            "revolve",
            &[
                ("axis location", axis.location),
                ("axis direction", axis.direction),
            ],
        )?;
        if self.is_zero(axis.direction) {
            return reject("revolve", ModelingError::ZeroVector("axis direction"));
        }
        let angle = check_angle("revolve", angle)?;
        let profile = self.native(profile);
        convert_shape_result::<K, _>(&self.session, self.kernel.revolve(profile, axis, angle))
    }

    fn boolean(&self, op: BooleanOp, a: &dyn Shape, b: &dyn Shape) -> Result<Box<dyn Shape>> {
        let a = self.native(a);
        let b = self.native(b);
        convert_shape_result::<K, _>(&self.session, self.kernel.boolean(op, a, b))
    }

    /// The volume shared by both shapes.
    ///
    /// # Errors
    ///
    /// Returns a kernel error, e.g. if the shapes do not intersect.
    ///
    /// # Panics
    ///
    /// Panics if a shape was not created by this factory.
    pub fn boolean_common(&self, a: &dyn Shape, b: &dyn Shape) -> Result<Box<dyn Shape>> {
        self.boolean(BooleanOp::Common, a, b)
    }

    /// `a` with `b` removed.
    ///
    /// # Errors
    ///
    /// Returns a kernel error.
    ///
    /// # Panics
    ///
    /// Panics if a shape was not created by this factory.
    pub fn boolean_cut(&self, a: &dyn Shape, b: &dyn Shape) -> Result<Box<dyn Shape>> {
        self.boolean(BooleanOp::Cut, a, b)
    }

    /// The union of both shapes.
    ///
    /// # Errors
    ///
    /// Returns a kernel error.
    ///
    /// # Panics
    ///
    /// Panics if a shape was not created by this factory.
    pub fn boolean_fuse(&self, a: &dyn Shape, b: &dyn Shape) -> Result<Box<dyn Shape>> {
        self.boolean(BooleanOp::Fuse, a, b)
    }

    /// Same as [`Self::boolean_fuse`].
    ///
    /// # Errors
    ///
    /// Returns a kernel error.
    ///
    /// # Panics
    ///
    /// Panics if a shape was not created by this factory.
    pub fn fuse(&self, bottom: &dyn Shape, top: &dyn Shape) -> Result<Box<dyn Shape>> {
        self.boolean_fuse(bottom, top)
    }

    /// Groups shapes into a compound. The children keep the identity of the given shapes.
    ///
    /// # Errors
    ///
    /// Returns [`ModelingError::EmptyInput`] without shapes.
    ///
    /// # Panics
    ///
    /// Panics if a shape was not created by this factory.
    pub fn combine(&self, shapes: &[&dyn Shape]) -> Result<OccCompound<K>> {
        if shapes.is_empty() {
            return reject("combine", ModelingError::EmptyInput("shapes"));
        }
        let shapes = self.natives(shapes);
        convert_shape_result::<K, _>(&self.session, self.kernel.combine(&shapes))
    }

    /// Gives a face or shell a thickness.
    ///
    /// # Errors
    ///
    /// Returns [`ModelingError::ThicknessTooSmall`] for a zero thickness, or a kernel error.
    ///
    /// # Panics
    ///
    /// Panics if `shape` was not created by this factory.
    pub fn make_thick_solid_by_simple(
        &self,
        shape: &dyn Shape,
        thickness: f64,
    ) -> Result<Box<dyn Shape>> {
        self.check_thickness(thickness)?;
        let shape = self.native(shape);
        let solid = self.kernel.thick_solid_simple(shape, thickness);
        convert_shape_result::<K, _>(&self.session, solid)
    }

    /// Hollows a solid, opening it at `closing_faces`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelingError::ThicknessTooSmall`] for a zero thickness, or a kernel error.
    ///
    /// # Panics
    ///
    /// Panics if a shape was not created by this factory.
    pub fn make_thick_solid_by_join(
        &self,
        shape: &dyn Shape,
        closing_faces: &[&dyn Face],
        thickness: f64,
    ) -> Result<Box<dyn Shape>> {
        self.check_thickness(thickness)?;
        let shape = self.native(shape);
        let closing_faces = self.natives(closing_faces);
        let solid = self.kernel.thick_solid_join(shape, &closing_faces, thickness);
        convert_shape_result::<K, _>(&self.session, solid)
    }

    fn check_thickness(&self, thickness: f64) -> Result<()> {
        check_finite("thick solid", &[("thickness", thickness)])?;
        if thickness.abs() < self.tolerance() {
            return reject("thick solid", ModelingError::ThicknessTooSmall);
        }
        Ok(())
    }
}

impl<K: Kernel + Default> Default for ShapeFactory<K> {
    fn default() -> Self {
        Self::new(K::default(), ModelingSettings::default())
    }
}
