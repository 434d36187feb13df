use glam::DVec3;
use kernel::geom::{Plane, Ray};
use kernel::mock::{KernelCall, MockKernel, MAX_RECORDED_CALLS};
use kernel::{BooleanOp, Kernel, NativeShape, ShapeType};
use std::f64::consts::{FRAC_PI_2, TAU};

#[test]
fn test_calls_are_recorded_in_order() {
    let kernel = MockKernel::new();
    let _ = kernel.make_vertex(DVec3::ZERO).unwrap();
    let _ = kernel.make_arc(DVec3::Z, DVec3::ZERO, DVec3::X, FRAC_PI_2).unwrap();
    let _ = kernel.make_box(&Plane::XY, 1.0, 1.0, 1.0).unwrap();
    assert_eq!(
        kernel.calls(),
        vec![
            KernelCall::Vertex,
            KernelCall::Arc { angle: FRAC_PI_2 },
            KernelCall::Box
        ]
    );
    kernel.clear_calls();
    assert_eq!(kernel.call_count(), 0);
}

#[test]
fn test_call_log_keeps_the_latest_calls() {
    let kernel = MockKernel::new();
    let _ = kernel.make_line(DVec3::ZERO, DVec3::X).unwrap();
    for _ in 0..MAX_RECORDED_CALLS {
        let _ = kernel.make_vertex(DVec3::ZERO).unwrap();
    }
    assert_eq!(kernel.call_count(), MAX_RECORDED_CALLS);
    let calls = kernel.calls();
    assert_eq!(calls.first(), Some(&KernelCall::Vertex));
    assert!(!calls.contains(&KernelCall::Line));
}

#[test]
fn test_huge_angles_are_rejected() {
    let kernel = MockKernel::new();
    for angle in [f64::INFINITY, f64::NAN, 1e20] {
        let arc = kernel.make_arc(DVec3::Z, DVec3::ZERO, DVec3::X, angle);
        let message = arc.err().map(|err| err.message().to_string());
        assert!(message.is_some_and(|m| m.contains("segments")), "{angle}");
    }
    let face = kernel.make_rect(&Plane::XY, 1.0, 1.0).unwrap();
    let axis = Ray::new(DVec3::new(-1.0, 0.0, 0.0), DVec3::Y);
    assert!(kernel.revolve(&face, &axis, 1e20).is_err());
    assert!(kernel.revolve(&face, &axis, -f64::INFINITY).is_err());
}

#[test]
fn test_live_shapes_are_counted() {
    let kernel = MockKernel::new();
    let solid = kernel.make_box(&Plane::XY, 1.0, 2.0, 3.0).unwrap();
    assert_eq!(kernel.live_shapes(), 1);
    let faces = solid.sub_shapes(ShapeType::Face);
    assert_eq!(faces.len(), 6);
    assert_eq!(kernel.live_shapes(), 7);
    drop(faces);
    assert_eq!(kernel.live_shapes(), 1);
    drop(solid);
    assert_eq!(kernel.live_shapes(), 0);
}

#[test]
fn test_quarter_arc_end_point() {
    let kernel = MockKernel::new();
    let arc = kernel
        .make_arc(DVec3::Z, DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0), FRAC_PI_2)
        .unwrap();
    let (start, end) = arc.end_points().unwrap();
    assert!(start.distance(DVec3::new(2.0, 0.0, 0.0)) < 1e-9);
    assert!(end.distance(DVec3::new(0.0, 2.0, 0.0)) < 1e-9);
    // A polyline is a little shorter than the true arc
    assert!((arc.length() - std::f64::consts::PI).abs() < 1e-2);
    assert!(!arc.is_closed());
}

#[test]
fn test_circle_is_closed() {
    let kernel = MockKernel::new();
    let circle = kernel.make_circle(DVec3::Z, DVec3::ONE, 1.5).unwrap();
    assert!(circle.is_closed());
    let bb = circle.bounding_box().unwrap();
    assert!((bb.size().x - 3.0).abs() < 2e-2);
    assert!(bb.size().z.abs() < 1e-9);
}

#[test]
fn test_bezier_interpolates_end_points() {
    let kernel = MockKernel::new();
    let poles = [DVec3::ZERO, DVec3::new(1.0, 2.0, 0.0), DVec3::new(2.0, 0.0, 0.0)];
    let curve = kernel.make_bezier(&poles, Some(&[1.0, 3.0, 1.0][..])).unwrap();
    let (start, end) = curve.end_points().unwrap();
    assert!(start.distance(poles[0]) < 1e-12);
    assert!(end.distance(poles[2]) < 1e-12);

    let err = kernel.make_bezier(&poles, Some(&[1.0][..])).unwrap_err();
    assert_eq!(err.message(), "the number of weights does not match the poles");
}

#[test]
fn test_disconnected_wire_is_rejected() {
    let kernel = MockKernel::new();
    let a = kernel.make_line(DVec3::ZERO, DVec3::X).unwrap();
    let b = kernel.make_line(DVec3::Y, DVec3::ONE).unwrap();
    let err = kernel.make_wire(&[&a, &b]).unwrap_err();
    assert_eq!(err.to_string(), "the edges are not connected");
}

#[test]
fn test_open_wire_cannot_bound_a_face() {
    let kernel = MockKernel::new();
    let wire = kernel
        .make_polygon(&[DVec3::ZERO, DVec3::X, DVec3::ONE])
        .unwrap();
    let err = kernel.make_face(&[&wire]).unwrap_err();
    assert_eq!(err.message(), "the wire is not closed");
}

#[test]
fn test_non_planar_wire_is_rejected() {
    let kernel = MockKernel::new();
    let wire = kernel
        .make_polygon(&[
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::Y,
            DVec3::ZERO,
        ])
        .unwrap();
    let err = kernel.make_face(&[&wire]).unwrap_err();
    assert_eq!(err.message(), "the wire is not planar");
}

#[test]
fn test_combine_keeps_children_identity() {
    let kernel = MockKernel::new();
    let a = kernel.make_vertex(DVec3::ZERO).unwrap();
    let b = kernel.make_line(DVec3::ZERO, DVec3::X).unwrap();
    let c = kernel.make_box(&Plane::XY, 1.0, 1.0, 1.0).unwrap();
    let compound = kernel.combine(&[&a, &b, &c]).unwrap();
    assert_eq!(compound.shape_type(), ShapeType::Compound);
    let ids: Vec<u64> = compound.children().iter().map(NativeShape::topology_id).collect();
    assert_eq!(ids, vec![a.topology_id(), b.topology_id(), c.topology_id()]);
}

#[test]
fn test_prism_kinds() {
    let kernel = MockKernel::new();
    let vertex = kernel.make_vertex(DVec3::ZERO).unwrap();
    let edge = kernel.make_line(DVec3::ZERO, DVec3::X).unwrap();
    let face = kernel.make_rect(&Plane::XY, 1.0, 1.0).unwrap();

    let v = DVec3::new(0.0, 0.0, 2.0);
    assert_eq!(kernel.prism(&vertex, v).unwrap().shape_type(), ShapeType::Edge);
    assert_eq!(kernel.prism(&edge, v).unwrap().shape_type(), ShapeType::Face);
    let solid = kernel.prism(&face, v).unwrap();
    assert_eq!(solid.shape_type(), ShapeType::Solid);
    assert!((solid.area() - 10.0).abs() < 1e-9);

    let err = kernel.prism(&solid, v).unwrap_err();
    assert_eq!(err.message(), "cannot sweep a solid");
}

#[test]
fn test_full_revolution_has_no_caps() {
    let kernel = MockKernel::new();
    let face = kernel
        .make_rect(
            &Plane {
                origin: DVec3::new(1.0, 0.0, 0.0),
                normal: DVec3::Y,
                x_dir: DVec3::X,
            },
            1.0,
            1.0,
        )
        .unwrap();
    let axis = Ray::new(DVec3::ZERO, DVec3::Z);
    let torus = kernel.revolve(&face, &axis, TAU).unwrap();
    assert_eq!(torus.shape_type(), ShapeType::Solid);
    assert_eq!(torus.sub_shapes(ShapeType::Face).len(), 4);

    let half = kernel.revolve(&face, &axis, TAU / 2.0).unwrap();
    assert_eq!(half.sub_shapes(ShapeType::Face).len(), 6);
    let bb = half.bounding_box().unwrap();
    assert!((bb.min.x + 2.0).abs() < 1e-9);
    assert!((bb.max.x - 2.0).abs() < 1e-9);
}

#[test]
fn test_sweep_along_polyline() {
    let kernel = MockKernel::new();
    let profile = kernel.make_circle(DVec3::Z, DVec3::ZERO, 0.5).unwrap();
    let path = kernel
        .make_polygon(&[DVec3::ZERO, DVec3::Z, DVec3::new(1.0, 0.0, 2.0)])
        .unwrap();
    let tube = kernel.sweep(&profile, &path).unwrap();
    assert_eq!(tube.shape_type(), ShapeType::Face);
    let bb = tube.bounding_box().unwrap();
    assert!((bb.max.z - 2.0).abs() < 1e-9);

    let err = kernel.sweep(&profile, &tube).unwrap_err();
    assert_eq!(err.message(), "the sweep path must be a wire, got face");
}

#[test]
fn test_booleans() {
    let kernel = MockKernel::new();
    let a = kernel.make_box(&Plane::XY, 2.0, 2.0, 2.0).unwrap();
    let b = kernel
        .make_box(
            &Plane {
                origin: DVec3::ONE,
                ..Plane::XY
            },
            2.0,
            2.0,
            2.0,
        )
        .unwrap();
    let far = kernel
        .make_box(
            &Plane {
                origin: DVec3::splat(10.0),
                ..Plane::XY
            },
            1.0,
            1.0,
            1.0,
        )
        .unwrap();

    let fused = kernel.boolean(BooleanOp::Fuse, &a, &b).unwrap();
    assert_eq!(fused.shape_type(), ShapeType::Solid);
    assert_ne!(fused.topology_id(), a.topology_id());
    assert_eq!(fused.sub_shapes(ShapeType::Face).len(), 12);

    let cut = kernel.boolean(BooleanOp::Cut, &a, &far).unwrap();
    assert_eq!(cut.sub_shapes(ShapeType::Face).len(), 6);

    let err = kernel.boolean(BooleanOp::Common, &a, &far).unwrap_err();
    assert_eq!(err.message(), "the common part of the shapes is empty");

    let edge = kernel.make_line(DVec3::ZERO, DVec3::X).unwrap();
    let err = kernel.boolean(BooleanOp::Fuse, &a, &edge).unwrap_err();
    assert_eq!(
        err.message(),
        "the second operand of a boolean contains no faces"
    );
}

#[test]
fn test_thick_solid_join() {
    let kernel = MockKernel::new();
    let solid = kernel.make_box(&Plane::XY, 10.0, 20.0, 30.0).unwrap();
    let faces = solid.sub_shapes(ShapeType::Face);
    let top = &faces[1];
    assert_eq!(top.normal(), Some(DVec3::Z));

    let hollow = kernel.thick_solid_join(&solid, &[top], 1.0).unwrap();
    assert_eq!(hollow.shape_type(), ShapeType::Solid);
    assert_ne!(hollow.topology_id(), solid.topology_id());
    assert_eq!(hollow.sub_shapes(ShapeType::Face).len(), 10);

    let foreign = kernel.make_rect(&Plane::XY, 1.0, 1.0).unwrap();
    let err = kernel.thick_solid_join(&solid, &[&foreign], 1.0).unwrap_err();
    assert_eq!(err.message(), "a closing face is not a face of the shape");
}

#[test]
fn test_thick_solid_simple() {
    let kernel = MockKernel::new();
    let face = kernel.make_rect(&Plane::XY, 2.0, 3.0).unwrap();
    let plate = kernel.thick_solid_simple(&face, 0.5).unwrap();
    assert_eq!(plate.shape_type(), ShapeType::Solid);
    let bb = plate.bounding_box().unwrap();
    assert!((bb.size().z - 0.5).abs() < 1e-12);

    let edge = kernel.make_line(DVec3::ZERO, DVec3::X).unwrap();
    let err = kernel.thick_solid_simple(&edge, 0.5).unwrap_err();
    assert_eq!(err.message(), "a thick solid needs a face or shell, got edge");
}
