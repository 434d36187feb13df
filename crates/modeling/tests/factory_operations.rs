mod common;

use common::setup;
use glam::DVec3;
use kernel::geom::{Plane, Ray};
use kernel::mesh::LineType;
use kernel::mock::{KernelCall, MockKernel};
use kernel::BooleanOp;
use modeling::settings::MeshStyle;
use modeling::shape::{Edge, Face, OccFace, OccShape, Shape, Solid, Vertex, Wire};
use modeling::{ModelingError, ModelingSettings, ShapeFactory, ShapeType};
use wasm_bindgen_test::*;

#[wasm_bindgen_test(unsupported = test)]
fn test_point_and_line() {
    let factory = setup();
    let point = factory.point(DVec3::new(1.0, 2.0, 3.0)).unwrap();
    assert_eq!(point.point(), DVec3::new(1.0, 2.0, 3.0));
    assert_eq!(point.shape_type(), ShapeType::Vertex);

    let line = factory.line(DVec3::ZERO, DVec3::new(3.0, 4.0, 0.0)).unwrap();
    assert_eq!(line.start(), DVec3::ZERO);
    assert_eq!(line.end(), DVec3::new(3.0, 4.0, 0.0));
    assert!((line.length() - 5.0).abs() < 1e-12);
    assert!(!line.is_closed());
}

#[wasm_bindgen_test(unsupported = test)]
fn test_profile_to_solid() {
    let factory = setup();
    let a = factory.line(DVec3::ZERO, DVec3::X).unwrap();
    let b = factory.line(DVec3::X, DVec3::new(1.0, 1.0, 0.0)).unwrap();
    let c = factory.line(DVec3::new(1.0, 1.0, 0.0), DVec3::ZERO).unwrap();
    let wire = factory.wire(&[&a, &b, &c]).unwrap();
    assert!(wire.is_closed());
    assert_eq!(wire.edges().len(), 3);

    let face = factory.face(&[&wire]).unwrap();
    assert!((face.area() - 0.5).abs() < 1e-12);
    assert_eq!(face.normal(), Some(DVec3::Z));
    let outer = face.outer_wire().unwrap();
    assert!(outer.is_closed());

    let prism = factory.prism(&face, DVec3::new(0.0, 0.0, 2.0)).unwrap();
    assert_eq!(prism.shape_type(), ShapeType::Solid);
    assert_eq!(prism.sub_shapes(ShapeType::Face).len(), 5);
    let bb = prism.bounding_box().unwrap();
    assert_eq!(bb.max, DVec3::new(1.0, 1.0, 2.0));
}

#[wasm_bindgen_test(unsupported = test)]
fn test_kernel_errors_keep_their_message() {
    let factory = setup();
    let a = factory.line(DVec3::ZERO, DVec3::X).unwrap();
    let b = factory.line(DVec3::Y, DVec3::ONE).unwrap();
    let err = factory.wire(&[&a, &b]).unwrap_err();
    assert_eq!(
        err,
        ModelingError::Kernel("the edges are not connected".to_string())
    );
    assert!(!err.is_validation());

    let open = factory
        .polygon(&[DVec3::ZERO, DVec3::X, DVec3::ONE])
        .unwrap();
    let err = factory.face(&[&open]).unwrap_err();
    assert_eq!(err, ModelingError::Kernel("the wire is not closed".into()));
}

#[wasm_bindgen_test(unsupported = test)]
fn test_hollow_box_is_a_new_solid() {
    let factory = setup();
    let solid = factory.box_(&Plane::XY, 10.0, 20.0, 30.0).unwrap();
    assert_eq!(solid.shells().len(), 1);
    let faces = solid.shells()[0].faces();
    assert_eq!(faces.len(), 6);
    let top = faces
        .iter()
        .find(|f| f.normal() == Some(DVec3::Z))
        .unwrap();

    let hollow = factory
        .make_thick_solid_by_join(&solid, &[top.as_ref()], 1.0)
        .unwrap();
    assert_eq!(hollow.shape_type(), ShapeType::Solid);
    assert!(!hollow.is_same(&solid));
    assert_eq!(hollow.sub_shapes(ShapeType::Face).len(), 10);
    assert_eq!(
        factory.kernel().calls().last(),
        Some(&KernelCall::ThickSolidJoin)
    );
}

#[wasm_bindgen_test(unsupported = test)]
fn test_thick_plate() {
    let factory = setup();
    let face = factory.rect(&Plane::XY, 2.0, 3.0).unwrap();
    let plate = factory.make_thick_solid_by_simple(&face, 0.5).unwrap();
    assert_eq!(plate.shape_type(), ShapeType::Solid);
    assert!((plate.bounding_box().unwrap().size().z - 0.5).abs() < 1e-12);

    let edge = factory.line(DVec3::ZERO, DVec3::X).unwrap();
    let err = factory.make_thick_solid_by_simple(&edge, 0.5).unwrap_err();
    assert_eq!(
        err,
        ModelingError::Kernel("a thick solid needs a face or shell, got edge".into())
    );
}

#[wasm_bindgen_test(unsupported = test)]
fn test_combine_keeps_order_and_identity() {
    let factory = setup();
    let a = factory.point(DVec3::ZERO).unwrap();
    let b = factory.line(DVec3::ZERO, DVec3::X).unwrap();
    let c = factory.box_(&Plane::XY, 1.0, 1.0, 1.0).unwrap();
    let compound = factory.combine(&[&a, &b, &c]).unwrap();
    assert_eq!(compound.shape_type(), ShapeType::Compound);

    let children = compound.children();
    assert_eq!(children.len(), 3);
    assert!(children[0].is_same(&a));
    assert!(children[1].is_same(&b));
    assert!(children[2].is_same(&c));
    assert!(!children[0].is_same(&b));
    assert_eq!(
        children.iter().map(|c| c.shape_type()).collect::<Vec<_>>(),
        vec![ShapeType::Vertex, ShapeType::Edge, ShapeType::Solid]
    );
}

#[wasm_bindgen_test(unsupported = test)]
fn test_booleans() {
    let factory = setup();
    let a = factory.box_(&Plane::XY, 2.0, 2.0, 2.0).unwrap();
    let b = factory
        .box_(
            &Plane {
                origin: DVec3::ONE,
                ..Plane::XY
            },
            2.0,
            2.0,
            2.0,
        )
        .unwrap();

    let common = factory.boolean_common(&a, &b).unwrap();
    let cut = factory.boolean_cut(&a, &b).unwrap();
    let fused = factory.boolean_fuse(&a, &b).unwrap();
    let aliased = factory.fuse(&a, &b).unwrap();
    for shape in [&common, &cut, &fused, &aliased] {
        assert_eq!(shape.shape_type(), ShapeType::Solid);
        assert!(!shape.is_same(&a));
    }
    assert_eq!(
        fused.sub_shapes(ShapeType::Face).len(),
        aliased.sub_shapes(ShapeType::Face).len()
    );

    let calls = factory.kernel().calls();
    assert_eq!(
        calls[calls.len() - 4..],
        [
            KernelCall::Boolean(BooleanOp::Common),
            KernelCall::Boolean(BooleanOp::Cut),
            KernelCall::Boolean(BooleanOp::Fuse),
            KernelCall::Boolean(BooleanOp::Fuse),
        ]
    );
}

#[wasm_bindgen_test(unsupported = test)]
fn test_sweep_and_revolve() {
    let factory = setup();
    let profile = factory.circle(DVec3::Z, DVec3::ZERO, 0.25).unwrap();
    let path = factory
        .polygon(&[DVec3::ZERO, DVec3::Z, DVec3::new(1.0, 0.0, 1.0)])
        .unwrap();
    let tube = factory.sweep(&profile, &path).unwrap();
    assert_eq!(tube.shape_type(), ShapeType::Face);

    let section = factory
        .rect(
            &Plane {
                origin: DVec3::new(1.0, 0.0, 0.0),
                normal: DVec3::Y,
                x_dir: DVec3::X,
            },
            1.0,
            1.0,
        )
        .unwrap();
    let ring = factory
        .revolve(&section, &Ray::new(DVec3::ZERO, DVec3::Z), 360.0)
        .unwrap();
    assert_eq!(ring.shape_type(), ShapeType::Solid);
    assert_eq!(ring.sub_shapes(ShapeType::Face).len(), 4);
}

#[wasm_bindgen_test(unsupported = test)]
fn test_bezier_and_arc_end_points() {
    let factory = setup();
    let curve = factory
        .bezier(&[DVec3::ZERO, DVec3::Y, DVec3::X], None)
        .unwrap();
    assert!(curve.start().distance(DVec3::ZERO) < 1e-12);
    assert!(curve.end().distance(DVec3::X) < 1e-12);

    let arc = factory
        .arc(DVec3::Z, DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0), -90.0)
        .unwrap();
    assert!(arc.end().distance(DVec3::new(0.0, -2.0, 0.0)) < 1e-9);

    let circle = factory.circle(DVec3::Z, DVec3::ZERO, 1.0).unwrap();
    assert!(circle.is_closed());
}

#[wasm_bindgen_test(unsupported = test)]
fn test_mesh_uses_style_from_settings() {
    let settings = ModelingSettings {
        mesh: MeshStyle {
            line_type: LineType::Dashed,
            line_width: 3.0,
            face_color: Some([0.2, 0.4, 0.6]),
            edge_color: Some([0.0, 0.0, 0.0]),
        },
        ..ModelingSettings::default()
    };
    let factory = ShapeFactory::new(MockKernel::new(), settings);
    let solid = factory.box_(&Plane::XY, 1.0, 1.0, 1.0).unwrap();
    let mesh = solid.mesh();
    assert_eq!(mesh.faces.triangle_count(), 12);
    assert_eq!(mesh.edges.groups.len(), 12);
    assert_eq!(mesh.faces.color, Some([0.2, 0.4, 0.6]));
    assert_eq!(mesh.edges.line_type, LineType::Dashed);
    assert_eq!(mesh.edges.line_width, 3.0);

    // Sub-shapes are styled the same way
    let face = &solid.sub_shapes(ShapeType::Face)[0];
    assert_eq!(face.mesh().edges.line_type, LineType::Dashed);
}

#[wasm_bindgen_test(unsupported = test)]
fn test_typed_conversion_checks_kind() {
    let factory = setup();
    let solid = factory.box_(&Plane::XY, 1.0, 1.0, 1.0).unwrap();
    let untyped: OccShape<MockKernel> = solid.into_occ();
    let err = OccFace::try_from(untyped).unwrap_err();
    assert_eq!(
        err,
        ModelingError::UnexpectedShapeType {
            expected: ShapeType::Face,
            found: ShapeType::Solid
        }
    );
}
