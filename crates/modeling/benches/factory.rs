use criterion::{criterion_group, criterion_main, Criterion};
use glam::DVec3;
use kernel::geom::Plane;
use kernel::mock::MockKernel;
use modeling::shape::{Face, Shape, Solid};
use modeling::{ModelingSettings, ShapeFactory};
use std::hint::black_box;

fn hollow_box(factory: &ShapeFactory<MockKernel>, size: f64) -> Box<dyn Shape> {
    let solid = factory.box_(&Plane::XY, size, size, size).unwrap();
    let faces = solid.shells()[0].faces();
    let top = faces.iter().find(|f| f.normal() == Some(DVec3::Z)).unwrap();
    factory
        .make_thick_solid_by_join(&solid, &[top.as_ref()], size / 10.0)
        .unwrap()
}

fn factory_benchmark(c: &mut Criterion) {
    let factory = ShapeFactory::new(MockKernel::new(), ModelingSettings::default());

    {
        let mut group = c.benchmark_group("Build");
        group.bench_function("Hollow Box", |b| {
            b.iter(|| black_box(hollow_box(&factory, black_box(10.0))));
        });
        group.bench_function("Fused Boxes", |b| {
            let a = factory.box_(&Plane::XY, 2.0, 2.0, 2.0).unwrap();
            let other = factory
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
            b.iter(|| black_box(factory.fuse(&a, &other).unwrap()));
        });
    }
    {
        let mut group = c.benchmark_group("Mesh");
        let shape = hollow_box(&factory, 10.0);
        group.bench_function("Hollow Box", |b| b.iter(|| black_box(shape.mesh())));
        let circle = factory.circle(DVec3::Z, DVec3::ZERO, 1.0).unwrap();
        let wire = factory.wire(&[&circle]).unwrap();
        let face = factory.face(&[&wire]).unwrap();
        let cylinder = factory.prism(&face, DVec3::Z).unwrap();
        group.bench_function("Cylinder", |b| b.iter(|| black_box(cylinder.mesh())));
    }
}

criterion_group!(benches, factory_benchmark);
criterion_main!(benches);
