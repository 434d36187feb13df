#![allow(dead_code)]

use kernel::geom::BoundingBox;
use kernel::mesh::MeshData;
use kernel::mock::MockKernel;
use kernel::ShapeType;
use glam::DVec3;
use modeling::shape::{Edge, Face, Shape, Wire};
use modeling::{ModelingSettings, ShapeFactory};
use std::any::Any;

pub type Factory = ShapeFactory<MockKernel>;

pub fn setup() -> Factory {
    ShapeFactory::new(MockKernel::new(), ModelingSettings::default())
}

/// A shape that was not created by any factory. It poses as any kind the tests need.
#[derive(Debug)]
pub struct ForeignShape;

impl Shape for ForeignShape {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Vertex
    }

    fn children(&self) -> Vec<Box<dyn Shape>> {
        Vec::new()
    }

    fn sub_shapes(&self, _kind: ShapeType) -> Vec<Box<dyn Shape>> {
        Vec::new()
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        None
    }

    fn mesh(&self) -> MeshData {
        MeshData::default()
    }

    fn identity(&self) -> Option<(modeling::SessionId, u64)> {
        None
    }

    fn kernel_shape(&self) -> &dyn Any {
        self
    }
}

impl Edge for ForeignShape {
    fn start(&self) -> DVec3 {
        DVec3::ZERO
    }

    fn end(&self) -> DVec3 {
        DVec3::X
    }

    fn length(&self) -> f64 {
        1.0
    }

    fn is_closed(&self) -> bool {
        false
    }
}

impl Wire for ForeignShape {
    fn edges(&self) -> Vec<Box<dyn Edge>> {
        Vec::new()
    }

    fn is_closed(&self) -> bool {
        true
    }
}

impl Face for ForeignShape {
    fn normal(&self) -> Option<DVec3> {
        Some(DVec3::Z)
    }

    fn area(&self) -> f64 {
        0.0
    }

    fn outer_wire(&self) -> Option<Box<dyn Wire>> {
        None
    }
}
