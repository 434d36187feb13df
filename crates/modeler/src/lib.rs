#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cognitive_complexity)]

use anyhow::{anyhow, Context};
use glam::DVec3;
use kernel::geom::{Plane, Ray};
use kernel::mock::MockKernel;
use kernel::Kernel;
use modeling::shape::{Face, Shape, Solid};
use modeling::{ModelingSettings, ShapeFactory, ShapeType};

/// Dimensions of the demo part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartDimensions {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub wall: f64,
    pub neck_radius: f64,
    pub neck_height: f64,
}

impl Default for PartDimensions {
    fn default() -> Self {
        Self {
            width: 50.0,
            depth: 30.0,
            height: 70.0,
            wall: 1.0,
            neck_radius: 7.5,
            neck_height: 7.0,
        }
    }
}

/// Counts describing the tessellated demo part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshSummary {
    pub faces: usize,
    pub triangles: usize,
    pub edges: usize,
}

/// Builds an open container with a neck on its lid.
///
/// # Errors
///
/// Returns an error if a modeling operation fails.
pub fn build_part<K: Kernel>(
    factory: &ShapeFactory<K>,
    dimensions: &PartDimensions,
) -> anyhow::Result<Box<dyn Shape>> {
    let PartDimensions {
        width,
        depth,
        height,
        wall,
        neck_radius,
        neck_height,
    } = *dimensions;

    let body = factory
        .box_(&Plane::XY, width, depth, height)
        .context("failed to build the body")?;
    let faces = body
        .shells()
        .first()
        .map(|shell| shell.faces())
        .unwrap_or_default();
    let bottom = faces
        .iter()
        .find(|f| f.normal() == Some(DVec3::NEG_Z))
        .ok_or_else(|| anyhow!("the body has no bottom face"))?;
    let container = factory
        .make_thick_solid_by_join(&body, &[bottom.as_ref()], -wall)
        .context("failed to hollow the body")?;

    let center = DVec3::new(width / 2.0, depth / 2.0, height);
    let rim = factory.circle(DVec3::Z, center, neck_radius)?;
    let rim = factory.wire(&[&rim])?;
    let disc = factory.face(&[&rim])?;
    let neck = factory
        .prism(&disc, DVec3::Z * neck_height)
        .context("failed to extrude the neck")?;
    let part = factory.fuse(container.as_ref(), neck.as_ref())?;

    // A stand ring revolved below the body
    let section = factory.rect(
        &Plane {
            origin: DVec3::new(width / 2.0 + neck_radius, depth / 2.0, -wall),
            normal: DVec3::Y,
            x_dir: DVec3::X,
        },
        wall,
        wall,
    )?;
    let ring = factory.revolve(
        &section,
        &Ray::new(DVec3::new(width / 2.0, depth / 2.0, 0.0), DVec3::Z),
        360.0,
    )?;

    let part = factory.combine(&[part.as_ref(), ring.as_ref()])?;
    Ok(Box::new(part))
}

/// Tessellates `shape` and counts the result.
#[must_use]
pub fn summarize(shape: &dyn Shape) -> MeshSummary {
    let mesh = shape.mesh();
    MeshSummary {
        faces: shape.sub_shapes(ShapeType::Face).len(),
        triangles: mesh.faces.triangle_count(),
        edges: mesh.edges.groups.len(),
    }
}

/// Builds the demo part with the mock kernel and logs its mesh summary.
///
/// # Errors
///
/// Returns an error if the part can not be built.
pub fn run_demo(settings: ModelingSettings) -> anyhow::Result<MeshSummary> {
    let factory = ShapeFactory::new(MockKernel::new(), settings);
    log::info!("modeling session {}", factory.session());
    let part = build_part(&factory, &PartDimensions::default())?;
    let summary = summarize(part.as_ref());
    log::info!(
        "built a part with {} faces, {} triangles and {} edges",
        summary.faces,
        summary.triangles,
        summary.edges
    );
    log::debug!("{} kernel calls", factory.kernel().call_count());
    Ok(summary)
}

/// Initializes logging for the current target. This function must only be called once.
///
/// # Panics
///
/// Panics if a logger is already installed.
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_log::init().expect("Initialize logger");
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    }

    #[cfg(not(target_arch = "wasm32"))]
    tracing_subscriber::fmt::init();
}

/// Entry point of the wasm build.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_modeler() {
    init_logging();
    if let Err(err) = run_demo(ModelingSettings::default()) {
        log::error!("{err:#}");
    }
}
