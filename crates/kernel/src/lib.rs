//! # Kernel
//!
//! The boundary between `CADara`'s modeling core and a boundary-representation geometry kernel.
//!
//! A kernel is anything implementing [`Kernel`]: it takes value geometry (points, vectors,
//! planes, angles in radians) and native shape handles, and answers every construction with a
//! [`KernelResult`]. Handles implement [`NativeShape`] and exclusively own the kernel resource
//! they refer to; dropping a handle releases it.
//!
//! [`mock::MockKernel`] is a deterministic in-memory kernel. It builds consistent topology for
//! every primitive but does not compute surface intersections, which makes it suitable for
//! tests, benchmarks and demos.

#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cognitive_complexity)]

pub mod geom;
pub mod mesh;
pub mod mock;
mod traits;

pub use traits::{BooleanOp, Kernel, KernelError, KernelResult, NativeShape, ShapeType};
