//! # Modeling
//!
//! A `Result` based facade over a B-Rep kernel.
//!
//! [`ShapeFactory`] is the entry point: every operation validates its input, unwraps the given
//! shapes to native kernel handles, calls the [`kernel::Kernel`] and wraps the outcome. Returned
//! shapes exclusively own their kernel handle and implement the interfaces in [`shape`].
//!
//! User input errors are returned as [`ModelingError`]. Passing a shape that was not created by
//! the same factory is a bug in the calling code and panics.

#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cognitive_complexity)]

mod convert;
pub mod converters;
mod error;
mod factory;
mod guard;
pub mod settings;
pub mod shape;

pub use convert::convert_shape_result;
pub use error::{ModelingError, Result};
pub use factory::ShapeFactory;
pub use guard::{ensure_occ_shape, ensure_occ_shapes};
pub use kernel::{BooleanOp, ShapeType};
pub use settings::ModelingSettings;
pub use shape::{FromNative, SessionId};
