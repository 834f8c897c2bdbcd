//! Geometry primitives: aspect crops, coverage masks and rotation.

pub(crate) mod crop;
pub(crate) mod raster;
pub(crate) mod rotate;
