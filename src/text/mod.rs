//! Font loading, measurement and shadowed text drawing.

pub(crate) mod draw;
pub(crate) mod engine;
