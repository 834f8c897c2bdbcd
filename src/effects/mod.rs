//! Pixel effects: blur, grain, tinting, compositing, shadows, masks and gradients.

pub(crate) mod blur;
pub(crate) mod composite;
pub(crate) mod gradient;
pub(crate) mod grain;
pub(crate) mod masks;
pub(crate) mod shadow;
