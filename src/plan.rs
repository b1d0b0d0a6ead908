//! Timeline planning: slides + audio duration -> ordered, timed layers.

pub(crate) mod layer;
pub(crate) mod opacity;
pub(crate) mod resources;
pub(crate) mod timeline;
