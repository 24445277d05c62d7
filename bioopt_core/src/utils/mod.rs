//! Small helpers shared by the exporters
pub(crate) mod ids;
