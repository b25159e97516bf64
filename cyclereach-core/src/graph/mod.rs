//! Street graph construction and connectivity analysis

mod builder;
pub mod connectivity;
mod refine;

pub use builder::{CoordKey, build_street_graph};
pub use connectivity::{
    Component, component_count, components, filter_by_suitability, largest_component, routable,
};
pub use refine::split_at_shared_vertices;
