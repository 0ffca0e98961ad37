mod component;
mod connector;
mod layout;
mod render;
mod state;
mod types;
mod zoom;

pub use component::WorkflowChart;
pub use types::{NodeKind, WorkflowGraph};
