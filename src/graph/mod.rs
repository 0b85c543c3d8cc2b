pub mod physics;
pub mod transform;

pub use transform::{
    apply_highlight, build_graph_data, build_graph_data_with, GraphData, GraphEdge, GraphNode,
    NodeKind, CANVAS_H, CANVAS_W,
};
