pub mod chat_panel;
pub mod force_graph;
pub mod graph_view;
pub mod node_details;
pub mod notice;
