//! UI components.

pub mod class_graph;
