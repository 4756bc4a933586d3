//! Class-graph visualization.
//!
//! Renders the subclass/superclass neighbourhood of an entity on an HTML canvas:
//! - Force-directed layout that cools and stops once the graph settles
//! - Camera fit and focus transitions that supersede each other
//! - Node click and search selection with a highlighted node
//! - Pan, zoom, and node dragging interactions
//!
//! # Example
//!
//! ```ignore
//! use kg_class_graph::{ClassGraphViz, GraphConfig, RawGraph};
//!
//! let graph = RwSignal::new(None::<RawGraph>);
//! view! {
//!     <ClassGraphViz
//!         entity_id="Q146"
//!         config=GraphConfig::default()
//!         graph=graph
//!         loading=Signal::stored(false)
//!         on_close=move |_| ()
//!     />
//! }
//! ```

pub mod adapter;
pub mod camera;
mod component;
pub mod controller;
pub mod layout;
pub mod render;
pub mod scale;
pub mod search;
mod search_box;
pub mod theme;
pub mod types;
mod viz;

pub use adapter::{Graph, adapt};
pub use component::{ClassGraphCanvas, GraphCommand};
pub use search_box::GraphSearch;
pub use theme::Theme;
pub use types::{ColorSpec, RawGraph, RawLink, RawNode};
pub use viz::ClassGraphViz;
