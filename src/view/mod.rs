//! View layer
//!
//! Selection tree model, presenter, geometry and rendering adapters.

pub mod focus;
pub mod geometry;
pub mod presenter;
pub mod ratatui_surface;
pub mod selection_tree;
pub mod surface;
pub mod ui;
