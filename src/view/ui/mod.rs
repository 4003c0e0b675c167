//! UI helpers shared by views

pub mod scroll_planner;

pub use scroll_planner::{ScrollPlanner, ScrollRequest, ScrollTick, ViewportRects};
