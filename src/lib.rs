// Type picker library - a searchable, hierarchical picker over named candidates

pub mod candidate;
pub mod config;
pub mod input;
pub mod services;
pub mod view;

pub use candidate::{Candidate, Grouping};
pub use config::{ConfigError, PickerConfig};
pub use view::focus::{FocusContext, PickerId};
pub use view::presenter::{DisplayMode, EventSink, SelectorPresenter};
pub use view::selection_tree::{NodeId, SelectionChangeKind, SelectorEvent};
