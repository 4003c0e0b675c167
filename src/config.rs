use crate::candidate::Grouping;
use crate::view::ui::scroll_planner::DEFAULT_SCROLL_FRAME_BUDGET;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Picker behavior and layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PickerConfig {
    /// Confirm as soon as a leaf is selected
    #[serde(default = "default_true")]
    pub confirm_on_select: bool,

    /// Confirm the selection on double-click
    #[serde(default = "default_true")]
    pub confirm_on_double_click: bool,

    /// Scroll the selection into view whenever it changes
    #[serde(default = "default_true")]
    pub auto_scroll_on_selection_changed: bool,

    /// Handle arrow/page/Enter keys while focused
    #[serde(default = "default_true")]
    pub auto_handle_keyboard_navigation: bool,

    /// Restore and record folder expand flags through an attached store
    #[serde(default = "default_true")]
    pub use_cached_expanded_states: bool,

    /// Open with every folder expanded
    #[serde(default = "default_false")]
    pub expand_all_on_open: bool,

    /// Center the initial selection instead of aligning it to an edge
    #[serde(default = "default_true")]
    pub center_initial_selection: bool,

    /// Frames a scroll request may wait for layout before it is dropped
    #[serde(default = "default_scroll_frame_budget")]
    pub scroll_frame_budget: u32,

    /// Row height in surface units
    #[serde(default = "default_row_height")]
    pub row_height: f32,

    /// Indentation per tree level in surface units
    #[serde(default = "default_indent_width")]
    pub indent_width: f32,

    /// How type names are turned into menu paths
    #[serde(default)]
    pub grouping: Grouping,

    /// Text shown when there are no candidates
    #[serde(default = "default_empty_message")]
    pub empty_message: String,
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_scroll_frame_budget() -> u32 {
    DEFAULT_SCROLL_FRAME_BUDGET
}

fn default_row_height() -> f32 {
    1.0
}

fn default_indent_width() -> f32 {
    2.0
}

fn default_empty_message() -> String {
    "No types to select.".to_string()
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            confirm_on_select: true,
            confirm_on_double_click: true,
            auto_scroll_on_selection_changed: true,
            auto_handle_keyboard_navigation: true,
            use_cached_expanded_states: true,
            expand_all_on_open: false,
            center_initial_selection: true,
            scroll_frame_budget: default_scroll_frame_budget(),
            row_height: default_row_height(),
            indent_width: default_indent_width(),
            grouping: Grouping::default(),
            empty_message: default_empty_message(),
        }
    }
}

impl PickerConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: PickerConfig = serde_json::from_str(&contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path.as_ref(), contents)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scroll_frame_budget == 0 {
            return Err(ConfigError::Validation(
                "scroll_frame_budget must be greater than 0".to_string(),
            ));
        }

        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            return Err(ConfigError::Validation(
                "row_height must be a positive number".to_string(),
            ));
        }

        if !self.indent_width.is_finite() || self.indent_width < 0.0 {
            return Err(ConfigError::Validation(
                "indent_width must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}
