use std::fmt;

/// Identifies one picker within a [`FocusContext`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PickerId(u64);

impl fmt::Display for PickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Picker({})", self.0)
    }
}

/// Decides which picker receives keyboard input
///
/// Owned by the host and passed to pickers on every call that needs it. At
/// most one picker holds focus at a time.
#[derive(Debug, Default)]
pub struct FocusContext {
    next_id: u64,
    focused: Option<PickerId>,
}

impl FocusContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out an id for a new picker
    pub fn register(&mut self) -> PickerId {
        let id = PickerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Give keyboard focus to `id`
    pub fn focus(&mut self, id: PickerId) {
        if self.focused != Some(id) {
            tracing::trace!(picker = %id, "focus moved");
        }
        self.focused = Some(id);
    }

    /// Drop focus entirely
    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn is_focused(&self, id: PickerId) -> bool {
        self.focused == Some(id)
    }

    /// Picker currently holding focus
    pub fn owner(&self) -> Option<PickerId> {
        self.focused
    }
}
