//! Selectable candidates and the policies that turn a type name into a
//! display path.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Folder used by [`Grouping::ByMenuPath`] when a type has no explicit menu path
pub const DEFAULT_MENU_FOLDER: &str = "Scripts";

/// One selectable item
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<P> {
    /// `/`-separated path that decides where the item lands in the tree
    pub display_path: String,
    /// Fully-qualified name, shown and matched in search mode
    pub full_name: String,
    /// Opaque identity handed back on confirmation
    pub payload: P,
}

impl<P> Candidate<P> {
    pub fn new(display_path: impl Into<String>, full_name: impl Into<String>, payload: P) -> Self {
        Self {
            display_path: display_path.into(),
            full_name: full_name.into(),
            payload,
        }
    }

    /// Build a candidate from a dotted type name using `grouping`
    pub fn from_type_name(full_name: impl Into<String>, grouping: &Grouping, payload: P) -> Self {
        let full_name = full_name.into();
        let display_path = grouping.display_path(&full_name);
        Self {
            display_path,
            full_name,
            payload,
        }
    }
}

/// How a dotted type name is turned into a menu path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// Flat list of full names (`Game.Enemy.Orc`)
    None,
    /// One folder per namespace segment (`Game/Enemy/Orc`)
    ByNamespace,
    /// A single folder holding the whole namespace (`Game.Enemy/Orc`)
    #[default]
    ByNamespaceFlat,
    /// Explicit menu path, or `Scripts/` followed by the namespaced name
    ByMenuPath(Option<String>),
}

impl Grouping {
    /// Display path for `full_name` under this policy
    pub fn display_path(&self, full_name: &str) -> String {
        match self {
            Grouping::None => full_name.to_string(),
            Grouping::ByNamespace => full_name.replace('.', "/"),
            Grouping::ByNamespaceFlat => match full_name.rfind('.') {
                Some(index) => format!("{}/{}", &full_name[..index], &full_name[index + 1..]),
                None => full_name.to_string(),
            },
            Grouping::ByMenuPath(Some(menu_path)) if !menu_path.trim().is_empty() => {
                menu_path.trim_matches('/').to_string()
            }
            Grouping::ByMenuPath(_) => {
                format!("{}/{}", DEFAULT_MENU_FOLDER, full_name.replace('.', "/"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_none() {
        assert_eq!(Grouping::None.display_path("Game.Enemy.Orc"), "Game.Enemy.Orc");
    }

    #[test]
    fn test_grouping_by_namespace() {
        assert_eq!(
            Grouping::ByNamespace.display_path("Game.Enemy.Orc"),
            "Game/Enemy/Orc"
        );
        assert_eq!(Grouping::ByNamespace.display_path("Orc"), "Orc");
    }

    #[test]
    fn test_grouping_by_namespace_flat() {
        assert_eq!(
            Grouping::ByNamespaceFlat.display_path("Game.Enemy.Orc"),
            "Game.Enemy/Orc"
        );
        assert_eq!(Grouping::ByNamespaceFlat.display_path("Orc"), "Orc");
    }

    #[test]
    fn test_grouping_by_menu_path() {
        let explicit = Grouping::ByMenuPath(Some("/Characters/Orc/".to_string()));
        assert_eq!(explicit.display_path("Game.Enemy.Orc"), "Characters/Orc");

        let fallback = Grouping::ByMenuPath(None);
        assert_eq!(fallback.display_path("Game.Orc"), "Scripts/Game/Orc");

        let blank = Grouping::ByMenuPath(Some("  ".to_string()));
        assert_eq!(blank.display_path("Orc"), "Scripts/Orc");
    }

    #[test]
    fn test_from_type_name() {
        let candidate = Candidate::from_type_name("Game.Enemy.Orc", &Grouping::ByNamespace, 3u32);
        assert_eq!(candidate.display_path, "Game/Enemy/Orc");
        assert_eq!(candidate.full_name, "Game.Enemy.Orc");
        assert_eq!(candidate.payload, 3);
    }

    #[test]
    fn test_grouping_serde() {
        let json = serde_json::to_string(&Grouping::ByNamespaceFlat).unwrap();
        assert_eq!(json, "\"by_namespace_flat\"");
        let parsed: Grouping = serde_json::from_str("\"by_namespace\"").unwrap();
        assert_eq!(parsed, Grouping::ByNamespace);
        let menu: Grouping = serde_json::from_str(r#"{"by_menu_path":"Tools/Brush"}"#).unwrap();
        assert_eq!(menu, Grouping::ByMenuPath(Some("Tools/Brush".to_string())));
    }
}
