use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Which collection a directive line feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Window,
    Layer,
}

impl RuleKind {
    /// Map a directive name to its collection. `windowrulev2` folds into
    /// `windowrule`.
    pub fn from_directive(name: &str) -> Option<Self> {
        match name {
            "windowrule" | "windowrulev2" => Some(Self::Window),
            "layerrule" => Some(Self::Layer),
            _ => None,
        }
    }

    /// Directive name used when rendering.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Window => "windowrule",
            Self::Layer => "layerrule",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive())
    }
}

/// A match criterion. Variables (`$name`) are kept as selectors without a
/// value so they take part in the merge identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Selector {
    pub key: String,
    pub value: Option<String>,
}

impl Selector {
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value: value.filter(|v| !v.is_empty()),
        }
    }

    pub fn is_variable(&self) -> bool {
        self.key.starts_with('$')
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}:{}", self.key, value),
            None => f.write_str(&self.key),
        }
    }
}

/// An effect. `value == None` marks a plain switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flag {
    pub key: String,
    pub value: Option<String>,
}

impl Flag {
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value: value.filter(|v| !v.is_empty()),
        }
    }
}

/// One source rule after normalization, before merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub kind: RuleKind,
    pub selectors: Vec<Selector>,
    pub flags: Vec<Flag>,
}

/// Sorted, deduplicated selector tuple used as the merge identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SelectorKey(Vec<Selector>);

impl SelectorKey {
    pub fn new(mut selectors: Vec<Selector>) -> Self {
        selectors.sort();
        selectors.dedup();
        Self(selectors)
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.0
    }
}

impl fmt::Display for SelectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(Selector::to_string).collect();
        write!(f, "({})", parts.join(", "))
    }
}

/// Flags accumulated for one selector key, ordered by key.
pub type FlagMap = BTreeMap<String, Option<String>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_kind_from_directive() {
        assert_eq!(RuleKind::from_directive("windowrule"), Some(RuleKind::Window));
        assert_eq!(
            RuleKind::from_directive("windowrulev2"),
            Some(RuleKind::Window)
        );
        assert_eq!(RuleKind::from_directive("layerrule"), Some(RuleKind::Layer));
        assert_eq!(RuleKind::from_directive("bind"), None);
    }

    #[test]
    fn test_selector_empty_value_is_absent() {
        let sel = Selector::new("class", Some(String::new()));
        assert_eq!(sel.value, None);
        assert_eq!(sel.to_string(), "class");
    }

    #[test]
    fn test_selector_key_sorts_and_dedups() {
        let a = SelectorKey::new(vec![
            Selector::new("title", Some("foo".to_string())),
            Selector::new("class", Some("kitty".to_string())),
            Selector::new("title", Some("foo".to_string())),
        ]);
        let b = SelectorKey::new(vec![
            Selector::new("class", Some("kitty".to_string())),
            Selector::new("title", Some("foo".to_string())),
        ]);
        assert_eq!(a, b);
        assert_eq!(a.selectors().len(), 2);
        assert_eq!(a.to_string(), "(class:kitty, title:foo)");
    }

    #[test]
    fn test_selector_key_same_text_different_split() {
        let joined = Selector::new("a:b", None);
        let split = Selector::new("a", Some("b".to_string()));
        let a = SelectorKey::new(vec![joined.clone(), split.clone()]);
        let b = SelectorKey::new(vec![split, joined]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_selector_key_serialization() {
        let key = SelectorKey::new(vec![Selector::new("class", Some("kitty".to_string()))]);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "[{\"key\":\"class\",\"value\":\"kitty\"}]");
    }
}
