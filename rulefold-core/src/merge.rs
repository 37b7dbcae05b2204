use std::collections::HashMap;

use anyhow::Result;
use serde::Serialize;

use crate::normalize::Normalizer;
use crate::rule::{FlagMap, Rule, RuleKind, SelectorKey};
use crate::tables::Tables;
use crate::tokenizer::Scan;

/// All source rules sharing one selector key, folded together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRule {
    pub selectors: SelectorKey,
    pub flags: FlagMap,
}

/// Merged rules of one kind, in order of first appearance.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSet {
    pub kind: RuleKind,
    rules: Vec<MergedRule>,
    #[serde(skip)]
    index: HashMap<SelectorKey, usize>,
}

impl RuleSet {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            rules: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn rules(&self) -> &[MergedRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn get(&self, key: &SelectorKey) -> Option<&MergedRule> {
        self.index.get(key).map(|&i| &self.rules[i])
    }

    /// Fold a rule in. Later values replace earlier ones for the same flag
    /// key; valueless flags collapse into a set.
    pub fn add(&mut self, rule: Rule) {
        let key = SelectorKey::new(rule.selectors);
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.rules.push(MergedRule {
                    selectors: key.clone(),
                    flags: FlagMap::new(),
                });
                self.index.insert(key, self.rules.len() - 1);
                self.rules.len() - 1
            }
        };

        let kind = self.kind;
        let merged = &mut self.rules[idx];
        for flag in rule.flags {
            if let Some(previous) = merged.flags.insert(flag.key.clone(), flag.value.clone()) {
                if previous != flag.value {
                    tracing::debug!(
                        "{} {}: {} overrides {:?} with {:?}",
                        kind,
                        merged.selectors,
                        flag.key,
                        previous,
                        flag.value
                    );
                }
            }
        }
    }

    /// Content view that ignores emission order.
    pub fn as_map(&self) -> HashMap<&SelectorKey, &FlagMap> {
        self.rules.iter().map(|r| (&r.selectors, &r.flags)).collect()
    }
}

/// Window and layer rule sets built from one file.
#[derive(Debug, Clone, Serialize)]
pub struct Rules {
    pub window: RuleSet,
    pub layer: RuleSet,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            window: RuleSet::new(RuleKind::Window),
            layer: RuleSet::new(RuleKind::Layer),
        }
    }
}

impl Rules {
    pub fn set_mut(&mut self, kind: RuleKind) -> &mut RuleSet {
        match kind {
            RuleKind::Window => &mut self.window,
            RuleKind::Layer => &mut self.layer,
        }
    }

    /// Normalize every scanned rule and merge by selector key.
    pub fn from_scan(scan: &Scan, tables: &Tables) -> Result<Self> {
        let normalizer = Normalizer::new(tables);
        let mut rules = Self::default();
        for raw in &scan.rules {
            for rule in normalizer.rule(raw)? {
                if rule.selectors.is_empty() && rule.flags.is_empty() {
                    tracing::warn!("line {}: empty {}, dropped", raw.line, raw.kind);
                    continue;
                }
                rules.set_mut(rule.kind).add(rule);
            }
        }
        tracing::info!(
            "Merged {} source rules into {} window rules and {} layer rules",
            scan.rules.len(),
            rules.window.len(),
            rules.layer.len()
        );
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Flag, Selector};
    use crate::tokenizer::scan;

    fn rule(selectors: &[(&str, &str)], flags: &[(&str, Option<&str>)]) -> Rule {
        Rule {
            kind: RuleKind::Window,
            selectors: selectors
                .iter()
                .map(|(k, v)| Selector::new(*k, Some(v.to_string())))
                .collect(),
            flags: flags
                .iter()
                .map(|(k, v)| Flag::new(*k, v.map(str::to_string)))
                .collect(),
        }
    }

    fn parse(content: &str) -> Rules {
        Rules::from_scan(&scan(content).unwrap(), &Tables::builtin()).unwrap()
    }

    #[test]
    fn test_same_selectors_merge() {
        let mut set = RuleSet::new(RuleKind::Window);
        set.add(rule(&[("class", "foo")], &[("float", None), ("opacity", Some("0.8"))]));
        set.add(rule(&[("class", "foo")], &[("pin", None), ("opacity", Some("0.9"))]));

        assert_eq!(set.len(), 1);
        let flags = &set.rules()[0].flags;
        assert_eq!(flags.len(), 3);
        assert_eq!(flags["opacity"], Some("0.9".to_string()));
        assert_eq!(flags["float"], None);
        assert_eq!(flags["pin"], None);
    }

    #[test]
    fn test_selector_order_does_not_matter() {
        let mut set = RuleSet::new(RuleKind::Window);
        set.add(rule(&[("class", "a"), ("title", "b")], &[("float", None)]));
        set.add(rule(&[("title", "b"), ("class", "a")], &[("pin", None)]));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_different_selectors_stay_apart() {
        let mut set = RuleSet::new(RuleKind::Window);
        set.add(rule(&[("class", "a")], &[("float", None)]));
        set.add(rule(&[("class", "b")], &[("float", None)]));
        set.add(rule(&[("class", "a")], &[("pin", None)]));
        assert_eq!(set.len(), 2);
        assert_eq!(set.rules()[0].selectors.to_string(), "(class:a)");
        assert_eq!(set.rules()[1].selectors.to_string(), "(class:b)");
    }

    #[test]
    fn test_boolean_flag_repeats_once() {
        let mut set = RuleSet::new(RuleKind::Window);
        set.add(rule(&[("class", "a")], &[("float", None)]));
        set.add(rule(&[("class", "a")], &[("float", None)]));
        assert_eq!(set.rules()[0].flags.len(), 1);
    }

    #[test]
    fn test_from_scan_splits_window_and_layer() {
        let rules = parse(
            "windowrule = float, class:kitty\nwindowrulev2 = bordersize 2, class:kitty\nlayerrule = blur, waybar\nlayerrule = ignorezero, waybar\n",
        );
        assert_eq!(rules.window.len(), 1);
        assert_eq!(rules.layer.len(), 1);

        let key = SelectorKey::new(vec![Selector::new("namespace", Some("waybar".into()))]);
        let layer = rules.layer.get(&key).unwrap();
        assert_eq!(layer.flags["blur"], None);
        assert_eq!(layer.flags["ignore_alpha"], Some("0".to_string()));
    }

    #[test]
    fn test_empty_rule_is_skipped() {
        let rules = parse("windowrule =\nwindowrule = , ,\n");
        assert!(rules.window.is_empty());
    }

    #[test]
    fn test_order_independence() {
        let a = parse("windowrule = float, class:a\nwindowrule = pin, class:b\nwindowrule = size 50% 50%, class:a\n");
        let b = parse("windowrule = size 50% 50%, class:a\nwindowrule = pin, class:b\nwindowrule = float, class:a\n");
        assert_eq!(a.window.as_map(), b.window.as_map());
    }

    #[test]
    fn test_serialization() {
        let rules = parse("windowrule = float, class:kitty\n");
        let json = serde_json::to_string(&rules.window).unwrap();
        assert!(json.contains("\"kind\":\"window\""));
        assert!(json.contains("\"flags\":{\"float\":null}"));
        assert!(!json.contains("index"));
    }
}
