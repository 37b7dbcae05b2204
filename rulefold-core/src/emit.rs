use crate::merge::{MergedRule, RuleSet};
use crate::rule::Selector;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// One `directive = ...` line per rule.
    #[default]
    Anonymous,
    /// One `directive { ... }` block per rule with a generated name.
    Named,
}

fn escape(value: &str) -> String {
    value.replace(',', "\\,")
}

fn anonymous_selector(sel: &Selector) -> String {
    if sel.is_variable() {
        return sel.key.clone();
    }
    match &sel.value {
        Some(value) => format!("match:{} {}", sel.key, escape(value)),
        None => format!("match:{}", sel.key),
    }
}

fn anonymous(directive: &str, rule: &MergedRule) -> String {
    let mut parts: Vec<String> = rule
        .selectors
        .selectors()
        .iter()
        .map(anonymous_selector)
        .collect();
    parts.extend(rule.flags.iter().map(|(key, value)| match value {
        Some(value) => format!("{} {}", key, escape(value)),
        None => key.clone(),
    }));
    format!("{} = {}", directive, parts.join(", "))
}

fn named(directive: &str, ordinal: usize, rule: &MergedRule) -> String {
    let mut block = vec![
        format!("{} {{", directive),
        format!("  name = {}-{}", directive, ordinal),
    ];
    for sel in rule.selectors.selectors() {
        block.push(match &sel.value {
            Some(value) if !sel.is_variable() => format!("  match:{} = {}", sel.key, value),
            _ => format!("  match:{}", sel.key),
        });
    }
    for (key, value) in &rule.flags {
        block.push(format!("  {} = {}", key, value.as_deref().unwrap_or("1")));
    }
    block.push("}".to_string());
    block.join("\n")
}

/// Render a merged rule set. Named blocks are numbered from 1 in iteration
/// order and separated by a blank line.
pub fn render(set: &RuleSet, mode: RenderMode) -> String {
    let directive = set.kind.directive();
    match mode {
        RenderMode::Anonymous => set
            .rules()
            .iter()
            .map(|rule| anonymous(directive, rule))
            .collect::<Vec<_>>()
            .join("\n"),
        RenderMode::Named => set
            .rules()
            .iter()
            .enumerate()
            .map(|(i, rule)| named(directive, i + 1, rule))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}
