use anyhow::{Context, Result};

use crate::expr;
use crate::rule::{Flag, Rule, RuleKind, Selector};
use crate::tables::{KeyRename, Tables};
use crate::tokenizer::{RawBody, RawRule};

/// A single classified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Selector(Selector),
    Flag(Flag),
}

/// Turns raw tokens into canonical selectors and flags.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    tables: &'a Tables,
}

fn is_selector(token: &str) -> bool {
    match token.find(':') {
        Some(colon) => token.find(char::is_whitespace).map_or(true, |ws| ws > colon),
        None => false,
    }
}

impl<'a> Normalizer<'a> {
    pub fn new(tables: &'a Tables) -> Self {
        Self { tables }
    }

    /// Classify and canonicalize one token of a window rule.
    pub fn token(&self, token: &str) -> Result<Vec<Token>> {
        let token = token.trim();
        if token.starts_with('$') {
            return Ok(vec![Token::Selector(Selector::new(token, None))]);
        }

        if is_selector(token) {
            return Ok(self
                .selector(token)
                .into_iter()
                .map(Token::Selector)
                .collect());
        }

        let (key, value) = match token.split_once(char::is_whitespace) {
            Some((key, value)) => (key, Some(value.trim())),
            None => (token, None),
        };
        Ok(vec![Token::Flag(self.flag(key, value)?)])
    }

    /// `key:value` or the rendered form `match:key value`.
    pub fn selector(&self, token: &str) -> Vec<Selector> {
        let (key, value) = match token.strip_prefix("match:") {
            Some(rest) => match rest.split_once(char::is_whitespace) {
                Some((key, value)) => (key, value),
                None => (rest, ""),
            },
            None => token.split_once(':').unwrap_or((token, "")),
        };
        self.selector_pair(key.trim(), value.trim())
    }

    fn selector_pair(&self, key: &str, value: &str) -> Vec<Selector> {
        match self.tables.rename_selector(key) {
            KeyRename::Single(key) => vec![Selector::new(key, Some(value.to_string()))],
            KeyRename::Split(first, second) => {
                let value = if value.is_empty() { "0 0" } else { value };
                let mut words = value.split_whitespace();
                let a = words.next().unwrap_or("0").to_string();
                let b = words.next().unwrap_or("0").to_string();
                vec![Selector::new(first, Some(a)), Selector::new(second, Some(b))]
            }
        }
    }

    /// Rename a flag key, fill in its default, and expand size/move values.
    pub fn flag(&self, key: &str, value: Option<&str>) -> Result<Flag> {
        let raw = key.to_lowercase();
        let key = self.tables.rename_flag(&raw);
        let value = value
            .filter(|v| !v.is_empty())
            .or_else(|| self.tables.default_for(key));

        let Some(value) = value else {
            return Ok(Flag::new(key, None));
        };

        if expr::is_size_key(key) {
            let (key, value) = expr::size(key, value)?;
            return Ok(Flag::new(key, Some(value)));
        }
        if key == "move" {
            return Ok(Flag::new(key, Some(expr::position(value)?)));
        }
        Ok(Flag::new(key, Some(value.to_string())))
    }

    /// Normalize a scanned rule. Layer lines with several namespaces yield one
    /// rule per namespace.
    pub fn rule(&self, raw: &RawRule) -> Result<Vec<Rule>> {
        let result = match (&raw.body, raw.kind) {
            (RawBody::Line(tokens), RuleKind::Window) => self.window_line(tokens),
            (RawBody::Line(tokens), RuleKind::Layer) => self.layer_line(tokens),
            (RawBody::Block(entries), kind) => self.block(kind, entries),
        };
        result.with_context(|| format!("line {}: invalid {}", raw.line, raw.kind))
    }

    fn window_line(&self, tokens: &[String]) -> Result<Vec<Rule>> {
        self.tokens_rule(RuleKind::Window, tokens).map(|rule| vec![rule])
    }

    fn tokens_rule(&self, kind: RuleKind, tokens: &[String]) -> Result<Rule> {
        let mut rule = Rule {
            kind,
            selectors: Vec::new(),
            flags: Vec::new(),
        };
        for token in tokens {
            for parsed in self.token(token)? {
                match parsed {
                    Token::Selector(s) => rule.selectors.push(s),
                    Token::Flag(f) => rule.flags.push(f),
                }
            }
        }
        Ok(rule)
    }

    /// Legacy layout is `flag, namespace...`. Lines we rendered ourselves use
    /// `match:namespace <ns>` and may carry several flags.
    fn layer_line(&self, tokens: &[String]) -> Result<Vec<Rule>> {
        if tokens.iter().any(|t| t.starts_with("match:")) {
            return self.tokens_rule(RuleKind::Layer, tokens).map(|rule| vec![rule]);
        }

        let Some((first, namespaces)) = tokens.split_first() else {
            return Ok(Vec::new());
        };

        let (key, value) = match first.split_once(char::is_whitespace) {
            Some((key, value)) => (key, Some(value.trim())),
            None => (first.as_str(), None),
        };
        let flag = self.flag(key, value)?;

        if namespaces.is_empty() {
            return Ok(vec![Rule {
                kind: RuleKind::Layer,
                selectors: Vec::new(),
                flags: vec![flag],
            }]);
        }

        Ok(namespaces
            .iter()
            .map(|ns| Rule {
                kind: RuleKind::Layer,
                selectors: vec![Selector::new("namespace", Some(ns.to_string()))],
                flags: vec![flag.clone()],
            })
            .collect())
    }

    fn block(&self, kind: RuleKind, entries: &[(String, String)]) -> Result<Vec<Rule>> {
        let mut rule = Rule {
            kind,
            selectors: Vec::new(),
            flags: Vec::new(),
        };
        for (key, value) in entries {
            if key == "name" {
                continue;
            }
            match key.strip_prefix("match:") {
                Some(key) if key.starts_with('$') => {
                    rule.selectors.push(Selector::new(key, None))
                }
                Some(key) => rule.selectors.extend(self.selector_pair(key, value)),
                None => rule.flags.push(self.flag(key, Some(value.as_str()))?),
            }
        }
        Ok(vec![rule])
    }
}
