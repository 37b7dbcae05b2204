use anyhow::{bail, Result};

use crate::rule::RuleKind;

/// Body of a recognized directive as it appeared in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawBody {
    /// `directive = a, b, c`, already split and trimmed.
    Line(Vec<String>),
    /// `directive { key = value ... }` entries in order. Entries without `=`
    /// carry an empty value.
    Block(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRule {
    pub kind: RuleKind,
    /// 1-based line of the directive.
    pub line: usize,
    pub body: RawBody,
}

/// Result of scanning a whole file.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub rules: Vec<RawRule>,
    /// 0-based indices of every line that belongs to a recognized directive.
    pub consumed: Vec<usize>,
}

impl Scan {
    pub fn is_consumed(&self, index: usize) -> bool {
        self.consumed.binary_search(&index).is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineClass<'a> {
    Skip,
    Directive {
        kind: RuleKind,
        rhs: Option<&'a str>,
    },
    BlockStart(RuleKind),
}

fn classify(line: &str) -> LineClass<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return LineClass::Skip;
    }

    if let Some(head) = trimmed.strip_suffix('{') {
        if let Some(kind) = RuleKind::from_directive(head.trim()) {
            return LineClass::BlockStart(kind);
        }
    }

    match trimmed.split_once('=') {
        Some((lhs, rhs)) => match RuleKind::from_directive(lhs.trim()) {
            Some(kind) => LineClass::Directive {
                kind,
                rhs: Some(rhs),
            },
            None => LineClass::Skip,
        },
        None => {
            let command = trimmed.split_whitespace().next().unwrap_or_default();
            match RuleKind::from_directive(command) {
                Some(kind) => LineClass::Directive { kind, rhs: None },
                None => LineClass::Skip,
            }
        }
    }
}

/// Split on commas, honoring `\,` as a literal comma. Tokens are trimmed and
/// empty tokens dropped.
pub fn split_tokens(rhs: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = rhs.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                current.push(',');
                chars.next();
            }
            ',' => tokens.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    tokens.push(current);

    tokens
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Scan file content for directive lines and named rule blocks.
pub fn scan(content: &str) -> Result<Scan> {
    let lines: Vec<&str> = content.lines().collect();
    let mut scan = Scan::default();
    let mut index = 0;

    while index < lines.len() {
        match classify(lines[index]) {
            LineClass::Skip => {}
            LineClass::Directive { kind, rhs } => {
                let tokens = match (kind, rhs) {
                    (_, Some(rhs)) => split_tokens(rhs),
                    (RuleKind::Layer, None) => Vec::new(),
                    (RuleKind::Window, None) => {
                        bail!("line {}: missing '=' after {}", index + 1, kind)
                    }
                };
                scan.rules.push(RawRule {
                    kind,
                    line: index + 1,
                    body: RawBody::Line(tokens),
                });
                scan.consumed.push(index);
            }
            LineClass::BlockStart(kind) => {
                let start = index;
                let mut entries = Vec::new();
                loop {
                    scan.consumed.push(index);
                    index += 1;
                    let Some(line) = lines.get(index) else {
                        bail!("line {}: unterminated {} block", start + 1, kind);
                    };
                    let trimmed = line.trim();
                    if trimmed == "}" {
                        scan.consumed.push(index);
                        break;
                    }
                    if trimmed.is_empty() || trimmed.starts_with('#') {
                        continue;
                    }
                    let (key, value) = trimmed.split_once('=').unwrap_or((trimmed, ""));
                    entries.push((key.trim().to_string(), value.trim().to_string()));
                }
                scan.rules.push(RawRule {
                    kind,
                    line: start + 1,
                    body: RawBody::Block(entries),
                });
            }
        }
        index += 1;
    }

    tracing::debug!(
        "Scanned {} lines, found {} rules",
        lines.len(),
        scan.rules.len()
    );
    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_tokens(rule: &RawRule) -> &[String] {
        match &rule.body {
            RawBody::Line(tokens) => tokens,
            RawBody::Block(_) => panic!("expected a line rule"),
        }
    }

    #[test]
    fn test_split_tokens_trims() {
        assert_eq!(
            split_tokens(" float ,  class:kitty "),
            vec!["float", "class:kitty"]
        );
    }

    #[test]
    fn test_split_tokens_escaped_comma() {
        assert_eq!(
            split_tokens("move min(1\\,2), class:a"),
            vec!["move min(1,2)", "class:a"]
        );
    }

    #[test]
    fn test_split_tokens_drops_empty() {
        assert_eq!(split_tokens("float,, class:a,"), vec!["float", "class:a"]);
    }

    #[test]
    fn test_scan_skips_comments_blanks_and_other_lines() {
        let content = "# windowrule = float, class:a\n\n$mod = SUPER\nbind = $mod, Q, exec, kitty\n";
        let scan = scan(content).unwrap();
        assert!(scan.rules.is_empty());
        assert!(scan.consumed.is_empty());
    }

    #[test]
    fn test_scan_directives() {
        let content = "general {\n}\nwindowrule = float, class:kitty\nwindowrulev2 = pin,title:foo\nlayerrule = blur, waybar\n";
        let scan = scan(content).unwrap();
        assert_eq!(scan.rules.len(), 3);
        assert_eq!(scan.rules[0].kind, RuleKind::Window);
        assert_eq!(scan.rules[0].line, 3);
        assert_eq!(line_tokens(&scan.rules[0]), ["float", "class:kitty"]);
        assert_eq!(scan.rules[1].kind, RuleKind::Window);
        assert_eq!(line_tokens(&scan.rules[1]), ["pin", "title:foo"]);
        assert_eq!(scan.rules[2].kind, RuleKind::Layer);
        assert_eq!(scan.consumed, vec![2, 3, 4]);
    }

    #[test]
    fn test_scan_unrecognized_command_with_prefix() {
        let scan = scan("windowrulefoo = float\n").unwrap();
        assert!(scan.rules.is_empty());
    }

    #[test]
    fn test_scan_window_rule_without_equals_fails() {
        let err = scan("windowrule float class:a\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_scan_layer_rule_without_equals_is_empty() {
        let scan = scan("layerrule blur\n").unwrap();
        assert_eq!(scan.rules.len(), 1);
        assert!(line_tokens(&scan.rules[0]).is_empty());
    }

    #[test]
    fn test_scan_named_block() {
        let content = "windowrule {\n  name = windowrule-1\n  match:class = kitty\n  float = 1\n}\nkeep = me\n";
        let scan = scan(content).unwrap();
        assert_eq!(scan.rules.len(), 1);
        assert_eq!(
            scan.rules[0].body,
            RawBody::Block(vec![
                ("name".to_string(), "windowrule-1".to_string()),
                ("match:class".to_string(), "kitty".to_string()),
                ("float".to_string(), "1".to_string()),
            ])
        );
        assert_eq!(scan.consumed, vec![0, 1, 2, 3, 4]);
        assert!(!scan.is_consumed(5));
    }

    #[test]
    fn test_scan_unterminated_block_fails() {
        assert!(scan("layerrule {\n  blur = 1\n").is_err());
    }
}
