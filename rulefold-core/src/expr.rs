use anyhow::{bail, Context, Result};

/// Axis a positional argument refers to. The first argument is horizontal,
/// all later ones vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn from_position(index: usize) -> Self {
        if index == 0 {
            Self::X
        } else {
            Self::Y
        }
    }

    fn monitor(self) -> &'static str {
        match self {
            Self::X => "monitor_w",
            Self::Y => "monitor_h",
        }
    }

    fn window(self) -> &'static str {
        match self {
            Self::X => "window_w",
            Self::Y => "window_h",
        }
    }

    fn cursor(self) -> &'static str {
        match self {
            Self::X => "cursor_x",
            Self::Y => "cursor_y",
        }
    }
}

/// `50%` -> `(monitor_w*0.5)`. Returns `None` when `part` is not a percentage.
fn percent(part: &str, axis: Axis) -> Result<Option<String>> {
    let Some(number) = part.strip_suffix('%') else {
        return Ok(None);
    };
    let pct: f64 = number
        .trim()
        .parse()
        .with_context(|| format!("invalid percentage: {}", part))?;
    if !pct.is_finite() {
        bail!("invalid percentage: {}", part);
    }
    Ok(Some(format!("({}*{})", axis.monitor(), pct / 100.0)))
}

/// Size keys that carry width/height arguments.
pub fn is_size_key(key: &str) -> bool {
    matches!(key, "size" | "min_size" | "max_size")
}

/// Rewrite a size value. A `>` or `<` prefix on any component turns a plain
/// `size` into `min_size` or `max_size`; the returned key reflects that.
pub fn size(key: &str, value: &str) -> Result<(String, String)> {
    let mut key = key.to_string();
    let mut parts = Vec::new();

    for (i, word) in value.split_whitespace().enumerate() {
        let mut word = word;
        if let Some(rest) = word.strip_prefix('>') {
            key = "min_size".to_string();
            word = rest;
        } else if let Some(rest) = word.strip_prefix('<') {
            key = "max_size".to_string();
            word = rest;
        }
        let axis = Axis::from_position(i);
        parts.push(percent(word, axis)?.unwrap_or_else(|| word.to_string()));
    }

    Ok((key, parts.join(" ")))
}

/// Rewrite a `move` value into monitor/window/cursor relative expressions.
pub fn position(value: &str) -> Result<String> {
    let mut cursor = false;
    let mut onscreen = false;
    let mut args = Vec::new();

    for word in value.split_whitespace() {
        match word {
            "cursor" => cursor = true,
            "onscreen" => onscreen = true,
            _ => args.push(word),
        }
    }

    let mut out = Vec::with_capacity(args.len());
    for (i, arg) in args.into_iter().enumerate() {
        // Already an expression from an earlier run.
        if arg.contains('(') {
            out.push(arg.to_string());
            continue;
        }

        let axis = Axis::from_position(i);
        let mut parts = Vec::new();
        for part in arg.split('-') {
            let part = part.trim();
            if part == "w" {
                parts.push(axis.window().to_string());
            } else {
                parts.push(percent(part, axis)?.unwrap_or_else(|| part.to_string()));
            }
        }

        let mut expr = parts.join("-");
        if onscreen {
            expr = format!(
                "min(max({},0),{}-{})",
                expr,
                axis.monitor(),
                axis.window()
            );
        }
        if cursor {
            expr = format!("{}+({})", axis.cursor(), expr);
        }
        out.push(format!("({})", expr));
    }

    Ok(out.join(" "))
}
