use std::collections::HashMap;

/// How a selector key is renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRename {
    Single(String),
    /// One source selector expands to two selectors with positional values.
    Split(String, String),
}

/// Canonicalization data handed to the normalizer.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub keys: HashMap<String, KeyRename>,
    pub values: HashMap<String, String>,
    pub defaults: HashMap<String, String>,
}

const KEY_RENAMES: &[(&str, &str)] = &[
    ("initialClass", "initial_class"),
    ("initialTitle", "initial_title"),
    ("floating", "float"),
    ("pinned", "pin"),
    ("onworkspace", "workspace"),
    ("xdgTag", "xdg_tag"),
    ("noinitialfocus", "no_initial_focus"),
];

const KEY_SPLITS: &[(&str, &str, &str)] = &[(
    "fullscreenstate",
    "fullscreen_state_internal",
    "fullscreen_state_client",
)];

const VALUE_RENAMES: &[(&str, &str)] = &[
    ("floating", "float"),
    ("pinned", "pin"),
    ("bordersize", "border_size"),
    ("bordercolor", "border_color"),
    ("roundingpower", "rounding_power"),
    ("noborder", "border_size"),
    ("noanim", "no_anim"),
    ("noblur", "no_blur"),
    ("nodim", "no_dim"),
    ("noshadow", "no_shadow"),
    ("norounding", "no_rounding"),
    ("nofocus", "no_focus"),
    ("nofollowmouse", "no_follow_mouse"),
    ("allowsinput", "allows_input"),
    ("focusonactivate", "focus_on_activate"),
    ("fullscreenstate", "fullscreen_state"),
    ("maxsize", "max_size"),
    ("minsize", "min_size"),
    ("nomaxsize", "no_max_size"),
    ("keepaspectratio", "keep_aspect_ratio"),
    ("idleinhibit", "idle_inhibit"),
    ("persistentsize", "persistent_size"),
    ("stayfocused", "stay_focused"),
    ("dimaround", "dim_around"),
    ("noclosefor", "no_close_for"),
    ("suppressevent", "suppress_event"),
    ("forcergbx", "force_rgbx"),
    ("syncfullscreen", "sync_fullscreen"),
    ("renderunfocused", "render_unfocused"),
    ("scrollmouse", "scroll_mouse"),
    ("scrolltouchpad", "scroll_touchpad"),
    ("noshortcutsinhibit", "no_shortcuts_inhibit"),
    ("noscreenshare", "no_screen_share"),
    ("novrr", "no_vrr"),
    ("noinitialfocus", "no_initial_focus"),
    ("ignorealpha", "ignore_alpha"),
    ("ignorezero", "ignore_alpha"),
    ("blurpopups", "blur_popups"),
    ("abovelock", "above_lock"),
];

// Flags that are plain switches (float, pin, fullscreen, ...) are left out on
// purpose: they stay valueless and merge as a set.
const DEFAULTS: &[(&str, &str)] = &[
    ("border_size", "0"),
    ("xwayland", "0"),
    ("focus", "0"),
    ("group", "0"),
    ("modal", "0"),
    ("ignore_alpha", "0"),
    ("fullscreen_state_internal", "0"),
    ("fullscreen_state_client", "0"),
];

impl Tables {
    pub fn builtin() -> Self {
        let mut keys: HashMap<String, KeyRename> = KEY_RENAMES
            .iter()
            .map(|(from, to)| (from.to_string(), KeyRename::Single(to.to_string())))
            .collect();
        for (from, first, second) in KEY_SPLITS {
            keys.insert(
                from.to_string(),
                KeyRename::Split(first.to_string(), second.to_string()),
            );
        }

        Self {
            keys,
            values: to_map(VALUE_RENAMES),
            defaults: to_map(DEFAULTS),
        }
    }

    pub fn rename_selector(&self, key: &str) -> KeyRename {
        self.keys
            .get(key)
            .cloned()
            .unwrap_or_else(|| KeyRename::Single(key.to_string()))
    }

    pub fn rename_flag<'a>(&'a self, key: &'a str) -> &'a str {
        self.values.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn default_for(&self, key: &str) -> Option<&str> {
        self.defaults.get(key).map(String::as_str)
    }
}

fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
