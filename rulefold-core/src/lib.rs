pub mod emit;
pub mod expr;
pub mod merge;
pub mod normalize;
pub mod rule;
pub mod splice;
pub mod tables;
pub mod tokenizer;

pub use emit::{render, RenderMode};
pub use merge::{MergedRule, RuleSet, Rules};
pub use normalize::{Normalizer, Token};
pub use rule::{Flag, FlagMap, Rule, RuleKind, Selector, SelectorKey};
pub use splice::{convert, splice, Conversion, LAYER_MARKER, WINDOW_MARKER};
pub use tables::{KeyRename, Tables};
pub use tokenizer::{scan, RawBody, RawRule, Scan};
