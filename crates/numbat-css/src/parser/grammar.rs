//! How at-rule blocks are parsed.
//!
//! The stylesheet parser only knows the generic rule/declaration syntax.
//! Whether an at-rule's `{}` block holds nested rules, declarations, or
//! nothing of interest is decided by an [`AtRuleSpec`] supplied by the
//! caller, with a fallback [`BlockType`] for names it does not list.

use std::collections::HashMap;

use strum_macros::{Display, EnumString};

/// How to parse the simple block of an at-rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BlockType {
    /// Parse the block as a list of qualified rules and at-rules.
    Rules,
    /// Parse the block as a list of declarations.
    Declarations,
    /// Skip the block.
    Ignore,
}

/// Block type per at-rule name. Keys are lowercase and carry no vendor
/// prefix.
pub type AtRuleSpec = HashMap<String, BlockType>;

/// Strip a vendor prefix (`-o-`, `-moz-`, `-ms-`, `-webkit-`) from an
/// identifier: `-moz-keyframes` becomes `keyframes`.
#[must_use]
pub fn strip_vendor_prefix(name: &str) -> &str {
    if !name.starts_with('-') {
        return name;
    }
    ["-o-", "-moz-", "-ms-", "-webkit-"]
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

/// Strip a `min-` or `max-` prefix from a media feature name:
/// `min-width` becomes `width`.
#[must_use]
pub fn strip_min_max(name: &str) -> &str {
    name.strip_prefix("min-")
        .or_else(|| name.strip_prefix("max-"))
        .unwrap_or(name)
}

/// Resolve the block type for an at-rule called `name`. The name is
/// matched ASCII case-insensitively after stripping a vendor prefix.
#[must_use]
pub fn block_type_for(spec: &AtRuleSpec, default: BlockType, name: &str) -> BlockType {
    let key = strip_vendor_prefix(name).to_ascii_lowercase();
    spec.get(&key).copied().unwrap_or(default)
}

/// The at-rules the AMP validator accepts in stylesheets.
///
/// Anything else should be parsed with [`BlockType::Ignore`] so that the
/// rule itself is kept for reporting but its block is skipped.
#[must_use]
pub fn validator_grammar() -> AtRuleSpec {
    [
        ("font-face", BlockType::Declarations),
        ("keyframes", BlockType::Rules),
        ("media", BlockType::Rules),
        ("page", BlockType::Declarations),
        ("supports", BlockType::Rules),
    ]
    .into_iter()
    .map(|(name, block_type)| (name.to_string(), block_type))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_vendor_prefix() {
        assert_eq!(strip_vendor_prefix("-moz-keyframes"), "keyframes");
        assert_eq!(strip_vendor_prefix("-webkit-keyframes"), "keyframes");
        assert_eq!(strip_vendor_prefix("-o-x"), "x");
        assert_eq!(strip_vendor_prefix("-ms-viewport"), "viewport");
        assert_eq!(strip_vendor_prefix("-foo-bar"), "-foo-bar");
        assert_eq!(strip_vendor_prefix("media"), "media");
        assert_eq!(strip_vendor_prefix(""), "");
    }

    #[test]
    fn test_strip_min_max() {
        assert_eq!(strip_min_max("min-width"), "width");
        assert_eq!(strip_min_max("max-height"), "height");
        assert_eq!(strip_min_max("color"), "color");
    }

    #[test]
    fn test_block_type_names() {
        assert_eq!("rules".parse::<BlockType>(), Ok(BlockType::Rules));
        assert_eq!("Declarations".parse::<BlockType>(), Ok(BlockType::Declarations));
        assert_eq!(BlockType::Ignore.to_string(), "ignore");
        assert!("nested".parse::<BlockType>().is_err());
    }

    #[test]
    fn test_block_type_for_uses_default_and_prefixes() {
        let spec = validator_grammar();
        assert_eq!(block_type_for(&spec, BlockType::Ignore, "-webkit-keyframes"), BlockType::Rules);
        assert_eq!(block_type_for(&spec, BlockType::Ignore, "font-face"), BlockType::Declarations);
        assert_eq!(block_type_for(&spec, BlockType::Ignore, "gregable"), BlockType::Ignore);
        assert_eq!(block_type_for(&spec, BlockType::Ignore, "MEDIA"), BlockType::Rules);
    }
}
