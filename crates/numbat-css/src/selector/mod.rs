//! CSS selector grammar per
//! [Selectors Level 3 § 10 The grammar of Selectors](https://www.w3.org/TR/selectors-3/#w3cselgrammar).
//!
//! Selectors are parsed from the token list of a qualified rule's prelude
//! into a small tree of nodes. Attribute selectors and functional
//! pseudo-classes (including `:not(...)`) keep their raw tokens; they are
//! not parsed further.

mod parser;
mod visitor;

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use strum_macros::{Display, IntoStaticStr};

use crate::error::Position;
use crate::tokenizer::Token;

pub use parser::{
    parse, parse_a_class_selector, parse_a_pseudo_selector, parse_a_selector,
    parse_a_selectors_group, parse_a_simple_selector_sequence, parse_a_type_selector,
    parse_an_attr_selector, parse_an_id_selector,
};
pub use visitor::{SelectorVisitor, traverse};

/// The kind of a selector node, as written in the `node` field of its JSON
/// form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    /// [`TypeSelector`]
    TypeSelector,
    /// [`IdSelector`]
    IdSelector,
    /// [`ClassSelector`]
    ClassSelector,
    /// [`AttrSelector`]
    AttrSelector,
    /// [`PseudoSelector`]
    PseudoSelector,
    /// [`SimpleSelectorSequence`]
    SimpleSelectorSequence,
    /// [`Combinator`]
    Combinator,
    /// [`SelectorsGroup`]
    SelectorsGroup,
}

/// [§ 6.1 Type selector](https://www.w3.org/TR/selectors-3/#type-selectors)
/// and [§ 6.2 Universal selector](https://www.w3.org/TR/selectors-3/#universal-selector)
///
/// The universal selector is a type selector with element name `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSelector {
    /// Position of the first token, including a namespace prefix.
    pub position: Position,
    /// "a specific prefix" selects that namespace, `""` selects elements
    /// without a namespace, `"*"` any namespace, and `None` the default
    /// namespace.
    pub namespace_prefix: Option<String>,
    /// Element name, or `*`.
    pub element_name: String,
}

impl TypeSelector {
    /// The implied `*` of a sequence that starts with another selector.
    #[must_use]
    pub fn universal(position: Position) -> Self {
        Self {
            position,
            namespace_prefix: None,
            element_name: "*".to_owned(),
        }
    }
}

impl fmt::Display for TypeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace_prefix {
            Some(prefix) => write!(f, "{prefix}|{}", self.element_name),
            None => f.write_str(&self.element_name),
        }
    }
}

/// [§ 6.5 ID selectors](https://www.w3.org/TR/selectors-3/#id-selectors), e.g. `#foo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSelector {
    /// Position of the HASH token.
    pub position: Position,
    /// The id, without `#`.
    pub value: String,
}

impl fmt::Display for IdSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.value)
    }
}

/// [§ 6.4 Class selectors](https://www.w3.org/TR/selectors-3/#class-html)
///
/// "the period (.) notation can be used as an alternative to the ~= notation
/// when representing the class attribute"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSelector {
    /// Position of the `.`.
    pub position: Position,
    /// The class name.
    pub value: String,
}

impl fmt::Display for ClassSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.value)
    }
}

/// [§ 6.3 Attribute selectors](https://www.w3.org/TR/selectors-3/#attribute-selectors), e.g. `[href^=http]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrSelector {
    /// Position of the `[`.
    pub position: Position,
    /// The tokens between the brackets, followed by an EOF token at the
    /// position of the `]`.
    pub value: Vec<Token>,
}

/// [§ 6.6 Pseudo-classes](https://www.w3.org/TR/selectors-3/#pseudo-classes)
/// and [§ 7 Pseudo-elements](https://www.w3.org/TR/selectors-3/#pseudo-elements)
///
/// `:visited`, `:lang(fr)`, `::first-line`.
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoSelector {
    /// Position of the first colon.
    pub position: Position,
    /// True for `:name` (pseudo-class), false for `::name` (pseudo-element).
    pub is_class: bool,
    /// Name of the pseudo-class or pseudo-element (the function name for
    /// the functional form).
    pub name: String,
    /// For the functional form: the function token, its argument tokens and
    /// an EOF token at the position of the `)`. Empty otherwise.
    pub func: Vec<Token>,
}

/// A simple selector following the type selector in a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum OtherSelector {
    /// `#id`
    Id(IdSelector),
    /// `.class`
    Class(ClassSelector),
    /// `[attr]`
    Attr(AttrSelector),
    /// `:pseudo`
    Pseudo(PseudoSelector),
}

impl OtherSelector {
    /// Position of the selector's first token.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Id(s) => s.position,
            Self::Class(s) => s.position,
            Self::Attr(s) => s.position,
            Self::Pseudo(s) => s.position,
        }
    }
}

/// [§ 4 Selector syntax](https://www.w3.org/TR/selectors-3/#selector-syntax)
///
/// "A sequence of simple selectors is a chain of simple selectors that are
/// not separated by a combinator. It always begins with a type selector or a
/// universal selector."
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleSelectorSequence {
    /// Position of the sequence's first token.
    pub position: Position,
    /// The explicit type selector, or an implied `*`.
    pub type_selector: TypeSelector,
    /// The remaining simple selectors in source order.
    pub other_selectors: Vec<OtherSelector>,
}

/// [§ 8 Combinators](https://www.w3.org/TR/selectors-3/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CombinatorType {
    /// "A descendant combinator is whitespace that separates two sequences of
    /// simple selectors."
    Descendant,
    /// `>`
    Child,
    /// `+`
    AdjacentSibling,
    /// `~`
    GeneralSibling,
}

/// Two selectors joined by a combinator. Chains fold to the left, so
/// `a b > c` is `(a b) > c`.
#[derive(Debug, Clone, PartialEq)]
pub struct Combinator {
    /// Position of the combinator token (the whitespace for DESCENDANT).
    pub position: Position,
    /// Which relationship the combinator expresses.
    pub combinator_type: CombinatorType,
    /// Everything to the left of the combinator.
    pub left: Box<Selector>,
    /// The sequence to its right.
    pub right: SimpleSelectorSequence,
}

/// The `selector` production: a sequence, or a chain of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// A single sequence of simple selectors.
    Sequence(SimpleSelectorSequence),
    /// Sequences joined by combinators.
    Combinator(Combinator),
}

impl Selector {
    /// Position of the sequence, or of the outermost combinator.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Sequence(s) => s.position,
            Self::Combinator(c) => c.position,
        }
    }
}

/// [§ 5 Groups of selectors](https://www.w3.org/TR/selectors-3/#grouping)
///
/// Only built for two or more comma-separated selectors.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorsGroup {
    /// Position of the first selector.
    pub position: Position,
    /// The selectors in source order.
    pub elements: Vec<Selector>,
}

/// The result of [`parse`]: a lone selector or a group of them.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorTree {
    /// A selector without commas.
    Selector(Selector),
    /// Two or more comma-separated selectors.
    Group(SelectorsGroup),
}

impl SelectorTree {
    /// The root node, for [`traverse`].
    #[must_use]
    pub const fn root(&self) -> SelectorNode<'_> {
        match self {
            Self::Selector(selector) => SelectorNode::from_selector(selector),
            Self::Group(group) => SelectorNode::SelectorsGroup(group),
        }
    }

    /// The selectors in source order; one for a lone selector.
    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        match self {
            Self::Selector(selector) => std::slice::from_ref(selector),
            Self::Group(group) => &group.elements,
        }
    }
}

/// A borrowed reference to any node of a selector tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectorNode<'a> {
    /// `TYPE_SELECTOR`
    TypeSelector(&'a TypeSelector),
    /// `ID_SELECTOR`
    IdSelector(&'a IdSelector),
    /// `CLASS_SELECTOR`
    ClassSelector(&'a ClassSelector),
    /// `ATTR_SELECTOR`
    AttrSelector(&'a AttrSelector),
    /// `PSEUDO_SELECTOR`
    PseudoSelector(&'a PseudoSelector),
    /// `SIMPLE_SELECTOR_SEQUENCE`
    SimpleSelectorSequence(&'a SimpleSelectorSequence),
    /// `COMBINATOR`
    Combinator(&'a Combinator),
    /// `SELECTORS_GROUP`
    SelectorsGroup(&'a SelectorsGroup),
}

impl<'a> SelectorNode<'a> {
    /// The node for a selector.
    #[must_use]
    pub const fn from_selector(selector: &'a Selector) -> Self {
        match selector {
            Selector::Sequence(sequence) => Self::SimpleSelectorSequence(sequence),
            Selector::Combinator(combinator) => Self::Combinator(combinator),
        }
    }

    /// The node for a simple selector after the type selector.
    #[must_use]
    pub const fn from_other(other: &'a OtherSelector) -> Self {
        match other {
            OtherSelector::Id(s) => Self::IdSelector(s),
            OtherSelector::Class(s) => Self::ClassSelector(s),
            OtherSelector::Attr(s) => Self::AttrSelector(s),
            OtherSelector::Pseudo(s) => Self::PseudoSelector(s),
        }
    }

    /// The node kind.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        match self {
            Self::TypeSelector(_) => NodeType::TypeSelector,
            Self::IdSelector(_) => NodeType::IdSelector,
            Self::ClassSelector(_) => NodeType::ClassSelector,
            Self::AttrSelector(_) => NodeType::AttrSelector,
            Self::PseudoSelector(_) => NodeType::PseudoSelector,
            Self::SimpleSelectorSequence(_) => NodeType::SimpleSelectorSequence,
            Self::Combinator(_) => NodeType::Combinator,
            Self::SelectorsGroup(_) => NodeType::SelectorsGroup,
        }
    }

    /// The node's position.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::TypeSelector(s) => s.position,
            Self::IdSelector(s) => s.position,
            Self::ClassSelector(s) => s.position,
            Self::AttrSelector(s) => s.position,
            Self::PseudoSelector(s) => s.position,
            Self::SimpleSelectorSequence(s) => s.position,
            Self::Combinator(s) => s.position,
            Self::SelectorsGroup(s) => s.position,
        }
    }

    /// Direct children in traversal order: a sequence's type selector then
    /// its other selectors, a combinator's left then right, a group's
    /// elements.
    #[must_use]
    pub fn children(&self) -> Vec<SelectorNode<'a>> {
        match *self {
            Self::SimpleSelectorSequence(sequence) => std::iter::once(Self::TypeSelector(&sequence.type_selector))
                .chain(sequence.other_selectors.iter().map(Self::from_other))
                .collect(),
            Self::Combinator(combinator) => vec![
                Self::from_selector(&combinator.left),
                Self::SimpleSelectorSequence(&combinator.right),
            ],
            Self::SelectorsGroup(group) => group.elements.iter().map(Self::from_selector).collect(),
            _ => Vec::new(),
        }
    }
}

fn serialize_header<S: Serializer>(
    serializer: S,
    position: Position,
    node: NodeType,
) -> Result<S::SerializeMap, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    map.serialize_entry("line", &position.line)?;
    map.serialize_entry("col", &position.col)?;
    map.serialize_entry("node", <&'static str>::from(node))?;
    Ok(map)
}

impl Serialize for TypeSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serialize_header(serializer, self.position, NodeType::TypeSelector)?;
        map.serialize_entry("namespacePrefix", &self.namespace_prefix)?;
        map.serialize_entry("elementName", &self.element_name)?;
        map.end()
    }
}

impl Serialize for IdSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serialize_header(serializer, self.position, NodeType::IdSelector)?;
        map.serialize_entry("value", &self.value)?;
        map.end()
    }
}

impl Serialize for ClassSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serialize_header(serializer, self.position, NodeType::ClassSelector)?;
        map.serialize_entry("value", &self.value)?;
        map.end()
    }
}

impl Serialize for AttrSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serialize_header(serializer, self.position, NodeType::AttrSelector)?;
        map.serialize_entry("value", &self.value)?;
        map.end()
    }
}

impl Serialize for PseudoSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serialize_header(serializer, self.position, NodeType::PseudoSelector)?;
        map.serialize_entry("isClass", &self.is_class)?;
        map.serialize_entry("name", &self.name)?;
        if !self.func.is_empty() {
            map.serialize_entry("func", &self.func)?;
        }
        map.end()
    }
}

impl Serialize for OtherSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Id(s) => s.serialize(serializer),
            Self::Class(s) => s.serialize(serializer),
            Self::Attr(s) => s.serialize(serializer),
            Self::Pseudo(s) => s.serialize(serializer),
        }
    }
}

impl Serialize for SimpleSelectorSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serialize_header(serializer, self.position, NodeType::SimpleSelectorSequence)?;
        map.serialize_entry("typeSelector", &self.type_selector)?;
        map.serialize_entry("otherSelectors", &self.other_selectors)?;
        map.end()
    }
}

impl Serialize for Combinator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serialize_header(serializer, self.position, NodeType::Combinator)?;
        map.serialize_entry("combinatorType", <&'static str>::from(self.combinator_type))?;
        map.serialize_entry("left", &*self.left)?;
        map.serialize_entry("right", &self.right)?;
        map.end()
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Sequence(s) => s.serialize(serializer),
            Self::Combinator(c) => c.serialize(serializer),
        }
    }
}

impl Serialize for SelectorsGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serialize_header(serializer, self.position, NodeType::SelectorsGroup)?;
        map.serialize_entry("elements", &self.elements)?;
        map.end()
    }
}

impl Serialize for SelectorTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Selector(s) => s.serialize(serializer),
            Self::Group(g) => g.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_selector_display() {
        let mut selector = TypeSelector::universal(Position::default());
        assert_eq!(selector.to_string(), "*");
        selector.namespace_prefix = Some(String::new());
        selector.element_name = "svg".to_owned();
        assert_eq!(selector.to_string(), "|svg");
        selector.namespace_prefix = Some("*".to_owned());
        assert_eq!(selector.to_string(), "*|svg");
    }

    #[test]
    fn test_node_type_names() {
        assert_eq!(NodeType::SimpleSelectorSequence.to_string(), "SIMPLE_SELECTOR_SEQUENCE");
        assert_eq!(CombinatorType::AdjacentSibling.to_string(), "ADJACENT_SIBLING");
    }
}
