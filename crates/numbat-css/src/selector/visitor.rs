//! Breadth-first traversal of a selector tree.

use std::collections::VecDeque;

use super::{
    AttrSelector, ClassSelector, Combinator, IdSelector, PseudoSelector, SelectorNode, SelectorsGroup,
    SimpleSelectorSequence, TypeSelector,
};

/// Callbacks for [`traverse`], one per node kind. Implement the ones of
/// interest; the rest do nothing.
pub trait SelectorVisitor {
    /// Called for each type or universal selector.
    fn visit_type_selector(&mut self, _type_selector: &TypeSelector) {}
    /// Called for each id selector.
    fn visit_id_selector(&mut self, _id_selector: &IdSelector) {}
    /// Called for each class selector.
    fn visit_class_selector(&mut self, _class_selector: &ClassSelector) {}
    /// Called for each attribute selector.
    fn visit_attr_selector(&mut self, _attr_selector: &AttrSelector) {}
    /// Called for each pseudo-class or pseudo-element.
    fn visit_pseudo_selector(&mut self, _pseudo_selector: &PseudoSelector) {}
    /// Called for each sequence, before its simple selectors.
    fn visit_simple_selector_sequence(&mut self, _sequence: &SimpleSelectorSequence) {}
    /// Called for each combinator, before its operands.
    fn visit_combinator(&mut self, _combinator: &Combinator) {}
    /// Called for the group, before its selectors.
    fn visit_selectors_group(&mut self, _group: &SelectorsGroup) {}
}

impl SelectorNode<'_> {
    /// Call the visitor method for this node's kind.
    pub fn accept<V: SelectorVisitor + ?Sized>(&self, visitor: &mut V) {
        match *self {
            Self::TypeSelector(node) => visitor.visit_type_selector(node),
            Self::IdSelector(node) => visitor.visit_id_selector(node),
            Self::ClassSelector(node) => visitor.visit_class_selector(node),
            Self::AttrSelector(node) => visitor.visit_attr_selector(node),
            Self::PseudoSelector(node) => visitor.visit_pseudo_selector(node),
            Self::SimpleSelectorSequence(node) => visitor.visit_simple_selector_sequence(node),
            Self::Combinator(node) => visitor.visit_combinator(node),
            Self::SelectorsGroup(node) => visitor.visit_selectors_group(node),
        }
    }
}

/// Visit `root` and every node below it, level by level. Children are
/// queued in [`SelectorNode::children`] order, so in `a > b c` the
/// descendant combinator is visited before the child combinator it
/// contains.
pub fn traverse<V: SelectorVisitor + ?Sized>(root: SelectorNode<'_>, visitor: &mut V) {
    let mut to_visit = VecDeque::from([root]);
    while let Some(node) = to_visit.pop_front() {
        node.accept(visitor);
        to_visit.extend(node.children());
    }
}
