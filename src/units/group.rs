use crate::tree::{ElementHandle, ElementKind};

use super::atom::Atom;
use super::hashing::Digest;

/// One node of the comparison-unit hierarchy: a group mirrors a block
/// element, an atom is a leaf.
///
/// Paragraph groups contain only atoms; every other group kind contains only
/// groups. The tree is built once per input document and is immutable
/// afterwards.
#[derive(Debug, Clone)]
pub(crate) enum Unit {
    Group(UnitGroup),
    Atom(Atom),
}

impl Unit {
    pub(crate) fn exact_hash(&self) -> Digest {
        match self {
            Unit::Group(group) => group.exact_hash,
            Unit::Atom(atom) => atom.exact_hash,
        }
    }

    pub(crate) fn content_hash(&self) -> Digest {
        match self {
            Unit::Group(group) => group.content_hash,
            Unit::Atom(atom) => atom.content_hash,
        }
    }

    pub(crate) fn as_group(&self) -> Option<&UnitGroup> {
        match self {
            Unit::Group(group) => Some(group),
            Unit::Atom(_) => None,
        }
    }

    /// Appends every atom of the subtree in document order.
    pub(crate) fn collect_atoms<'u>(&'u self, out: &mut Vec<&'u Atom>) {
        match self {
            Unit::Atom(atom) => out.push(atom),
            Unit::Group(group) => {
                for child in &group.children {
                    child.collect_atoms(out);
                }
            }
        }
    }
}

/// Ordered collection of units representing one block element, annotated with
/// digests derived bottom-up from its children.
#[derive(Debug, Clone)]
pub(crate) struct UnitGroup {
    pub element: ElementHandle,
    pub kind: ElementKind,
    pub children: Vec<Unit>,
    pub exact_hash: Digest,
    pub content_hash: Digest,
}

impl UnitGroup {
    pub(crate) fn atoms(&self) -> Vec<&Atom> {
        let mut atoms = Vec::new();
        for child in &self.children {
            child.collect_atoms(&mut atoms);
        }
        atoms
    }
}
