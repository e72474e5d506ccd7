mod atom;
mod builder;
mod group;
mod hashing;
mod tokenize;

pub(crate) use atom::{Atom, AtomContent};
pub(crate) use builder::UnitBuilder;
pub(crate) use group::{Unit, UnitGroup};
pub(crate) use hashing::Digest;
