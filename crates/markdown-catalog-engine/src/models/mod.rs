pub mod document;

pub use document::{Document, Link, LinkKind, Section};
