// src/feed/raw.rs

//! Typed views over raw archive entries
//!
//! An entry is published as `(name . [version deps description kind ...])`.
//! The plain-list form `((name) (version deps description kind))` is read the
//! same way. Nothing here allocates beyond the name text; the views borrow
//! from the parsed feed.

use std::borrow::Cow;

use crate::sexp::Sexp;

/// Positions inside an entry's info vector
const INFO_VERSION: usize = 0;
const INFO_DEPENDENCIES: usize = 1;
const INFO_DESCRIPTION: usize = 2;
const INFO_SRC_TYPE: usize = 3;

/// Minimum number of info fields; archives may append more (extras alist)
const INFO_FIELDS: usize = 4;

/// Split an entry into its name node and its info node
fn split_entry(entry: &Sexp) -> Option<(&Sexp, &Sexp)> {
    match entry {
        Sexp::List(items) if items.len() == 2 => Some((&items[0], &items[1])),
        Sexp::Dotted(items, tail) if items.len() == 1 => Some((&items[0], tail)),
        _ => None,
    }
}

/// The entry's package name as text
///
/// Accepts an atom or a one-element list holding an atom.
pub fn entry_name(entry: &Sexp) -> Option<Cow<'_, str>> {
    let (head, _) = split_entry(entry)?;
    match head {
        Sexp::List(items) if items.len() == 1 => items[0].as_text(),
        atom => atom.as_text(),
    }
}

/// The fixed-position info fields of an entry
#[derive(Debug, Clone, Copy)]
pub struct RawInfo<'a> {
    pub version: &'a Sexp,
    pub dependencies: &'a Sexp,
    pub description: &'a Sexp,
    pub source_type: &'a Sexp,
}

/// Extract the info fields, or `None` if the entry is not shaped like one
pub fn entry_info(entry: &Sexp) -> Option<RawInfo<'_>> {
    let (_, info) = split_entry(entry)?;
    let fields = match info {
        Sexp::List(items) | Sexp::Vector(items) => items,
        _ => return None,
    };
    if fields.len() < INFO_FIELDS {
        return None;
    }
    Some(RawInfo {
        version: &fields[INFO_VERSION],
        dependencies: &fields[INFO_DEPENDENCIES],
        description: &fields[INFO_DESCRIPTION],
        source_type: &fields[INFO_SRC_TYPE],
    })
}

/// The dependency slot of an entry
#[derive(Debug, Clone, PartialEq)]
pub enum RawDependencies<'a> {
    /// A sequence of `(name version)` items
    Pairs(&'a [Sexp]),
    /// Free text where a list was expected (e.g. "No commentary.")
    Text(Cow<'a, str>),
    /// Anything else; carries no dependencies
    Malformed,
}

impl<'a> RawDependencies<'a> {
    pub fn from_sexp(node: &'a Sexp) -> Self {
        if let Some(items) = node.as_items() {
            return RawDependencies::Pairs(items);
        }
        match node.as_text() {
            Some(text) => RawDependencies::Text(text),
            None => RawDependencies::Malformed,
        }
    }
}

/// Name element of one dependency item
///
/// Items are `(name version)`; an item that is not a sequence has no name.
pub fn dependency_name(item: &Sexp) -> Option<Cow<'_, str>> {
    item.car()?.as_text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sexp::parse;

    #[test]
    fn test_name_from_dotted_entry() {
        let entry = parse("(ace-window . [(0 10 0) nil \"x\" single])").unwrap();
        assert_eq!(entry_name(&entry).as_deref(), Some("ace-window"));
    }

    #[test]
    fn test_name_from_list_entry() {
        let entry = parse("((\"foo\") ((1 2 0) () \"desc\" \"single\"))").unwrap();
        assert_eq!(entry_name(&entry).as_deref(), Some("foo"));

        let entry = parse("(bar ((1) () \"desc\" tar))").unwrap();
        assert_eq!(entry_name(&entry).as_deref(), Some("bar"));
    }

    #[test]
    fn test_name_rejects_other_shapes() {
        assert!(entry_name(&parse("foo").unwrap()).is_none());
        assert!(entry_name(&parse("(a b c)").unwrap()).is_none());
        assert!(entry_name(&parse("((a b) [])").unwrap()).is_none());
    }

    #[test]
    fn test_info_fields() {
        let entry = parse(
            "(magit . [(3 3 0) ((dash (2 19))) \"Git\" tar ((:url . \"https://magit.vc\"))])",
        )
        .unwrap();
        let info = entry_info(&entry).unwrap();
        assert_eq!(info.version, &parse("(3 3 0)").unwrap());
        assert_eq!(info.description, &Sexp::string("Git"));
        assert_eq!(info.source_type, &Sexp::symbol("tar"));
    }

    #[test]
    fn test_info_too_short() {
        let entry = parse("(magit . [(3 3 0) nil \"Git\"])").unwrap();
        assert!(entry_info(&entry).is_none());
        let entry = parse("(magit . \"not a vector\")").unwrap();
        assert!(entry_info(&entry).is_none());
    }

    #[test]
    fn test_dependencies_shapes() {
        let pairs = parse("((avy (0 5)) (dash (2)))").unwrap();
        assert!(matches!(RawDependencies::from_sexp(&pairs), RawDependencies::Pairs(p) if p.len() == 2));

        let nil = Sexp::symbol("nil");
        assert_eq!(RawDependencies::from_sexp(&nil), RawDependencies::Pairs(&[]));

        let text = Sexp::string("No commentary.");
        assert_eq!(
            RawDependencies::from_sexp(&text),
            RawDependencies::Text(Cow::Borrowed("No commentary."))
        );

        let dotted = parse("(a . b)").unwrap();
        assert_eq!(RawDependencies::from_sexp(&dotted), RawDependencies::Malformed);
    }

    #[test]
    fn test_dependency_name() {
        assert_eq!(
            dependency_name(&parse("(avy (0 5))").unwrap()).as_deref(),
            Some("avy")
        );
        assert_eq!(
            dependency_name(&parse("(\"baz\" 1)").unwrap()).as_deref(),
            Some("baz")
        );
        assert!(dependency_name(&Sexp::symbol("avy")).is_none());
        assert!(dependency_name(&parse("((x) 1)").unwrap()).is_none());
    }
}
