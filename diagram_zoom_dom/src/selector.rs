// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small CSS selector subset for diagram descriptors.
//!
//! Supported:
//! - type selectors (`svg`) and the universal selector (`*`);
//! - `.class`, `#id`, `[attr]` and `[attr=value]` (value bare or quoted);
//! - compound selectors (`div.mermaid[data-kind=flow]`);
//! - descendant (` `) and child (`>`) combinators;
//! - comma-separated selector lists.
//!
//! Pseudo-classes, sibling combinators and attribute operators other than
//! `=` are rejected at parse time so that an unsupported selector surfaces as
//! a settings validation error instead of silently never matching.

use core::fmt;

use crate::document::{Document, NodeKind};
use crate::types::NodeId;

/// Errors from [`SelectorList::parse`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector (or one entry of the list) is empty.
    #[error("empty selector")]
    Empty,
    /// A character that cannot start or continue a selector here.
    #[error("unexpected character {found:?} at offset {offset}")]
    Unexpected {
        /// Byte offset into the source.
        offset: usize,
        /// The offending character.
        found: char,
    },
    /// The input ended inside a selector component.
    #[error("unexpected end of selector")]
    UnexpectedEnd,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttrSelector>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    // combinators[i] joins compounds[i] and compounds[i + 1].
    combinators: Vec<Combinator>,
}

/// A parsed, comma-separated selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    source: String,
    selectors: Vec<Complex>,
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl SelectorList {
    /// Parses a selector list.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser {
            chars: source.char_indices().collect(),
            pos: 0,
            len: source.len(),
        };
        let mut selectors = Vec::new();
        loop {
            parser.skip_ws();
            selectors.push(parser.complex()?);
            parser.skip_ws();
            match parser.peek() {
                None => break,
                Some(',') => parser.bump(),
                Some(found) => {
                    return Err(SelectorError::Unexpected {
                        offset: parser.offset(),
                        found,
                    });
                }
            }
        }
        Ok(Self {
            source: source.trim().to_owned(),
            selectors,
        })
    }

    /// Returns the selector text as written (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if `node` matches any selector in the list.
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.selectors
            .iter()
            .any(|complex| match_from(doc, node, complex, complex.compounds.len() - 1))
    }
}

fn match_from(doc: &Document, node: NodeId, complex: &Complex, i: usize) -> bool {
    if !compound_matches(doc, node, &complex.compounds[i]) {
        return false;
    }
    if i == 0 {
        return true;
    }
    match complex.combinators[i - 1] {
        Combinator::Child => doc
            .parent(node)
            .is_some_and(|p| match_from(doc, p, complex, i - 1)),
        Combinator::Descendant => doc
            .ancestors(node)
            .any(|a| match_from(doc, a, complex, i - 1)),
    }
}

fn compound_matches(doc: &Document, node: NodeId, compound: &Compound) -> bool {
    if doc.kind(node) != Some(NodeKind::Element) {
        return false;
    }
    if let Some(tag) = &compound.tag
        && !doc.tag(node).is_some_and(|t| t.eq_ignore_ascii_case(tag))
    {
        return false;
    }
    if let Some(id) = &compound.id
        && doc.attribute(node, "id").as_deref() != Some(id.as_str())
    {
        return false;
    }
    if !compound.classes.iter().all(|c| doc.has_class(node, c)) {
        return false;
    }
    compound.attributes.iter().all(|a| {
        let actual = doc.attribute(node, &a.name);
        match &a.value {
            None => actual.is_some(),
            Some(v) => actual.as_deref() == Some(v.as_str()),
        }
    })
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
    len: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars.get(self.pos).map_or(self.len, |&(o, _)| o)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected {
                offset: self.offset(),
                found,
            },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        if matches!(self.peek(), None | Some(',')) {
            return Err(SelectorError::Empty);
        }
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    Combinator::Child
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }
        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let mut any = false;
        match self.peek() {
            Some('*') => {
                self.bump();
                any = true;
            }
            Some(c) if is_ident_char(c) => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
                any = true;
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.ident()?);
                }
                Some('#') => {
                    self.bump();
                    compound.id = Some(self.ident()?);
                }
                Some('[') => {
                    self.bump();
                    compound.attributes.push(self.attribute()?);
                }
                _ => break,
            }
            any = true;
        }
        if any {
            Ok(compound)
        } else {
            Err(self.unexpected())
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some(c) = self.peek().filter(|&c| is_ident_char(c)) {
            out.push(c);
            self.bump();
        }
        if out.is_empty() {
            Err(self.unexpected())
        } else {
            Ok(out)
        }
    }

    fn attribute(&mut self) -> Result<AttrSelector, SelectorError> {
        self.skip_ws();
        let name = self.ident()?;
        self.skip_ws();
        let value = match self.peek() {
            Some('=') => {
                self.bump();
                self.skip_ws();
                let v = match self.peek() {
                    Some(q @ ('"' | '\'')) => self.quoted(q)?,
                    _ => self.ident()?,
                };
                self.skip_ws();
                Some(v)
            }
            _ => None,
        };
        match self.peek() {
            Some(']') => {
                self.bump();
                Ok(AttrSelector { name, value })
            }
            _ => Err(self.unexpected()),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, SelectorError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(SelectorError::UnexpectedEnd),
                Some(c) if c == quote => {
                    self.bump();
                    return Ok(out);
                }
                Some(c) => {
                    out.push(c);
                    self.bump();
                }
            }
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let block = doc.create_element("div");
        doc.set_attribute(block, "class", "block-language-plantuml cm-embed");
        doc.set_attribute(block, "data-lang", "plantuml");
        doc.append_child(root, block);
        let img = doc.create_element("IMG");
        doc.set_attribute(img, "id", "uml");
        doc.append_child(block, img);
        (doc, root, block, img)
    }

    #[test]
    fn parses_and_matches_compounds() {
        let (doc, _, block, img) = tree();
        let s = SelectorList::parse("div.block-language-plantuml[data-lang=plantuml]").unwrap();
        assert!(s.matches(&doc, block));
        assert!(!s.matches(&doc, img));

        let s = SelectorList::parse("img#uml").unwrap();
        assert!(s.matches(&doc, img));

        let s = SelectorList::parse("[data-lang='plantuml']").unwrap();
        assert!(s.matches(&doc, block));

        let s = SelectorList::parse("*").unwrap();
        assert!(s.matches(&doc, img));
    }

    #[test]
    fn combinators() {
        let (doc, _, _, img) = tree();
        assert!(SelectorList::parse("html img").unwrap().matches(&doc, img));
        assert!(SelectorList::parse(".cm-embed > img").unwrap().matches(&doc, img));
        assert!(!SelectorList::parse("html > img").unwrap().matches(&doc, img));
        assert!(SelectorList::parse("svg, .cm-embed>img").unwrap().matches(&doc, img));
    }

    #[test]
    fn query_selector_excludes_scope() {
        let (doc, root, block, img) = tree();
        let s = SelectorList::parse(".cm-embed").unwrap();
        assert_eq!(doc.query_selector(root, &s), Some(block));
        assert_eq!(doc.query_selector(block, &s), None);
        assert_eq!(doc.closest(img, &s), Some(block));
    }

    #[test]
    fn rejects_malformed_selectors() {
        assert_eq!(SelectorList::parse(""), Err(SelectorError::Empty));
        assert_eq!(SelectorList::parse("a,,b"), Err(SelectorError::Empty));
        assert_eq!(SelectorList::parse(".a,"), Err(SelectorError::Empty));
        assert_eq!(SelectorList::parse("."), Err(SelectorError::UnexpectedEnd));
        assert!(matches!(
            SelectorList::parse("a:hover"),
            Err(SelectorError::Unexpected { found: ':', .. })
        ));
        assert!(matches!(
            SelectorList::parse("[x~=y]"),
            Err(SelectorError::Unexpected { found: '~', .. })
        ));
        assert_eq!(
            SelectorList::parse("[x='y"),
            Err(SelectorError::UnexpectedEnd)
        );
    }

    #[test]
    fn display_round_trips_source() {
        let s = SelectorList::parse("  .mermaid  ").unwrap();
        assert_eq!(s.to_string(), ".mermaid");
        assert_eq!(s.as_str(), ".mermaid");
    }
}
