//! # tabalign
//!
//! A tabular code-alignment engine for source-code formatters.
//!
//! Given a parsed region of code whose logical rows (consecutive
//! declarations, port lists, assignments) are each backed by a syntax
//! subtree, the engine adjusts inter-token whitespace so that
//! syntactically-corresponding fragments line up into visually consistent
//! columns, while respecting a maximum line width:
//!
//! ```text
//! a  = 1;
//! bb = 22;
//! ```
//!
//! The crate deliberately does not lex, parse, wrap lines, or emit text.
//! Its inputs are the artifacts a formatter already has — a token buffer, a
//! syntax tree, and a partition tree of candidate rows — and its only output
//! is mutated `spaces_required` values on those tokens, which a downstream
//! emitter renders. When a group of rows cannot be aligned (mixed grammar
//! shapes, a format-disabled region, or a width budget overflow), the engine
//! abstains and leaves the group's spacing bytewise unchanged; it never
//! partially aligns.
//!
//! ## Quick Start
//!
//! Language frontends supply a [`CellScanner`] that marks column anchor
//! points on each row's subtree. Here the scanner makes one column per
//! child of the row's node:
//!
//! ```rust
//! use tabalign::{
//!     tabular_align_tokens, ByteOffsetSet, CellScanner, ColumnAnchor, ColumnCollector,
//!     ColumnProperties, NodeKind, Partition, PreToken, Symbol, Token,
//! };
//!
//! let source = "a = 1;\nbb = 22;\n";
//!
//! // Tokens reference slices of the source; interior tokens request one
//! // leading space, the ";" hugs its neighbor.
//! let mut tokens = vec![
//!     PreToken::new(Token::new(&source[0..1], 0), 0),    // a
//!     PreToken::new(Token::new(&source[2..3], 2), 1),    // =
//!     PreToken::new(Token::new(&source[4..5], 4), 1),    // 1
//!     PreToken::new(Token::new(&source[5..6], 5), 0),    // ;
//!     PreToken::new(Token::new(&source[7..9], 7), 0),    // bb
//!     PreToken::new(Token::new(&source[10..11], 10), 1), // =
//!     PreToken::new(Token::new(&source[12..14], 12), 1), // 22
//!     PreToken::new(Token::new(&source[14..15], 14), 0), // ;
//! ];
//!
//! // One syntax node per assignment; the kind tags the grammar shape.
//! let kind = NodeKind(1);
//! let rows = vec![
//!     Symbol::node(kind, (0..4).map(|i| Symbol::leaf(tokens[i].token)).collect()),
//!     Symbol::node(kind, (4..8).map(|i| Symbol::leaf(tokens[i].token)).collect()),
//! ];
//!
//! let parent = Partition::new(0..8, 0, None).with_children(vec![
//!     Partition::new(0..4, 0, Some(&rows[0])),
//!     Partition::new(4..8, 0, Some(&rows[1])),
//! ]);
//!
//! struct DeclScanner;
//! impl<'src> CellScanner<'src> for DeclScanner {
//!     fn scan_row(
//!         &mut self,
//!         row: &Partition<'src>,
//!         _tokens: &[PreToken<'src>],
//!     ) -> Vec<ColumnAnchor<'src>> {
//!         let mut collector = ColumnCollector::new();
//!         if let Some(node) = row.origin.and_then(Symbol::as_node) {
//!             for (i, child) in node.children.iter().enumerate() {
//!                 collector.reserve_column(child, vec![i], ColumnProperties::default());
//!             }
//!         }
//!         collector.into_anchors()
//!     }
//! }
//!
//! tabular_align_tokens(
//!     &parent,
//!     &mut DeclScanner,
//!     &|_| false,
//!     &mut tokens,
//!     source,
//!     &ByteOffsetSet::new(),
//!     40,
//! );
//!
//! // "a" is one column narrower than "bb", so its "=" moves right.
//! assert_eq!(tokens[1].spacing.spaces_required, 2);
//! assert_eq!(tokens[5].spacing.spaces_required, 1);
//! ```
//!
//! ## Format-disabled regions
//!
//! Callers pass the byte ranges where formatting is turned off as a
//! [`ByteOffsetSet`], a canonical set of disjoint half-open intervals. Any
//! group of rows overlapping a disabled byte is skipped whole:
//!
//! ```rust
//! use tabalign::ByteOffsetSet;
//!
//! let mut disabled: ByteOffsetSet = [10..20, 30..40].into_iter().collect();
//! disabled.add(20..30); // fuses into a single interval
//! assert_eq!(disabled.to_string(), "[10, 40)");
//! assert!(disabled.contains(39));
//! ```
//!
//! ## Grouping
//!
//! Rows separated by one or more fully blank lines form independent
//! alignment groups, so the widths of one paragraph of declarations never
//! influence the next. Within a group, rows qualify only when they share a
//! syntax-node kind and survive the caller's ignore predicate (used for
//! comment-only rows); a group with fewer than two qualifying rows is left
//! alone.

mod align;
mod error;
mod interval_set;
mod partition;
mod scanner;
mod syntax;
mod token;

pub use crate::align::tabular_align_tokens;
pub use crate::error::AlignError;
pub use crate::interval_set::{ByteOffsetSet, IntervalScalar, IntervalSet};
pub use crate::partition::Partition;
pub use crate::scanner::{CellScanner, ColumnAnchor, ColumnCollector, ColumnProperties};
pub use crate::syntax::{NodeKind, Symbol, SyntaxNode, SyntaxPath};
pub use crate::token::{PreToken, Spacing, Token};
