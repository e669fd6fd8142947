use serde::{Deserialize, Serialize};

use crate::partition::Partition;
use crate::syntax::{Symbol, SyntaxPath};
use crate::token::{PreToken, Token};

/// Per-column layout configuration carried on each anchor.
///
/// The first anchor seen for a path fixes the column's properties; scanners
/// are expected to emit consistent properties for a shared path, but this is
/// not verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProperties {
    /// Whether cell content is flushed to the left of the column (padding
    /// trails the content) or to the right (padding precedes it).
    pub flush_left: bool,
}

impl Default for ColumnProperties {
    fn default() -> Self {
        Self { flush_left: true }
    }
}

impl ColumnProperties {
    pub fn flush_right() -> Self {
        Self { flush_left: false }
    }
}

/// One sparse column anchor produced by a cell scanner for one row: the
/// column's identity (`path`), the first token of the cell, and the column's
/// layout properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAnchor<'src> {
    pub path: SyntaxPath,
    pub starting_token: Token<'src>,
    pub properties: ColumnProperties,
}

/// Per-language producer of column anchors.
///
/// For each row the scanner yields a sparse list of anchors in increasing
/// path order. Paths are shared across rows exactly when those cells should
/// share a column, and each anchor's `starting_token` is the leftmost token
/// of its cell.
pub trait CellScanner<'src> {
    fn scan_row(
        &mut self,
        row: &Partition<'src>,
        tokens: &[PreToken<'src>],
    ) -> Vec<ColumnAnchor<'src>>;
}

impl<'src, F> CellScanner<'src> for F
where
    F: FnMut(&Partition<'src>, &[PreToken<'src>]) -> Vec<ColumnAnchor<'src>>,
{
    fn scan_row(
        &mut self,
        row: &Partition<'src>,
        tokens: &[PreToken<'src>],
    ) -> Vec<ColumnAnchor<'src>> {
        self(row, tokens)
    }
}

/// Helper for scanner implementations: accumulates anchors for one row.
///
/// `reserve_column` resolves a subtree to its leftmost leaf and records an
/// anchor for it. Empty subtrees are ignored. Reserving the same path twice
/// in a row keeps the earlier (leftmost) token, which lets a scanner fuse a
/// cell with its predecessor by reusing the predecessor's path.
#[derive(Debug, Default)]
pub struct ColumnCollector<'src> {
    anchors: Vec<ColumnAnchor<'src>>,
}

impl<'src> ColumnCollector<'src> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve_column(
        &mut self,
        symbol: &Symbol<'src>,
        path: SyntaxPath,
        properties: ColumnProperties,
    ) {
        let Some(leaf) = symbol.leftmost_leaf() else {
            return;
        };
        if self.anchors.last().is_some_and(|prev| prev.path == path) {
            return;
        }
        self.anchors.push(ColumnAnchor {
            path,
            starting_token: leaf,
            properties,
        });
    }

    pub fn into_anchors(self) -> Vec<ColumnAnchor<'src>> {
        self.anchors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::NodeKind;

    const KIND: NodeKind = NodeKind(1);

    #[test]
    fn reserve_skips_empty_subtrees() {
        let mut collector = ColumnCollector::new();
        let empty: Symbol<'_> = Symbol::node(KIND, vec![]);
        collector.reserve_column(&empty, vec![0], ColumnProperties::default());
        assert!(collector.into_anchors().is_empty());
    }

    #[test]
    fn reserve_collapses_consecutive_same_path() {
        let source = "a b";
        let first = Symbol::leaf(Token::new(&source[0..1], 0));
        let second = Symbol::leaf(Token::new(&source[2..3], 2));

        let mut collector = ColumnCollector::new();
        collector.reserve_column(&first, vec![0], ColumnProperties::default());
        collector.reserve_column(&second, vec![0], ColumnProperties::default());
        collector.reserve_column(&second, vec![1], ColumnProperties::default());

        let anchors = collector.into_anchors();
        assert_eq!(anchors.len(), 2);
        // The earlier, leftmost token wins for the fused path.
        assert_eq!(anchors[0].starting_token, Token::new("a", 0));
        assert_eq!(anchors[1].starting_token, Token::new("b", 2));
    }
}
