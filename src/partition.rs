use std::ops::Range;

use crate::syntax::Symbol;
use crate::token::PreToken;

/// A node in the partition tree: one candidate row of an alignment group.
///
/// `tokens` indexes into the caller's token buffer. `origin` points at the
/// syntax subtree the row was built from; rows without an origin (comments,
/// blank carriers) are excluded from alignment by the ignore predicate or by
/// abstention. Children represent finer subdivisions; the alignment engine
/// works on the children of the partition it is handed.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    pub tokens: Range<usize>,
    pub indentation: usize,
    pub origin: Option<&'a Symbol<'a>>,
    pub children: Vec<Partition<'a>>,
}

impl<'a> Partition<'a> {
    pub fn new(tokens: Range<usize>, indentation: usize, origin: Option<&'a Symbol<'a>>) -> Self {
        Self {
            tokens,
            indentation,
            origin,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Partition<'a>>) -> Self {
        self.children = children;
        self
    }

    /// The slice of pre-format tokens this partition covers.
    pub fn token_slice<'t, 'src>(&self, tokens: &'t [PreToken<'src>]) -> &'t [PreToken<'src>] {
        &tokens[self.tokens.clone()]
    }

    /// Byte span of this partition's text within the source buffer, or
    /// `None` when the partition covers no tokens.
    pub fn text_span(&self, tokens: &[PreToken<'_>]) -> Option<Range<usize>> {
        let slice = self.token_slice(tokens);
        let first = slice.first()?;
        let last = slice.last()?;
        Some(first.token.offset..last.token.span().end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    #[test]
    fn text_span_covers_first_to_last_token() {
        let source = "a = 1;";
        let tokens = vec![
            PreToken::new(Token::new(&source[0..1], 0), 0),
            PreToken::new(Token::new(&source[2..3], 2), 1),
            PreToken::new(Token::new(&source[4..5], 4), 1),
            PreToken::new(Token::new(&source[5..6], 5), 0),
        ];
        let row = Partition::new(0..4, 0, None);
        assert_eq!(row.text_span(&tokens), Some(0..6));

        let empty = Partition::new(2..2, 0, None);
        assert_eq!(empty.text_span(&tokens), None);
    }
}
