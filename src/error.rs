use thiserror::Error;

use crate::syntax::NodeKind;

/// Reasons a candidate group is left unaligned.
///
/// These never cross the public interface: abstention is silent, and the
/// engine logs the reason at debug level before leaving the group's tokens
/// bytewise unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignError {
    /// Fewer than two qualifying rows; there is nothing to align against.
    #[error("group has {rows} qualifying row(s), alignment requires at least 2")]
    UnderfullGroup { rows: usize },

    /// Rows originate from syntax nodes of different kinds; their column
    /// schemas are not comparable.
    #[error("rows mix syntax node kinds {first:?} and {other:?}")]
    HeterogeneousRows { first: NodeKind, other: NodeKind },

    /// A qualifying row has no originating syntax node to derive a schema
    /// from.
    #[error("row has no originating syntax node")]
    RowWithoutOrigin,

    /// Trimming trailing out-of-subtree tokens never found the subtree's
    /// rightmost leaf; the scanner or partition builder broke its contract.
    #[error("row tokens do not contain the rightmost leaf of the row's subtree")]
    TrailingTokenMismatch,

    /// The aligned columns alone would exceed the line limit.
    #[error("aligned column width {width} exceeds column limit {limit}")]
    ColumnOverflow { width: usize, limit: usize },

    /// Some row's trailing unaligned text would push it past the line limit.
    #[error("aligned row width {width} with epilog exceeds column limit {limit}")]
    EpilogOverflow { width: usize, limit: usize },
}
