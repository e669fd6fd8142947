use std::collections::BTreeMap;
use std::ops::Range;

use tracing::{debug, trace};

use crate::error::AlignError;
use crate::interval_set::ByteOffsetSet;
use crate::partition::Partition;
use crate::scanner::{CellScanner, ColumnAnchor, ColumnProperties};
use crate::syntax::{NodeKind, Symbol, SyntaxPath};
use crate::token::{PreToken, Token};

/// Width of a token range rendered with its minimum required spacing: the
/// sum of leading spaces and text widths, less the first token's leading
/// spaces (the cell's leading border is accounted for separately).
fn effective_cell_width(tokens: &[PreToken<'_>]) -> usize {
    let Some(first) = tokens.first() else {
        return 0;
    };
    tokens
        .iter()
        .map(|t| t.leading_spaces() + t.token.width())
        .sum::<usize>()
        - first.leading_spaces()
}

fn effective_left_border_width(tokens: &[PreToken<'_>]) -> usize {
    tokens
        .first()
        .map_or(0, |t| t.spacing.spaces_required)
}

/// One cell of the alignment matrix: a slice of the row's tokens (possibly
/// empty) plus its computed widths.
#[derive(Debug, Clone)]
struct AlignmentCell {
    tokens: Range<usize>,
    compact_width: usize,
    left_border_width: usize,
}

impl Default for AlignmentCell {
    fn default() -> Self {
        Self {
            tokens: 0..0,
            compact_width: 0,
            left_border_width: 0,
        }
    }
}

impl AlignmentCell {
    fn update_widths(&mut self, tokens: &[PreToken<'_>]) {
        let slice = &tokens[self.tokens.clone()];
        self.compact_width = effective_cell_width(slice);
        self.left_border_width = effective_left_border_width(slice);
    }
}

type AlignmentRow = Vec<AlignmentCell>;
type AlignmentMatrix = Vec<AlignmentRow>;

/// Aggregated width configuration of one column across all rows.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnConfig {
    width: usize,
    left_border: usize,
}

impl ColumnConfig {
    fn total_width(&self) -> usize {
        self.left_border + self.width
    }

    fn update_from_cell(&mut self, cell: &AlignmentCell) {
        self.width = self.width.max(cell.compact_width);
        self.left_border = self.left_border.max(cell.left_border_width);
    }
}

/// Data aggregated for one unique syntax path across all rows.
#[derive(Debug, Default)]
struct AggregateColumnData<'src> {
    // First-seen properties win; scanners should be consistent across rows
    // but this is not verified.
    properties: ColumnProperties,
    starting_tokens: Vec<Token<'src>>,
}

impl<'src> AggregateColumnData<'src> {
    fn import(&mut self, anchor: &ColumnAnchor<'src>) {
        if self.starting_tokens.is_empty() {
            self.properties = anchor.properties;
        }
        self.starting_tokens.push(anchor.starting_token);
    }
}

/// Unions the sparse column keys of all rows into an ordered dense column
/// index, keyed by syntax path.
#[derive(Debug, Default)]
struct ColumnSchemaAggregator<'src> {
    cell_map: BTreeMap<SyntaxPath, AggregateColumnData<'src>>,
    column_positions: Vec<SyntaxPath>,
}

impl<'src> ColumnSchemaAggregator<'src> {
    fn collect(&mut self, row: &[ColumnAnchor<'src>]) {
        for anchor in row {
            self.cell_map
                .entry(anchor.path.clone())
                .or_default()
                .import(anchor);
        }
    }

    /// Establishes the 1:1 path-to-column-index mapping. Call after all rows
    /// have been collected.
    fn finalize_column_indices(&mut self) {
        self.column_positions = self.cell_map.keys().cloned().collect();
        for (path, data) in &self.cell_map {
            trace!(?path, rows = data.starting_tokens.len(), "column");
        }
    }

    fn column_positions(&self) -> &[SyntaxPath] {
        &self.column_positions
    }

    fn column_properties(&self) -> Vec<ColumnProperties> {
        self.cell_map.values().map(|data| data.properties).collect()
    }
}

/// Range of tokens and sparse anchors for one row.
#[derive(Debug)]
struct AlignmentRowData<'src> {
    token_range: Range<usize>,
    sparse_columns: Vec<ColumnAnchor<'src>>,
}

/// Translates a row's sparse anchors into a dense row of token sub-ranges.
///
/// Both the anchor paths and `column_positions` are monotonic, so a single
/// forward pass over each suffices. Cells with no anchor get an empty range
/// pinned at the next anchor's token (or the row end), which fixes their
/// horizontal position.
fn fill_alignment_row(
    row_data: &AlignmentRowData<'_>,
    column_positions: &[SyntaxPath],
    tokens: &[PreToken<'_>],
    row: &mut AlignmentRow,
) {
    let token_end = row_data.token_range.end;
    let mut pos_index = 0;
    let mut token_index = row_data.token_range.start;
    let mut last_column_index = 0;

    for anchor in &row_data.sparse_columns {
        while pos_index < column_positions.len() && column_positions[pos_index] != anchor.path {
            pos_index += 1;
        }
        // The sparse paths are a subset of the aggregated set by
        // construction.
        assert!(
            pos_index < column_positions.len(),
            "anchor path missing from aggregated column schema"
        );
        let column_index = pos_index;

        while token_index < token_end && tokens[token_index].token != anchor.starting_token {
            token_index += 1;
        }
        assert!(
            token_index < token_end,
            "anchor starting token not found in row token range"
        );
        trace!(column_index, token_index, "cell anchor");

        // Pin this cell and any empty cells before it to the anchor token.
        while last_column_index <= column_index {
            row[last_column_index].tokens = token_index..token_index;
            last_column_index += 1;
        }
    }

    // Trailing cells with no anchor pin to the row end.
    while last_column_index < column_positions.len() {
        row[last_column_index].tokens = token_end..token_end;
        last_column_index += 1;
    }

    // Right-to-left pass: each cell extends to the start of the next, and
    // the last populated cell absorbs the tokens up to the row end.
    let mut upper_bound = token_end;
    for cell in row.iter_mut().rev() {
        cell.tokens.end = upper_bound;
        upper_bound = cell.tokens.start;
    }
}

fn compute_cell_widths(matrix: &mut AlignmentMatrix, tokens: &[PreToken<'_>]) {
    for row in matrix {
        for cell in row {
            cell.update_widths(tokens);
        }
    }
}

fn compute_column_widths(matrix: &AlignmentMatrix, num_columns: usize) -> Vec<ColumnConfig> {
    let mut column_configs = vec![ColumnConfig::default(); num_columns];
    for row in matrix {
        for (config, cell) in column_configs.iter_mut().zip(row) {
            config.update_from_cell(cell);
        }
    }
    column_configs
}

/// Adjusts pre-token spacing for a single row so its cells land in the
/// aggregated columns. Empty cells forward their column's budget to the next
/// populated cell.
fn align_row_spacings(
    column_configs: &[ColumnConfig],
    properties: &[ColumnProperties],
    row: &AlignmentRow,
    tokens: &mut [PreToken<'_>],
) {
    let mut accrued_spaces = 0;
    for ((cell, config), props) in row.iter().zip(column_configs).zip(properties) {
        accrued_spaces += config.left_border;
        if cell.tokens.is_empty() {
            accrued_spaces += config.width;
        } else {
            let padding = config.width - cell.compact_width;
            let spacing = &mut tokens[cell.tokens.start].spacing;
            if props.flush_left {
                spacing.spaces_required = accrued_spaces;
                accrued_spaces = padding;
            } else {
                spacing.spaces_required = accrued_spaces + padding;
                accrued_spaces = 0;
            }
            trace!(left_spacing = spacing.spaces_required, "aligned cell");
        }
    }
}

fn partition_node_kind(partition: &Partition<'_>) -> Result<NodeKind, AlignError> {
    match partition.origin {
        Some(Symbol::Node(node)) => Ok(node.kind),
        _ => Err(AlignError::RowWithoutOrigin),
    }
}

fn verify_row_kinds(rows: &[&Partition<'_>]) -> Result<(), AlignError> {
    let first = partition_node_kind(rows[0])?;
    for row in &rows[1..] {
        let kind = partition_node_kind(row)?;
        if kind != first {
            return Err(AlignError::HeterogeneousRows { first, other: kind });
        }
    }
    Ok(())
}

/// The row's mutable token range: the partition's tokens minus any trailing
/// tokens outside the span of the row's origin subtree (such as a trailing
/// comma delimiter). The backward scan is expected to check at most a few
/// tokens.
fn row_token_range(
    partition: &Partition<'_>,
    tokens: &[PreToken<'_>],
) -> Result<Range<usize>, AlignError> {
    let origin = partition.origin.ok_or(AlignError::RowWithoutOrigin)?;
    trace!(origin_span = ?origin.text_span(), "extracting row");
    let last_leaf = origin
        .rightmost_leaf()
        .ok_or(AlignError::TrailingTokenMismatch)?;
    let begin = partition.tokens.start;
    let mut end = partition.tokens.end;
    loop {
        if end == begin {
            return Err(AlignError::TrailingTokenMismatch);
        }
        if tokens[end - 1].token == last_leaf {
            return Ok(begin..end);
        }
        end -= 1;
    }
}

fn align_filtered_rows<'a, 'src: 'a>(
    rows: &[&Partition<'a>],
    scanner: &mut dyn CellScanner<'a>,
    tokens: &mut [PreToken<'src>],
    column_limit: usize,
) -> Result<(), AlignError> {
    // Alignment requires 2+ rows.
    if rows.len() <= 1 {
        return Err(AlignError::UnderfullGroup { rows: rows.len() });
    }
    verify_row_kinds(rows)?;

    // Walk each row's subtree, adding a column to the schema if *any* row
    // wants it. This captures optional and repeated constructs.
    let mut schema = ColumnSchemaAggregator::default();
    let mut row_data = Vec::with_capacity(rows.len());
    for row in rows {
        let data = AlignmentRowData {
            token_range: row_token_range(row, tokens)?,
            sparse_columns: scanner.scan_row(row, tokens),
        };
        schema.collect(&data.sparse_columns);
        row_data.push(data);
    }

    schema.finalize_column_indices();
    let column_positions = schema.column_positions();
    let num_columns = column_positions.len();
    trace!(num_columns, "aggregated column schema");

    // Dense matrix of cells spanning token sub-ranges. Cells of optional
    // constructs absent from a row are empty ranges of width 0.
    let mut matrix: AlignmentMatrix = Vec::with_capacity(rows.len());
    for data in &row_data {
        let mut row = vec![AlignmentCell::default(); num_columns];
        fill_alignment_row(data, column_positions, tokens, &mut row);
        matrix.push(row);
    }

    compute_cell_widths(&mut matrix, tokens);
    let column_configs = compute_column_widths(&matrix, num_columns);
    let column_properties = schema.column_properties();

    // Total width does not include the left indentation, which is assumed
    // uniform across the group and taken from the first row.
    let indentation = rows[0].indentation;
    let total_column_width = column_configs
        .iter()
        .fold(indentation, |total, config| total + config.total_width());
    trace!(total_column_width, "computed column widths");
    if total_column_width > column_limit {
        return Err(AlignError::ColumnOverflow {
            width: total_column_width,
            limit: column_limit,
        });
    }

    // The column check alone misses text that follows the last aligned
    // column, like trailing commas and EOL comments; measure each row's
    // epilog against the limit as well.
    for (row, partition) in matrix.iter().zip(rows) {
        if let Some(last) = row.last() {
            let epilog = &tokens[last.tokens.end..partition.tokens.end];
            let width = total_column_width + effective_cell_width(epilog);
            if width > column_limit {
                return Err(AlignError::EpilogOverflow {
                    width,
                    limit: column_limit,
                });
            }
        }
    }

    for row in &matrix {
        align_row_spacings(&column_configs, &column_properties, row, tokens);
    }
    Ok(())
}

fn align_partition_group<'a, 'src: 'a>(
    group: &'a [Partition<'a>],
    scanner: &mut dyn CellScanner<'a>,
    ignore_pred: &dyn Fn(&Partition<'a>) -> bool,
    tokens: &mut [PreToken<'src>],
    column_limit: usize,
) {
    // The group may contain partitions that should not take part in column
    // alignment (comment-only rows and the like); filter those out but leave
    // them in place.
    let qualified: Vec<&Partition<'a>> = group.iter().filter(|p| !ignore_pred(p)).collect();
    trace!(
        group_size = group.len(),
        qualified = qualified.len(),
        "aligning partition group"
    );
    if let Err(reason) = align_filtered_rows(&qualified, scanner, tokens, column_limit) {
        debug!(%reason, "not aligning group");
    }
}

/// Boundary indices subdividing `children` into alignment groups. A new
/// group begins wherever the source gap between consecutive partitions
/// contains a fully blank line (two or more newlines). Partitions with no
/// tokens never start a group.
fn find_group_boundaries(
    children: &[Partition<'_>],
    tokens: &[PreToken<'_>],
    full_text: &str,
) -> Vec<usize> {
    let mut boundaries = vec![0];
    let mut previous_end: Option<usize> = None;
    for (index, child) in children.iter().enumerate() {
        let Some(span) = child.text_span(tokens) else {
            continue;
        };
        if let Some(prev) = previous_end {
            let gap = &full_text[prev..span.start];
            if gap.bytes().filter(|&b| b == b'\n').count() >= 2 {
                boundaries.push(index);
            }
        }
        previous_end = Some(span.end);
    }
    boundaries.push(children.len());
    boundaries
}

fn group_text_span(group: &[Partition<'_>], tokens: &[PreToken<'_>]) -> Option<Range<usize>> {
    let first = group.iter().find_map(|p| p.text_span(tokens))?;
    let last = group.iter().rev().find_map(|p| p.text_span(tokens))?;
    Some(first.start..last.end)
}

/// True when any byte of the group's text span lies in a format-disabled
/// range: the disabled set complemented against the span must equal the span
/// itself for the group to be fully enabled.
fn group_is_disabled(
    group: &[Partition<'_>],
    tokens: &[PreToken<'_>],
    disabled_ranges: &ByteOffsetSet,
) -> bool {
    let Some(span) = group_text_span(group, tokens) else {
        return false;
    };
    let mut enabled = disabled_ranges.clone();
    enabled.complement(span.clone());
    let mut span_set = ByteOffsetSet::new();
    span_set.add(span);
    enabled != span_set
}

/// Aligns the children of `partition` into visually consistent columns by
/// adjusting inter-token spacing, respecting `column_limit`.
///
/// Children are split into groups at blank-line boundaries; each group is
/// aligned independently. A group is left bytewise unchanged when it has
/// fewer than two qualifying rows, mixes syntax-node kinds, overlaps a
/// format-disabled byte range, or would exceed the column limit (including
/// per-row trailing text past the last aligned column). The engine never
/// partially aligns a group.
///
/// The only mutation performed is to `spaces_required` on tokens of aligned
/// rows; the downstream emitter renders with the resulting spacings.
pub fn tabular_align_tokens<'a, 'src: 'a>(
    partition: &'a Partition<'a>,
    scanner: &mut dyn CellScanner<'a>,
    ignore_pred: &dyn Fn(&Partition<'a>) -> bool,
    tokens: &mut [PreToken<'src>],
    full_text: &str,
    disabled_ranges: &ByteOffsetSet,
    column_limit: usize,
) {
    let children = &partition.children;
    if children.is_empty() {
        return;
    }
    let boundaries = find_group_boundaries(children, tokens, full_text);
    debug_assert!(boundaries.len() >= 2);
    for window in boundaries.windows(2) {
        let group = &children[window[0]..window[1]];
        if group.is_empty() {
            continue;
        }
        if group_is_disabled(group, tokens, disabled_ranges) {
            debug!("group overlaps format-disabled range, not aligning");
            continue;
        }
        align_partition_group(group, scanner, ignore_pred, tokens, column_limit);
    }
}
