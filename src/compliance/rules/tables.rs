//! Table rules: grid regularity and header/data cell association.
//!
//! Cells are laid out on a grid honouring RowSpan and ColSpan (ISO 32000-1,
//! 14.8.5.7). A data cell is associated with a header either explicitly, via
//! its Headers id list, or implicitly through the Scope of TH cells sharing
//! its row or column.

use super::RuleContext;
use crate::compliance::types::{CheckResult, UaProfile, ViolationCode};
use crate::error::Result;
use crate::structure::{owners, traverse_structure_tree, NodeId, StandardRole, StructNode};
use std::collections::HashSet;

/// Header scope (Table attribute /Scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Applies to its row
    Row,
    /// Applies to its column
    Column,
    /// Applies to both
    Both,
    /// Applies to nothing
    None,
}

impl Scope {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "Row" => Some(Scope::Row),
            "Column" => Some(Scope::Column),
            "Both" => Some(Scope::Both),
            "None" => Some(Scope::None),
            _ => None,
        }
    }

    fn covers_rows(&self) -> bool {
        matches!(self, Scope::Row | Scope::Both)
    }

    fn covers_columns(&self) -> bool {
        matches!(self, Scope::Column | Scope::Both)
    }
}

/// A cell placed on the table grid.
#[derive(Debug, Clone)]
struct Cell<'a> {
    node: &'a StructNode,
    header: bool,
    row: usize,
    col: usize,
    row_span: usize,
    col_span: usize,
}

impl Cell<'_> {
    fn rows(&self) -> std::ops::Range<usize> {
        self.row..self.row + self.row_span
    }

    fn cols(&self) -> std::ops::Range<usize> {
        self.col..self.col + self.col_span
    }

    fn headers(&self) -> Vec<&str> {
        self.node
            .attribute_of(owners::TABLE, "Headers")
            .or_else(|| self.node.attribute("Headers"))
            .map(|v| v.as_list())
            .unwrap_or_default()
    }

    fn scope(&self) -> Option<Scope> {
        self.node
            .attribute_of(owners::TABLE, "Scope")
            .or_else(|| self.node.attribute("Scope"))
            .and_then(|v| v.as_str())
            .and_then(Scope::parse)
    }
}

fn overlaps(a: std::ops::Range<usize>, b: std::ops::Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// RowSpan or ColSpan of a cell, clamped to `limit`.
fn span(node: &StructNode, key: &str, limit: usize) -> usize {
    node.attribute_of(owners::TABLE, key)
        .or_else(|| node.attribute(key))
        .and_then(|v| v.as_integer())
        .filter(|n| *n >= 1)
        .map_or(1, |n| usize::try_from(n).map_or(limit, |n| n.min(limit)))
}

/// Rows of a table in order, looking through THead/TBody/TFoot.
fn table_rows<'a>(ctx: &RuleContext<'a>, table: NodeId) -> Vec<NodeId> {
    let mut rows = Vec::new();
    for child in ctx.children(table) {
        match ctx.role(child.handle) {
            Some(StandardRole::TR) => rows.push(child.handle),
            Some(r) if r.is_row_group() => rows.extend(
                ctx.children(child.handle)
                    .into_iter()
                    .filter(|c| ctx.is(c.handle, StandardRole::TR))
                    .map(|c| c.handle),
            ),
            _ => {},
        }
    }
    rows
}

/// Place the cells of `rows` on a grid. Returns the cells and the occupied
/// width of every row.
fn layout<'a>(ctx: &RuleContext<'a>, rows: &[NodeId]) -> (Vec<Cell<'a>>, Vec<usize>) {
    let mut occupied: Vec<HashSet<usize>> = vec![HashSet::new(); rows.len()];
    let mut cells = Vec::new();
    // no row can be wider than the table has cells
    let max_cols = rows.iter().map(|r| ctx.children(*r).len()).sum::<usize>().max(1);

    for (r, row) in rows.iter().enumerate() {
        let mut col = 0;
        for child in ctx.children(*row) {
            let header = match ctx.role(child.handle) {
                Some(StandardRole::TH) => true,
                Some(StandardRole::TD) => false,
                _ => continue,
            };
            while occupied[r].contains(&col) {
                col += 1;
            }
            let cell = Cell {
                node: child,
                header,
                row: r,
                col,
                row_span: span(child, "RowSpan", rows.len() - r),
                col_span: span(child, "ColSpan", max_cols),
            };
            for rr in cell.rows().take_while(|rr| *rr < rows.len()) {
                occupied[rr].extend(cell.cols());
            }
            col += cell.col_span;
            cells.push(cell);
        }
    }

    let widths = occupied.iter().map(|cols| cols.len()).collect();
    (cells, widths)
}

/// Check every table in the document.
pub fn check_tables(ctx: &RuleContext<'_>, result: &mut CheckResult) -> Result<()> {
    for visit in traverse_structure_tree(ctx.tree()) {
        if ctx.is(visit.node.handle, StandardRole::Table) {
            result.stats.tables_checked += 1;
            check_table(ctx, visit.node.handle, result);
        }
    }
    Ok(())
}

fn check_table(ctx: &RuleContext<'_>, table: NodeId, result: &mut CheckResult) {
    let rows = table_rows(ctx, table);
    let (cells, widths) = layout(ctx, &rows);

    if let Some(&expected) = widths.first() {
        for (r, width) in widths.iter().enumerate().skip(1) {
            if *width != expected {
                result.add_violation(ctx.violation_at(
                    rows[r],
                    ViolationCode::TableGridIrregular,
                    vec![
                        ("row", (r + 1).to_string()),
                        ("actual", width.to_string()),
                        ("expected", expected.to_string()),
                    ],
                ));
            }
        }
    }

    let headers: Vec<&Cell<'_>> = cells.iter().filter(|c| c.header).collect();
    let header_ids: HashSet<&str> = headers.iter().filter_map(|c| c.node.id.as_deref()).collect();
    let uses_headers = cells.iter().any(|c| !c.headers().is_empty());

    // explicit association
    for cell in &cells {
        for id in cell.headers() {
            if !header_ids.contains(id) {
                result.add_violation(ctx.violation_at(
                    cell.node.handle,
                    ViolationCode::TableHeaderIdNotFound,
                    vec![("id", id.to_string())],
                ));
            }
        }
    }

    if headers.is_empty() {
        return;
    }

    // implicit association through Scope
    let mut scoped: Vec<(&Cell<'_>, Scope)> = Vec::new();
    for th in &headers {
        let scope = match (th.scope(), ctx.profile) {
            (Some(scope), UaProfile::Ua1) => {
                if scope == Scope::None && !uses_headers {
                    report_scope(ctx, th, "None", result);
                }
                scope
            },
            (None, UaProfile::Ua1) => {
                if !uses_headers {
                    report_scope(ctx, th, "missing", result);
                }
                Scope::None
            },
            (Some(scope), UaProfile::Ua2) => scope,
            (None, UaProfile::Ua2) if th.row == 0 => Scope::Column,
            (None, UaProfile::Ua2) if th.col == 0 => Scope::Row,
            (None, UaProfile::Ua2) => {
                if !uses_headers {
                    report_scope(ctx, th, "missing", result);
                }
                Scope::None
            },
        };
        scoped.push((*th, scope));
    }

    for td in cells.iter().filter(|c| !c.header) {
        let explicit = td.headers().iter().any(|id| header_ids.contains(id));
        let implicit = scoped.iter().any(|(th, scope)| {
            (scope.covers_columns() && overlaps(th.cols(), td.cols()))
                || (scope.covers_rows() && overlaps(th.rows(), td.rows()))
        });
        if !explicit && !implicit {
            result.add_violation(ctx.violation_at(
                td.node.handle,
                ViolationCode::TableCellWithoutHeader,
                vec![
                    ("row", (td.row + 1).to_string()),
                    ("column", (td.col + 1).to_string()),
                ],
            ));
        }
    }
}

fn report_scope(ctx: &RuleContext<'_>, th: &Cell<'_>, scope: &str, result: &mut CheckResult) {
    result.add_violation(ctx.violation_at(
        th.node.handle,
        ViolationCode::TableHeaderScopeMissing,
        vec![("scope", scope.to_string())],
    ));
}
