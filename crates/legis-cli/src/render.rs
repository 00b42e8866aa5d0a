//! Plain-text rendering of progress tracks and tables

use legis_dashboard::{Cell, TableRow};
use legis_milestones::{BillProgress, NodeState, Outcome, TrackAssignment};

/// Render the stage track, one stage per line
///
/// ```text
/// [x] Introduced                    2024-01-10
/// [>] In Committee           A* S-  2024-01-10
/// [ ] On Floor Calendar      A- S-
/// ```
#[must_use]
pub fn render_progress(progress: &BillProgress) -> String {
    let mut out = String::new();
    for node in &progress.nodes {
        let marker = match node.state {
            NodeState::Complete => "[x]",
            NodeState::Current if node.reached => "[>]",
            NodeState::Current | NodeState::Pending => "[ ]",
        };
        let halves = node.halves.map_or_else(String::new, |h| {
            format!("A{} S{}", lit(h.assembly_lit), lit(h.senate_lit))
        });
        let date = node.reached_on.map(|d| d.to_string()).unwrap_or_default();
        let line = format!("{marker} {:<22} {halves:<6} {date}", node.label);
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let assignment = match progress.assignment {
        TrackAssignment::OriginatingAssembly => "originating bill on the Assembly track",
        TrackAssignment::OriginatingSenate => "originating bill on the Senate track",
        TrackAssignment::Unassigned => "chamber unknown; showing companion history only",
    };
    let outcome = match progress.outcome {
        Outcome::InProgress => "in progress",
        Outcome::Enacted => "enacted",
        Outcome::Vetoed => "vetoed",
    };
    format!("{out}status: {outcome} ({assignment})\n")
}

fn lit(on: bool) -> char {
    if on {
        '*'
    } else {
        '-'
    }
}

/// Render rows as an aligned text table with a header
#[must_use]
pub fn render_table<T: TableRow>(rows: &[&T]) -> String {
    let columns = T::columns();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| format_cell(&row.cell(c))).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            body.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns.iter().map(|c| (*c).to_string()).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &body {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Display form of a cell
#[must_use]
pub fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(n) if n.fract() == 0.0 => format!("{n:.0}"),
        Cell::Number(n) => format!("{n:.2}"),
        Cell::Text(s) => s.clone(),
        Cell::Empty => "-".to_string(),
    }
}
