//! Row formatting.
//!
//! One pass over a query's row stream builds three synchronized outputs:
//! a bordered plain-text table, an HTML table, and the columnar [`Frame`]
//! the chart renderer consumes. The first row fixes the header; every cell
//! goes through [`cell_text`], which never fails — a cell the driver could
//! not convert renders as `NULL` without disturbing the rest of the result
//! set. A footer with the row count and elapsed wall-clock time is appended
//! to both text outputs.

use std::time::{Duration, Instant};

use crate::frame::Frame;
use crate::reader::{CellResult, Field, Session, SqlValue};
use crate::Result;

/// The three synchronized renderings of one result set.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    pub plain: String,
    pub html: String,
    pub frame: Frame,
}

/// Run `sql` on the session and render the result set.
///
/// Timing covers cursor open through iteration end. A zero-row result
/// yields footer-only text outputs and an empty, header-less frame.
pub fn run_query(session: &mut dyn Session, sql: &str) -> Result<QueryOutput> {
    let started = Instant::now();
    let mut table = TableBuilder::default();
    let mut on_row = |fields: &[Field]| -> Result<()> {
        table.push(fields);
        Ok(())
    };
    session.query(sql, &mut on_row)?;
    Ok(table.finish(started.elapsed()))
}

#[derive(Default)]
struct TableBuilder {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    frame: Frame,
}

impl TableBuilder {
    fn push(&mut self, fields: &[Field]) {
        if self.header.is_empty() {
            self.header = fields.iter().map(|f| f.name.clone()).collect();
            self.frame.set_columns(&self.header);
        }
        let cells: Vec<String> = fields.iter().map(|f| cell_text(&f.value)).collect();
        self.frame.push_row(cells.clone());
        self.rows.push(cells);
    }

    fn finish(self, elapsed: Duration) -> QueryOutput {
        let footer = footer(self.rows.len(), elapsed);
        let (plain, html) = if self.rows.is_empty() {
            (footer.clone(), footer)
        } else {
            (
                format!("{}\n{}", render_grid(&self.header, &self.rows), footer),
                format!("{}\n{}", render_html(&self.header, &self.rows), footer),
            )
        };
        QueryOutput { plain, html, frame: self.frame }
    }
}

/// Render one cell. Saturating: conversion failures become `NULL`.
pub fn cell_text(value: &CellResult) -> String {
    match value {
        Err(_) => "NULL".to_string(),
        Ok(SqlValue::Null) => "NULL".to_string(),
        Ok(SqlValue::Text(s)) => s.clone(),
        Ok(SqlValue::Double(v)) => format_double(*v),
        Ok(SqlValue::Int(v)) => v.to_string(),
        Ok(SqlValue::BigInt(v)) => v.to_string(),
        Ok(SqlValue::UnsignedBigInt(v)) => v.to_string(),
        Ok(SqlValue::DateTime(v)) => v.format("%Y-%m-%d %H:%M:%S").to_string(),
        Ok(SqlValue::Unsupported) => String::new(),
    }
}

/// Fixed six-decimal rendering with trailing fractional zeros stripped and
/// no dangling decimal point: `12.0` renders as `12`, `12.5` as `12.5`.
pub fn format_double(value: f64) -> String {
    let fixed = format!("{value:.6}");
    if !fixed.contains('.') {
        // NaN and infinities have no fractional part to trim
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn footer(row_count: usize, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    match row_count {
        0 => format!("Empty set ({secs:.2} sec)"),
        1 => format!("1 row in set ({secs:.2} sec)"),
        n => format!("{n} rows in set ({secs:.2} sec)"),
    }
}

fn render_grid(header: &[String], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain([name.chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border: String = format!(
        "+{}+",
        widths.iter().map(|w| "-".repeat(w + 2)).collect::<Vec<_>>().join("+")
    );
    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!(" {cell:<width$} "))
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&line(header));
    out.push('\n');
    out.push_str(&border);
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out.push_str(&border);
    out
}

fn render_html(header: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::from("<table>\n<tr>\n");
    for name in header {
        out.push_str("<th>");
        out.push_str(&escape_html(name));
        out.push_str("</th>\n");
    }
    out.push_str("</tr>\n");
    for row in rows {
        out.push_str("<tr>\n");
        for cell in row {
            out.push_str("<td>");
            out.push_str(&escape_html(cell));
            out.push_str("</td>\n");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>");
    out
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::CellError;
    use crate::testing::{field, StaticSession};
    use proptest::prelude::*;

    #[test]
    fn double_rendering_strips_trailing_zeros() {
        assert_eq!(format_double(12.0), "12");
        assert_eq!(format_double(12.5), "12.5");
        assert_eq!(format_double(0.1), "0.1");
        assert_eq!(format_double(-3.14), "-3.14");
        assert_eq!(format_double(120.0), "120");
        assert_eq!(format_double(0.0), "0");
        assert_eq!(format_double(1.000001), "1.000001");
    }

    #[test]
    fn cell_rendering_by_type() {
        assert_eq!(cell_text(&Ok(SqlValue::Text("hi".into()))), "hi");
        assert_eq!(cell_text(&Ok(SqlValue::Null)), "NULL");
        assert_eq!(cell_text(&Ok(SqlValue::Int(-7))), "-7");
        assert_eq!(cell_text(&Ok(SqlValue::BigInt(1_000_000_000_000))), "1000000000000");
        assert_eq!(cell_text(&Ok(SqlValue::UnsignedBigInt(u64::MAX))), "18446744073709551615");
        assert_eq!(cell_text(&Ok(SqlValue::Unsupported)), "");
        assert_eq!(cell_text(&Err(CellError("overflow".into()))), "NULL");

        let when = chrono::NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        assert_eq!(cell_text(&Ok(SqlValue::DateTime(when))), "2021-03-04 05:06:07");
    }

    #[test]
    fn footer_texts() {
        let t = Duration::from_millis(1234);
        assert_eq!(footer(0, t), "Empty set (1.23 sec)");
        assert_eq!(footer(1, t), "1 row in set (1.23 sec)");
        assert_eq!(footer(42, t), "42 rows in set (1.23 sec)");
    }

    #[test]
    fn empty_result_is_footer_only_with_empty_frame() {
        let mut session = StaticSession::new(vec![]);
        let output = run_query(&mut session, "SELECT 1").unwrap();
        assert!(output.plain.starts_with("Empty set ("));
        assert_eq!(output.plain, output.html);
        assert!(output.frame.is_empty());
    }

    #[test]
    fn single_pass_builds_all_three_outputs() {
        let mut session = StaticSession::new(vec![
            vec![field("n", SqlValue::BigInt(1)), field("s", SqlValue::Text("x".into()))],
            vec![field("n", SqlValue::Double(2.50)), field("s", SqlValue::Null)],
        ]);
        let output = run_query(&mut session, "SELECT n, s FROM t").unwrap();

        assert!(output.plain.contains("| n   | s    |"));
        assert!(output.plain.contains("| 1   | x    |"));
        assert!(output.plain.contains("| 2.5 | NULL |"));
        assert!(output.plain.contains("2 rows in set ("));

        assert!(output.html.starts_with("<table>\n<tr>\n<th>n</th>\n<th>s</th>\n</tr>\n"));
        assert!(output.html.contains("<td>2.5</td>"));
        assert!(output.html.contains("\n2 rows in set ("));

        assert_eq!(output.frame.columns(), ["n", "s"]);
        assert_eq!(output.frame.column("n").unwrap(), ["1", "2.5"]);
        assert_eq!(output.frame.column("s").unwrap(), ["x", "NULL"]);
    }

    #[test]
    fn one_row_footer() {
        let mut session = StaticSession::new(vec![vec![field("a", SqlValue::Int(9))]]);
        let output = run_query(&mut session, "SELECT a").unwrap();
        assert!(output.plain.contains("1 row in set ("));
    }

    #[test]
    fn broken_cell_renders_null_without_dropping_the_row() {
        let mut session = StaticSession::new(vec![vec![
            field("good", SqlValue::Int(1)),
            Field::broken("bad", "uint out of range"),
            field("also_good", SqlValue::Text("kept".into())),
        ]]);
        let output = run_query(&mut session, "SELECT *").unwrap();
        assert!(output.plain.contains("| 1    | NULL | kept      |"));
        assert_eq!(output.frame.column("bad").unwrap(), ["NULL"]);
        assert_eq!(output.frame.column("also_good").unwrap(), ["kept"]);
    }

    #[test]
    fn html_cells_are_escaped() {
        let mut session = StaticSession::new(vec![vec![field(
            "v",
            SqlValue::Text("<b>&\"hi\"</b>".into()),
        )]]);
        let output = run_query(&mut session, "SELECT v").unwrap();
        assert!(output.html.contains("<td>&lt;b&gt;&amp;\"hi\"&lt;/b&gt;</td>"));
        // the plain rendering keeps the raw value
        assert!(output.plain.contains("<b>&\"hi\"</b>"));
    }

    #[test]
    fn database_errors_propagate() {
        let mut session = StaticSession::failing("no such table: t");
        assert!(run_query(&mut session, "SELECT * FROM t").is_err());
    }

    proptest! {
        #[test]
        fn doubles_never_dangle(value in any::<f64>()) {
            let rendered = format_double(value);
            prop_assert!(!rendered.ends_with('.'));
            if rendered.contains('.') {
                prop_assert!(!rendered.ends_with('0'));
            }
        }

        #[test]
        fn frame_invariant_holds_after_every_row(rows in 0usize..20, cols in 1usize..6) {
            let mut frame = Frame::new();
            let names: Vec<String> = (0..cols).map(|c| format!("c{c}")).collect();
            frame.set_columns(&names);
            for r in 0..rows {
                frame.push_row((0..cols).map(|c| format!("{r}:{c}")).collect());
                for name in &names {
                    prop_assert_eq!(frame.column(name).unwrap().len(), r + 1);
                }
            }
        }
    }
}
