use ego_tree::NodeId;
use fbref_model::RawTable;
use scraper::{ElementRef, Selector};

use crate::normalize::{collect_text, normalize_text};

/// fbref repeats the header row inside long bodies with this class.
const REPEATED_HEADER_CLASS: &str = "thead";

const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

#[derive(Debug, Clone)]
struct Cell {
    text: String,
    colspan: usize,
    rowspan: usize,
}

/// Parse a `<table>` element into a [`RawTable`].
///
/// Header rows come from `<thead>`, or, without one, from the leading rows
/// made only of `<th>` cells. Every other row is data (`<tfoot>` included),
/// except fbref's repeated in-body header rows. Spans are expanded and short
/// rows padded with empty cells so the result is rectangular.
pub fn parse_table(table: ElementRef<'_>) -> RawTable {
    let tr_sel = Selector::parse("tr").expect("valid selector");

    // Rows of nested tables belong to those tables.
    let trs: Vec<ElementRef<'_>> = table
        .select(&tr_sel)
        .filter(|tr| owning_table(*tr) == Some(table.id()))
        .collect();

    let has_thead = trs.iter().any(|tr| parent_name(*tr) == Some("thead"));
    let leading_th = if has_thead {
        0
    } else {
        trs.iter().take_while(|tr| is_all_th(**tr)).count()
    };

    let mut header_cells = Vec::new();
    let mut body_cells = Vec::new();
    for (i, tr) in trs.iter().enumerate() {
        let is_header = if has_thead {
            parent_name(*tr) == Some("thead")
        } else {
            i < leading_th
        };
        if is_header {
            header_cells.push(cells(*tr));
        } else if !tr.value().classes().any(|c| c == REPEATED_HEADER_CLASS) {
            body_cells.push(cells(*tr));
        }
    }

    let table = RawTable::padded(expand(&header_cells), expand(&body_cells));
    tracing::debug!(
        header_levels = table.header_levels(),
        rows = table.rows().len(),
        columns = table.width(),
        "Parsed table"
    );
    table
}

/// Lay cells out on a grid, copying each cell into every slot it spans.
/// Row spans never reach past the end of `rows`.
fn expand(rows: &[Vec<Cell>]) -> Vec<Vec<String>> {
    let mut grid: Vec<Vec<Option<String>>> = vec![Vec::new(); rows.len()];

    for (r, row) in rows.iter().enumerate() {
        let mut col = 0;
        for cell in row {
            while grid[r].get(col).is_some_and(Option::is_some) {
                col += 1;
            }
            let end_col = col + cell.colspan;
            let end_row = (r + cell.rowspan).min(rows.len());
            for target in &mut grid[r..end_row] {
                if target.len() < end_col {
                    target.resize(end_col, None);
                }
                for slot in &mut target[col..end_col] {
                    *slot = Some(cell.text.clone());
                }
            }
            col = end_col;
        }
    }

    grid.into_iter()
        .map(|row| row.into_iter().map(Option::unwrap_or_default).collect())
        .collect()
}

fn cells(tr: ElementRef<'_>) -> Vec<Cell> {
    cell_elements(tr)
        .map(|cell| Cell {
            text: normalize_text(&collect_text(*cell)),
            colspan: span(cell, "colspan", MAX_COLSPAN),
            rowspan: span(cell, "rowspan", MAX_ROWSPAN),
        })
        .collect()
}

fn cell_elements<'a>(tr: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter(|c| matches!(c.value().name(), "th" | "td"))
}

/// `rowspan="0"` means "to the end of the section".
fn span(cell: ElementRef<'_>, attr: &str, max: usize) -> usize {
    match cell.value().attr(attr).map(|v| v.trim().parse::<usize>()) {
        Some(Ok(0)) if attr == "rowspan" => max,
        Some(Ok(n)) => n.clamp(1, max),
        _ => 1,
    }
}

fn is_all_th(tr: ElementRef<'_>) -> bool {
    let mut any = false;
    for cell in cell_elements(tr) {
        if cell.value().name() != "th" {
            return false;
        }
        any = true;
    }
    any
}

fn parent_name(tr: ElementRef<'_>) -> Option<&str> {
    tr.parent()
        .and_then(|p| p.value().as_element())
        .map(|e| e.name())
}

fn owning_table(tr: ElementRef<'_>) -> Option<NodeId> {
    tr.ancestors()
        .find(|n| n.value().as_element().is_some_and(|e| e.name() == "table"))
        .map(|n| n.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn parse_first(html: &str) -> RawTable {
        let document = Html::parse_document(html);
        let sel = Selector::parse("table").expect("valid selector");
        let table = document.select(&sel).next().unwrap();
        parse_table(table)
    }

    #[test]
    fn test_parse_fbref_style_table() {
        let table = parse_first(
            r#"
            <table class="stats_table" id="stats_standard_9">
              <thead>
                <tr class="over_header">
                  <th colspan="2"></th>
                  <th colspan="2">Playing Time</th>
                </tr>
                <tr>
                  <th>Player</th><th>Nation</th><th>MP</th><th>Min</th>
                </tr>
              </thead>
              <tbody>
                <tr><th><a href="/en/players/1/Bukayo-Saka">Bukayo Saka</a></th>
                    <td><span>eng</span> ENG</td><td>35</td><td>2,890</td></tr>
                <tr class="thead"><th>Player</th><th>Nation</th><th>MP</th><th>Min</th></tr>
                <tr><th>Declan Rice</th><td>eng ENG</td><td>38</td><td>3,240</td></tr>
              </tbody>
              <tfoot>
                <tr><th>Squad Total</th><td></td><td>38</td><td>3,420</td></tr>
              </tfoot>
            </table>
            "#,
        );

        assert_eq!(table.header_levels(), 2);
        assert_eq!(table.header()[0], vec!["", "", "Playing Time", "Playing Time"]);
        assert_eq!(table.header()[1], vec!["Player", "Nation", "MP", "Min"]);
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.rows()[0], vec!["Bukayo Saka", "eng ENG", "35", "2,890"]);
        assert_eq!(table.rows()[2][0], "Squad Total");
        assert_eq!(table.flatten_header(), vec!["Player", "Nation", "MP", "Min"]);
    }

    #[test]
    fn test_leading_th_rows_without_thead() {
        let table = parse_first(
            r#"<table>
              <tr><th>Player</th><th>Gls</th></tr>
              <tr><th>Saka</th><td>16</td></tr>
            </table>"#,
        );
        assert_eq!(table.header_levels(), 1);
        assert_eq!(table.rows(), &[vec!["Saka".to_string(), "16".to_string()]]);
    }

    #[test]
    fn test_rowspan_and_colspan_expand() {
        let table = parse_first(
            r#"<table>
              <thead><tr><th>A</th><th>B</th><th>C</th></tr></thead>
              <tbody>
                <tr><td rowspan="2">x</td><td colspan="2">y</td></tr>
                <tr><td>1</td><td>2</td></tr>
              </tbody>
            </table>"#,
        );
        assert_eq!(table.rows()[0], vec!["x", "y", "y"]);
        assert_eq!(table.rows()[1], vec!["x", "1", "2"]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = parse_first(
            r#"<table>
              <thead><tr><th>A</th><th>B</th></tr></thead>
              <tbody><tr><td>only</td></tr><tr><td>1</td><td>2</td><td>3</td></tr></tbody>
            </table>"#,
        );
        assert_eq!(table.width(), 3);
        assert_eq!(table.header()[0], vec!["A", "B", ""]);
        assert_eq!(table.rows()[0], vec!["only", "", ""]);
    }

    #[test]
    fn test_nested_table_rows_ignored() {
        let table = parse_first(
            r#"<table>
              <thead><tr><th>A</th></tr></thead>
              <tbody><tr><td><table><tr><td>inner</td></tr></table></td></tr></tbody>
            </table>"#,
        );
        assert_eq!(table.rows().len(), 1);
    }

    #[test]
    fn test_empty_table() {
        let table = parse_first("<table></table>");
        assert_eq!(table.width(), 0);
        assert!(table.rows().is_empty());
    }
}
