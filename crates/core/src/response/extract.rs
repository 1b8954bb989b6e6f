use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use super::classify::RESULT_TABLE_SELECTOR;
use super::types::OrderRecord;

/// Extract all order records from a response body.
///
/// Pure over its input: the same HTML always yields the same record
/// sequence, in source row order. Returns an empty vector when the result
/// table is absent.
pub fn extract_records(html: &str, order_date: NaiveDate) -> Vec<OrderRecord> {
    let document = Html::parse_document(html);
    let table_selector =
        Selector::parse(RESULT_TABLE_SELECTOR).expect("result table selector is valid CSS");

    document
        .select(&table_selector)
        .next()
        .map(|table| records_from_table(&table, order_date))
        .unwrap_or_default()
}

/// Extract records from an already-located result table.
///
/// The first row is the header. Data rows need at least 5 cells; shorter
/// rows are portal noise and are skipped whole, never partially recorded.
pub(super) fn records_from_table(table: &ElementRef, order_date: NaiveDate) -> Vec<OrderRecord> {
    let row_selector = Selector::parse("tr").expect("row selector is valid CSS");
    let cell_selector = Selector::parse("td").expect("cell selector is valid CSS");
    let anchor_selector = Selector::parse("a").expect("anchor selector is valid CSS");

    let mut records = Vec::new();

    for row in table.select(&row_selector).skip(1) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() < 5 {
            continue;
        }

        // The first cell stacks up to three lines: appeal number,
        // assessment year, case status. Missing lines become empty strings.
        let lines = stripped_lines(&cells[0]);
        let line = |i: usize| lines.get(i).cloned().unwrap_or_default();

        let order_link = cells[3]
            .select(&anchor_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default()
            .to_string();

        records.push(OrderRecord {
            order_date,
            appeal_number: line(0),
            assessment_year: line(1),
            case_status: line(2),
            parties: cell_text(&cells[1]),
            alpha_bench: cell_text(&cells[2]),
            order_link,
        });
    }

    records
}

/// Non-empty trimmed text fragments of a cell, in document order.
fn stripped_lines(cell: &ElementRef) -> Vec<String> {
    cell.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Whole text content of a cell, trimmed.
fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2010, 3, 6).unwrap()
    }

    #[test]
    fn test_extracts_one_record_per_valid_row() {
        let records = extract_records(fixtures::RESULTS_PAGE, date());
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].appeal_number, "ITA 1001/Mum/2009");
        assert_eq!(records[0].assessment_year, "2006-07");
        assert_eq!(records[0].case_status, "Disposed");
        assert_eq!(records[0].parties, "DCIT vs Alpha Industries");
        assert_eq!(records[0].alpha_bench, "A");
        assert_eq!(records[0].order_link, "/judicial/orders/1001.pdf");
        assert_eq!(records[0].order_date, date());

        assert_eq!(records[1].appeal_number, "ITA 1002/Mum/2009");
        assert_eq!(records[1].order_link, "");
    }

    #[test]
    fn test_short_rows_are_skipped_not_errors() {
        // Header + 2 valid rows + 1 three-cell row: exactly 2 records.
        let records = extract_records(fixtures::RESULTS_PAGE_WITH_SHORT_ROW, date());
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_missing_first_cell_lines_become_empty() {
        let html = r#"
        <table class="table table-striped table-bordered">
          <tr><th>h</th><th>h</th><th>h</th><th>h</th><th>h</th></tr>
          <tr>
            <td>ITA 55/Del/2011</td>
            <td>X vs Y</td>
            <td>B</td>
            <td></td>
            <td>extra</td>
          </tr>
        </table>"#;
        let records = extract_records(html, date());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].appeal_number, "ITA 55/Del/2011");
        assert_eq!(records[0].assessment_year, "");
        assert_eq!(records[0].case_status, "");
        assert_eq!(records[0].order_link, "");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let first = extract_records(fixtures::RESULTS_PAGE, date());
        let second = extract_records(fixtures::RESULTS_PAGE, date());
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_table_yields_no_records() {
        let records = extract_records("<html><body></body></html>", date());
        assert!(records.is_empty());
    }

    #[test]
    fn test_row_order_is_preserved() {
        let records = extract_records(fixtures::RESULTS_PAGE, date());
        assert!(records[0].appeal_number < records[1].appeal_number);
    }
}
