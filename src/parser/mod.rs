use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::types::{ContributorFormat, RawRow};

/// Reads the first `<table>` of a donor-lookup results page into rows of cell text.
///
/// Every `<tr>` becomes a row (the header included, usually with no `<td>`
/// cells); cells are the row's `<td>` elements. A page without a table yields
/// no rows.
pub fn parse_donation_table(html: &str, format: ContributorFormat) -> Vec<RawRow> {
    debug!("parse_donation_table: start html_len={}", html.len());
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").expect("valid table selector");
    let row_selector = Selector::parse("tr").expect("valid row selector");
    let cell_selector = Selector::parse("td").expect("valid cell selector");

    let Some(table) = document.select(&table_selector).next() else {
        warn!("parse_donation_table: no table found in results page");
        return Vec::new();
    };

    let rows: Vec<RawRow> = table
        .select(&row_selector)
        .map(|row| {
            row.select(&cell_selector)
                .map(|cell| cell_text(cell, format))
                .collect()
        })
        .collect();

    debug!("parse_donation_table: extracted rows={}", rows.len());
    rows
}

/// Text of a cell with each fragment trimmed and blank fragments dropped.
///
/// Inline cells glue fragments together with nothing in between, which is how
/// the site's `NAME<br>ADDRESS` markup ends up as one run-together string.
fn cell_text(cell: ElementRef<'_>, format: ContributorFormat) -> String {
    let separator = match format {
        ContributorFormat::Inline => "",
        ContributorFormat::Multiline => "\n",
    };
    cell.text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <html><body>
        <h1>Donor Lookup</h1>
        <table class="DataTable">
          <thead>
            <tr><th>Category</th><th>Contributor</th><th>Employer</th><th>Occupation</th>
                <th>Date</th><th>Amount</th><th>Recipient</th><th>Jurisdiction</th></tr>
          </thead>
          <tbody>
            <tr>
              <td>Individual</td>
              <td><strong>KAUR, AASEES</strong><br/>DUNWOODY, GA 30360</td>
              <td> ACME CORP </td>
              <td>ENGINEER</td>
              <td>03/14/2022</td>
              <td>$1,000</td>
              <td>WARNOCK, RAPHAEL <span>(D)</span></td>
              <td>Federal</td>
            </tr>
          </tbody>
        </table>
        <table><tr><td>ignored</td></tr></table>
        </body></html>
    "#;

    #[test]
    fn test_parse_inline_cells() {
        let rows = parse_donation_table(RESULTS_PAGE, ContributorFormat::Inline);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_empty());
        assert_eq!(rows[1].len(), 8);
        assert_eq!(rows[1][1], "KAUR, AASEESDUNWOODY, GA 30360");
        assert_eq!(rows[1][2], "ACME CORP");
        assert_eq!(rows[1][6], "WARNOCK, RAPHAEL(D)");
    }

    #[test]
    fn test_parse_multiline_cells() {
        let rows = parse_donation_table(RESULTS_PAGE, ContributorFormat::Multiline);
        assert_eq!(rows[1][1], "KAUR, AASEES\nDUNWOODY, GA 30360");
    }

    #[test]
    fn test_page_without_table() {
        assert!(parse_donation_table("<html><p>No results</p></html>", ContributorFormat::Inline).is_empty());
    }
}
