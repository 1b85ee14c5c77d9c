//! Plain-text rendering of display models.

use std::fmt::Write as _;

use forest_dash_presentation::metrics::Share;
use forest_dash_presentation::palette::Choropleth;
use forest_dash_presentation::table::{Align, Cell, HeaderCell, TableView};
use forest_dash_presentation::value::{format_fixed, format_grouped};
use forest_dash_presentation::view::MetricCard;
use forest_dash_presentation::{Record, Row, UNAVAILABLE};

const GAP: &str = "  ";

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{text:<width$}"),
        Align::Center => format!("{text:^width$}"),
        Align::Right => format!("{text:>width$}"),
    }
}

fn header_label(header: &HeaderCell) -> String {
    header
        .indicator
        .map_or_else(|| header.label.clone(), |arrow| format!("{} {arrow}", header.label))
}

/// Lays out a header and body as aligned columns.
#[must_use]
pub fn format_grid(header: &[HeaderCell], body: &[Vec<Cell>]) -> String {
    let labels: Vec<String> = header.iter().map(header_label).collect();
    let widths: Vec<usize> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            body.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.text.chars().count())
                .chain(std::iter::once(label.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let line = labels
        .iter()
        .zip(header)
        .zip(&widths)
        .map(|((label, h), w)| pad(label, *w, h.align))
        .collect::<Vec<_>>()
        .join(GAP);
    let _ = writeln!(out, "{}", line.trim_end());
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join(GAP);
    let _ = writeln!(out, "{rule}");

    for row in body {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(&cell.text, *w, cell.align))
            .collect::<Vec<_>>()
            .join(GAP);
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

/// The current page of `table` with its position summary.
#[must_use]
pub fn format_table<R: Record>(table: &TableView<R>) -> String {
    let mut out = format_grid(&table.header(), &table.render_page());
    let _ = writeln!(
        out,
        "{} (page {} of {})",
        table.page_summary(),
        table.page() + 1,
        table.total_pages().max(1)
    );
    out
}

#[must_use]
pub fn format_cards(cards: &[MetricCard]) -> String {
    cards.iter().fold(String::new(), |mut out, card| {
        let _ = writeln!(out, "  {card}");
        out
    })
}

#[must_use]
pub fn format_shares(title: &str, shares: &[Share]) -> String {
    let mut out = format!("{title}\n");
    for share in shares {
        let value = share
            .value
            .map_or_else(|| UNAVAILABLE.to_string(), |v| format_grouped(v, 1));
        let percent = share
            .percentage
            .map_or_else(|| UNAVAILABLE.to_string(), |p| format!("{}%", format_fixed(p, 1)));
        let _ = writeln!(out, "  {}: {value} ({percent})", share.category);
    }
    out
}

/// One line per row: the `name` field followed by every other field.
#[must_use]
pub fn format_rows(title: &str, rows: &[Row], name_field: &str) -> String {
    let mut out = format!("{title}\n");
    for row in rows {
        let name = row.value(&name_field.to_string()).display();
        let rest = row
            .iter()
            .filter(|(field, _)| *field != name_field)
            .map(|(field, value)| format!("{field}={}", value.display()))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "  {name}: {rest}");
    }
    out
}

/// Legend followed by one line per state, in input order.
#[must_use]
pub fn format_map(map: &Choropleth) -> String {
    let mut out = format!(
        "{} ({} bin(s) over {} reported state(s))\n",
        map.metric,
        map.scale.bin_count(),
        map.scale.domain_len()
    );
    for (bin, item) in map.legend.iter().enumerate() {
        let _ = writeln!(
            out,
            "  bin {bin}: {} >= {}",
            item.color,
            format_grouped(item.lower, 1)
        );
    }
    for entry in &map.entries {
        let abbr = entry.abbr.unwrap_or("--");
        let mark = if entry.selected { '*' } else { ' ' };
        let _ = writeln!(out, "{mark}{abbr} {} {}", entry.color, entry.tooltip);
    }
    out
}

#[cfg(test)]
mod tests {
    use forest_dash_presentation::palette::Palette;
    use forest_dash_presentation::table::Column;

    use super::*;

    #[test]
    fn grid_aligns_by_widest_cell() {
        let rows = vec![
            Row::new().with("state", "Maine").with("forest", 17_600.0),
            Row::new().with("state", "Rhode Island").with("forest", Option::<f64>::None),
        ];
        let columns = vec![
            Column::field("state".to_string(), "State"),
            Column::field("forest".to_string(), "Forest").align(Align::Right),
        ];
        let mut table = TableView::new(rows, columns, 15).unwrap();
        table.sort("forest");

        let text = format_table(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "State         Forest ↑");
        assert_eq!(lines[2], "Maine           17,600");
        assert_eq!(lines[3], "Rhode Island         —");
        assert_eq!(lines[4], "Showing 1 to 2 of 2 entries (page 1 of 1)");
    }

    #[test]
    fn map_lists_legend_and_states() {
        let map = Choropleth::build(
            [("Maine", Some(1.0)), ("Ohio", None)],
            "thousand acres",
            3,
            &Palette::greens9(),
        )
        .unwrap();
        let text = format_map(&map.with_selection(Some("Maine")));
        assert!(text.starts_with("thousand acres (1 bin(s) over 1 reported state(s))"));
        assert!(text.contains("\n OH #e5e7eb Ohio: N/A thousand acres\n"));
        assert!(text.contains("\n*ME #74c476 Maine: 1 thousand acres\n"));
    }

    #[test]
    fn shares_show_glyph_for_missing() {
        let shares = vec![Share {
            category: "Private".to_string(),
            value: None,
            percentage: None,
        }];
        assert_eq!(format_shares("Ownership", &shares), "Ownership\n  Private: — (—)\n");
    }
}
