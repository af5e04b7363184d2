use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use configuration::Theme;

fn header_color(theme: Theme) -> Color {
    match theme {
        Theme::Light => Color::DarkBlue,
        Theme::Dark => Color::Cyan,
    }
}

/// A table with the theme's borders and header colours. Every column after
/// the first is right-aligned, since those hold the numbers.
pub fn themed_table(theme: Theme, header: &[&str]) -> Table {
    let mut table = Table::new();
    match theme {
        Theme::Light => table.load_preset(UTF8_FULL).apply_modifier(UTF8_ROUND_CORNERS),
        Theme::Dark => table.load_preset(UTF8_FULL_CONDENSED),
    };
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let color = header_color(theme);
    table.set_header(
        header
            .iter()
            .map(|h| Cell::new(h).fg(color).add_attribute(Attribute::Bold)),
    );
    for column in table.column_iter_mut().skip(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

/// Two-column label/value table used for result summaries.
pub fn summary_table<L: AsRef<str>>(theme: Theme, title: &str, rows: &[(L, String)]) -> Table {
    let mut table = themed_table(theme, &[title, ""]);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label.as_ref()), Cell::new(value)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_draw_differently() {
        let rows = [("Total", "$1.00".to_string())];
        let light = summary_table(Theme::Light, "Result", &rows).to_string();
        let dark = summary_table(Theme::Dark, "Result", &rows).to_string();
        assert!(light.contains("Total") && light.contains("$1.00"));
        assert!(light.contains('╭'));
        assert!(!dark.contains('╭'));
    }
}
