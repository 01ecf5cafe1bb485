/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Configuration for a single column of a rendered table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub min_width: usize,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn left(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            min_width: 0,
            max_width: None,
            alignment: Alignment::Left,
        }
    }

    pub fn right(header: impl Into<String>) -> Self {
        Self {
            alignment: Alignment::Right,
            ..Self::left(header)
        }
    }

    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

/// Fixed-width text table.
#[derive(Clone, Debug)]
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub padding: usize,
    /// ASCII rule instead of box drawing characters.
    pub plain: bool,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            padding: 1,
            plain: false,
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Content width of each column from headers, cells and column limits.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = visible_width(&column.header).max(column.min_width);
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(visible_width(cell));
                    }
                }
                if let Some(max_width) = column.max_width {
                    width = width.min(max_width);
                }
                width
            })
            .collect()
    }

    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, widths[idx], column.alignment, self.padding)
            })
            .collect();
        cells.join(" ").trim_end().to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let mut lines = vec![
            self.render_row(&header, &widths),
            horizontal_rule(&widths, self.padding, self.plain),
        ];
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

/// Character count ignoring ANSI escape sequences.
fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for next in chars.by_ref() {
                if ('@'..='~').contains(&next) && next != '[' {
                    break;
                }
            }
            continue;
        }
        width += 1;
    }
    width
}

fn truncate_text(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut result: String = text.chars().take(width - 1).collect();
    result.push('…');
    result
}

pub fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let fitted = truncate_text(text, width);
    let remaining = width.saturating_sub(visible_width(&fitted));
    let (left, right) = match alignment {
        Alignment::Left => (0, remaining),
        Alignment::Right => (remaining, 0),
    };
    format!(
        "{}{}{}{}{}",
        " ".repeat(padding),
        " ".repeat(left),
        fitted,
        " ".repeat(right),
        " ".repeat(padding)
    )
}

pub fn horizontal_rule(widths: &[usize], padding: usize, plain: bool) -> String {
    if widths.is_empty() {
        return String::new();
    }
    let total: usize =
        widths.iter().map(|w| w + padding * 2).sum::<usize>() + widths.len().saturating_sub(1);
    let ch = if plain { '-' } else { '─' };
    ch.to_string().repeat(total)
}
