//! Table geometry for the queue report.
//!
//! Layout is computed up front as plain data so pagination and truncation
//! can be checked without decoding a PDF. All coordinates are PDF user
//! space: points, origin at the bottom-left corner of the page.

/// A4 portrait
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 50.0;

pub const HEADER_FONT_SIZE: f32 = 11.0;
pub const BODY_FONT_SIZE: f32 = 10.0;
pub const ROW_HEIGHT: f32 = 20.0;

pub const HEAVY_RULE_WIDTH: f32 = 1.2;
pub const THIN_RULE_WIDTH: f32 = 0.3;

// Gap between a baseline and the rule under it
const BASELINE_TO_RULE: f32 = 6.0;
// Horizontal padding kept free at the right edge of each cell
const CELL_PADDING: f32 = 6.0;

pub const ELLIPSIS: &str = "...";

/// A fixed, left-aligned table column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub title: &'static str,
    pub x: f32,
    pub width: f32,
}

pub const COLUMNS: [Column; 4] = [
    Column {
        title: "#",
        x: MARGIN,
        width: 40.0,
    },
    Column {
        title: "Name",
        x: MARGIN + 40.0,
        width: 150.0,
    },
    Column {
        title: "Surname",
        x: MARGIN + 190.0,
        width: 150.0,
    },
    Column {
        title: "Date",
        x: MARGIN + 340.0,
        width: PAGE_WIDTH - 2.0 * MARGIN - 340.0,
    },
];

/// Cell values for one data row, in column order
pub type Cells = [String; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleWeight {
    Heavy,
    Thin,
}

impl RuleWeight {
    pub fn line_width(self) -> f32 {
        match self {
            RuleWeight::Heavy => HEAVY_RULE_WIDTH,
            RuleWeight::Thin => THIN_RULE_WIDTH,
        }
    }
}

/// Horizontal rule spanning the table width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub y: f32,
    pub weight: RuleWeight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    pub baseline_y: f32,
    pub cells: Cells,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub header_baseline_y: f32,
    pub rows: Vec<PlacedRow>,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub pages: Vec<PageLayout>,
}

impl TableLayout {
    /// Paginate `rows`. Always yields at least one page.
    pub fn build(rows: Vec<Cells>) -> Self {
        let per_page = rows_per_page();
        let mut pages = Vec::new();
        let mut rows = rows.into_iter().peekable();

        loop {
            let chunk: Vec<Cells> = rows.by_ref().take(per_page).collect();
            pages.push(layout_page(chunk));
            if rows.peek().is_none() {
                break;
            }
        }

        Self { pages }
    }

    pub fn row_count(&self) -> usize {
        self.pages.iter().map(|p| p.rows.len()).sum()
    }
}

fn header_baseline() -> f32 {
    PAGE_HEIGHT - MARGIN - HEADER_FONT_SIZE
}

fn header_rule_y() -> f32 {
    header_baseline() - BASELINE_TO_RULE
}

/// Rows that fit between the header rule and the bottom margin
pub fn rows_per_page() -> usize {
    (((header_rule_y() - MARGIN) / ROW_HEIGHT).floor() as usize).max(1)
}

fn layout_page(chunk: Vec<Cells>) -> PageLayout {
    let header_rule = header_rule_y();
    let mut rules = vec![Rule {
        y: header_rule,
        weight: RuleWeight::Heavy,
    }];

    let count = chunk.len();
    let mut rows = Vec::with_capacity(count);
    for (i, cells) in chunk.into_iter().enumerate() {
        let bottom = header_rule - (i as f32 + 1.0) * ROW_HEIGHT;
        rows.push(PlacedRow {
            baseline_y: bottom + BASELINE_TO_RULE,
            cells,
        });
        if i + 1 < count {
            rules.push(Rule {
                y: bottom,
                weight: RuleWeight::Thin,
            });
        }
    }

    // Closing rule; an empty table keeps one blank row of height
    let body_rows = count.max(1) as f32;
    rules.push(Rule {
        y: header_rule - body_rows * ROW_HEIGHT,
        weight: RuleWeight::Heavy,
    });

    PageLayout {
        header_baseline_y: header_baseline(),
        rows,
        rules,
    }
}

// Helvetica advance widths from the standard AFM metrics, in em.
// Anything outside ASCII falls back to the widest glyph of its class.
fn glyph_width(c: char) -> f32 {
    match c {
        'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 0.667,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 0.722,
        'F' | 'T' | 'Z' => 0.611,
        'G' | 'O' | 'Q' => 0.778,
        'I' => 0.278,
        'J' => 0.5,
        'L' => 0.556,
        'M' => 0.833,
        'W' => 0.944,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 0.5,
        'f' | 't' => 0.278,
        'i' | 'j' | 'l' => 0.222,
        'm' => 0.833,
        'r' => 0.333,
        'w' => 0.722,
        'a'..='z' | '0'..='9' => 0.556,
        ' ' | '.' | ',' | ':' | ';' | '!' | '/' => 0.278,
        '\'' => 0.191,
        '|' => 0.26,
        '(' | ')' | '-' => 0.333,
        '@' => 1.015,
        c if c.is_uppercase() => 0.944,
        c if c.is_lowercase() => 0.722,
        _ => 1.0,
    }
}

/// Estimated rendered width of `text` at `font_size`
pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(glyph_width).sum::<f32>() * font_size
}

/// Cut `text` so it fits `column`, marking the cut with a trailing ellipsis
pub fn fit_to_column(text: &str, column: &Column, font_size: f32) -> String {
    let available = column.width - CELL_PADDING;
    if text_width(text, font_size) <= available {
        return text.to_string();
    }

    let budget = available - text_width(ELLIPSIS, font_size);
    let mut used = 0.0;
    let mut kept = String::new();
    for c in text.chars() {
        let w = glyph_width(c) * font_size;
        if used + w > budget {
            break;
        }
        used += w;
        kept.push(c);
    }

    format!("{}{}", kept.trim_end(), ELLIPSIS)
}
