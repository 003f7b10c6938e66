//! Fixed-width table layout with wrapped cells.

use thiserror::Error;

use super::canvas::{Canvas, Rgb};
use super::wrap::wrap_text;

const WEIGHT_TOLERANCE: f32 = 0.001;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("table needs at least one column")]
    NoColumns,

    #[error("column weights must be positive (column {index} is {weight})")]
    NonPositiveWeight { index: usize, weight: f32 },

    #[error("column weights must sum to 1.0 (got {0})")]
    WeightSum(f32),

    #[error("table width and line metrics must be positive")]
    NonPositiveMetric,
}

/// Geometry and typography of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    left: f32,
    width: f32,
    column_weights: Vec<f32>,
    font_size: f32,
    line_height: f32,
    padding: f32,
    header_fill: Option<Rgb>,
}

impl TableLayout {
    /// `column_weights` are fractions of `width` and must sum to 1.0.
    pub fn new(left: f32, width: f32, column_weights: Vec<f32>) -> Result<Self, LayoutError> {
        if column_weights.is_empty() {
            return Err(LayoutError::NoColumns);
        }
        if let Some((index, &weight)) = column_weights
            .iter()
            .enumerate()
            .find(|(_, w)| !(w.is_finite() && **w > 0.0))
        {
            return Err(LayoutError::NonPositiveWeight { index, weight });
        }
        let sum: f32 = column_weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(LayoutError::WeightSum(sum));
        }
        if !(width > 0.0) {
            return Err(LayoutError::NonPositiveMetric);
        }

        Ok(Self {
            left,
            width,
            column_weights,
            font_size: 10.0,
            line_height: 14.0,
            padding: 4.0,
            header_fill: Some(Rgb::LIGHT_GRAY),
        })
    }

    pub fn with_typography(
        mut self,
        font_size: f32,
        line_height: f32,
        padding: f32,
    ) -> Result<Self, LayoutError> {
        if !(font_size > 0.0 && line_height > 0.0 && padding >= 0.0) {
            return Err(LayoutError::NonPositiveMetric);
        }
        self.font_size = font_size;
        self.line_height = line_height;
        self.padding = padding;
        Ok(self)
    }

    pub fn with_header_fill(mut self, fill: Option<Rgb>) -> Self {
        self.header_fill = fill;
        self
    }

    pub fn column_count(&self) -> usize {
        self.column_weights.len()
    }

    /// `(x, width)` of every column.
    pub fn column_bounds(&self) -> Vec<(f32, f32)> {
        let mut x = self.left;
        self.column_weights
            .iter()
            .map(|w| {
                let col = (x, self.width * w);
                x += col.1;
                col
            })
            .collect()
    }
}

/// A row after wrapping, before drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredRow {
    pub lines: Vec<Vec<String>>,
    pub height: f32,
}

/// Draws rows of text cells and hands the vertical cursor back to the caller.
#[derive(Debug, Clone)]
pub struct TableRenderer {
    layout: TableLayout,
}

impl TableRenderer {
    pub fn new(layout: TableLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    /// Wrap every cell to its column and compute the row height.
    ///
    /// Height is the tallest cell's line count times the line height plus
    /// padding above and below. Missing cells are empty; extra cells are
    /// ignored.
    pub fn measure_row<C: Canvas + ?Sized>(&self, canvas: &C, cells: &[&str]) -> MeasuredRow {
        let layout = &self.layout;
        let font_size = layout.font_size;

        let lines: Vec<Vec<String>> = layout
            .column_bounds()
            .iter()
            .enumerate()
            .map(|(i, &(_, col_width))| {
                let text = cells.get(i).copied().unwrap_or("");
                let inner = (col_width - 2.0 * layout.padding).max(0.0);
                wrap_text(text, inner, |s| canvas.measure_text(s, font_size))
            })
            .collect();

        let max_lines = lines.iter().map(Vec::len).max().unwrap_or(1).max(1);
        let height = max_lines as f32 * layout.line_height + 2.0 * layout.padding;

        MeasuredRow { lines, height }
    }

    /// Draw one row with its top at `y`; returns the `y` of the next row.
    ///
    /// The first column is left-aligned, the rest right-aligned. Header rows
    /// get the shaded background. A separator is drawn under every row.
    pub fn draw_row<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        cells: &[&str],
        y: f32,
        is_header: bool,
    ) -> f32 {
        let row = self.measure_row(canvas, cells);
        let layout = &self.layout;

        if is_header {
            if let Some(fill) = layout.header_fill {
                canvas.draw_rect(layout.left, y, layout.width, row.height, fill);
            }
        }

        for (col, (&(x, col_width), lines)) in
            layout.column_bounds().iter().zip(&row.lines).enumerate()
        {
            for (n, line) in lines.iter().enumerate() {
                let baseline = y + layout.padding + n as f32 * layout.line_height + layout.font_size;
                let text_x = if col == 0 {
                    x + layout.padding
                } else {
                    x + col_width - layout.padding - canvas.measure_text(line, layout.font_size)
                };
                canvas.draw_text(line, text_x, baseline, layout.font_size);
            }
        }

        let bottom = y + row.height;
        canvas.draw_line(layout.left, bottom, layout.left + layout.width, bottom);
        bottom
    }

    /// Draw a header and body rows, starting new pages as needed.
    ///
    /// A row that would cross `page_bottom` goes to a fresh page: `new_page`
    /// is called and returns the top `y` of that page, where the header is
    /// repeated. Returns the cursor after the last row.
    pub fn draw_table<C, F>(
        &self,
        canvas: &mut C,
        header: &[&str],
        rows: &[Vec<String>],
        mut y: f32,
        page_bottom: f32,
        mut new_page: F,
    ) -> f32
    where
        C: Canvas + ?Sized,
        F: FnMut(&mut C) -> f32,
    {
        y = self.draw_row(canvas, header, y, true);

        for row in rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            let height = self.measure_row(canvas, &cells).height;
            if y + height > page_bottom {
                y = new_page(canvas);
                y = self.draw_row(canvas, header, y, true);
            }
            y = self.draw_row(canvas, &cells, y, false);
        }
        y
    }
}
