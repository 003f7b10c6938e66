//! Page composition for an invoice or quote.

use bizap_invoicing::Invoice;

use super::canvas::Canvas;
use super::table::{LayoutError, TableLayout, TableRenderer};
use super::wrap::wrap_text;

const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 10.0;
const BODY_LINE: f32 = 14.0;

/// Page size and margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageSetup {
    /// A4 portrait with 40pt margins.
    pub const A4: PageSetup = PageSetup {
        width: 595.0,
        height: 842.0,
        margin: 40.0,
    };

    fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn bottom(&self) -> f32 {
        self.height - self.margin
    }
}

fn money(amount: f64, currency: &str) -> String {
    format!("{amount:.2} {currency}")
}

/// Draw `invoice` starting at the top margin; returns the final cursor.
///
/// `new_page` must start a fresh page on the surface; the cursor restarts at
/// the top margin.
pub fn draw_invoice<C, F>(
    canvas: &mut C,
    invoice: &Invoice,
    page: &PageSetup,
    mut new_page: F,
) -> Result<f32, LayoutError>
where
    C: Canvas + ?Sized,
    F: FnMut(&mut C),
{
    let left = page.margin;
    let mut y = page.margin;

    let title = if invoice.is_quote { "QUOTE" } else { "INVOICE" };
    y += TITLE_SIZE;
    canvas.draw_text(&format!("{title} {}", invoice.document_number()), left, y, TITLE_SIZE);
    y += BODY_LINE / 2.0;

    let mut preamble: Vec<String> = Vec::new();
    for text in [&invoice.header, &invoice.subheader] {
        if !text.trim().is_empty() {
            preamble.push(text.clone());
        }
    }
    preamble.push(format!("Bill to: {}", invoice.customer_name));
    preamble.push(format!("Date: {}", invoice.date.format("%d-%m-%Y")));
    if let Some(due) = invoice.due_date {
        preamble.push(format!("Due: {}", due.format("%d-%m-%Y")));
    }
    for line in &preamble {
        y = draw_paragraph(canvas, line, left, y, page.content_width());
    }
    y += BODY_LINE;

    let items = TableRenderer::new(TableLayout::new(
        left,
        page.content_width(),
        vec![0.46, 0.14, 0.18, 0.22],
    )?);
    let rows: Vec<Vec<String>> = invoice
        .items
        .iter()
        .map(|item| {
            vec![
                item.description.clone(),
                format!("{}", item.quantity),
                format!("{:.2}", item.unit_price),
                format!("{:.2}", item.total()),
            ]
        })
        .collect();

    let margin = page.margin;
    y = items.draw_table(
        canvas,
        &["Description", "Qty", "Unit price", "Total"],
        &rows,
        y,
        page.bottom(),
        |c| {
            new_page(c);
            margin
        },
    );

    let totals = TableRenderer::new(
        TableLayout::new(left, page.content_width(), vec![0.7, 0.3])?.with_header_fill(None),
    );
    let mut summary = vec![("Total", money(invoice.total_amount, &invoice.currency_code))];
    if invoice.amount_paid > 0.0 {
        summary.push(("Paid", money(invoice.amount_paid, &invoice.currency_code)));
        summary.push((
            "Balance due",
            money(invoice.outstanding_amount(), &invoice.currency_code),
        ));
    }
    for (label, value) in &summary {
        let cells = [*label, value.as_str()];
        if y + totals.measure_row(canvas, &cells).height > page.bottom() {
            new_page(canvas);
            y = page.margin;
        }
        y = totals.draw_row(canvas, &cells, y, false);
    }

    for text in [&invoice.notes, &invoice.footer] {
        if text.trim().is_empty() {
            continue;
        }
        y += BODY_LINE;
        y = draw_paragraph(canvas, text, left, y, page.content_width());
    }

    Ok(y)
}

fn draw_paragraph<C: Canvas + ?Sized>(canvas: &mut C, text: &str, x: f32, mut y: f32, width: f32) -> f32 {
    let lines = wrap_text(text, width, |s| canvas.measure_text(s, BODY_SIZE));
    for line in lines {
        y += BODY_LINE;
        canvas.draw_text(&line, x, y, BODY_SIZE);
    }
    y
}
