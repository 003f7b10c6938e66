use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use bizap_analytics::{
    ConfidenceDecay, build_dashboard, forecast_cash_flow, generate_dunning_notices,
    outstanding_by_aging,
};
use bizap_core::{BusinessProfileId, InvoiceId};
use bizap_documents::pdf::{Canvas, PageSetup, Rgb, draw_invoice};
use bizap_invoicing::{Invoice, InvoiceStatus, LineItem};
use chrono::{Duration, NaiveDate};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

/// A book of invoices spread over the past year with mixed states.
fn book(count: usize) -> Vec<Invoice> {
    let profile = BusinessProfileId::new();
    (0..count)
        .map(|i| {
            let date = today() - Duration::days((i % 365) as i64);
            let mut inv = Invoice::draft(
                InvoiceId::new(),
                profile,
                format!("Customer {}", i % 50),
                date,
                "USD",
            )
            .with_item(LineItem::new("Work", 1.0 + (i % 5) as f64, 100.0))
            .with_due_date(date + Duration::days(30));
            inv.invoice_sequence = i as u32 + 1;
            inv.transition_to(InvoiceStatus::Sent).unwrap();
            if i % 3 == 0 {
                let paid_at = date.and_hms_opt(12, 0, 0).unwrap().and_utc() + Duration::days(10);
                inv.record_payment(inv.total_amount, paid_at).unwrap();
            }
            inv
        })
        .collect()
}

/// Canvas that only measures text; draws are discarded.
struct NullCanvas;

impl Canvas for NullCanvas {
    fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32) {
        black_box((text, x, y, font_size));
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Rgb) {
        black_box((x, y, width, height, fill));
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        black_box((x1, y1, x2, y2));
    }

    fn measure_text(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * 0.5
    }
}

fn bench_reports(c: &mut Criterion) {
    let mut group = c.benchmark_group("reports");
    let decay = ConfidenceDecay::default();

    for size in [100usize, 1_000, 10_000] {
        let invoices = book(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("dashboard", size), &invoices, |b, inv| {
            b.iter(|| build_dashboard(black_box(inv), today()))
        });
        group.bench_with_input(BenchmarkId::new("aging", size), &invoices, |b, inv| {
            b.iter(|| outstanding_by_aging(black_box(inv), today()))
        });
        group.bench_with_input(BenchmarkId::new("dunning", size), &invoices, |b, inv| {
            b.iter(|| generate_dunning_notices(black_box(inv), today()))
        });
        group.bench_with_input(BenchmarkId::new("forecast_90d", size), &invoices, |b, inv| {
            b.iter(|| forecast_cash_flow(black_box(inv), today(), 90, &decay))
        });
    }

    group.finish();
}

fn bench_invoice_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("invoice_layout");

    for lines in [10usize, 200] {
        let mut invoice = book(1).remove(0);
        for i in 0..lines {
            invoice = invoice.with_item(LineItem::new(
                format!("Consulting block {i} covering analysis, design review and follow-up"),
                2.0,
                85.0,
            ));
        }

        group.bench_with_input(BenchmarkId::new("draw_invoice", lines), &invoice, |b, inv| {
            b.iter(|| {
                let mut canvas = NullCanvas;
                draw_invoice(&mut canvas, black_box(inv), &PageSetup::A4, |_| {})
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reports, bench_invoice_layout);
criterion_main!(benches);
