//! Diff benchmark: cost of pushing a composed pet frame to the terminal.
//!
//! The stage paints half-block pixels, so every cell carries two colors.
//! Target: < 500µs for a 200×50 update.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use petclip::buffer::diff::{render_diff, render_full, DiffState};
use petclip::{Buffer, Cell, Frame, Rect, Rgb};

/// A buffer of half-block pixels with a gradient shifted by `seed`.
fn pixel_buffer(width: u16, height: u16, seed: u8) -> Buffer {
    let mut frame = Frame::new(u32::from(width), u32::from(height) * 2);
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            let r = ((x * 3 + u32::from(seed)) % 256) as u8;
            let g = ((y * 5 + u32::from(seed)) % 256) as u8;
            frame.set(x, y, Rgb::new(r, g, 120));
        }
    }
    let mut buffer = Buffer::new(width, height);
    frame.paint_half_blocks(&mut buffer, Rect::from_size(width, height));
    buffer
}

fn diff_identical(c: &mut Criterion) {
    let a = pixel_buffer(200, 50, 0);
    let b = a.clone();

    c.bench_function("diff_200x50_identical", |bench| {
        bench.iter(|| {
            let mut output = Vec::with_capacity(4096);
            let mut state = DiffState::new();
            render_diff(black_box(&a), black_box(&b), &[], &mut output, &mut state)
        });
    });
}

fn diff_status_line(c: &mut Criterion) {
    let a = pixel_buffer(200, 50, 0);
    let mut b = a.clone();
    for (x, ch) in (0u16..).zip("Idle-loop  bursts: 2".chars()) {
        b.set(x, 49, Cell::new(ch).with_fg(Rgb::new(230, 230, 230)));
    }

    c.bench_function("diff_200x50_status_line", |bench| {
        bench.iter(|| {
            let mut output = Vec::with_capacity(4096);
            let mut state = DiffState::new();
            render_diff(black_box(&a), black_box(&b), &[], &mut output, &mut state)
        });
    });
}

fn diff_dirty_rect(c: &mut Criterion) {
    let a = pixel_buffer(200, 50, 0);
    let b = pixel_buffer(200, 50, 1);
    let dirty = [Rect::new(60, 10, 80, 30)];

    c.bench_function("diff_200x50_dirty_rect", |bench| {
        bench.iter(|| {
            let mut output = Vec::with_capacity(16384);
            let mut state = DiffState::new();
            render_diff(black_box(&a), black_box(&b), &dirty, &mut output, &mut state)
        });
    });
}

fn full_render(c: &mut Criterion) {
    let buffer = pixel_buffer(200, 50, 0);

    c.bench_function("render_full_200x50", |bench| {
        bench.iter(|| {
            let mut output = Vec::with_capacity(65536);
            render_full(black_box(&buffer), &mut output);
            output
        });
    });
}

fn diff_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_by_size");

    for (width, height) in [(80, 24), (120, 40), (200, 50), (300, 80)] {
        let pair = (pixel_buffer(width, height, 0), pixel_buffer(width, height, 1));
        group.bench_with_input(
            BenchmarkId::new("animated", format!("{width}x{height}")),
            &pair,
            |bench, (a, b)| {
                bench.iter(|| {
                    let mut output = Vec::with_capacity(65536);
                    let mut state = DiffState::new();
                    render_diff(black_box(a), black_box(b), &[], &mut output, &mut state)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, diff_identical, diff_status_line, diff_dirty_rect, full_render, diff_by_size);
criterion_main!(benches);
