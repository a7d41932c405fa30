//! Freeze frame benchmark: capture cost of a clip still into the viewport.
//!
//! Runs on every transition, so it has to stay well under one frame.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use petclip::buffer::{cover_crop, Frame};
use petclip::pet::FreezeFrame;
use petclip::{ClipName, Rgb, SyntheticClip, Theme};
use std::time::Duration;

fn decoded_clip(width: u32, height: u32) -> SyntheticClip {
    let mut clip = SyntheticClip::new(ClipName::Idle, Theme::Day)
        .with_size(width, height)
        .with_load_delay(Duration::ZERO);
    clip.advance(Duration::ZERO);
    clip
}

fn capture_still(c: &mut Criterion) {
    let clip = decoded_clip(640, 480);
    let mut group = c.benchmark_group("freeze_capture");

    for viewport in [(80u32, 48u32), (200, 100), (400, 240)] {
        let id = format!("{}x{}", viewport.0, viewport.1);
        group.bench_with_input(BenchmarkId::from_parameter(id), &viewport, |b, &viewport| {
            let mut freeze = FreezeFrame::new();
            b.iter(|| freeze.capture(black_box(&clip), viewport));
        });
    }

    group.finish();
}

fn blit_cover(c: &mut Criterion) {
    let source = Frame::filled(1280, 720, Rgb::new(40, 90, 160));
    let mut canvas = Frame::new(200, 100);

    c.bench_function("blit_1280x720_into_200x100", |b| {
        b.iter(|| {
            if let Some(crop) = cover_crop(source.size(), canvas.size()) {
                canvas.blit_crop_nearest(black_box(&source), crop);
            }
        });
    });
}

fn cover_crop_math(c: &mut Criterion) {
    c.bench_function("cover_crop", |b| {
        b.iter(|| cover_crop(black_box((1920, 1080)), black_box((375, 812))));
    });
}

criterion_group!(benches, capture_still, blit_cover, cover_crop_math);
criterion_main!(benches);
