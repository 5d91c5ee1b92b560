//! Benchmarks for the Gallery Plus enrichment stages.
//!
//! Run with: cargo bench -p gallery-plus-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gallery_plus_core::config::{Config, LimitsConfig, ThumbnailConfig};
use gallery_plus_core::pipeline::{
    color, Enricher, ImageDecoder, ListAssembler, ThumbnailGenerator,
};
use gallery_plus_core::{MediaListOptions, PickerSource, Session};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

fn benchmark_base_color(c: &mut Criterion) {
    let img = gradient(1920, 1080);

    c.bench_function("base_color_10x10", |b| {
        b.iter(|| color::average_hex(black_box(&img), 10))
    });
}

fn benchmark_thumbnail(c: &mut Criterion) {
    let img = gradient(1920, 1080);
    let generator = ThumbnailGenerator::new(ThumbnailConfig::default());

    c.bench_function("thumbnail_jpeg_200px", |b| {
        b.iter(|| generator.inline_jpeg(black_box(&img), 200))
    });
    c.bench_function("thumbnail_webp_200px", |b| {
        b.iter(|| generator.encode_webp(black_box(&img), 200))
    });
}

fn benchmark_decode(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.png");
    gradient(1024, 768)
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();

    let decoder = ImageDecoder::new(LimitsConfig::default());
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("decode_png_1024", |b| {
        b.iter(|| {
            let _ = rt.block_on(decoder.decode(black_box(&path)));
        })
    });
}

fn benchmark_listing(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let blobs = tempfile::tempdir().unwrap();
    for i in 0..20 {
        gradient(640, 480)
            .save_with_format(dir.path().join(format!("img_{:02}.png", i)), ImageFormat::Png)
            .unwrap();
    }

    let assembler = ListAssembler::new(Enricher::new(&Config::default()), blobs.path());
    let source = PickerSource::fixed([dir.path()]);
    let options = MediaListOptions {
        include_base_color: true,
        ..MediaListOptions::default()
    };
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("list_20_with_color", |b| {
        b.iter(|| {
            let mut session = Session::new();
            let _ = rt.block_on(assembler.assemble(&source, &mut session, black_box(&options)));
        })
    });
}

criterion_group!(
    benches,
    benchmark_base_color,
    benchmark_thumbnail,
    benchmark_decode,
    benchmark_listing,
);
criterion_main!(benches);
