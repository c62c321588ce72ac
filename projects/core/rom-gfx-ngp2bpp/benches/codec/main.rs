use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rom_gfx_ngp2bpp::bench::{pack_row_word, unpack_row_word};
use rom_gfx_ngp2bpp::*;
use std::hint::black_box;

#[cfg(not(target_os = "windows"))]
use pprof::criterion::{Output, PProfProfiler};

// 128 x 1024 pixels: 2048 tiles, 32KB packed.
const WIDTH: u32 = 128;
const HEIGHT: u32 = 1024;

fn packed_input(len: usize) -> Vec<u8> {
    // Simple pattern; real tile data has more runs, but this is fine for throughput.
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let geometry = TileGeometry::NGP_2BPP;
    let dimensions = ImageDimensions::new(WIDTH, HEIGHT);
    let packed_size = (WIDTH as usize / 8) * (HEIGHT as usize / 8) * geometry.tile_size_bytes();

    let mut group = c.benchmark_group("NGP 2BPP Rows");
    group.throughput(Throughput::Elements(1 << 16));
    group.bench_function("unpack_row_word", |b| {
        b.iter(|| {
            let mut sum = 0u32;
            for word in 0..=u16::MAX {
                sum += unpack_row_word(black_box(word))[7] as u32;
            }
            sum
        })
    });
    group.bench_function("pack_row_word", |b| {
        b.iter(|| {
            let mut acc = 0u16;
            for word in 0..=u16::MAX {
                acc ^= pack_row_word(&unpack_row_word(black_box(word)));
            }
            acc
        })
    });
    group.finish();

    let mut group = c.benchmark_group("NGP 2BPP Decode");
    group.throughput(Throughput::Bytes(packed_size as u64));

    // Full data, and data that runs out halfway through the image.
    for (name, len) in [("full", packed_size), ("truncated", packed_size / 2 + 3)] {
        let packed = packed_input(len);
        for layout in [PixelLayout::Indexed, PixelLayout::IndexedAlpha] {
            let settings = Ngp2bppDecodeSettings { layout };
            group.bench_with_input(
                BenchmarkId::new(format!("sequential_{layout:?}"), name),
                &packed,
                |b, packed| {
                    b.iter(|| {
                        decode_ngp_2bpp(black_box(packed), dimensions, &geometry, settings).unwrap()
                    })
                },
            );

            #[cfg(feature = "multithreaded")]
            group.bench_with_input(
                BenchmarkId::new(format!("parallel_{layout:?}"), name),
                &packed,
                |b, packed| {
                    b.iter(|| {
                        decode_ngp_2bpp_parallel(black_box(packed), dimensions, &geometry, settings)
                            .unwrap()
                    })
                },
            );
        }
    }
    group.finish();

    let mut group = c.benchmark_group("NGP 2BPP Encode");
    group.throughput(Throughput::Bytes(packed_size as u64));

    // Second half of the image is transparent filler, which gets elided.
    let pixels = decode_ngp_2bpp(
        &packed_input(packed_size / 2),
        dimensions,
        &geometry,
        Ngp2bppDecodeSettings::default(),
    )
    .unwrap()
    .pixels;
    for settings in Ngp2bppEncodeSettings::all_combinations() {
        let name = if settings.elide_transparent_tiles {
            "elide"
        } else {
            "keep"
        };
        group.bench_with_input(BenchmarkId::new("encode", name), &pixels, |b, pixels| {
            b.iter(|| encode_ngp_2bpp(black_box(pixels), &geometry, settings).unwrap())
        });
    }
    group.finish();
}

#[cfg(not(target_os = "windows"))]
criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = criterion_benchmark
}

#[cfg(target_os = "windows")]
criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = criterion_benchmark
}

criterion_main!(benches);
