use criterion::{Criterion, black_box, criterion_group, criterion_main};
use texmip_core::{Image, Rgba8};
use texmip_pyr::{MipPyramid, UploadLayout, downsample2x2_mean_rgba8};

fn test_image(width: usize, height: usize) -> Image<Rgba8> {
    let mut data = Vec::with_capacity(width * height);
    for i in 0..(width * height) {
        let v = (i % 251) as u8;
        data.push(Rgba8::new(v, 255 - v, v / 2, 255));
    }
    Image::from_vec(width, height, data).expect("valid image")
}

fn bench_downsample_rgba8(c: &mut Criterion) {
    let img = test_image(2048, 2048);
    let view = img.as_view();

    c.bench_function("downsample2x2_mean_rgba8_2048x2048", |b| {
        b.iter(|| {
            let out = downsample2x2_mean_rgba8(black_box(&view));
            black_box(out);
        });
    });
}

fn bench_full_chain(c: &mut Criterion) {
    let img = test_image(2048, 2048);

    c.bench_function("mip_chain_full_2048x2048", |b| {
        b.iter(|| {
            let mut pyr = MipPyramid::new(black_box(img.clone()));
            black_box(pyr.build_chain(usize::MAX));
        });
    });
}

fn bench_upload_write(c: &mut Criterion) {
    let mut pyr = MipPyramid::new(test_image(1000, 1000));
    pyr.build_chain(usize::MAX);
    let layout = UploadLayout::default();
    let mut buf = Vec::new();

    c.bench_function("upload_write_pitched_1000x1000_chain", |b| {
        b.iter(|| {
            let fps = layout.write(black_box(pyr.levels()), &mut buf);
            black_box(fps);
        });
    });
}

criterion_group!(
    benches,
    bench_downsample_rgba8,
    bench_full_chain,
    bench_upload_write
);
criterion_main!(benches);
