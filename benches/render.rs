#[macro_use]
extern crate criterion;
extern crate mandelview;

use criterion::Criterion;
use mandelview::{
    render_frame, render_frame_threaded, Camera, Complex, Dimensions, Divergence, Histogram,
    Mandelbrot,
};

fn divergence(c: &mut Criterion) {
    let m = Mandelbrot::default();
    c.bench_function("divergence near the boundary", move |b| {
        b.iter(|| m.divergence(Complex::new(-0.7436, 0.1318)))
    });
}

fn histogram(c: &mut Criterion) {
    let h = Histogram::default();
    c.bench_function("histogram 100k ranks", move |b| b.iter(|| h.generate(100_000)));
}

fn frame(c: &mut Criterion) {
    c.bench_function("frame 64x48 home", |b| {
        let d = Dimensions::new(64, 48);
        let cam = Camera::home(d.aspect_ratio());
        let m = Mandelbrot::new(200);
        let h = Histogram::default();
        b.iter(|| render_frame(&cam, d, &m, &h))
    });
    c.bench_function("frame 64x48 home, 4 threads", |b| {
        let d = Dimensions::new(64, 48);
        let cam = Camera::home(d.aspect_ratio());
        let m = Mandelbrot::new(200);
        let h = Histogram::default();
        b.iter(|| render_frame_threaded(&cam, d, &m, &h, 4))
    });
}

criterion_group!(benches, divergence, histogram, frame);
criterion_main!(benches);
