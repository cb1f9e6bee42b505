use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use skyflap::{GameConfig, InputFrame, Scene};

fn frame_step(c: &mut Criterion) {
    let mut scene = Scene::headless(GameConfig::default(), 12345);
    scene.step(InputFrame::start());
    c.bench_function("Frame step", |b| {
        b.iter(|| {
            let result = scene.step(InputFrame::new());
            if result.game_over {
                scene.step(InputFrame::restart());
            }
        })
    });
}

fn ten_seconds(c: &mut Criterion) {
    c.bench_function("Ten seconds of frames", |b| {
        b.iter_batched(
            || Scene::headless(GameConfig::default(), 12345),
            |mut scene| {
                for i in 0..600u32 {
                    let input = if i % 15 == 0 { InputFrame::start() } else { InputFrame::new() };
                    scene.step(input);
                }
                scene.run().compute_hash()
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, frame_step, ten_seconds);
criterion_main!(benches);
