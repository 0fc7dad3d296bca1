//! Benchmarks for the per-tick playback path.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use replay_bot::{
    ControlStep, ControllerState, GameTickPacket, Sequence, TickRecorder,
    host::{CarInfo, Physics},
};

fn bench_sequence_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence_tick");

    for steps in [1, 16, 256, 4096] {
        let controls = ControllerState {
            throttle: 1.0,
            ..Default::default()
        };
        let template: Vec<ControlStep> = (0..steps)
            .map(|_| ControlStep::new(0.5, controls).unwrap())
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, _| {
            b.iter(|| {
                let mut sequence = Sequence::new(template.clone());
                let mut now = 0.0;
                while sequence.tick(black_box(now)).is_some() {
                    now += 1.0 / 120.0;
                }
            });
        });
    }

    group.finish();
}

fn bench_recorder_log(c: &mut Criterion) {
    let mut group = c.benchmark_group("recorder_log");

    for cars in [2, 8] {
        let packet = GameTickPacket {
            seconds_elapsed: 0.0,
            frame: 0,
            ball: Physics::default(),
            cars: vec![CarInfo::default(); cars],
        };

        group.bench_with_input(BenchmarkId::from_parameter(cars), &cars, |b, _| {
            b.iter(|| {
                let mut recorder = TickRecorder::new("unused.ticklog");
                for _ in 0..600 {
                    recorder.log(black_box(packet.clone()));
                }
                recorder.len()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sequence_tick, bench_recorder_log);
criterion_main!(benches);
