//! Benchmarks for tilt and posture estimation and frame decoding

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use head_tilt_quiz::constants::{LEFT_EAR, NUM_POSE_LANDMARKS, RIGHT_EAR};
use head_tilt_quiz::estimator::TiltEstimator;
use head_tilt_quiz::landmarks::{Landmark, PoseFrame};
use head_tilt_quiz::posture::PostureEstimator;

fn skeleton() -> Vec<Landmark> {
    let mut landmarks: Vec<Landmark> = (0..NUM_POSE_LANDMARKS)
        .map(|_| Landmark::new(rand::random(), rand::random()).with_visibility(rand::random()))
        .collect();
    landmarks[LEFT_EAR] = Landmark::new(0.6, 0.45).with_visibility(0.9);
    landmarks[RIGHT_EAR] = Landmark::new(0.4, 0.38).with_visibility(0.85);
    landmarks
}

fn benchmark_estimator(c: &mut Criterion) {
    let estimator = TiltEstimator::default();
    let landmarks = skeleton();

    c.bench_function("estimate_tilt", |b| {
        b.iter(|| black_box(estimator.estimate(black_box(&landmarks))));
    });

    let posture = PostureEstimator::default();
    c.bench_function("estimate_posture", |b| {
        b.iter(|| black_box(posture.estimate(black_box(&landmarks))));
    });

    let line = serde_json::to_string(&PoseFrame {
        timestamp_ms: 1_000,
        subjects: vec![landmarks.clone()],
        key: None,
    })
    .unwrap_or_default();

    c.bench_function("decode_and_estimate", |b| {
        b.iter(|| {
            let frame = PoseFrame::from_json_line(black_box(&line)).ok();
            let subject = frame.as_ref().and_then(PoseFrame::primary_subject);
            black_box(subject.map(|s| estimator.estimate(s)))
        });
    });
}

criterion_group!(benches, benchmark_estimator);
criterion_main!(benches);
