use std::f32::consts::TAU;

use pedometer::{Axis, Config, DetectionMode, StepCounter, StepListener, best_axis};

const SAMPLE_MS: u64 = 20;
const START_MS: u64 = 10_000;
const GRAVITY: f32 = 9.81;

#[derive(Default)]
struct Recorder {
    deltas: Vec<u32>,
}

impl StepListener for Recorder {
    fn on_steps_counted(&mut self, delta_step_count: u32) {
        self.deltas.push(delta_step_count);
    }
}

fn timestamp(k: u64) -> u64 {
    START_MS + k * SAMPLE_MS
}

/// One step per period, sampled every `SAMPLE_MS`.
fn sine(amplitude: f32, period_ms: u64, k: u64) -> f32 {
    let phase = ((k * SAMPLE_MS) % period_ms) as f32 / period_ms as f32;
    amplitude * (TAU * phase).sin()
}

fn recording_counter() -> StepCounter<Recorder> {
    match StepCounter::with_listener(Config::default(), Recorder::default()) {
        Ok(counter) => counter,
        Err(error) => panic!("default config rejected: {}", error),
    }
}

#[test]
fn steady_walk_reports_validation_batch_then_single_steps() {
    let mut counter = recording_counter();

    // 20 s of walking at two steps per second on the X axis
    for k in 0..1000 {
        let reports_before = counter.listener().deltas.len();
        counter.count_steps([sine(2.0, 500, k), 0.0, 0.0], timestamp(k));

        if counter.listener().deltas.len() != reports_before {
            assert_eq!(counter.detected_axis(), Some(Axis::X));
            assert_eq!(counter.detected_axis_label(), "X");
        } else {
            assert_eq!(counter.detected_axis(), None);
        }
    }

    let deltas = &counter.listener().deltas;
    assert!(deltas.len() >= 20, "only {} updates", deltas.len());
    assert_eq!(deltas[0], 5);
    assert!(deltas[1..].iter().all(|&delta| delta == 1));

    assert_eq!(counter.step_count(), deltas.iter().sum::<u32>());
    assert_eq!(counter.axis(Axis::X).mode(), DetectionMode::Counting);
    assert_eq!(counter.axis(Axis::Y).step_count(), 0);
    assert_eq!(counter.axis(Axis::Z).step_count(), 0);
}

#[test]
fn standing_still_never_counts() {
    for resting in [[0.0, 0.0, GRAVITY], [0.3, -0.2, 9.7], [GRAVITY, 0.0, 0.0]] {
        let mut counter = recording_counter();

        for k in 0..3000 {
            counter.count_steps(resting, timestamp(k));
            for axis in Axis::ALL {
                assert!(!counter.axis(axis).has_valid_steps());
            }
        }

        assert_eq!(counter.step_count(), 0);
        assert!(counter.listener().deltas.is_empty());
        assert_eq!(counter.detected_axis(), None);
        for axis in Axis::ALL {
            assert_eq!(counter.axis(axis).crossing_threshold_count(), 0);
        }
    }
}

#[test]
fn gravity_settling_transient_is_not_a_step() {
    let mut counter = recording_counter();

    // The gravity estimate starts at zero, so the first linear value is 0.8 * g
    counter.count_steps([0.0, 0.0, GRAVITY], timestamp(0));
    assert!((counter.linear_accelerations()[2] - 7.848).abs() < 1e-3);

    for k in 1..50 {
        counter.count_steps([0.0, 0.0, GRAVITY], timestamp(k));
    }

    // The first window captured the settling envelope on Z
    let z = counter.axis(Axis::Z);
    assert!(z.fixed_peak_to_peak() > 7.0, "Z p2p {}", z.fixed_peak_to_peak());
    assert_eq!(best_axis(counter.peak_to_peak_values()), Some(Axis::Z));

    for k in 50..500 {
        counter.count_steps([0.0, 0.0, GRAVITY], timestamp(k));
        assert!(!counter.axis(Axis::Z).has_valid_steps());
    }

    assert_eq!(counter.axis(Axis::Z).crossing_threshold_count(), 0);
    assert!(counter.axis(Axis::Z).fixed_max() <= 0.3);
    assert_eq!(counter.step_count(), 0);
    assert!(counter.listener().deltas.is_empty());
    assert_eq!(counter.detected_axis(), None);
}

#[test]
fn count_is_monotonic_and_matches_reported_deltas() {
    let mut counter = recording_counter();
    counter.set_step_count(1234);

    let mut previous = counter.step_count();
    for k in 0..3000 {
        let t = k * SAMPLE_MS;
        let sample = match t {
            // Walk, stand still, then walk slower with the phone turned over
            0..=15_000 => [sine(0.8, 1000, k), sine(2.0, 500, k), GRAVITY + sine(1.0, 500, k)],
            15_001..=25_000 => [0.1, 0.2, GRAVITY],
            _ => [sine(2.5, 650, k), 0.3, -GRAVITY + sine(0.5, 650, k)],
        };
        counter.count_steps(sample, timestamp(k));

        assert!(counter.step_count() >= previous);
        previous = counter.step_count();
    }

    let reported: u32 = counter.listener().deltas.iter().sum();
    assert_eq!(counter.step_count() - 1234, reported);
    assert!(reported > 0);
}

#[test]
fn strongest_axis_alone_contributes() {
    let mut counter = recording_counter();
    let mut snapshots = [0_u32; 3];
    let mut y_reports = 0;

    for k in 0..1500 {
        let total_before = counter.step_count();
        let reports_before = counter.listener().deltas.len();

        counter.count_steps([sine(1.2, 500, k), sine(2.5, 500, k), GRAVITY], timestamp(k));

        let counts = Axis::ALL.map(|axis| counter.axis(axis).step_count());
        let y = counter.axis(Axis::Y);
        if best_axis(counter.peak_to_peak_values()) == Some(Axis::Y) && y.has_valid_steps() {
            assert_eq!(counter.step_count() - total_before, counts[1] - snapshots[1]);
            assert_eq!(counter.detected_axis(), Some(Axis::Y));
            y_reports += 1;
        }

        if counter.listener().deltas.len() != reports_before {
            snapshots = counts;
        } else {
            assert_eq!(counter.step_count(), total_before);
        }
    }

    assert!(y_reports >= 20, "Y reported only {} times", y_reports);

    // X walked the same steps; they must not be added on top of Y's
    let x = counter.axis(Axis::X).step_count();
    let y = counter.axis(Axis::Y).step_count();
    assert!(x > 0);
    assert!(counter.step_count() < x + y);
    assert_eq!(counter.axis(Axis::Z).step_count(), 0);
}

#[test]
fn raw_sensor_counts_are_scaled() {
    // 4096 LSB per g
    let scale = GRAVITY / 4096.0;
    let config = Config {
        input_scale: scale,
        ..Config::default()
    };
    let mut raw_counter = match StepCounter::new(config) {
        Ok(counter) => counter,
        Err(error) => panic!("scaled config rejected: {}", error),
    };
    let mut float_counter = StepCounter::default();

    for k in 0..1000 {
        let x = sine(2.0, 500, k);
        let raw = [(x / scale).round() as i16, 0, (GRAVITY / scale).round() as i16];
        raw_counter.count_steps(raw, timestamp(k));
        float_counter.count_steps([x, 0.0, GRAVITY], timestamp(k));
    }

    assert!(raw_counter.step_count() >= 25);
    assert!(raw_counter.step_count().abs_diff(float_counter.step_count()) <= 5);
}

#[test]
fn diagnostic_vectors_follow_axis_order() {
    let mut counter = StepCounter::default();

    for k in 0..200 {
        counter.count_steps([0.0, sine(2.0, 500, k), GRAVITY], timestamp(k));
    }

    let smoothed = counter.smoothed_accelerations();
    let linear = counter.linear_accelerations();
    let thresholds = counter.threshold_values();
    for axis in Axis::ALL {
        let detector = counter.axis(axis);
        assert_eq!(smoothed[axis.index()], detector.smoothed_acceleration());
        assert_eq!(linear[axis.index()], detector.linear_acceleration());
        assert_eq!(thresholds[axis.index()], detector.threshold_value());
    }

    assert_eq!(smoothed[0], 0.0);
    assert!((counter.axis(Axis::Z).gravity() - GRAVITY).abs() < 1e-3);
    assert!(counter.axis(Axis::Y).fixed_peak_to_peak() > counter.axis(Axis::Z).fixed_peak_to_peak());
}
