use vitals::gauge::{
    FloatGauge, GaugeError, IntGauge, MaxFloatThreshold, MaxIntThreshold, MinIntThreshold,
};
use vitals::Status;

use crate::common::assert_health;

#[test]
fn length_zero_is_a_construction_error() {
    let err = IntGauge::new("test-invalid", 0).unwrap_err();
    assert!(matches!(err, GaugeError::InvalidLength { len: 0 }));
    assert!(err.to_string().contains("at least one value"));
}

#[test]
fn empty_gauge_is_ok() {
    let gauge = IntGauge::new("test-empty", 10).unwrap();
    gauge.set(MaxIntThreshold {
        threshold: 5,
        last_n: 2,
        any_n: 3,
        description: "max5".to_string(),
        severity: Status::Major,
    });
    assert_health(&gauge.health(), Status::Ok, "ok");
}

#[test]
fn any_n_counts_violations_anywhere() {
    // only two samples reach 5.5 (the equal one counts), which is below
    // the any-3 requirement
    let gauge = FloatGauge::new("test-floats-any", 10).unwrap();
    gauge.set(MaxFloatThreshold {
        threshold: 5.5,
        last_n: 0,
        any_n: 3,
        description: "too many spikes".to_string(),
        severity: Status::Major,
    });

    for sample in [9.9, 1.1, 5.5, 1.1, 3.3, 2.2, 0.0, 1.1, 2.2] {
        gauge.record(sample);
    }
    assert_health(&gauge.health(), Status::Ok, "ok");

    // a third spike crosses the line
    gauge.record(7.0);
    assert_health(&gauge.health(), Status::Major, "too many spikes");
}

#[test]
fn last_n_requires_a_consecutive_run() {
    let gauge = IntGauge::new("test-ints-last", 5).unwrap();
    gauge.set(MaxIntThreshold {
        threshold: 10,
        last_n: 3,
        any_n: 0,
        description: "hot streak".to_string(),
        severity: Status::Minor,
    });

    gauge.record(11);
    gauge.record(12);
    assert_health(&gauge.health(), Status::Ok, "ok");

    gauge.record(13);
    assert_health(&gauge.health(), Status::Minor, "hot streak");

    // one healthy sample at the front breaks the streak
    gauge.record(2);
    assert_health(&gauge.health(), Status::Ok, "ok");
}

#[test]
fn zeroed_predicates_never_fire() {
    let gauge = IntGauge::new("test-ints-zeroed", 5).unwrap();
    gauge.set(MaxIntThreshold {
        threshold: 0,
        last_n: 0,
        any_n: 0,
        description: "unreachable".to_string(),
        severity: Status::Outage,
    });

    for sample in [100, 200, 300] {
        gauge.record(sample);
    }
    assert_health(&gauge.health(), Status::Ok, "ok");
}

#[test]
fn min_threshold_watches_the_floor() {
    let gauge = IntGauge::new("test-ints-min", 4).unwrap();
    gauge.set(MinIntThreshold {
        threshold: 2,
        last_n: 2,
        any_n: 0,
        description: "running dry".to_string(),
        severity: Status::Major,
    });

    gauge.record(10);
    gauge.record(1);
    assert_health(&gauge.health(), Status::Ok, "ok");

    gauge.record(0);
    assert_health(&gauge.health(), Status::Major, "running dry");
}

#[test]
fn history_is_bounded() {
    let gauge = IntGauge::new("test-ints-bounded", 3).unwrap();
    gauge.set(MaxIntThreshold {
        threshold: 50,
        last_n: 0,
        any_n: 1,
        description: "spiked".to_string(),
        severity: Status::Major,
    });

    gauge.record(99);
    assert_health(&gauge.health(), Status::Major, "spiked");

    // three newer samples push the spike out of the history
    gauge.record(1);
    gauge.record(2);
    gauge.record(3);
    assert_eq!(3, gauge.len());
    assert_health(&gauge.health(), Status::Ok, "ok");
}

#[test]
fn worst_severity_wins_across_thresholds() {
    let gauge = IntGauge::new("test-ints-worst", 5).unwrap();
    gauge
        .set(MaxIntThreshold {
            threshold: 10,
            last_n: 1,
            any_n: 0,
            description: "warm".to_string(),
            severity: Status::Minor,
        })
        .set(MaxIntThreshold {
            threshold: 100,
            last_n: 1,
            any_n: 0,
            description: "on fire".to_string(),
            severity: Status::Outage,
        });

    gauge.record(50);
    assert_health(&gauge.health(), Status::Minor, "warm");

    gauge.record(500);
    assert_health(&gauge.health(), Status::Outage, "on fire");
}
