/// Assert that a result failed with the given error kind
#[macro_export]
macro_rules! assert_kind {
    ($result:expr, $kind:expr) => {
        match $result {
            Ok(_) => panic!("Expected {:?} error, got Ok", $kind),
            Err(err) => assert_eq!(err.kind(), $kind, "unexpected error: {}", err),
        }
    };
}

/// Assert the exact `(tick, position)` samples of a position curve
#[macro_export]
macro_rules! assert_samples {
    ($curve:expr, [$(($tick:expr, $x:expr, $y:expr)),* $(,)?]) => {
        let actual: Vec<(u64, downflux_shared::Position)> =
            $curve.samples().map(|(tick, p)| (tick, *p)).collect();
        let expected: Vec<(u64, downflux_shared::Position)> =
            vec![$(($tick, downflux_shared::Position::new($x as f64, $y as f64))),*];
        assert_eq!(actual, expected);
    };
}
