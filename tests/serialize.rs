#![cfg(feature = "serde")]

use closed_knots::prelude::*;

#[test]
fn test_serialization() {
    let sequence = IncreasingOpenKnotSequenceClosedCurve::<f64>::try_minimal(3).unwrap();
    let json = serde_json::to_string_pretty(&sequence).unwrap();
    println!("{}", json);
    let deserialized: IncreasingOpenKnotSequenceClosedCurve<f64> =
        serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, sequence);
}

#[test]
fn test_configuration_serialization() {
    let configuration = KnotSequenceConfiguration::PeriodicKnots {
        max_multiplicity_order: 4,
        periodic_knots: vec![0., 0.5, 0.6, 0.7, 1.],
        multiplicities: Some(vec![4, 1, 1, 2, 4]),
    };
    let json = serde_json::to_string(&configuration).unwrap();
    let deserialized: KnotSequenceConfiguration<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, configuration);

    let sequence =
        StrictlyIncreasingOpenKnotSequenceClosedCurve::try_from_configuration(deserialized)
            .unwrap();
    let index = serde_json::to_string(&sequence.index_knot_origin()).unwrap();
    assert_eq!(index, "0");
}
