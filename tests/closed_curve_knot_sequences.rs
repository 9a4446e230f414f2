use approx::assert_relative_eq;
use closed_knots::prelude::*;

fn clamped() -> StrictlyIncreasingOpenKnotSequenceClosedCurve<f64> {
    StrictlyIncreasingOpenKnotSequenceClosedCurve::try_new(
        4,
        vec![0., 0.5, 0.6, 0.7, 1.],
        vec![4, 1, 1, 2, 4],
    )
    .unwrap()
}

#[test]
fn minimal_sequence_of_order_3() {
    let sequence = IncreasingOpenKnotSequenceClosedCurve::<f64>::try_from_configuration(
        KnotSequenceConfiguration::Minimal {
            max_multiplicity_order: 3,
        },
    )
    .unwrap();
    assert_eq!(
        sequence.knots().to_vec(),
        vec![-2., -1., 0., 1., 2., 3., 4.]
    );
    assert_eq!(sequence.periodic_knots(), vec![0., 1., 2.]);
    assert_eq!(sequence.free_knots(), vec![1.]);
    assert_eq!(sequence.index_knot_origin().get(), 2);
    assert_eq!(sequence.u_max(), 2.);
}

#[test]
fn bezier_like_sequence() {
    let sequence = StrictlyIncreasingOpenKnotSequenceClosedCurve::try_from_configuration(
        KnotSequenceConfiguration::AllKnots {
            max_multiplicity_order: 4,
            knots: vec![0., 0., 0., 0., 1., 1., 1., 1.],
            multiplicities: None,
        },
    )
    .unwrap();
    assert_eq!(sequence.distinct_abscissae(), vec![0., 1.]);
    assert_eq!(sequence.multiplicities(), vec![4, 4]);
    assert_eq!(sequence.index_knot_origin().get(), 0);
    assert_eq!(sequence.u_max(), 1.);
}

#[test]
fn clamped_sequence_with_interior_knots() {
    let sequence = IncreasingOpenKnotSequenceClosedCurve::try_new(
        4,
        vec![0., 0., 0., 0., 0.5, 0.6, 0.7, 0.7, 1., 1., 1., 1.],
    )
    .unwrap();
    assert_eq!(sequence.distinct_abscissae(), vec![0., 0.5, 0.6, 0.7, 1.]);
    assert_eq!(sequence.multiplicities(), vec![4, 1, 1, 2, 4]);
    assert!(!sequence.is_knot_spacing_uniform());
    assert!(!sequence.is_knot_multiplicity_uniform());
    assert_eq!(sequence.to_strictly_increasing(), clamped());
}

#[test]
fn order_reduction_of_a_uniform_sequence() {
    let knots: Vec<f64> = (-3..=10).map(|i| i as f64).collect();
    let sequence = IncreasingOpenKnotSequenceClosedCurve::try_new(4, knots).unwrap();
    assert_eq!(sequence.u_max(), 7.);
    let reduced = sequence.decrement_max_multiplicity_order().unwrap();
    assert_eq!(reduced.max_multiplicity_order(), 3);
    let expected: Vec<f64> = (-2..=9).map(|i| i as f64).collect();
    assert_eq!(reduced.knots().to_vec(), expected);
    assert_eq!(reduced.u_max(), 7.);
}

#[test]
fn knot_insertion_in_a_clamped_sequence() {
    let inserted = clamped().insert_knot(0.3, 3).unwrap();
    assert_eq!(
        inserted.distinct_abscissae(),
        vec![0., 0.3, 0.5, 0.6, 0.7, 1.]
    );
    assert_eq!(inserted.multiplicities(), vec![4, 3, 1, 1, 2, 4]);

    let increasing = IncreasingOpenKnotSequenceClosedCurve::from(&clamped());
    let inserted = increasing.insert_knot(0.3, 3).unwrap();
    assert_eq!(inserted.length(), 15);
    assert_eq!(inserted.knot_multiplicity_at_abscissa(0.3), 3);
}

#[test]
fn construction_errors() {
    assert!(matches!(
        StrictlyIncreasingOpenKnotSequenceClosedCurve::<f64>::try_minimal(0),
        Err(KnotSequenceError::MultiplicityOrder { .. })
    ));
    assert_eq!(
        IncreasingOpenKnotSequenceClosedCurve::<f64>::try_new(3, vec![]),
        Err(KnotSequenceError::EmptySequence)
    );
    assert_eq!(
        StrictlyIncreasingOpenKnotSequenceClosedCurve::try_new(3, vec![0., 1.], vec![3]),
        Err(KnotSequenceError::LengthMismatch {
            abscissae: 2,
            multiplicities: 1
        })
    );
    assert!(matches!(
        IncreasingOpenKnotSequenceClosedCurve::try_new(2, vec![0.5, 0.5, 1., 1.]),
        Err(KnotSequenceError::Origin { .. })
    ));
    assert_eq!(
        StrictlyIncreasingOpenKnotSequenceClosedCurve::try_new(3, vec![0., 0.5, 1.], vec![2, 1, 3]),
        Err(KnotSequenceError::BoundaryMultiplicityMismatch {
            origin: 2,
            upper_bound: 3
        })
    );
    assert_eq!(
        StrictlyIncreasingOpenKnotSequenceClosedCurve::try_new(3, vec![0., 1.], vec![1, 1]),
        Err(KnotSequenceError::InsufficientBasisSize {
            cumulative: 2,
            order: 3
        })
    );
    let last_knot = KnotSequenceError::LastKnotMultiplicity {
        cumulative: 4,
        order: 3,
    };
    assert_eq!(
        StrictlyIncreasingOpenKnotSequenceClosedCurve::try_new(
            3,
            vec![-1., 0., 1., 2., 3.],
            vec![1, 2, 2, 2, 2],
        ),
        Err(last_knot.clone())
    );
    assert_eq!(
        IncreasingOpenKnotSequenceClosedCurve::try_new(
            3,
            vec![-1., 0., 0., 1., 1., 2., 2., 3., 3.],
        ),
        Err(last_knot)
    );
}

#[test]
fn single_precision_periodic_knots() {
    let configuration = KnotSequenceConfiguration::PeriodicKnots {
        max_multiplicity_order: 4,
        periodic_knots: vec![0_f32, 0.1, 0.35, 0.7, 1.3],
        multiplicities: None,
    };
    let strictly = StrictlyIncreasingOpenKnotSequenceClosedCurve::try_from_configuration(
        configuration.clone(),
    )
    .unwrap();
    let expected = [-1.2_f32, -0.95, -0.6, 0., 0.1, 0.35, 0.7, 1.3, 1.4, 1.65, 2.];
    assert_eq!(strictly.length(), expected.len());
    for (a, b) in strictly.abscissae().iter().zip(expected.iter()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-5);
    }
    assert_eq!(strictly.multiplicities(), vec![1; 11]);
    assert_eq!(strictly.index_knot_origin().get(), 3);
    assert_relative_eq!(strictly.u_max(), 1.3, epsilon = 1e-6);

    let increasing =
        IncreasingOpenKnotSequenceClosedCurve::try_from_configuration(configuration).unwrap();
    assert_eq!(
        StrictlyIncreasingOpenKnotSequenceClosedCurve::from(&increasing),
        strictly
    );
}

#[test]
fn uniform_sequence_properties() {
    let sequence = StrictlyIncreasingOpenKnotSequenceClosedCurve::<f64>::try_uniform(4, 5).unwrap();
    assert!(sequence.is_knot_spacing_uniform());
    assert!(sequence.is_knot_multiplicity_uniform());
    assert!(!sequence.is_knot_multiplicity_non_uniform());
    assert!(!sequence.is_sequence_up_to_c0_discontinuity());
    assert_eq!(sequence.length(), 12);
    assert_eq!(sequence.index_knot_origin().get(), 3);
    assert_eq!(sequence.index_upper_bound().get(), 8);
    assert_eq!(sequence.free_knots(), vec![1., 2., 3., 4.]);
    let knots: Vec<Knot<f64>> = sequence.iter().collect();
    assert_eq!(knots[0], Knot::new(-3., 1));
    assert_eq!((&sequence).into_iter().count(), 12);
}

#[test]
fn reversal_of_a_non_uniform_sequence() {
    let sequence = StrictlyIncreasingOpenKnotSequenceClosedCurve::try_from_configuration(
        KnotSequenceConfiguration::PeriodicKnots {
            max_multiplicity_order: 3,
            periodic_knots: vec![0., 0.1, 0.5, 0.5, 1.],
            multiplicities: None,
        },
    )
    .unwrap();
    assert_eq!(
        sequence.distinct_abscissae(),
        vec![-0.5, 0., 0.1, 0.5, 1., 1.1, 1.5]
    );
    assert_eq!(sequence.multiplicities(), vec![2, 1, 1, 2, 1, 1, 1]);
    let reverted = sequence.revert_knot_sequence();
    assert_eq!(reverted.multiplicities(), vec![1, 1, 1, 2, 1, 1, 2]);
    assert_eq!(reverted.index_knot_origin().get(), 2);
    assert_relative_eq!(reverted.abscissae()[3], 0.5);
    assert_relative_eq!(reverted.abscissae()[4], 0.9);
    let twice = reverted.revert_knot_sequence();
    assert_eq!(twice.multiplicities(), sequence.multiplicities());
    twice
        .abscissae()
        .iter()
        .zip(sequence.abscissae())
        .for_each(|(a, b)| assert_relative_eq!(*a, *b, epsilon = 1e-10));
}

#[test]
fn extraction_records() {
    let sequence = IncreasingOpenKnotSequenceClosedCurve::<f64>::try_uniform(3, 3).unwrap();
    let open = sequence.open_parameters();
    assert_eq!(open.max_multiplicity_order, 3);
    assert_eq!(open.index_left_normalized_basis, 2);
    assert_eq!(open.index_right_normalized_basis, 5);
    assert_eq!(open.knots[2], 0.);
    assert_eq!(open.knots[5], 3.);

    let periodic = sequence.periodic_parameters();
    assert_eq!(periodic.periodic_knots, vec![0., 1., 2., 3.]);
    assert_eq!(periodic.multiplicities, vec![1, 1, 1, 1]);
    assert_eq!(periodic.free_knots, vec![1., 2.]);
}

#[test]
fn periodic_sequences_round_trip() {
    let increasing =
        IncreasingPeriodicKnotSequence::try_new(4, vec![0., 0.2, 0.5, 0.5, 0.5, 1.]).unwrap();
    let strictly = increasing.to_strictly_increasing();
    assert_eq!(strictly.distinct_abscissae(), vec![0., 0.2, 0.5, 1.]);
    assert_eq!(strictly.multiplicities(), vec![1, 1, 3, 1]);
    assert_eq!(
        IncreasingPeriodicKnotSequence::from(strictly.clone()),
        increasing
    );

    let open = IncreasingOpenKnotSequenceClosedCurve::try_from(&increasing).unwrap();
    assert_eq!(open.distinct_abscissae().len(), 7);
    assert_eq!(open.multiplicities(), vec![3, 1, 1, 3, 1, 1, 2]);
    assert_eq!(open.to_periodic_knot_sequence(), increasing);
}
