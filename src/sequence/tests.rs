use approx::assert_relative_eq;

use crate::{
    error::KnotSequenceError,
    knot::{KnotIndexIncreasing, KnotIndexStrictlyIncreasing, KnotVector},
};

use super::*;

/// Periods covering simple, multiple and clamped seams for orders 1 to 5
fn periods() -> Vec<(usize, Vec<f64>, Vec<usize>)> {
    vec![
        (1, vec![0., 1.], vec![1, 1]),
        (2, vec![0., 0.5, 1.], vec![1, 1, 1]),
        (2, vec![0., 0.3, 1.], vec![2, 1, 2]),
        (3, vec![0., 1., 2.], vec![1, 1, 1]),
        (3, vec![0., 0.25, 0.5, 1.], vec![1, 2, 1, 1]),
        (3, vec![0., 0.4, 1.], vec![3, 2, 3]),
        (3, vec![0., 0.2, 0.7, 1.], vec![2, 1, 1, 2]),
        (4, vec![0., 0.2, 0.5, 1.], vec![1, 1, 3, 1]),
        (4, vec![0., 0.5, 0.6, 0.7, 1.], vec![4, 1, 1, 2, 4]),
        (4, (0..8).map(|i| i as f64).collect(), vec![1; 8]),
        (5, vec![0., 0.1, 0.3, 0.6, 1.], vec![2, 4, 1, 3, 2]),
    ]
}

fn open_sequences() -> Vec<StrictlyIncreasingOpenKnotSequenceClosedCurve<f64>> {
    periods()
        .into_iter()
        .map(|(order, abscissae, multiplicities)| {
            let periodic =
                StrictlyIncreasingPeriodicKnotSequence::try_new(order, abscissae, multiplicities)
                    .unwrap();
            StrictlyIncreasingOpenKnotSequenceClosedCurve::try_from_periodic(&periodic, false)
                .unwrap()
        })
        .collect()
}

fn uniform() -> StrictlyIncreasingOpenKnotSequenceClosedCurve<f64> {
    StrictlyIncreasingOpenKnotSequenceClosedCurve::try_uniform(3, 4).unwrap()
}

#[test]
fn both_closure_walks_accept_expanded_periods() {
    for strictly in open_sequences() {
        let flat =
            KnotVector::from_multiplicities(strictly.abscissae(), &strictly.multiplicities());
        let increasing = IncreasingOpenKnotSequenceClosedCurve::try_new(
            strictly.max_multiplicity_order(),
            flat.to_vec(),
        )
        .unwrap();
        assert_eq!(
            increasing,
            IncreasingOpenKnotSequenceClosedCurve::from(&strictly)
        );
        assert_eq!(
            StrictlyIncreasingOpenKnotSequenceClosedCurve::from(&increasing),
            strictly
        );
    }
}

#[test]
fn both_closure_walks_reject_the_same_corruptions() {
    for strictly in open_sequences() {
        let order = strictly.max_multiplicity_order();
        let origin = strictly.index_knot_origin().get();
        let upper_bound = strictly.index_upper_bound().get();
        let last = strictly.length() - 1;

        if origin > 0 {
            let mut abscissae = strictly.distinct_abscissae();
            abscissae[0] -= 0.05;
            let corrupted = StrictlyIncreasingOpenKnotSequenceClosedCurve::try_new(
                order,
                abscissae.clone(),
                strictly.multiplicities(),
            );
            assert_eq!(corrupted, Err(KnotSequenceError::LeftClosure { index: 0 }));
            let flat = KnotVector::from_multiplicities(&abscissae, &strictly.multiplicities());
            assert!(matches!(
                IncreasingOpenKnotSequenceClosedCurve::try_new(order, flat.to_vec()),
                Err(KnotSequenceError::LeftClosure { .. })
            ));
        }

        if upper_bound < last {
            let mut abscissae = strictly.distinct_abscissae();
            abscissae[last] += 0.05;
            let corrupted = StrictlyIncreasingOpenKnotSequenceClosedCurve::try_new(
                order,
                abscissae.clone(),
                strictly.multiplicities(),
            );
            assert_eq!(
                corrupted,
                Err(KnotSequenceError::RightClosure { index: last })
            );
            let flat = KnotVector::from_multiplicities(&abscissae, &strictly.multiplicities());
            assert!(matches!(
                IncreasingOpenKnotSequenceClosedCurve::try_new(order, flat.to_vec()),
                Err(KnotSequenceError::RightClosure { .. })
            ));
        }
    }
}

#[test]
fn periodic_projection_round_trip() {
    for ((order, abscissae, multiplicities), strictly) in
        periods().into_iter().zip(open_sequences())
    {
        let periodic = strictly.to_periodic_knot_sequence();
        assert_eq!(periodic.max_multiplicity_order(), order);
        assert_eq!(periodic.abscissae(), abscissae.as_slice());
        assert_eq!(periodic.multiplicities(), multiplicities);
        assert_eq!(strictly.periodic_knots(), abscissae);
    }
}

#[test]
fn reversal_involution() {
    for strictly in open_sequences() {
        let reverted = strictly.revert_knot_sequence();
        assert!(StrictlyIncreasingOpenKnotSequenceClosedCurve::try_new(
            reverted.max_multiplicity_order(),
            reverted.distinct_abscissae(),
            reverted.multiplicities(),
        )
        .is_ok());
        let twice = reverted.revert_knot_sequence();
        assert_eq!(twice.multiplicities(), strictly.multiplicities());
        assert_eq!(twice.index_knot_origin(), strictly.index_knot_origin());
        twice
            .abscissae()
            .iter()
            .zip(strictly.abscissae())
            .for_each(|(a, b)| assert_relative_eq!(*a, *b, epsilon = 1e-10));

        let increasing = IncreasingOpenKnotSequenceClosedCurve::from(&strictly);
        let twice = increasing.revert_knot_sequence().revert_knot_sequence();
        assert_eq!(twice.index_knot_origin(), increasing.index_knot_origin());
        twice
            .knots()
            .iter()
            .zip(increasing.knots().iter())
            .for_each(|(a, b)| assert_relative_eq!(*a, *b, epsilon = 1e-10));
    }
}

#[test]
fn find_span_agrees_across_index_spaces() {
    for strictly in open_sequences() {
        let increasing = IncreasingOpenKnotSequenceClosedCurve::from(&strictly);
        let multiplicities = strictly.multiplicities();
        let steps = 40;
        for i in 0..=steps {
            let u = strictly.u_max() * i as f64 / steps as f64;
            let span = strictly.find_span(u).unwrap().get();
            let last_repetition =
                to_increasing_index(&multiplicities, span).unwrap() + multiplicities[span] - 1;
            assert_eq!(increasing.find_span(u).unwrap().get(), last_repetition);
        }
    }
}

#[test]
fn find_span_on_distinct_abscissae() {
    for strictly in open_sequences() {
        let increasing = IncreasingOpenKnotSequenceClosedCurve::from(&strictly);
        let multiplicities = strictly.multiplicities();
        let origin = strictly.index_knot_origin().get();
        let upper_bound = strictly.index_upper_bound().get();
        for j in origin..upper_bound {
            let cumulative: usize = multiplicities[..=j].iter().sum();
            let a = strictly.abscissae()[j];
            assert_eq!(increasing.find_span(a).unwrap().get(), cumulative - 1);
            let midpoint = (a + strictly.abscissae()[j + 1]) / 2.;
            assert_eq!(strictly.find_span(midpoint).unwrap().get(), j);
        }
        assert!(matches!(
            strictly.find_span(-0.01),
            Err(KnotSequenceError::OutOfRange { .. })
        ));
        assert!(matches!(
            increasing.find_span(strictly.u_max() + 0.01),
            Err(KnotSequenceError::OutOfRange { .. })
        ));
    }
}

#[test]
fn checked_raise_of_a_mirrored_knot() {
    // the knot at -1 mirrors the knot at 3
    let raised = uniform()
        .raise_knot_multiplicity(&[KnotIndexStrictlyIncreasing::new(1)], 1, true)
        .unwrap();
    assert_eq!(
        raised.distinct_abscissae(),
        vec![-1., 0., 1., 2., 3., 4., 5., 6.]
    );
    assert_eq!(raised.multiplicities(), vec![2, 1, 1, 1, 2, 1, 1, 1]);
    assert_eq!(raised.index_knot_origin().get(), 1);
}

#[test]
fn checked_raise_of_the_seam() {
    let raised = uniform()
        .raise_knot_multiplicity(&[KnotIndexStrictlyIncreasing::new(2)], 1, true)
        .unwrap();
    assert_eq!(
        raised.distinct_abscissae(),
        vec![-1., 0., 1., 2., 3., 4., 5.]
    );
    assert_eq!(raised.multiplicities(), vec![1, 2, 1, 1, 1, 2, 1]);
}

#[test]
fn checked_raise_errors() {
    let sequence = uniform();
    assert_eq!(
        sequence.raise_knot_multiplicity(&[KnotIndexStrictlyIncreasing::new(3)], 2, true),
        Err(KnotSequenceError::IntermediateMultiplicity {
            index: 3,
            multiplicity: 3,
            maximum: 2
        })
    );
    assert_eq!(
        sequence.raise_knot_multiplicity(&[KnotIndexStrictlyIncreasing::new(3)], 3, true),
        Err(KnotSequenceError::AtKnotMultiplicity {
            index: 3,
            multiplicity: 4,
            order: 3
        })
    );
    assert!(matches!(
        sequence.raise_knot_multiplicity(&[KnotIndexStrictlyIncreasing::new(9)], 1, true),
        Err(KnotSequenceError::IndexRange { .. })
    ));

    let clamped = StrictlyIncreasingOpenKnotSequenceClosedCurve::try_new(
        4,
        vec![0., 0.5, 0.6, 0.7, 1.],
        vec![4, 1, 1, 2, 4],
    )
    .unwrap();
    assert_eq!(
        clamped.raise_knot_multiplicity(&[KnotIndexStrictlyIncreasing::new(0)], 1, true),
        Err(KnotSequenceError::NormalizedBasisModification { index: 0 })
    );
}

#[test]
fn unchecked_raise_then_update() {
    let sequence = uniform();
    let raised = sequence
        .raise_knot_multiplicity(&[KnotIndexStrictlyIncreasing::new(3)], 1, false)
        .unwrap();
    // the tails still mirror the former period
    assert_eq!(raised.multiplicities(), vec![1, 1, 1, 2, 1, 1, 1, 1, 1]);
    let updated = raised
        .update_knot_sequence_through_normalized_basis_analysis()
        .unwrap();
    assert_eq!(
        updated.distinct_abscissae(),
        vec![-2., -1., 0., 1., 2., 3., 4., 5.]
    );
    assert_eq!(updated.multiplicities(), vec![1, 1, 1, 2, 1, 1, 1, 2]);
}

#[test]
fn unchecked_raise_of_one_seam_end_then_update() {
    let sequence = StrictlyIncreasingOpenKnotSequenceClosedCurve::<f64>::try_uniform(4, 5).unwrap();
    let origin = sequence.index_knot_origin();
    let upper_bound = sequence.index_upper_bound();
    let checked = sequence
        .raise_knot_multiplicity(&[origin], 1, true)
        .unwrap();
    assert_eq!(checked.multiplicities(), vec![1, 1, 2, 1, 1, 1, 1, 2, 1, 1]);

    for end in [origin, upper_bound] {
        let raised = sequence.raise_knot_multiplicity(&[end], 1, false).unwrap();
        let updated = raised
            .update_knot_sequence_through_normalized_basis_analysis()
            .unwrap();
        assert_eq!(updated, checked);
        assert_eq!(updated.index_knot_origin().get(), 2);
    }
}

#[test]
fn unchecked_raise_beyond_the_order_is_caught_on_update() {
    let raised = uniform()
        .raise_knot_multiplicity(&[KnotIndexStrictlyIncreasing::new(3)], 3, false)
        .unwrap();
    assert!(matches!(
        raised.update_knot_sequence_through_normalized_basis_analysis(),
        Err(KnotSequenceError::MultiplicityOrder { .. })
    ));
}

#[test]
fn checked_decrement_rebuilds_the_tails() {
    let decremented = uniform()
        .decrement_knot_multiplicity(&[KnotIndexStrictlyIncreasing::new(3)], true)
        .unwrap();
    assert_eq!(
        decremented.distinct_abscissae(),
        vec![-2., -1., 0., 2., 3., 4., 6., 7.]
    );
    assert_eq!(decremented.u_max(), 4.);
    assert!(!decremented.is_knot_spacing_uniform());
}

#[test]
fn decrement_of_a_bound() {
    let sequence = uniform();
    assert_eq!(
        sequence.decrement_knot_multiplicity(&[KnotIndexStrictlyIncreasing::new(2)], true),
        Err(KnotSequenceError::NormalizedBasisModification { index: 2 })
    );
    assert_eq!(
        sequence.decrement_knot_multiplicity(&[KnotIndexStrictlyIncreasing::new(6)], false),
        Err(KnotSequenceError::NormalizedBasisModification { index: 6 })
    );
}

#[test]
fn unchecked_decrement_shifts_the_origin() {
    let sequence = uniform();
    let decremented = sequence
        .decrement_knot_multiplicity(&[KnotIndexStrictlyIncreasing::new(0)], false)
        .unwrap();
    assert_eq!(decremented.index_knot_origin().get(), 1);
    assert_eq!(decremented.length(), 8);
    let updated = decremented
        .update_knot_sequence_through_normalized_basis_analysis()
        .unwrap();
    assert_eq!(updated, sequence);
}

#[test]
fn insertion_errors() {
    let sequence = uniform();
    assert!(matches!(
        sequence.insert_knot(1., 1),
        Err(KnotSequenceError::TooCloseToExistingKnot { .. })
    ));
    assert!(matches!(
        sequence.insert_knot(5., 1),
        Err(KnotSequenceError::TooCloseToExistingKnot { .. })
    ));
    assert!(matches!(
        sequence.insert_knot(4.5, 1),
        Err(KnotSequenceError::OverUpperBound { .. })
    ));
    assert!(matches!(
        sequence.insert_knot(-0.5, 1),
        Err(KnotSequenceError::UnderOrigin { .. })
    ));
    assert!(matches!(
        sequence.insert_knot(0.5, 4),
        Err(KnotSequenceError::MultiplicityOrder { .. })
    ));
    assert_eq!(
        sequence.insert_knot(0.5, 3),
        Err(KnotSequenceError::IntermediateMultiplicity {
            index: 3,
            multiplicity: 3,
            maximum: 2
        })
    );
    assert!(matches!(
        sequence.insert_knots(&[0.5, 0.5], 1),
        Err(KnotSequenceError::TooCloseToExistingKnot { .. })
    ));
}

#[test]
fn insertion_updates_both_tails() {
    let inserted = uniform().insert_knots(&[0.5, 3.5], 1).unwrap();
    assert_eq!(
        inserted.periodic_knots(),
        vec![0., 0.5, 1., 2., 3., 3.5, 4.]
    );
    assert_eq!(inserted.distinct_abscissae()[..2], [-1., -0.5]);
    assert_relative_eq!(inserted.distinct_abscissae()[9], 4.5);
}

#[test]
fn order_reduction() {
    let sequence = uniform();
    let reduced = sequence.decrement_max_multiplicity_order().unwrap();
    assert_eq!(reduced.max_multiplicity_order(), 2);
    assert_eq!(
        reduced.distinct_abscissae(),
        vec![-1., 0., 1., 2., 3., 4., 5.]
    );

    let order_one = reduced.decrement_max_multiplicity_order().unwrap();
    assert_eq!(order_one.max_multiplicity_order(), 1);
    assert_eq!(order_one.distinct_abscissae(), vec![0., 1., 2., 3., 4.]);
    assert_eq!(order_one.index_knot_origin().get(), 0);
    assert!(matches!(
        order_one.decrement_max_multiplicity_order(),
        Err(KnotSequenceError::MultiplicityOrder { .. })
    ));
}

#[test]
fn order_reduction_of_multiple_knots() {
    let sequence = StrictlyIncreasingOpenKnotSequenceClosedCurve::try_new(
        4,
        vec![0., 0.5, 0.6, 0.7, 1.],
        vec![4, 1, 1, 2, 4],
    )
    .unwrap();
    let reduced = sequence.decrement_max_multiplicity_order().unwrap();
    assert_eq!(reduced.multiplicities(), vec![3, 1, 1, 1, 3]);

    let c0 = StrictlyIncreasingOpenKnotSequenceClosedCurve::try_from_configuration(
        KnotSequenceConfiguration::AllKnotsUpToC0Discontinuity {
            max_multiplicity_order: 3,
            knots: vec![0., 0.5, 1.],
            multiplicities: Some(vec![3, 3, 3]),
        },
    )
    .unwrap();
    let reduced = c0.decrement_max_multiplicity_order().unwrap();
    assert_eq!(reduced.multiplicities(), vec![2, 2, 2]);
    assert!(reduced.is_sequence_up_to_c0_discontinuity());
}

#[test]
fn intermediate_full_multiplicity_needs_c0_configuration() {
    let configuration = |up_to_c0| {
        let knots = vec![0., 0.5, 1.];
        let multiplicities = Some(vec![3, 3, 3]);
        if up_to_c0 {
            KnotSequenceConfiguration::AllKnotsUpToC0Discontinuity {
                max_multiplicity_order: 3,
                knots,
                multiplicities,
            }
        } else {
            KnotSequenceConfiguration::AllKnots {
                max_multiplicity_order: 3,
                knots,
                multiplicities,
            }
        }
    };
    assert_eq!(
        StrictlyIncreasingOpenKnotSequenceClosedCurve::try_from_configuration(configuration(false)),
        Err(KnotSequenceError::IntermediateMultiplicity {
            index: 1,
            multiplicity: 3,
            maximum: 2
        })
    );
    assert!(
        IncreasingOpenKnotSequenceClosedCurve::try_from_configuration(configuration(true)).is_ok()
    );
}

#[test]
fn increasing_form_mutators_use_flat_indices() {
    let increasing = IncreasingOpenKnotSequenceClosedCurve::from(&uniform());
    let raised = increasing
        .raise_knot_multiplicity(&[KnotIndexIncreasing::new(3)], 1, true)
        .unwrap();
    assert_eq!(
        raised.knots().to_vec(),
        vec![-2., -1., 0., 1., 1., 2., 3., 4., 5., 5.]
    );
    // both repetitions designate the same knot
    let decremented = raised
        .decrement_knot_multiplicity(
            &[KnotIndexIncreasing::new(3), KnotIndexIncreasing::new(4)],
            true,
        )
        .unwrap();
    assert_eq!(decremented, increasing);
}
