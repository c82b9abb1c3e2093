// Tests for the dense matrix engine: construction, products, reductions,
// activations and batch assembly.

use approx::assert_relative_eq;
use rand::{rngs::StdRng, SeedableRng};
use twolayer_nn::{Matrix, MatrixError};

fn m(rows: usize, cols: usize, values: &[f64]) -> Matrix {
    Matrix::from_vec(rows, cols, values.to_vec()).unwrap()
}

#[test]
fn make_reshapes_to_zeros() {
    let mut a = m(1, 2, &[3.0, 4.0]);
    a.make(2, 3);
    assert_eq!(a.shape(), (2, 3));
    assert_eq!(a.as_slice(), &[0.0; 6]);
}

#[test]
fn make_from_populates_row_major() {
    let mut a = Matrix::new();
    a.make_from(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(a.at(0, 1), 2.0);
    assert_eq!(a.at(1, 0), 3.0);
}

#[test]
fn make_from_rejects_wrong_length() {
    let mut a = Matrix::new();
    let err = a.make_from(2, 2, &[1.0, 2.0, 3.0]).unwrap_err();
    assert_eq!(err, MatrixError::LengthMismatch { rows: 2, cols: 2, len: 3 });
    assert_eq!(a.shape(), (0, 0));
}

#[test]
fn clone_is_independent() {
    let a = m(1, 2, &[1.0, 2.0]);
    let mut b = a.clone();
    *b.at_mut(0, 0) = 9.0;
    assert_eq!(a.at(0, 0), 1.0);
    assert_eq!(b.at(0, 0), 9.0);
}

#[test]
fn transpose_of_2x3() {
    let a = m(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let t = a.transpose();
    assert_eq!(t.shape(), (3, 2));
    assert_eq!(t.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
}

#[test]
fn transpose_twice_is_identity() {
    let mut rng = StdRng::seed_from_u64(7);
    for &(r, c) in &[(1, 1), (1, 5), (4, 3), (6, 2)] {
        let a = Matrix::random_normal(r, c, 1.0, &mut rng);
        assert_eq!(a.transpose().transpose(), a);
    }
}

#[test]
fn dot_row_vector_selects_first_row() {
    let a = m(1, 2, &[1.0, 0.0]);
    let b = m(2, 2, &[5.0, 6.0, 7.0, 8.0]);
    let c = a.dot(&b).unwrap();
    assert_eq!(c.shape(), (1, 2));
    assert_eq!(c.as_slice(), &[5.0, 6.0]);
}

#[test]
fn dot_transpose_identity() {
    let mut rng = StdRng::seed_from_u64(11);
    let a = Matrix::random_normal(3, 4, 1.0, &mut rng);
    let b = Matrix::random_normal(4, 2, 1.0, &mut rng);
    let left = a.dot(&b).unwrap().transpose();
    let right = b.transpose().dot(&a.transpose()).unwrap();
    assert_eq!(left.shape(), right.shape());
    for (x, y) in left.as_slice().iter().zip(right.as_slice()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-12);
    }
}

#[test]
fn dot_rejects_incompatible_shapes() {
    let a = m(2, 3, &[0.0; 6]);
    let b = m(2, 3, &[0.0; 6]);
    assert_eq!(
        a.dot(&b).unwrap_err(),
        MatrixError::IncompatibleDot { left: (2, 3), right: (2, 3) }
    );
}

#[test]
fn elementwise_ops_require_matching_shapes() {
    let a = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let b = m(2, 2, &[4.0, 3.0, 2.0, 1.0]);
    assert_eq!(a.add(&b).unwrap().as_slice(), &[5.0; 4]);
    assert_eq!(a.sub(&b).unwrap().as_slice(), &[-3.0, -1.0, 1.0, 3.0]);
    assert_eq!(a.mul(&b).unwrap().as_slice(), &[4.0, 6.0, 6.0, 4.0]);

    let row = m(1, 2, &[1.0, 1.0]);
    assert!(matches!(a.add(&row), Err(MatrixError::ShapeMismatch { op: "add", .. })));
    assert!(matches!(a.sub(&row), Err(MatrixError::ShapeMismatch { op: "sub", .. })));
    assert!(matches!(a.mul(&row), Err(MatrixError::ShapeMismatch { op: "mul", .. })));
}

#[test]
fn scalar_ops() {
    let a = m(1, 3, &[1.0, -2.0, 0.0]);
    assert_eq!(a.scale(2.0).as_slice(), &[2.0, -4.0, 0.0]);
    assert_eq!(a.div(2.0).as_slice(), &[0.5, -1.0, 0.0]);

    let d = a.div(0.0);
    assert_eq!(d.at(0, 0), f64::INFINITY);
    assert_eq!(d.at(0, 1), f64::NEG_INFINITY);
    assert!(d.at(0, 2).is_nan());
}

#[test]
fn broadcast_adds_bias_to_every_row() {
    let a = m(3, 2, &[0.0, 0.0, 1.0, 1.0, 2.0, 2.0]);
    let bias = m(1, 2, &[10.0, 20.0]);
    let out = a.add_row_broadcast(&bias).unwrap();
    assert_eq!(out.as_slice(), &[10.0, 20.0, 11.0, 21.0, 12.0, 22.0]);

    let wrong = m(1, 3, &[0.0; 3]);
    assert!(a.add_row_broadcast(&wrong).is_err());
    assert!(a.add_row_broadcast(&a).is_err());
}

#[test]
fn sum_is_column_wise() {
    let a = m(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let s = a.sum();
    assert_eq!(s.shape(), (1, 2));
    assert_eq!(s.as_slice(), &[9.0, 12.0]);
}

#[test]
fn sigmoid_values() {
    let a = m(1, 3, &[0.0, 2.0, -2.0]).sigmoid();
    assert_relative_eq!(a.at(0, 0), 0.5, epsilon = 1e-12);
    assert_relative_eq!(a.at(0, 1), 0.880797, epsilon = 1e-6);
    assert_relative_eq!(a.at(0, 2), 0.1192029, epsilon = 1e-6);
}

#[test]
fn sigmoid_grad_matches_sigmoid_product() {
    let xs: Vec<f64> = (-20..=20).map(|i| i as f64 * 0.37).collect();
    let a = m(1, xs.len(), &xs);
    let s = a.sigmoid();
    let g = a.sigmoid_grad();
    for i in 0..xs.len() {
        let expected = s.at(0, i) * (1.0 - s.at(0, i));
        assert_relative_eq!(g.at(0, i), expected, epsilon = 1e-12);
        assert!(g.at(0, i) <= 0.25);
    }
    assert_relative_eq!(m(1, 1, &[0.0]).sigmoid_grad().at(0, 0), 0.25, epsilon = 1e-12);
}

#[test]
fn softmax_rows_sum_to_one() {
    let a = m(2, 3, &[1.0, 2.0, 3.0, -5.0, 0.0, 1000.0]);
    let s = a.softmax();
    for r in 0..2 {
        let total: f64 = s.row(r).iter().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }
    assert_relative_eq!(s.at(1, 2), 1.0, epsilon = 1e-12);
}

#[test]
fn softmax_is_shift_invariant() {
    let a = m(1, 4, &[0.5, -1.0, 2.0, 0.0]);
    let shifted = a.map(|v| v + 123.0);
    let s1 = a.softmax();
    let s2 = shifted.softmax();
    for (x, y) in s1.as_slice().iter().zip(s2.as_slice()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-12);
    }
}

#[test]
fn softmax_uses_own_row_max() {
    // An all-negative row next to a large row must still normalize correctly.
    let a = m(2, 2, &[-1000.0, -1001.0, 500.0, 0.0]);
    let s = a.softmax();
    let e = (-1.0f64).exp();
    assert_relative_eq!(s.at(0, 0), 1.0 / (1.0 + e), epsilon = 1e-12);
    assert_relative_eq!(s.at(0, 1), e / (1.0 + e), epsilon = 1e-12);
}

#[test]
fn add_rows_builds_a_batch() {
    let mut batch = Matrix::new();
    batch.add_rows(&m(1, 3, &[1.0, 2.0, 3.0])).unwrap();
    assert_eq!(batch.shape(), (1, 3));
    assert_eq!(batch.as_slice(), &[1.0, 2.0, 3.0]);

    batch.add_rows(&m(1, 3, &[4.0, 5.0, 6.0])).unwrap();
    assert_eq!(batch.shape(), (2, 3));
    assert_eq!(batch.row(1), &[4.0, 5.0, 6.0]);

    assert!(batch.add_rows(&m(1, 2, &[0.0, 0.0])).is_err());
    assert_eq!(batch.shape(), (2, 3));
}

#[test]
fn argmax_ties_go_to_lowest_index() {
    let a = m(2, 4, &[0.1, 0.7, 0.7, 0.2, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(a.argmax_row(0), 1);
    assert_eq!(a.argmax_row(1), 0);
}

#[test]
fn from_rows_checks_widths() {
    let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    assert_eq!(a.shape(), (2, 2));
    assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
}

#[test]
fn error_messages_name_the_problem() {
    let err = m(1, 2, &[0.0; 2]).dot(&m(3, 1, &[0.0; 3])).unwrap_err();
    assert!(err.to_string().contains("incompatible dimensions"));
    let err = m(1, 2, &[0.0; 2]).add(&m(2, 1, &[0.0; 2])).unwrap_err();
    assert!(err.to_string().contains("shape mismatch"));
}

#[test]
fn random_normal_is_seed_reproducible() {
    let a = Matrix::random_normal(4, 4, 0.1, &mut StdRng::seed_from_u64(3));
    let b = Matrix::random_normal(4, 4, 0.1, &mut StdRng::seed_from_u64(3));
    assert_eq!(a, b);
    assert!(a.as_slice().iter().any(|&v| v != 0.0));
}
