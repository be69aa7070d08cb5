use super::*;

#[test]
fn test_from_vec_valid() {
    let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).expect("matrix");
    assert_eq!(m.shape(), (2, 2));
    assert_eq!(m.n_rows(), 2);
    assert_eq!(m.n_cols(), 2);
}

#[test]
fn test_from_vec_wrong_length() {
    let result = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]);
    assert!(result.is_err());
}

#[test]
fn test_get_set() {
    let mut m = Matrix::zeros(2, 3);
    m.set(1, 2, 7.5);
    assert!((m.get(1, 2) - 7.5).abs() < 1e-6);
    assert_eq!(m.get(0, 0), 0.0);
}

#[test]
fn test_row() {
    let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("matrix");
    let row = m.row(1);
    assert_eq!(row.as_slice(), &[4.0, 5.0, 6.0]);
}

#[test]
fn test_column() {
    let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("matrix");
    let col = m.column(2);
    assert_eq!(col.as_slice(), &[3.0, 6.0]);
}

#[test]
fn test_zeros() {
    let m = Matrix::zeros(3, 4);
    assert_eq!(m.shape(), (3, 4));
    assert!(m.as_slice().iter().all(|&x| x == 0.0));
}

#[test]
fn test_max() {
    let m = Matrix::from_vec(2, 2, vec![1.0, 5.0, 3.0, 2.0]).expect("matrix");
    assert!((m.max() - 5.0).abs() < 1e-6);
}

#[test]
fn test_max_empty_is_zero() {
    let m = Matrix::zeros(0, 0);
    assert_eq!(m.max(), 0.0);
}
