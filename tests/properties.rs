mod common;

use common::synthetic_image::{checkerboard, noise, vertical_step};
use pixel_algebra::matrix::{DeterminantMethod, Matrix};
use pixel_algebra::prelude::*;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn dense(rows: usize, cols: usize, seed: usize) -> Matrix<f64> {
    let data = (0..rows * cols)
        .map(|i| ((i * 31 + seed * 17) % 13) as f64 - 6.0)
        .collect();
    Matrix::from_vec(rows, cols, data).unwrap()
}

#[test]
fn product_is_associative_and_identity_is_neutral() {
    let a = dense(3, 4, 1);
    let b = dense(4, 2, 2);
    let c = dense(2, 5, 3);
    let left = a.mul(&b).unwrap().mul(&c).unwrap();
    let right = a.mul(&b.mul(&c).unwrap()).unwrap();
    assert!(left.approx_eq(&right, 1e-9));
    assert_eq!(a.mul(&Matrix::identity(4)).unwrap(), a);
    assert_eq!(a.transpose().transpose(), a);
}

#[test]
fn identity_four_matches_hand_built() {
    let hand = Matrix::from_rows(&[
        vec![1.0, 0.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0],
        vec![0.0, 0.0, 0.0, 1.0],
    ])
    .unwrap();
    assert_eq!(Matrix::<f64>::identity(4), hand);
}

#[test]
fn lu_and_cofactor_inverses_agree() {
    init_logger();
    let mut m = dense(4, 4, 5);
    for i in 0..4 {
        let v = m.get(i, i).unwrap();
        m.set(i, i, v + 20.0).unwrap();
    }
    let lu = m.inverse_with(DeterminantMethod::Lu).unwrap();
    let cof = m.inverse_with(DeterminantMethod::Cofactor).unwrap();
    assert!(lu.approx_eq(&cof, 1e-9));
    assert!(m.inverse().unwrap().mul(&m).unwrap().approx_eq(&Matrix::identity(4), 1e-9));
}

#[test]
fn ramp_scenario_average_and_sobel() {
    let ramp = Channel::from_values(3, 3, (1..=9).collect(), ChannelKind::Gray).unwrap();

    let mut unchanged = ramp.clone();
    unchanged.apply_mask(&mask::average(1).unwrap()).unwrap();
    assert_eq!(unchanged, ramp);

    let mut sobel = ramp.clone();
    sobel.apply_mask(&mask::sobel_horizontal()).unwrap();
    assert_eq!(sobel.get(1, 1).unwrap(), -24);
}

#[test]
fn convolution_is_linear_up_to_truncation() {
    let a = noise(12, 9, 7);
    let b = checkerboard(12, 9, 3);
    let kernel = mask::gaussian(3, 0.8).unwrap();

    let mut sum = a.clone();
    for (dst, &v) in sum.as_mut_slice().iter_mut().zip(b.as_slice()) {
        *dst += v;
    }
    sum.apply_mask(&kernel).unwrap();

    let (mut fa, mut fb) = (a.clone(), b.clone());
    fa.apply_mask(&kernel).unwrap();
    fb.apply_mask(&kernel).unwrap();

    for i in 0..sum.len() {
        let combined = fa.as_slice()[i] + fb.as_slice()[i];
        assert!(
            (sum.as_slice()[i] - combined).abs() <= 1,
            "pixel {i}: {} vs {combined}",
            sum.as_slice()[i]
        );
    }
}

#[test]
fn normalize_is_idempotent() {
    let mut c = noise(10, 10, 3);
    c.apply_mask(&mask::high_boost(3, 2).unwrap()).unwrap();
    c.normalize();
    assert_eq!(c.min_max(), Some((0, 255)));
    let once = c.clone();
    c.normalize();
    assert_eq!(c, once);
}

#[test]
fn otsu_lands_between_modes() {
    init_logger();
    let c = vertical_step(20, 10, 7, 30, 190);
    let t = c.otsu_threshold();
    assert!(t > 30 && t < 190, "t={t}");

    let mut binary = c.clone();
    binary.apply_threshold(0, 255, ThresholdMode::Otsu);
    assert_eq!(binary.get(0, 0).unwrap(), 0);
    assert_eq!(binary.get(19, 9).unwrap(), 255);
}

#[test]
fn checkerboard_gradients_are_axis_aligned() {
    let c = checkerboard(16, 16, 4);
    let hist = c.gradient_histogram().unwrap();
    assert_eq!(hist.total(), 256);
    // Away from corners every response is purely horizontal or vertical.
    let axis = hist.get(0) + hist.get(UNDEFINED);
    assert!(axis as u64 * 2 > hist.total(), "{hist:?}");
}

const UNDEFINED: i32 = pixel_algebra::channel::UNDEFINED_ANGLE;
