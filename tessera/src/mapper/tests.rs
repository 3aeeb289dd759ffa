use std::f64::consts::FRAC_PI_2;

use glam::{DAffine2, DMat2, DVec2};

use super::*;
use crate::raster::Image;

const EPSILON: f64 = 1e-9;

fn assert_close(a: DVec2, b: DVec2) {
    assert!(a.distance(b) < EPSILON, "{a} != {b}");
}

#[test]
fn test_scaling_inverse_divides_by_scale() {
    let mapper = ScalingMapper::new(2.0, 0.5).unwrap();
    assert_close(
        mapper.inverse_transform(DVec2::new(10.0, 3.0)),
        DVec2::new(5.0, 6.0),
    );
}

#[test]
fn test_scaling_destination_bounds_round() {
    let image = Image::new(5, 3, 1, 8).unwrap();
    let mapper = Mapper::Scaling(ScalingMapper::new(1.5, 0.5).unwrap());
    // 7.5 rounds half-up to 8, 1.5 to 2
    assert_eq!(
        mapper.destination_bounds(&image).unwrap(),
        Rect::from_size(8, 2)
    );

    let tiny = Mapper::Scaling(ScalingMapper::uniform(0.01).unwrap());
    assert_eq!(
        tiny.destination_bounds(&image).unwrap(),
        Rect::from_size(1, 1)
    );
}

#[test]
fn test_scaling_rejects_oversized_destination() {
    let image = Image::new(4, 4, 1, 8).unwrap();
    let huge = ScalingMapper::new(1e300, 1.0).unwrap();
    assert!(matches!(
        huge.destination_bounds(&image),
        Err(Error::ScaledLengthTooLarge {
            len: 4,
            limit: MAX_SCALED_LEN,
            ..
        })
    ));

    // exactly at the limit is still accepted
    let edge = ScalingMapper::new((MAX_SCALED_LEN / 4) as f64, 1.0).unwrap();
    assert_eq!(
        edge.destination_bounds(&image).unwrap(),
        Rect::from_size(MAX_SCALED_LEN, 4)
    );
}

#[test]
fn test_scaling_rejects_invalid_factors() {
    assert!(matches!(
        ScalingMapper::new(0.0, 1.0),
        Err(Error::InvalidScale { .. })
    ));
    assert!(ScalingMapper::new(1.0, f64::NAN).is_err());
    assert!(ScalingMapper::new(-2.0, 1.0).is_err());
}

#[test]
fn test_affine_singular_transform_is_rejected() {
    let singular = DAffine2::from_mat2(DMat2::from_cols_array(&[1.0, 2.0, 2.0, 4.0]));
    let err = AffineMapper::new(singular).unwrap_err();
    assert!(matches!(err, Error::SingularTransform { .. }));
}

#[test]
fn test_affine_inverse_undoes_forward() {
    let forward = DAffine2::from_scale_angle_translation(
        DVec2::new(2.0, 0.5),
        0.3,
        DVec2::new(-4.0, 7.0),
    );
    let mapper = AffineMapper::new(forward).unwrap();
    for p in [
        DVec2::ZERO,
        DVec2::new(3.0, -1.0),
        DVec2::new(100.5, 42.25),
    ] {
        assert_close(mapper.inverse_transform(forward.transform_point2(p)), p);
    }
}

#[test]
fn test_affine_rotation_about_center() {
    let center = DVec2::new(5.0, 5.0);
    let mapper = AffineMapper::rotation_about(center, FRAC_PI_2).unwrap();
    assert_close(mapper.inverse_transform(center), center);
    // forward rotates (6, 5) to (5, 6); the inverse brings it back
    assert_close(
        mapper.inverse_transform(DVec2::new(5.0, 6.0)),
        DVec2::new(6.0, 5.0),
    );
}

#[test]
fn test_twirl_is_identity_until_initialized() {
    let mapper = TwirlMapper::new(0.5, 0.5, 2.0);
    let p = DVec2::new(3.0, 4.0);
    assert_close(mapper.inverse_transform(p), p);
}

#[test]
fn test_twirl_frame_uses_pixel_center_and_min_dim() {
    let image = Image::new(10, 6, 1, 8).unwrap();
    let mut mapper = Mapper::Twirl(TwirlMapper::new(0.5, 0.25, 1.0));
    mapper.initialize_mapping(&image);
    let Mapper::Twirl(twirl) = mapper else {
        unreachable!()
    };
    let frame = twirl.frame().unwrap();
    assert_close(frame.center, DVec2::new(5.5, 1.5));
    assert_eq!(frame.min_dim, 6.0);
}

#[test]
fn test_twirl_preserves_radius() {
    let image = Image::new(20, 20, 1, 8).unwrap();
    let mut mapper = TwirlMapper::new(0.5, 0.5, 3.0);
    mapper.initialize_mapping(&image);
    let center = mapper.frame().unwrap().center;
    for p in [
        DVec2::new(0.0, 0.0),
        DVec2::new(12.0, 3.0),
        DVec2::new(19.5, 10.0),
    ] {
        let q = mapper.inverse_transform(p);
        assert!((q.distance(center) - p.distance(center)).abs() < EPSILON);
    }
}

#[test]
fn test_twirl_leaves_min_dim_circle_fixed() {
    let image = Image::new(8, 8, 1, 8).unwrap();
    let mut mapper = TwirlMapper::new(0.5, 0.5, 5.0);
    mapper.initialize_mapping(&image);
    let center = mapper.frame().unwrap().center;
    // r == min_dim gives zero angular perturbation
    let p = center + DVec2::new(8.0, 0.0);
    assert_close(mapper.inverse_transform(p), p);
}

#[test]
fn test_default_padders() {
    let scaling = Mapper::Scaling(ScalingMapper::uniform(2.0).unwrap());
    let twirl = Mapper::Twirl(TwirlMapper::new(0.5, 0.5, 1.0));
    let affine = Mapper::Affine(AffineMapper::new(DAffine2::IDENTITY).unwrap());
    assert_eq!(scaling.default_padder(), Padder::ExtendedBorder);
    assert_eq!(affine.default_padder(), Padder::ExtendedBorder);
    assert_eq!(twirl.default_padder(), Padder::Reflective);
}

#[test]
fn test_non_scaling_bounds_match_source() {
    let image = Image::new(7, 4, 2, 8).unwrap();
    let twirl = Mapper::Twirl(TwirlMapper::new(0.5, 0.5, 1.0));
    assert_eq!(twirl.destination_bounds(&image).unwrap(), image.bounds());
}
