use super::*;

use crate::compose::compositor::composite;
use crate::foundation::core::Dimensions;

fn solid(width: u32, height: u32, px: [u8; 4]) -> PixelBuffer {
    PixelBuffer::filled(width, height, px).unwrap()
}

fn layers() -> Vec<PixelBuffer> {
    vec![
        solid(6, 5, [255, 255, 255, 255]),
        solid(6, 5, [255, 0, 0, 128]),
        solid(6, 5, [0, 0, 255, 64]),
        solid(6, 5, [0, 200, 0, 200]),
    ]
}

#[test]
fn fewer_than_two_images_is_rejected() {
    let one = vec![solid(2, 2, [0; 4])];
    let err = blend_multiple(&one, Algorithm::SourceOver, None, 1).unwrap_err();
    assert!(matches!(err, BlendError::InsufficientImages { count: 1 }));

    let err = blend_multiple(&[], Algorithm::SourceOver, None, 1).unwrap_err();
    assert!(matches!(err, BlendError::InsufficientImages { count: 0 }));
}

#[test]
fn per_step_length_must_be_one_less_than_images() {
    let mut images = layers();
    images.push(solid(6, 5, [1, 2, 3, 4]));
    let steps = [Algorithm::Alpha; 3];
    let err = blend_multiple(&images, Algorithm::SourceOver, Some(&steps), 1).unwrap_err();
    assert!(matches!(
        err,
        BlendError::AlgorithmCountMismatch {
            expected: 4,
            found: 3
        }
    ));
}

#[test]
fn mismatch_reports_first_offending_index() {
    let mut images = layers();
    images[2] = solid(6, 4, [0; 4]);
    images[3] = solid(5, 5, [0; 4]);
    let err = BatchJob::new(&images, Algorithm::SourceOver, None).unwrap_err();
    match err {
        BlendError::DimensionMismatch { index, found, .. } => {
            assert_eq!(index, 2);
            assert_eq!(found, Dimensions::new(6, 4));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn count_is_checked_before_geometry() {
    let images = vec![solid(2, 2, [0; 4]), solid(3, 3, [0; 4])];
    let steps = [Algorithm::Alpha; 2];
    let err = blend_multiple(&images, Algorithm::SourceOver, Some(&steps), 1).unwrap_err();
    assert!(matches!(err, BlendError::AlgorithmCountMismatch { .. }));
}

#[test]
fn steps_default_or_override() {
    let images = layers();
    let job = BatchJob::new(&images, Algorithm::Multiplicative, None).unwrap();
    assert_eq!(job.steps(), &[Algorithm::Multiplicative; 3]);
    assert_eq!(job.images().len(), 4);

    let per_step = [
        Algorithm::Alpha,
        Algorithm::DestinationOver,
        Algorithm::FirstTop,
    ];
    let job = BatchJob::new(&images, Algorithm::Multiplicative, Some(&per_step)).unwrap();
    assert_eq!(job.steps(), &per_step);
}

#[test]
fn fold_equals_nested_pairs() {
    let images = layers();
    for alg in Algorithm::ALL {
        let folded = blend_multiple(&images[..3], alg, None, 1).unwrap();
        let step = composite(&images[0], &images[1], alg, 1).unwrap();
        let nested = composite(&step, &images[2], alg, 1).unwrap();
        assert_eq!(folded, nested, "{alg}");
    }
}

#[test]
fn per_step_fold_applies_algorithms_in_order() {
    let images = layers();
    let per_step = [Algorithm::SourceOver, Algorithm::Alpha, Algorithm::FirstBottom];
    let folded = blend_multiple(&images, Algorithm::DisjointDebug, Some(&per_step), 1).unwrap();

    let mut acc = images[0].clone();
    for (layer, alg) in images[1..].iter().zip(per_step) {
        acc = composite(&acc, layer, alg, 1).unwrap();
    }
    assert_eq!(folded, acc);
}

#[test]
fn owned_pool_fold_matches_serial() {
    let pool = WorkerPool::new(2).unwrap();
    let images = layers();
    let serial = blend_multiple(&images, Algorithm::SourceOver, None, 1).unwrap();
    let pooled = blend_multiple_with(&pool, &images, Algorithm::SourceOver, None, 3).unwrap();
    assert_eq!(pooled, serial);
    assert!(pool.status().completed_units > 0);
}

#[test]
fn validation_failure_never_touches_owned_pool() {
    let pool = WorkerPool::new(2).unwrap();
    let images = vec![solid(4, 4, [0; 4]), solid(4, 3, [0; 4])];
    let err = blend_multiple_with(&pool, &images, Algorithm::SourceOver, None, 2).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(pool.status().completed_units, 0);
}

#[test]
fn resolve_steps_for_two_images() {
    assert_eq!(
        resolve_steps(2, Algorithm::Alpha, None).unwrap(),
        vec![Algorithm::Alpha]
    );
    assert!(resolve_steps(2, Algorithm::Alpha, Some(&[])).is_err());
}
