use super::*;

#[test]
fn defaults() {
    let opts = BlendOptions::default();
    assert_eq!(opts.num_threads, 1);
    assert_eq!(opts.algorithm, Algorithm::SourceOver);
    assert_eq!(opts.hints(), EncodeHints::default());
    opts.validate().unwrap();
}

#[test]
fn builders_set_fields() {
    let opts = BlendOptions::default()
        .with_threads(8)
        .with_algorithm(Algorithm::Alpha)
        .with_hints(EncodeHints {
            filter: FilterHint::Paeth,
            compression: CompressionHint::Best,
        });
    assert_eq!(opts.num_threads, 8);
    assert_eq!(opts.algorithm, Algorithm::Alpha);
    assert_eq!(opts.filter, FilterHint::Paeth);
    assert_eq!(opts.compression, CompressionHint::Best);
}

#[test]
fn zero_threads_fails_validation() {
    let err = BlendOptions::default().with_threads(0).validate().unwrap_err();
    assert!(matches!(err, BlendError::InvalidConfiguration(_)));
}

#[test]
fn json_fills_missing_keys_with_defaults() {
    let opts = BlendOptions::from_json(r#"{ "num_threads": 4, "algorithm": "multiplicative" }"#)
        .unwrap();
    assert_eq!(opts.num_threads, 4);
    assert_eq!(opts.algorithm, Algorithm::Multiplicative);
    assert_eq!(opts.filter, FilterHint::NoFilter);

    assert_eq!(BlendOptions::from_json("{}").unwrap(), BlendOptions::default());
}

#[test]
fn json_rejects_unknown_keys_and_zero_threads() {
    let err = BlendOptions::from_json(r#"{ "threads": 4 }"#).unwrap_err();
    assert!(err.to_string().contains("options json"));
    assert!(err.to_string().contains("threads"));

    let err = BlendOptions::from_json(r#"{ "num_threads": 0 }"#).unwrap_err();
    assert!(matches!(err, BlendError::InvalidConfiguration(_)));
}

#[test]
fn pairs_parse_every_key() {
    let opts = BlendOptions::from_pairs([
        ("num_threads", "3"),
        ("algorithm", "Destination_Over"),
        ("filter", "up"),
        ("compression", "default"),
    ])
    .unwrap();
    assert_eq!(
        opts,
        BlendOptions {
            num_threads: 3,
            algorithm: Algorithm::DestinationOver,
            filter: FilterHint::Up,
            compression: CompressionHint::Default,
        }
    );
}

#[test]
fn pairs_reject_unknown_key() {
    let err = BlendOptions::from_pairs([("quality", "9")]).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("unknown option 'quality'"));
    assert!(msg.contains("num_threads, algorithm, filter, compression"));
}

#[test]
fn pairs_reject_bad_values() {
    assert!(matches!(
        BlendOptions::from_pairs([("num_threads", "many")]).unwrap_err(),
        BlendError::InvalidConfiguration(_)
    ));
    assert!(matches!(
        BlendOptions::from_pairs([("num_threads", "0")]).unwrap_err(),
        BlendError::InvalidConfiguration(_)
    ));
    assert!(matches!(
        BlendOptions::from_pairs([("algorithm", "xor")]).unwrap_err(),
        BlendError::UnknownAlgorithm(_)
    ));
}
