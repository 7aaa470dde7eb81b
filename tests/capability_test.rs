use mqconn_core::{
    BalancingParms, Capabilities, ConnectionOptions, Decoder, DroppedFeaturePolicy, Encoder,
    Feature, MarshalConfig, SecurityParms, TrackingAllocator,
};

fn late_features() -> ConnectionOptions {
    ConnectionOptions::new()
        .with_security_parms(SecurityParms::user_password("app", "pw-9-0"))
        .with_ccdt_url("file:///var/mqm/ccdt.json")
        .with_appl_name("reporting")
        .with_balance_parms(BalancingParms::new())
}

#[test]
fn test_version_never_exceeds_library_level() {
    for level in 5..=8 {
        let tracker = TrackingAllocator::new();
        let mut opts = late_features();
        let encoder = Encoder::new(&MarshalConfig::for_library_level(level));

        let block = encoder.encode_with(&opts, &tracker);
        assert_eq!(block.version(), level, "library level {}", level);
        assert_eq!(block.dropped_features().len(), (8 - level) as usize);

        Decoder::new().decode_and_release(block, &mut opts);
        let stats = tracker.stats();
        assert_eq!(stats.live, 0, "library level {}", level);
        assert_eq!(stats.invalid_releases, 0);
    }
}

#[test]
fn test_mq_9_0_library() {
    let tracker = TrackingAllocator::new();
    let encoder = Encoder::with_capabilities(Capabilities::for_level(6));
    let block = encoder.encode_with(&late_features(), &tracker);

    assert!(block.ccdt_url().is_some());
    assert!(block.appl_name().is_empty());
    assert!(block.balance_parms().is_none());
    assert_eq!(
        block.dropped_features(),
        &[Feature::ApplName, Feature::BalanceParms]
    );
}

#[test]
fn test_mq_9_1_2_library() {
    let tracker = TrackingAllocator::new();
    let encoder = Encoder::with_capabilities(Capabilities::for_level(7));
    let block = encoder.encode_with(&late_features(), &tracker);

    assert_eq!(block.version(), 7);
    assert_eq!(block.appl_name(), b"reporting");
    assert!(block.header().balance_parms_ptr.is_null());
    assert_eq!(block.dropped_features(), &[Feature::BalanceParms]);
}

#[test]
fn test_warn_policy_still_drops() {
    let tracker = TrackingAllocator::new();
    let config = MarshalConfig {
        library_level: Some(5),
        dropped_features: DroppedFeaturePolicy::Warn,
    };
    let block = Encoder::new(&config).encode_with(&late_features(), &tracker);

    assert_eq!(block.version(), 5);
    assert_eq!(
        block.dropped_features(),
        &[Feature::CcdtUrl, Feature::ApplName, Feature::BalanceParms]
    );
    // csp, user id, password
    assert_eq!(tracker.stats().allocations, 3);
}

#[test]
fn test_unsupported_lists_match_levels() {
    let unsupported: Vec<Feature> = Capabilities::for_level(6).unsupported().collect();
    assert_eq!(unsupported, vec![Feature::ApplName, Feature::BalanceParms]);
    assert_eq!(Capabilities::for_level(8).unsupported().count(), 0);
}

#[test]
fn test_config_file_drives_encoder() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mqconn.json");
    std::fs::write(&path, r#"{ "library_level": 6, "dropped_features": "warn" }"#).unwrap();

    let config = MarshalConfig::from_file(&path).unwrap();
    let encoder = Encoder::new(&config);
    assert_eq!(encoder.capabilities().max_version(), 6);

    let block = encoder.encode(&late_features());
    assert_eq!(block.version(), 6);
}

#[cfg(feature = "mq-9-2-4")]
#[test]
fn test_default_build_detects_latest_level() {
    assert_eq!(Capabilities::detect().max_version(), 8);
    assert_eq!(Encoder::default().capabilities(), Capabilities::global());
}
