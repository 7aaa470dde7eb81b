use mqconn_core::{
    required_version, BalancingParms, Capabilities, ConnectionOptions, Decoder, Encoder, Feature,
    ForeignImage, SecurityParms, TrackingAllocator,
};
use proptest::prelude::*;

fn add_feature(opts: ConnectionOptions, feature: Feature, user: &str, password: &str) -> ConnectionOptions {
    match feature {
        Feature::ClientConn => opts.with_client_conn(ForeignImage::zeroed(64)),
        Feature::SslConfig => opts.with_ssl_config(ForeignImage::zeroed(32)),
        Feature::SecurityParms => {
            let mut csp = SecurityParms::new();
            csp.user_id = user.to_string();
            csp.password = password.to_string();
            opts.with_security_parms(csp)
        }
        Feature::CcdtUrl => opts.with_ccdt_url("file:///ccdt.json"),
        Feature::ApplName => opts.with_appl_name("props"),
        Feature::BalanceParms => opts.with_balance_parms(BalancingParms::new()),
    }
}

fn any_features() -> impl Strategy<Value = Vec<Feature>> {
    prop::sample::subsequence(Feature::ALL.to_vec(), 0..=Feature::ALL.len()).prop_shuffle()
}

proptest! {
    #[test]
    fn prop_allocations_match_releases(
        features in any_features(),
        level in 5..=8i32,
        user in "[a-z]{0,12}",
        password in "[A-Za-z0-9]{0,20}",
    ) {
        let tracker = TrackingAllocator::new();
        let encoder = Encoder::with_capabilities(Capabilities::for_level(level));
        let mut opts = features
            .iter()
            .fold(ConnectionOptions::new(), |opts, f| add_feature(opts, *f, &user, &password));

        let block = encoder.encode_with(&opts, &tracker);
        let caps = encoder.capabilities();
        let expected = required_version(
            1,
            features.iter().copied().filter(|f| caps.supports(*f)),
        );
        prop_assert_eq!(block.version(), expected);
        prop_assert!(block.version() <= level);
        let password_ptr = block
            .security_parms()
            .map(|csp| csp.password_ptr)
            .filter(|ptr| !ptr.is_null());

        Decoder::new().decode_and_release(block, &mut opts);
        let stats = tracker.stats();
        prop_assert_eq!(stats.allocations, stats.releases);
        prop_assert_eq!(stats.invalid_releases, 0);
        if let Some(ptr) = password_ptr {
            let region = tracker.released_at(ptr as *const u8);
            prop_assert!(region.map_or(false, |r| r.is_zeroed()));
        }
    }

    #[test]
    fn prop_adding_features_never_lowers_version(features in any_features()) {
        let encoder = Encoder::with_capabilities(Capabilities::for_level(8));
        let mut opts = ConnectionOptions::new();
        let mut last = encoder.encode(&opts).version();

        for feature in &features {
            opts = add_feature(opts, *feature, "app", "secret");
            let version = encoder.encode(&opts).version();
            prop_assert!(version >= last);
            last = version;
        }

        if features.len() == Feature::ALL.len() {
            prop_assert_eq!(last, 8);
        }
    }
}
