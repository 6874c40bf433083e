use bluebox_core::ModelTier;
use bluebox_server::BlueboxConfig;
use bluebox_tier::UsageLimit;
use std::io::Write;

#[test]
fn bundled_defaults_describe_the_service() {
    let config = BlueboxConfig::bundled().unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.relay.history_window, 12);
    assert_eq!(config.relay.max_tokens, 512);
    assert_eq!(config.relay.models.basic, "llama-3.1-8b-instant");
    assert_eq!(config.tier.plans.free.message_limit, UsageLimit::Limited(25));
    assert_eq!(config.tier.plans.pro.message_limit, UsageLimit::Unlimited);
    assert_eq!(config.tier.billing.yearly_days, 365);
    assert_eq!(*config.context.scrape_limit(), 5000);
}

#[test]
fn overrides_layer_over_bundled_values() {
    let config = BlueboxConfig::from_toml(
        r#"
        [relay]
        history_window = 4

        [plans.free]
        name = "Starter"
        message_limit = 5
        token_limit = 1000
        model_tier = "basic"
        "#,
    )
    .unwrap();
    assert_eq!(config.relay.history_window, 4);
    assert_eq!(config.relay.max_tokens, 512);
    assert_eq!(config.tier.plans.free.message_limit, UsageLimit::Limited(5));
    assert_eq!(config.tier.plans.pro.name, "Pro");
}

#[test]
fn explicit_file_has_highest_precedence() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[server]\nport = 9191\n\n[pacing]\nenabled = false").unwrap();

    let config = BlueboxConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.server.port, 9191);
    assert!(!config.pacing.enabled);
    assert_eq!(config.pacing.strategy().delay(ModelTier::Basic), None);
}

#[test]
fn pacing_delays_basic_tier_only() {
    let pacing = BlueboxConfig::bundled().unwrap().pacing.strategy();
    for _ in 0..50 {
        let delay = pacing.delay(ModelTier::Basic).unwrap().as_millis();
        assert!((60..80).contains(&delay));
    }
    assert_eq!(pacing.delay(ModelTier::Premium), None);
}
