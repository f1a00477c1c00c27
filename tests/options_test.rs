use recap_passage::{
    ConfigProvider, Error, ExclusionSet, HeadingAnchor, Settings, SourceTextConfig, StoredConfig,
    BUILTIN_EXCLUDES, DEFAULT_PROMPT,
};

#[test]
fn settings_default_values_are_sensible() {
    let settings = Settings::default();
    assert_eq!(settings.source.article_containers, vec!["article", "body"]);
    assert_eq!(settings.source.exclude_containers, vec!["aside", "footer", "nav"]);
    assert_eq!(settings.source.heading_anchor, HeadingAnchor::H2);
    assert_eq!(settings.min_words, 0);
    assert_eq!(settings.prompt, DEFAULT_PROMPT);
}

#[test]
fn struct_update_syntax_overrides_selected_fields_only() {
    let config = SourceTextConfig {
        heading_anchor: HeadingAnchor::H4,
        ..SourceTextConfig::default()
    };

    assert_eq!(config.heading_anchor.level(), 4);
    assert_eq!(config.article_containers, vec!["article", "body"]);
}

#[test]
fn settings_json_uses_persisted_key_names() {
    let json = r#"{
        "articleContainers": [".post"],
        "excludeContainers": ["nav", ".ad"],
        "headingAnchor": "h1",
        "minWords": 20,
        "prompt": "Explain:"
    }"#;
    let Ok(settings) = Settings::from_json(json) else {
        panic!("valid settings");
    };

    assert_eq!(settings.source.article_containers, vec![".post"]);
    assert_eq!(settings.source.exclude_containers, vec!["nav", ".ad"]);
    assert_eq!(settings.source.heading_anchor, HeadingAnchor::H1);
    assert_eq!(settings.min_words, 20);
    assert_eq!(settings.prompt, "Explain:");
}

#[test]
fn settings_json_missing_keys_fall_back_to_defaults() {
    let Ok(settings) = Settings::from_json("{}") else {
        panic!("empty object is valid");
    };
    assert_eq!(settings, Settings::default());
}

#[test]
fn settings_json_errors_are_config_errors() {
    assert!(matches!(Settings::from_json("not json"), Err(Error::ConfigError(_))));
    assert!(matches!(
        Settings::from_json(r#"{"headingAnchor":"h7"}"#),
        Err(Error::ConfigError(_))
    ));
}

#[test]
fn stored_config_ready_only_when_complete() {
    let Ok(stored) = StoredConfig::from_json(r#"{"articleContainers":["article"],"headingAnchor":"h3"}"#) else {
        panic!("valid stored config");
    };
    assert!(stored.source_text_config().is_none());

    let complete = StoredConfig {
        exclude_containers: Some(vec!["aside".to_string()]),
        ..stored.clone()
    };
    let Some(config) = complete.source_text_config() else {
        panic!("all keys present");
    };
    assert_eq!(config.heading_anchor, HeadingAnchor::H3);
    assert_eq!(stored.with_defaults().source.exclude_containers, vec!["aside", "footer", "nav"]);
}

#[test]
fn heading_anchor_round_trips_through_level_and_name() {
    for anchor in HeadingAnchor::ALL {
        assert_eq!(HeadingAnchor::from_level(anchor.level()), Some(anchor));
        assert_eq!(anchor.as_str(), format!("h{}", anchor.level()));
    }
    assert_eq!(HeadingAnchor::from_level(0), None);
    assert!(HeadingAnchor::H1.is_extreme());
    assert!(HeadingAnchor::H6.is_extreme());
    assert!(!HeadingAnchor::H3.is_extreme());
}

#[test]
fn exclusion_set_appends_builtins_once() {
    let set = ExclusionSet::new(&["nav", " ", ".sr-only", "nav"]);
    assert_eq!(set.selectors(), &["nav", ".sr-only", BUILTIN_EXCLUDES[0]]);

    let config = SourceTextConfig::default();
    let set = config.exclusion_set();
    for builtin in BUILTIN_EXCLUDES {
        assert!(set.selectors().iter().any(|s| s == builtin));
    }
}

#[test]
fn exclusion_set_validation_reports_bad_selector() {
    assert!(ExclusionSet::new(&["nav", "div > p.note"]).validate().is_ok());
    assert_eq!(
        ExclusionSet::only(&["nav", "p["]).validate(),
        Err(Error::InvalidSelector("p[".to_string()))
    );
}
