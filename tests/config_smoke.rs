use tumble_engine::domain::config::DegeneratePolicy;
use tumble_engine::domain::object::LoadedScene;
use tumble_engine::{SceneConfig, SceneCore, SceneError};

#[test]
fn config_smoke_overrides_and_validates() {
    let config = SceneConfig::from_json(
        r#"{ "scale_factor": 35, "front_wall": false, "degenerate_policy": "substitute" }"#,
    )
    .expect("partial config should parse");
    assert_eq!(config.scale_factor, 35.0);
    assert!(!config.front_wall);
    assert_eq!(config.degenerate_policy, DegeneratePolicy::Substitute);
    assert_eq!(config.decay_ms, 5000.0);

    let round = SceneConfig::from_json(&config.to_json()).expect("serialized config should parse");
    assert_eq!(round, config);

    assert!(matches!(
        SceneConfig::from_json(r#"{ "time_step": 0 }"#),
        Err(SceneError::Config(_))
    ));
    assert!(SceneCore::from_config_json("not json").is_err());
}

#[test]
fn config_smoke_front_wall_off_builds_five_walls() {
    let json = r#"{ "front_wall": false }"#;
    let mut core = SceneCore::from_config_json(json).expect("config should parse");
    let outcome = core.resize(800.0, 600.0).expect("resize");
    assert_eq!(outcome.walls, 5);

    let assets = LoadedScene::from_json(
        r#"{ "objects": [ { "name": "Cube", "size": [1, 1, 1] } ] }"#,
    )
    .expect("assets should parse");
    core.on_assets_loaded(assets).expect("first load");
    assert_eq!(core.world().expect("world").body_count(), 6);
}
