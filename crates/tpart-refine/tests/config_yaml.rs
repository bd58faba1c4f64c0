use std::fs;

use tempfile::tempdir;
use tpart_core::errors::TpError;
use tpart_refine::{EvaluatorConfig, PartitionerConfig, RefinerConfig};

#[test]
fn empty_document_yields_defaults() {
    let config = PartitionerConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config, PartitionerConfig::default());
    assert_eq!(config.evaluator.num_parts, 2);
    assert_eq!(config.evaluator.timing_exp_factor, 2.0);
    assert_eq!(config.evaluator.e_wt_factors, vec![1.0]);
    assert!(config.evaluator.placement_wt_factors.is_empty());
    assert_eq!(config.refiner.max_moves, 50);
    assert_eq!(config.refiner.refiner_iters, 2);
    assert!(config.refiner.check_consistency);
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let yaml = r#"
evaluator:
  num_parts: 4
  extra_cut_delay: 0.5
  v_wt_factors: [1.0, 0.25]
refiner:
  max_moves: 200
"#;
    let config = PartitionerConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(
        config.evaluator,
        EvaluatorConfig {
            num_parts: 4,
            extra_cut_delay: 0.5,
            v_wt_factors: vec![1.0, 0.25],
            ..EvaluatorConfig::default()
        }
    );
    assert_eq!(
        config.refiner,
        RefinerConfig {
            max_moves: 200,
            ..RefinerConfig::default()
        }
    );
}

#[test]
fn config_round_trips_through_a_file() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("partitioner.yaml");
    let config = PartitionerConfig {
        evaluator: EvaluatorConfig {
            snaking_wt_factor: 3.0,
            placement_wt_factors: vec![0.5, 0.5],
            ..EvaluatorConfig::default()
        },
        refiner: RefinerConfig {
            check_consistency: false,
            ..RefinerConfig::default()
        },
    };
    fs::write(&path, config.to_yaml().unwrap()).expect("write config");

    let loaded = PartitionerConfig::from_yaml_path(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn invalid_values_are_config_errors() {
    let err = PartitionerConfig::from_yaml_str("evaluator:\n  num_parts: 1\n").unwrap_err();
    match err {
        TpError::Config(info) => {
            assert_eq!(info.code, "num-parts");
            assert_eq!(info.context.get("num_parts"), Some(&"1".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let nan = EvaluatorConfig {
        timing_factor: f64::NAN,
        ..EvaluatorConfig::default()
    };
    match nan.validate().unwrap_err() {
        TpError::Config(info) => {
            assert_eq!(info.code, "non-finite-factor");
            assert_eq!(info.context.get("field"), Some(&"timing_factor".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn malformed_or_missing_files_are_serde_errors() {
    let err = PartitionerConfig::from_yaml_str("refiner: [1, 2").unwrap_err();
    assert!(matches!(&err, TpError::Serde(info) if info.code == "yaml-parse"));

    let err = PartitionerConfig::from_yaml_str("refiner:\n  max_moves: many\n").unwrap_err();
    assert!(matches!(&err, TpError::Serde(info) if info.code == "yaml-parse"));

    let dir = tempdir().expect("temp dir");
    let err = PartitionerConfig::from_yaml_path(&dir.path().join("absent.yaml")).unwrap_err();
    match err {
        TpError::Serde(info) => {
            assert_eq!(info.code, "config-read");
            assert!(info.context.contains_key("path"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
