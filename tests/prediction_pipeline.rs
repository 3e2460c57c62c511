use insurance_charges::application::PredictionService;
use insurance_charges::application::ml::{ChargeRegressor, ModelRegistry, SmartCoreRegressor};
use insurance_charges::config::ModelPaths;
use insurance_charges::domain::errors::{PredictionError, RegistryError};
use insurance_charges::domain::insurance::{ModelId, PredictionInput, USD_TO_VND};
use insurance_charges::infrastructure::InMemoryPredictionRepository;
use insurance_charges::infrastructure::observability::Metrics;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};
use std::path::Path;
use tempfile::TempDir;
use std::sync::Arc;

/// Synthetic rows in the given layout: charges depend on age, smoking and BMI.
fn training_rows(one_hot: bool) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut x = Vec::new();
    let mut y = Vec::new();
    for age in (18..=64).step_by(3) {
        for bmi in [18.0, 22.86, 27.0, 33.0, 40.0] {
            for smoker in 0..=1 {
                for region in 0..=3u8 {
                    let mut row = vec![age as f64, 0.0, bmi, 1.0, smoker as f64];
                    if one_hot {
                        row.extend([
                            (region == 2) as u8 as f64,
                            (region == 1) as u8 as f64,
                            (region == 0) as u8 as f64,
                        ]);
                    } else {
                        row.push(region as f64);
                    }
                    x.push(row);
                    y.push(500.0 + age as f64 * 260.0 + bmi * 40.0 + smoker as f64 * 23_000.0);
                }
            }
        }
    }
    (x, y)
}

fn write_artifacts(dir: &Path) {
    let (x, y) = training_rows(false);
    let x = DenseMatrix::from_2d_vec(&x).unwrap();
    let params = RandomForestRegressorParameters::default()
        .with_n_trees(20)
        .with_max_depth(8);
    let forest: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>> =
        RandomForestRegressor::fit(&x, &y, params).unwrap();
    std::fs::write(
        dir.join("random_forest_model.json"),
        serde_json::to_vec(&forest).unwrap(),
    )
    .unwrap();

    let (x, y) = training_rows(true);
    let x = DenseMatrix::from_2d_vec(&x).unwrap();
    let tree: DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>> =
        DecisionTreeRegressor::fit(&x, &y, DecisionTreeRegressorParameters::default()).unwrap();
    std::fs::write(
        dir.join("decision_tree_model.json"),
        serde_json::to_vec(&tree).unwrap(),
    )
    .unwrap();
}

/// Artifacts live as long as the returned directory.
fn model_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    dir
}

fn loaded_service(dir: &Path) -> PredictionService {
    let registry = ModelRegistry::load(&ModelPaths::in_dir(dir)).expect("models should load");
    PredictionService::new(Arc::new(registry), Metrics::new().unwrap())
}

fn scenario(model: &str) -> PredictionInput {
    PredictionInput {
        age: 30,
        sex: 0,
        height: 1.75,
        weight: 70.0,
        children: 1,
        smoker: 0,
        region: 2,
        model: model.to_string(),
    }
}

#[test]
fn test_end_to_end_decision_tree() {
    let dir = model_dir();
    let service = loaded_service(dir.path());

    let result = service.predict_charges(&scenario("decision_tree")).unwrap();

    // Same model queried directly with the golden one-hot vector
    let tree = SmartCoreRegressor::load(ModelId::DecisionTree, &dir.path().join("decision_tree_model.json")).unwrap();
    let bmi = 70.0 / (1.75 * 1.75);
    let expected = tree
        .predict_one(&[30.0, 0.0, bmi, 1.0, 0.0, 1.0, 0.0, 0.0])
        .unwrap()
        .max(0.0);

    assert_eq!(result.model_id, ModelId::DecisionTree);
    assert_eq!(result.amount_usd, expected);
    assert_eq!(result.amount_vnd, expected * USD_TO_VND);
    assert!(result.amount_usd > 0.0);
    assert!(result.display_text.contains("Decision Tree"));
    assert!(result.display_text.ends_with(" VND"));
}

#[test]
fn test_end_to_end_random_forest_uses_raw_region() {
    let dir = model_dir();
    let service = loaded_service(dir.path());

    let result = service.predict_charges(&scenario("random_forest")).unwrap();

    let forest = SmartCoreRegressor::load(ModelId::RandomForest, &dir.path().join("random_forest_model.json")).unwrap();
    let bmi = 70.0 / (1.75 * 1.75);
    let expected = forest.predict_one(&[30.0, 0.0, bmi, 1.0, 0.0, 2.0]).unwrap();

    assert_eq!(result.amount_usd, expected.max(0.0));
    assert!(result.display_text.contains("Random Forest"));
}

#[test]
fn test_end_to_end_bmi_rejection() {
    let service = loaded_service(model_dir().path());
    let input = PredictionInput {
        height: 1.0,
        weight: 150.0,
        ..scenario("decision_tree")
    };

    let err = service.predict_charges(&input).unwrap_err();
    assert!(err.is_client_error());
    match err {
        PredictionError::DerivedConstraint { bmi, .. } => assert!((bmi - 150.0).abs() < 1e-9),
        other => panic!("expected derived constraint error, got {:?}", other),
    }
}

#[test]
fn test_unknown_model_rejected() {
    let service = loaded_service(model_dir().path());
    let err = service.predict_charges(&scenario("linear_regression")).unwrap_err();
    assert!(matches!(err, PredictionError::UnknownModel { .. }));

    // Legacy id from an older revision is not an alias
    let err = service.predict_charges(&scenario("decision_tree_model")).unwrap_err();
    assert!(matches!(err, PredictionError::UnknownModel { .. }));
}

#[test]
fn test_predictions_are_deterministic() {
    let service = loaded_service(model_dir().path());
    for model in ["random_forest", "decision_tree"] {
        let first = service.predict_charges(&scenario(model)).unwrap();
        let second = service.predict_charges(&scenario(model)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_concurrent_predictions_share_registry() {
    let service = Arc::new(loaded_service(model_dir().path()));
    let reference = service.predict_charges(&scenario("random_forest")).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            std::thread::spawn(move || service.predict_charges(&scenario("random_forest")).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), reference);
    }
}

#[test]
fn test_startup_fails_without_every_model() {
    let dir = model_dir();
    std::fs::remove_file(dir.path().join("random_forest_model.json")).unwrap();

    let err = ModelRegistry::load(&ModelPaths::in_dir(dir.path())).err().unwrap();
    assert!(matches!(err, RegistryError::FatalLoad { model_id: ModelId::RandomForest, .. }));
    assert!(err.to_string().contains("random_forest_model.json"));
}

#[test]
fn test_temp_artifacts_removed_on_drop() {
    let dir = model_dir();
    let path = dir.path().to_path_buf();
    assert!(path.join("decision_tree_model.json").exists());

    drop(dir);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_history_records_successful_predictions() {
    let repo = Arc::new(InMemoryPredictionRepository::new());
    let service = loaded_service(model_dir().path()).with_history(repo);

    let result = service
        .predict_and_record(&scenario("decision_tree"), Some("user-42"))
        .await
        .unwrap();

    let history = service.history(Some("user-42"), Some(5)).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].result, result);
    assert_eq!(history[0].request.model_id(), ModelId::DecisionTree);
}
