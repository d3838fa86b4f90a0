//! End-to-end: CSV on disk -> frame -> split -> fit -> evaluate -> store.

use std::io::Write;

use bayes_classifiers::config::ModelConfig;
use bayes_classifiers::data_handling::split_seeded;
use bayes_classifiers::error::ErrorKind;
use bayes_classifiers::io::{
    load_model, read_frame, read_frame_with_config, save_model, ReaderConfig,
};
use bayes_classifiers::models::Model;
use bayes_classifiers::preprocessing::BinaryLabeller;

const CSV: &str = "\
Age,Gender,Polyuria,class
40,Male,No,Negative
58,Male,No,Negative
41,Male,Yes,Negative
45,Male,No,Negative
60,Male,Yes,Positive
55,Male,Yes,Positive
57,Male,Yes,Positive
66,Male,Yes,Positive
67,Female,Yes,Positive
70,Male,No,Positive
44,Female,Yes,Negative
38,Female,No,Negative
35,Male,No,Negative
61,Female,Yes,Positive
";

fn write_temp(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn csv_is_encoded_with_default_labeller() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "diabetes.csv", CSV);
    let frame = read_frame(&path).unwrap();

    assert_eq!(frame.nrows(), 14);
    assert_eq!(frame.ncols(), 4);
    assert_eq!(&frame.column("Age").unwrap()[..3], &[40, 58, 41]);
    assert_eq!(&frame.column("Gender").unwrap()[8..11], &[0, 1, 0]);
    assert_eq!(frame.column("class").unwrap().iter().sum::<i64>(), 7);
}

#[test]
fn tsv_extension_switches_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "small.tsv", "a\tclass\n1\tsick\n2\twell\n");
    let frame =
        read_frame_with_config(&path, &ReaderConfig::default(), &BinaryLabeller::new(["sick"]))
            .unwrap();
    assert_eq!(frame.column("a").unwrap(), &[1, 2]);
    assert_eq!(frame.column("class").unwrap(), &[1, 0]);
}

#[test]
fn ragged_csv_fails_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "bad.csv", "a,b\n1,2\n3\n");
    let err = read_frame(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("record"));
}

#[test]
fn missing_dataset_fails() {
    assert!(read_frame("/nonexistent/data.csv").is_err());
}

#[test]
fn trained_model_survives_a_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let frame = read_frame(write_temp(&dir, "diabetes.csv", CSV)).unwrap();
    let frame = bayes_classifiers::Frame::from_columns(
        frame
            .columns()
            .filter(|(name, _)| *name != "Gender")
            .map(|(name, values)| (name.to_string(), values.to_vec())),
    )
    .unwrap();

    let config = ModelConfig::new(1e-6);
    let model = Model::fit(&frame, "class", &config).unwrap();
    let before = model.evaluate(&frame, "class").unwrap();

    let model_path = dir.path().join("model.json");
    save_model(&model_path, &model).unwrap();
    let reloaded = load_model(&model_path).unwrap();
    let after = reloaded.evaluate(&frame, "class").unwrap();

    for (class, prior) in model.priors.iter() {
        assert!((reloaded.priors.get(class).unwrap() - prior).abs() < 1e-12);
    }
    for (feature, class, params) in model.stats.iter() {
        let params = params.unwrap();
        let loaded = reloaded.stats.lookup(feature, class).unwrap();
        assert!((loaded.mean - params.mean).abs() < 1e-9);
        assert!((loaded.variance - params.variance).abs() < 1e-9);
    }
    assert_eq!(before.counts, after.counts);
    assert!(before.metrics.accuracy.unwrap() > 0.7);
}

#[test]
fn reloaded_undefined_cells_surface_as_zero_variance() {
    let dir = tempfile::tempdir().unwrap();
    let frame = bayes_classifiers::Frame::from_columns(vec![
        ("x", vec![1, 2, 3]),
        ("class", vec![0, 0, 0]),
    ])
    .unwrap();
    let model = Model::fit(&frame, "class", &ModelConfig::default()).unwrap();

    let path = dir.path().join("model.json");
    save_model(&path, &model).unwrap();
    let mut reloaded = load_model(&path).unwrap();

    // give the never-seen class a prior so its normalised cell is scored
    reloaded.priors.insert(1, 0.0);
    let sample = [("x".to_string(), 2)].into_iter().collect();
    let err = reloaded.predict(&sample).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModelQuality);
}

#[test]
fn seeded_pipeline_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let frame = read_frame(write_temp(&dir, "diabetes.csv", CSV)).unwrap();
    let config = ModelConfig::new(1e-6);

    let run = || {
        let parts = split_seeded(&frame, 0.3, Some(9)).unwrap();
        let model = Model::fit(&parts.train, "class", &config).unwrap();
        model.evaluate(&parts.test, "class").unwrap()
    };
    assert_eq!(run(), run());
}
