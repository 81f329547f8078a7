//! End-to-end integration tests: CSV -> generate -> JSON -> deserialize.

use std::fs;
use std::io::Write;

use calluna_io::{DatasetProvider, DatasetReader, DatasetSchema, ProfileWriter, RunName};
use calluna_tree::ProfileTreeConfig;
use tempfile::TempDir;

/// Write a CSV with the two-feature scenario: `A, young` is a clear
/// chance group, `A, old` a clear risk group, and `B, old` is too small
/// to ever become a node.
fn write_scenario_csv(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("applications.csv");
    let mut file = fs::File::create(&path).unwrap();
    writeln!(file, "country,age_band,hit,refused,watchlist").unwrap();

    let mut row = |country: &str, age: &str, hit: bool, refused: bool, n: usize| {
        for _ in 0..n {
            writeln!(
                file,
                "{country},{age},{},{},{}",
                u8::from(hit),
                u8::from(refused),
                u8::from(hit)
            )
            .unwrap();
        }
    };

    // country=A, age_band=young: 100 records, 2 hits, 5 refusals
    row("A", "young", true, false, 2);
    row("A", "young", false, true, 5);
    row("A", "young", false, false, 93);
    // country=A, age_band=old: 60 records, 30 hits
    row("A", "old", true, false, 30);
    row("A", "old", false, false, 30);
    // country=B, age_band=old: 10 records, below the minimum group size
    row("B", "old", false, false, 10);

    path
}

fn schema() -> DatasetSchema {
    DatasetSchema::new(
        vec!["country".into(), "age_band".into()],
        "hit".into(),
        "refused".into(),
        vec!["watchlist".into()],
    )
}

#[test]
fn scenario_round_trip() {
    // 1. Read CSV
    let dir = TempDir::new().unwrap();
    let data = write_scenario_csv(&dir);
    let dataset = DatasetReader::new(&data, schema()).read().unwrap();
    assert_eq!(dataset.n_records(), 170);

    // 2. Generate profiles
    let config = ProfileTreeConfig::new(vec!["country".into(), "age_band".into()])
        .unwrap()
        .with_chance_max_hit_percentage(5.0)
        .with_chance_max_refusal_percentage(10.0)
        .with_risk_min_hit_percentage(40.0)
        .with_minimal_groupsize(50)
        .with_min_depth_required(2);
    let provider = DatasetProvider::new(&dataset);
    let result = config.generate(&provider).unwrap();

    // root -> country=A -> {old, young}; B never qualifies.
    assert_eq!(result.metadata().nodes_built, 4);
    assert_eq!(result.metadata().nodes_pruned, 0);
    assert_eq!(result.metadata().nodes_filtered, 0);
    assert_eq!(result.profiles().len(), 2);

    // 3. Write JSON artifact
    let run = RunName::new("scenario".into()).unwrap();
    let writer = ProfileWriter::new(dir.path(), run).unwrap();
    writer
        .write_profiles(result.profiles(), result.parameter_set())
        .unwrap();

    // 4. Deserialize back and verify
    let content: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("scenario_profiles.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(content["run"], "scenario");
    assert_eq!(content["n_profiles"], 2);
    assert_eq!(
        content["parameter_set"]["features_ordered"],
        serde_json::json!(["country", "age_band"])
    );

    // Lexicographic within the layer: old before young.
    let old = &content["profiles"]["0"];
    assert_eq!(old["type"], "risk");
    assert_eq!(old["size"], 60);
    assert_eq!(old["hit_percentage"], 0.5);
    assert_eq!(old["hit_counts"]["watchlist"], 30);
    assert_eq!(old["features"][0]["feature"], "country");
    assert_eq!(old["features"][0]["value"], "A");
    assert_eq!(old["features"][1]["value"], "old");

    let young = &content["profiles"]["1"];
    assert_eq!(young["type"], "chance");
    assert_eq!(young["size"], 100);
    assert_eq!(young["hit_percentage"], 0.02);
    assert_eq!(young["refusal_percentage"], 0.05);
    assert_eq!(young["features"][1]["value"], "young");
}

#[test]
fn too_shallow_profiles_yield_empty_output() {
    // Grouping on one feature only with a two-condition minimum: every
    // candidate profile is filtered, which is valid empty output.
    let dir = TempDir::new().unwrap();
    let data = write_scenario_csv(&dir);
    let schema = DatasetSchema::new(
        vec!["country".into()],
        "hit".into(),
        "refused".into(),
        vec![],
    );
    let dataset = DatasetReader::new(&data, schema).read().unwrap();

    let config = ProfileTreeConfig::new(vec!["country".into()])
        .unwrap()
        .with_minimal_groupsize(50)
        .with_min_depth_required(2);
    let provider = DatasetProvider::new(&dataset);
    let result = config.generate(&provider).unwrap();

    assert!(result.profiles().is_empty());

    let run = RunName::new("empty".into()).unwrap();
    let writer = ProfileWriter::new(dir.path(), run).unwrap();
    writer
        .write_profiles(result.profiles(), result.parameter_set())
        .unwrap();

    let content: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("empty_profiles.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(content["n_profiles"], 0);
}
