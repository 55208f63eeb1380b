/// End-to-end tests of the ltrmeta binary
mod common;

use assert_cmd::Command;
use common::{datasheet, good, TestEnvironment};
use predicates::prelude::*;
use std::fs;

fn ltrmeta() -> Command {
    let mut cmd = Command::cargo_bin("ltrmeta").unwrap();
    cmd.env_remove("LTRMETA_CONFIG")
        .env_remove("LTRMETA_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn populated_env() -> TestEnvironment {
    let env = TestEnvironment::new();
    env.add_genome("Athaliana.fa", 2000, 0);
    env.add_genome("Alyrata.fa", 2000, 0);
    env.add_results(
        "Athaliana",
        &[good("at1", 95.0, 500), good("at2", 72.5, 300)],
    );
    env.add_results("Alyrata", &[good("al1", 88.0, 1000)]);
    env
}

#[test]
fn test_summarize_writes_tables() {
    let env = populated_env();

    ltrmeta()
        .arg("summarize")
        .arg("-g")
        .arg(&env.genomes)
        .arg("-r")
        .arg(&env.results)
        .arg("-o")
        .arg(&env.output)
        .arg("-p")
        .arg("plants")
        .assert()
        .success()
        .stdout(predicate::str::contains("plants_SimilarityMatrix.csv"));

    let matrix = fs::read_to_string(env.output.join("plants_SimilarityMatrix.csv")).unwrap();
    assert!(matrix.starts_with("organism;(70,72];"));
    assert_eq!(matrix.lines().count(), 3);
    assert!(env.output.join("plants_GenomeInfo.csv").is_file());
}

#[test]
fn test_summarize_default_prefix_is_results_folder() {
    let env = populated_env();

    ltrmeta()
        .arg("summarize")
        .arg("-g")
        .arg(&env.genomes)
        .arg("-r")
        .arg(&env.results)
        .arg("-o")
        .arg(&env.output)
        .assert()
        .success();

    assert!(env.output.join("results_SimilarityMatrix.csv").is_file());
    assert!(env.output.join("results_GenomeInfo.csv").is_file());
}

#[test]
fn test_missing_genome_dir_is_config_error() {
    let env = TestEnvironment::new();

    ltrmeta()
        .arg("summarize")
        .arg("-g")
        .arg(env.root().join("nowhere"))
        .arg("-r")
        .arg(&env.results)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn test_folder_count_mismatch_exit_code() {
    let env = populated_env();
    env.add_genome("Crubella.fa", 1000, 0);

    ltrmeta()
        .arg("summarize")
        .arg("-g")
        .arg(&env.genomes)
        .arg("-r")
        .arg(&env.results)
        .arg("-o")
        .arg(&env.output)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Crubella"));

    assert!(!env.output.exists());
}

#[test]
fn test_incompatible_bin_width() {
    let env = populated_env();

    ltrmeta()
        .arg("summarize")
        .arg("-g")
        .arg(&env.genomes)
        .arg("-r")
        .arg(&env.results)
        .arg("--threshold")
        .arg("99")
        .arg("--bin-width")
        .arg("5")
        .assert()
        .code(2);
}

#[test]
fn test_results_and_manifest_conflict() {
    let env = populated_env();

    ltrmeta()
        .arg("summarize")
        .arg("-g")
        .arg(&env.genomes)
        .arg("-r")
        .arg(&env.results)
        .arg("-m")
        .arg(env.root().join("manifest.toml"))
        .assert()
        .failure();
}

#[test]
fn test_export_bed() {
    let env = TestEnvironment::new();
    let input = env.root().join("sheet.tsv");
    fs::write(
        &input,
        datasheet(&[
            good("te1", 95.0, 500),
            good("te2", 50.0, 500),
            good("te3", 80.0, 200),
        ]),
    )
    .unwrap();
    let bed = env.root().join("out.bed");

    ltrmeta()
        .arg("export")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&bed)
        .assert()
        .success();

    let contents = fs::read_to_string(&bed).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Chr1\t999\t1499\tte1\t95\t+");
}

#[test]
fn test_export_malformed_table() {
    let env = TestEnvironment::new();
    let input = env.root().join("sheet.tsv");
    fs::write(&input, "name\tscore\nx\t1\n").unwrap();

    ltrmeta()
        .arg("export")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(env.root().join("out.bed"))
        .assert()
        .code(4);
}

#[test]
fn test_stats_json() {
    let env = TestEnvironment::new();
    let input = env.root().join("sheet.tsv");
    fs::write(
        &input,
        datasheet(&[
            good("te1", 95.0, 500),
            good("te2", 50.0, 500),
            good("te3", 80.0, 200),
        ]),
    )
    .unwrap();

    ltrmeta()
        .arg("stats")
        .arg("-i")
        .arg(&input)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_records\": 3"))
        .stdout(predicate::str::contains("\"retained_records\": 2"));
}

#[test]
fn test_config_init_and_show() {
    let env = TestEnvironment::new();
    let path = env.root().join("ltrmeta.toml");

    ltrmeta()
        .arg("config")
        .arg("init")
        .arg(&path)
        .assert()
        .success();
    assert!(path.is_file());

    ltrmeta()
        .arg("config")
        .arg("init")
        .arg(&path)
        .assert()
        .code(2);

    let contents = fs::read_to_string(&path)
        .unwrap()
        .replace("similarity_threshold = 70.0", "similarity_threshold = 85.0");
    fs::write(&path, contents).unwrap();

    ltrmeta()
        .arg("--config")
        .arg(&path)
        .arg("config")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("similarity_threshold = 85.0"));
}

#[test]
fn test_broken_config_file() {
    let env = TestEnvironment::new();
    let path = env.root().join("broken.toml");
    fs::write(&path, "[filter\nsimilarity_threshold = ").unwrap();

    ltrmeta()
        .arg("--config")
        .arg(&path)
        .arg("config")
        .arg("show")
        .assert()
        .code(2);
}
