//! Flattening of nested JSON documents, through the library and `run_app`.

use std::fs;

use clap::Parser;
use serde_json::{json, Value};
use tabdupe::cli::Cli;
use tabdupe::error::ExitCode;
use tabdupe::flatten::{flatten, flatten_file};
use tempfile::tempdir;

fn calculation_record() -> Value {
    json!({
        "calculation-relax-static": {
            "key": "00999575-6044-4420-baf5-9bb33e60b02c",
            "calculation": {
                "iprPy-version": "0.8.3",
                "atomman-version": "1.2.4",
                "LAMMPS-version": "22 Aug 2018",
                "script": "calc_relax_static",
                "run-parameter": {
                    "size-multipliers": {"a": [0, 1], "b": [0, 1], "c": [0, 1]},
                    "energytolerance": 0.0,
                    "forcetolerance": {"value": 1e-10, "unit": "eV/angstrom"},
                    "maxiterations": 10000,
                    "maxevaluations": 100000,
                    "maxatommotion": {"value": 0.01, "unit": "angstrom"}
                }
            },
            "potential-LAMMPS": {
                "key": "bb69cb78-f906-476f-866a-8411864e5130",
                "id": "1996--Farkas-D--Nb-Ti-Al--LAMMPS--ipr1",
                "potential": {
                    "key": "0856888b-57ec-4005-828d-d1b0c331f120",
                    "id": "1996--Farkas-D-Jones-C--Nb-Ti-Al"
                }
            }
        }
    })
}

fn flattened_calculation_record() -> Value {
    json!({
        "calculation-relax-static.calculation.LAMMPS-version": "22 Aug 2018",
        "calculation-relax-static.calculation.atomman-version": "1.2.4",
        "calculation-relax-static.calculation.iprPy-version": "0.8.3",
        "calculation-relax-static.calculation.run-parameter.energytolerance": 0.0,
        "calculation-relax-static.calculation.run-parameter.forcetolerance.unit": "eV/angstrom",
        "calculation-relax-static.calculation.run-parameter.forcetolerance.value": 1e-10,
        "calculation-relax-static.calculation.run-parameter.maxatommotion.unit": "angstrom",
        "calculation-relax-static.calculation.run-parameter.maxatommotion.value": 0.01,
        "calculation-relax-static.calculation.run-parameter.maxevaluations": 100000,
        "calculation-relax-static.calculation.run-parameter.maxiterations": 10000,
        "calculation-relax-static.calculation.run-parameter.size-multipliers.a.0": 0,
        "calculation-relax-static.calculation.run-parameter.size-multipliers.a.1": 1,
        "calculation-relax-static.calculation.run-parameter.size-multipliers.b.0": 0,
        "calculation-relax-static.calculation.run-parameter.size-multipliers.b.1": 1,
        "calculation-relax-static.calculation.run-parameter.size-multipliers.c.0": 0,
        "calculation-relax-static.calculation.run-parameter.size-multipliers.c.1": 1,
        "calculation-relax-static.calculation.script": "calc_relax_static",
        "calculation-relax-static.key": "00999575-6044-4420-baf5-9bb33e60b02c",
        "calculation-relax-static.potential-LAMMPS.id": "1996--Farkas-D--Nb-Ti-Al--LAMMPS--ipr1",
        "calculation-relax-static.potential-LAMMPS.key": "bb69cb78-f906-476f-866a-8411864e5130",
        "calculation-relax-static.potential-LAMMPS.potential.id": "1996--Farkas-D-Jones-C--Nb-Ti-Al",
        "calculation-relax-static.potential-LAMMPS.potential.key": "0856888b-57ec-4005-828d-d1b0c331f120"
    })
}

#[test]
fn test_flatten_calculation_record() {
    let flat = flatten(&calculation_record());
    assert_eq!(Value::Object(flat), flattened_calculation_record());
}

#[test]
fn test_flattened_record_is_a_fixed_point() {
    let expected = flattened_calculation_record();
    assert_eq!(Value::Object(flatten(&expected)), expected);
}

#[test]
fn test_flatten_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("record.json");
    fs::write(&path, calculation_record().to_string()).unwrap();

    let flat = flatten_file(&path).unwrap();
    assert_eq!(flat.len(), 22);
}

#[test]
fn test_flatten_command_writes_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("record.json");
    fs::write(&input, calculation_record().to_string()).unwrap();
    let out_dir = dir.path().join("flat");

    let cli = Cli::try_parse_from([
        "tabdupe",
        "flatten",
        "--input",
        input.to_str().unwrap(),
        "--destination",
        out_dir.to_str().unwrap(),
        "--write",
        "--no-print",
    ])
    .unwrap();
    assert_eq!(tabdupe::run_app(cli).unwrap(), ExitCode::Success);

    let written = fs::read_to_string(out_dir.join("record.flat.json")).unwrap();
    let value: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value, flattened_calculation_record());
}

#[test]
fn test_flatten_command_without_input() {
    let cli = Cli::try_parse_from(["tabdupe", "flatten", "--no-print"]).unwrap();
    assert_eq!(tabdupe::run_app(cli).unwrap(), ExitCode::Success);
}

#[test]
fn test_flatten_command_write_requires_input() {
    let cli = Cli::try_parse_from(["tabdupe", "flatten", "--write", "--no-print"]).unwrap();
    let err = tabdupe::run_app(cli).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
}

#[test]
fn test_flatten_command_invalid_json() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.json");
    fs::write(&input, "{\"a\": ").unwrap();

    let cli = Cli::try_parse_from([
        "tabdupe",
        "flatten",
        "--input",
        input.to_str().unwrap(),
        "--no-print",
    ])
    .unwrap();
    let err = tabdupe::run_app(cli).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));
}
