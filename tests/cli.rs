//! Integration test for the CLI's exit-code contract: a missing
//! configuration file must fail fast, before the kitchen ever starts.

use std::process::Command;

#[test]
fn missing_config_file_exits_non_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_kitchen-sim"))
        .arg("/nonexistent/path/config.json")
        .output()
        .expect("failed to run kitchen-sim binary");

    assert!(
        !output.status.success(),
        "expected a non-zero exit code for an unreadable config file"
    );
}

#[test]
fn missing_orders_source_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        r#"{
            "orders_source": "/nonexistent/path/orders.jsonl",
            "customer_wait_between_orders_ms": 0,
            "courier_min_wait_ms": 0,
            "courier_max_wait_ms": 0,
            "shelf_capacity": { "hot": 10, "cold": 10, "frozen": 10, "overflow": 15 }
        }"#,
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_kitchen-sim"))
        .arg(&config_path)
        .output()
        .expect("failed to run kitchen-sim binary");

    assert!(
        !output.status.success(),
        "expected a non-zero exit code for an unreadable orders source"
    );
}
