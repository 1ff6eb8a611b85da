// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use serde_json::json;
use sitebook::{cli, commands::exporter, db};
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = db::open_in_memory().unwrap();
    conn.execute(
        "INSERT INTO sites(id,name,final_quotation,status_id,created_at) VALUES (1,'Corner Shop Fitout','2000',1,'2025-01-01T00:00:00Z')",
        [],
    )
    .unwrap();
    conn.execute("INSERT INTO expense_categories(id,name) VALUES (1,'Joinery')", [])
        .unwrap();
    conn
}

fn run_export(conn: &Connection, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "sitebook",
        "export",
        "transactions",
        "--project",
        "1",
        "--format",
        format,
        "--out",
        out,
    ]);
    match matches.subcommand() {
        Some(("export", export_m)) => exporter::handle(conn, export_m),
        _ => panic!("no export subcommand"),
    }
}

#[test]
fn export_transactions_writes_pretty_json_timeline() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO expenses(site_id,category_id,amount,remarks,created_at) VALUES \
        (1,1,'12.34','Weekly run','2025-01-02T00:00:00Z')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO incomes(site_id,amount,remarks,created_at) VALUES \
        (1,'500',NULL,'2025-01-03T00:00:00Z')",
        [],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();
    run_export(&conn, "json", &out_str).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": 1,
                "kind": "income",
                "date": "2025-01-03T00:00:00Z",
                "description": "Income from Corner Shop Fitout",
                "category": null,
                "amount": "500",
                "remarks": null
            },
            {
                "id": 1,
                "kind": "expense",
                "date": "2025-01-02T00:00:00Z",
                "description": "Expense for Corner Shop Fitout",
                "category": "Joinery",
                "amount": "12.34",
                "remarks": "Weekly run"
            }
        ])
    );
}

#[test]
fn export_transactions_writes_csv_header_and_rows() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO expenses(site_id,category_id,amount,remarks,created_at) VALUES \
        (1,1,'8','Hinges','2025-01-02T00:00:00Z')",
        [],
    )
    .unwrap();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    run_export(&conn, "CSV", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "id,kind,date,description,category,amount,remarks");
    assert_eq!(
        lines[1],
        "1,expense,2025-01-02T00:00:00Z,Expense for Corner Shop Fitout,Joinery,8,Hinges"
    );
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    assert!(run_export(&conn, "xml", &out_path.to_string_lossy()).is_err());
    assert!(!out_path.exists());
}
