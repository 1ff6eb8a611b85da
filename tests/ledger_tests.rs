// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use rusqlite::Connection;
use rust_decimal_macros::dec;
use sitebook::commands::{categories, statuses};
use sitebook::{cli, db};
use sitebook::error::SiteError;
use sitebook::ledger::{self, NewProject, ProjectPatch, TransactionInput};
use sitebook::models::TransactionKind;
use sitebook::source::{project_transactions, RecordSource, SqliteSource};

fn setup() -> (Connection, i64) {
    let conn = db::open_in_memory().unwrap();
    conn.execute("INSERT INTO expense_categories(name) VALUES ('Cement')", [])
        .unwrap();
    conn.execute("INSERT INTO expense_categories(name) VALUES ('Labour')", [])
        .unwrap();
    let id = ledger::add_project(
        &conn,
        &NewProject {
            name: " Harbour View ".into(),
            initial_quotation: dec!(900),
            final_quotation: dec!(1000),
            status: "ongoing".into(),
        },
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    )
    .unwrap();
    (conn, id)
}

#[test]
fn input_requires_category_iff_expense() {
    assert!(TransactionInput::new(TransactionKind::Income, dec!(1), None, None).is_ok());
    assert!(matches!(
        TransactionInput::new(TransactionKind::Income, dec!(1), None, Some("Cement".into())),
        Err(SiteError::InvalidInput(_))
    ));
    assert!(matches!(
        TransactionInput::new(TransactionKind::Expense, dec!(1), None, None),
        Err(SiteError::InvalidInput(_))
    ));
    assert!(matches!(
        TransactionInput::new(TransactionKind::Expense, dec!(-1), None, Some("Cement".into())),
        Err(SiteError::InvalidInput(_))
    ));
    let e = TransactionInput::new(
        TransactionKind::Expense,
        dec!(2.5),
        Some("bags".into()),
        Some("Cement".into()),
    )
    .unwrap();
    assert_eq!(e.kind(), TransactionKind::Expense);
    assert_eq!(e.amount(), dec!(2.5));
    assert_eq!(e.remarks(), Some("bags"));
}

#[test]
fn add_update_delete_round_through_both_tables() {
    let (conn, pid) = setup();
    let at = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();

    let inc = TransactionInput::Income {
        amount: dec!(300),
        remarks: Some("advance".into()),
    };
    let exp = TransactionInput::Expense {
        amount: dec!(120),
        remarks: None,
        category: "Cement".into(),
    };
    let inc_id = ledger::add_transaction(&conn, pid, &inc, at).unwrap();
    let exp_id = ledger::add_transaction(&conn, pid, &exp, at).unwrap();

    let txs = project_transactions(&SqliteSource::new(&conn), pid).unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].kind, TransactionKind::Income);
    assert_eq!(txs[0].remarks.as_deref(), Some("advance"));
    assert_eq!(txs[1].category.as_deref(), Some("Cement"));
    assert_eq!(txs[1].occurred_at, at);

    ledger::update_transaction(
        &conn,
        exp_id,
        &TransactionInput::Expense {
            amount: dec!(150),
            remarks: Some("extra".into()),
            category: "Labour".into(),
        },
    )
    .unwrap();
    let exp_rows = SqliteSource::new(&conn).fetch_expense_records(pid).unwrap();
    assert_eq!(exp_rows[0].amount, Some(dec!(150)));
    assert_eq!(exp_rows[0].category_name, "Labour");

    ledger::delete_transaction(&conn, TransactionKind::Income, inc_id).unwrap();
    let txs = project_transactions(&SqliteSource::new(&conn), pid).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].kind, TransactionKind::Expense);
}

#[test]
fn missing_rows_and_lookups_are_not_found() {
    let (conn, pid) = setup();
    let inc = TransactionInput::Income {
        amount: dec!(1),
        remarks: None,
    };
    assert!(matches!(
        ledger::add_transaction(&conn, 99, &inc, Utc::now()),
        Err(SiteError::NotFound { entity: "project", .. })
    ));
    assert!(matches!(
        ledger::update_transaction(&conn, 12345, &inc),
        Err(SiteError::NotFound { .. })
    ));
    assert!(matches!(
        ledger::delete_transaction(&conn, TransactionKind::Expense, 12345),
        Err(SiteError::NotFound { .. })
    ));
    let bad_cat = TransactionInput::Expense {
        amount: dec!(1),
        remarks: None,
        category: "Glass".into(),
    };
    assert!(matches!(
        ledger::add_transaction(&conn, pid, &bad_cat, Utc::now()),
        Err(SiteError::NotFound { entity: "expense category", .. })
    ));
}

#[test]
fn projects_are_trimmed_validated_and_patched() {
    let (conn, pid) = setup();
    let src = SqliteSource::new(&conn);
    let p = src.fetch_project(pid).unwrap();
    assert_eq!(p.name, "Harbour View");
    assert_eq!(p.status, "Ongoing");

    ledger::edit_project(
        &conn,
        pid,
        &ProjectPatch {
            final_quotation: Some(dec!(1250)),
            status: Some("Completed".into()),
            ..Default::default()
        },
    )
    .unwrap();
    let p = src.fetch_project(pid).unwrap();
    assert_eq!(p.final_quotation, dec!(1250));
    assert_eq!(p.initial_quotation, dec!(900));
    assert_eq!(p.status, "Completed");
    assert_eq!(p.name, "Harbour View");

    let rejected = ledger::edit_project(
        &conn,
        pid,
        &ProjectPatch {
            name: Some("Renamed".into()),
            initial_quotation: Some(dec!(-5)),
            ..Default::default()
        },
    );
    assert!(matches!(rejected, Err(SiteError::InvalidInput(_))));
    assert_eq!(src.fetch_project(pid).unwrap().name, "Harbour View");

    let blank = NewProject {
        name: "  ".into(),
        initial_quotation: dec!(0),
        final_quotation: dec!(0),
        status: "Ongoing".into(),
    };
    assert!(ledger::add_project(&conn, &blank, Utc::now()).is_err());
}

fn run(conn: &Connection, argv: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("status", m)) => statuses::handle(conn, m),
        Some(("category", m)) => categories::handle(conn, m),
        _ => panic!("command not parsed"),
    }
}

#[test]
fn lookup_commands_share_ledger_name_resolution() {
    let (conn, _) = setup();
    assert_eq!(ledger::status_id(&conn, "ONGOING").unwrap(), 1);
    assert!(matches!(
        ledger::category_id(&conn, "Steel"),
        Err(SiteError::NotFound { entity: "expense category", .. })
    ));

    // the project holds "Ongoing", matched without regard to case
    let err = run(&conn, &["sitebook", "status", "rm", "ongoing"]).unwrap_err();
    assert!(err.to_string().contains("used by 1 project"));

    let err = run(&conn, &["sitebook", "category", "rm", "Steel"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SiteError>(),
        Some(SiteError::NotFound { .. })
    ));

    run(&conn, &["sitebook", "category", "rm", "Labour"]).unwrap();
    assert!(ledger::category_id(&conn, "Labour").is_err());
}
