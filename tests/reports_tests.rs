// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection};
use rust_decimal_macros::dec;
use sitebook::commands::{doctor, projects, reports};
use sitebook::source::{project_report, SqliteSource};
use sitebook::{cli, config, db};

fn setup() -> Connection {
    let conn = db::open_in_memory().unwrap();
    conn.execute(
        "INSERT INTO sites(id,name,final_quotation,status_id,created_at) VALUES (1,'Lakeside','1000',1,'2025-01-01T00:00:00Z')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO sites(id,name,final_quotation,status_id,created_at) VALUES (2,'Quarry Road','0',2,'2025-02-01T00:00:00Z')",
        [],
    )
    .unwrap();
    for (id, name) in [(1, "Steel"), (2, "Cement"), (3, "Paint")] {
        conn.execute(
            "INSERT INTO expense_categories(id,name) VALUES (?1,?2)",
            params![id, name],
        )
        .unwrap();
    }
    for (cat, amount) in [(1, "300"), (2, "150"), (3, "50"), (1, "0")] {
        conn.execute(
            "INSERT INTO expenses(site_id,category_id,amount,created_at) VALUES (1,?1,?2,'2025-01-05T00:00:00Z')",
            params![cat, amount],
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO incomes(site_id,amount,created_at) VALUES (1,'1200','2025-01-06T00:00:00Z')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO incomes(site_id,amount,created_at) VALUES (2,'500','2025-02-06T00:00:00Z')",
        [],
    )
    .unwrap();
    conn
}

#[test]
fn summary_view_ranks_and_suggests_top_two() {
    let conn = setup();
    let report = project_report(&SqliteSource::new(&conn), 1).unwrap();
    let view = reports::summary_view(&report);

    assert_eq!(view.total_income, "1200.00");
    assert_eq!(view.total_expense, "500.00");
    assert_eq!(view.net_balance, "700.00");
    assert_eq!(view.remaining_from_quote, "-200.00");
    assert_eq!(view.progress, 100);
    assert!(view.ongoing);

    let cats: Vec<(&str, u8)> = view
        .breakdown
        .iter()
        .map(|c| (c.category.as_str(), c.percentage))
        .collect();
    assert_eq!(cats, vec![("Steel", 60), ("Cement", 30), ("Paint", 10)]);
    assert_eq!(view.breakdown[0].amount, dec!(300));
    assert_eq!(view.cost_reduction, vec!["Steel", "Cement"]);
}

#[test]
fn summary_command_runs_for_project() {
    let conn = setup();
    let matches =
        cli::build_cli().get_matches_from(["sitebook", "report", "summary", "--project", "1"]);
    if let Some(("report", m)) = matches.subcommand() {
        reports::handle(&conn, m).unwrap();
    } else {
        panic!("report command not parsed");
    }
}

#[test]
fn project_rows_carry_card_figures() {
    let conn = setup();
    let rows = projects::query_rows(&conn, 10).unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].name, "Quarry Road");
    assert_eq!(rows[0].status, "Completed");
    assert_eq!(rows[0].progress, Some(0));
    assert_eq!(rows[0].profit_or_loss.as_deref(), Some("500.00"));

    assert_eq!(rows[1].name, "Lakeside");
    assert_eq!(rows[1].progress, Some(100));
    assert_eq!(rows[1].expenses.as_deref(), Some("500.00"));
}

#[test]
fn project_rows_survive_unreadable_records() {
    let conn = setup();
    conn.execute(
        "INSERT INTO incomes(site_id,amount,created_at) VALUES (2,'oops','2025-02-07T00:00:00Z')",
        [],
    )
    .unwrap();
    let rows = projects::query_rows(&conn, 10).unwrap();
    assert_eq!(rows[0].name, "Quarry Road");
    assert_eq!(rows[0].progress, None);
    assert_eq!(rows[1].progress, Some(100));
}

#[test]
fn doctor_flags_zero_quotes_and_bad_amounts() {
    let conn = setup();
    conn.execute(
        "INSERT INTO expenses(site_id,category_id,amount,created_at) VALUES (1,1,NULL,'2025-01-05T00:00:00Z')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO incomes(site_id,amount,created_at) VALUES (1,'-3','2025-01-05T00:00:00Z')",
        [],
    )
    .unwrap();
    let issues: Vec<String> = doctor::find_issues(&conn)
        .unwrap()
        .into_iter()
        .map(|r| r[0].clone())
        .collect();
    assert!(issues.contains(&"site_zero_final_quote".to_string()));
    assert!(issues.contains(&"expense_missing_amount".to_string()));
    assert!(issues.contains(&"income_malformed_amount".to_string()));
}

#[test]
fn doctor_flags_sites_the_project_list_cannot_load() {
    let conn = setup();
    conn.execute(
        "INSERT INTO sites(id,name,initial_quotation,final_quotation,status_id,created_at) VALUES (3,'Mill Lane','ten','500',1,'2025-03-01T00:00:00Z')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO sites(id,name,final_quotation,status_id,created_at) VALUES (4,'Dockside','800',1,'last week')",
        [],
    )
    .unwrap();
    assert!(SqliteSource::new(&conn).list_projects(10).is_err());

    let issues = doctor::find_issues(&conn).unwrap();
    assert!(issues.contains(&vec!["site_bad_quotation".to_string(), "#3 Mill Lane".to_string()]));
    assert!(issues.contains(&vec!["site_bad_timestamp".to_string(), "#4 Dockside".to_string()]));
    assert!(!issues.iter().any(|r| r[1] == "#1 Lakeside"));
}

#[test]
fn settings_have_defaults_and_validate() {
    let conn = setup();
    let s = config::Settings::load(&conn).unwrap();
    assert_eq!(s, config::Settings::default());

    config::set(&conn, "currency", " inr ").unwrap();
    config::set(&conn, "list_limit", "5").unwrap();
    let s = config::Settings::load(&conn).unwrap();
    assert_eq!(s.currency, "INR");
    assert_eq!(s.list_limit, 5);

    assert!(config::set(&conn, "list_limit", "0").is_err());
    assert!(config::set(&conn, "theme", "dark").is_err());
}
