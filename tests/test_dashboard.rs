//! Integration tests for a dashboard session over a loaded snapshot.
//!
//! Tests cover:
//! - Filtering, searching, sorting and paging together
//! - Aggregates over the filtered records
//! - Assistant answers whose directives reproduce their counts
//! - Directives surviving a trip through JSON

mod common;

use devtrack::{
    Intent,
    table::{FilterField, SortDir, SortKey, SortState},
};

use common::*;

async fn sample_dashboard() -> anyhow::Result<(Dashboard, tempfile::TempDir)> {
    let (db, temp_dir) = create_test_db().await;
    db.import_projects(&sample_projects()).await?;
    let snapshot = load(&db).await?;
    db.close().await?;
    Ok((Dashboard::new(snapshot), temp_dir))
}

#[tokio::test]
async fn test_filter_sort_and_page() -> anyhow::Result<()> {
    let (mut dashboard, _temp_dir) = sample_dashboard().await?;

    // 1. Everything is visible before any filter is set
    assert_eq!(dashboard.page().total_matching, 6);

    // 2. Restrict to Borno and Adamawa, sorted by budget descending
    dashboard.update_filter(|spec| {
        spec.toggle(FilterField::States, "Borno");
        spec.toggle(FilterField::States, "Adamawa");
    });
    dashboard.set_sort(SortState::new(SortKey::ContractAmount, SortDir::Desc));
    let page = dashboard.page();
    let sns: Vec<Option<i64>> = page.items.iter().map(|r| r.sn).collect();
    assert_eq!(sns, vec![Some(1), Some(2), Some(4)]);
    assert_eq!(page.showing(), "Showing 3 of 3 projects");

    // 3. Dropping Borno prunes its LGA from the selection
    dashboard.update_filter(|spec| spec.toggle(FilterField::Lgas, "Biu"));
    assert_eq!(dashboard.filtered().len(), 1);
    dashboard.update_filter(|spec| {
        spec.set_states(["Adamawa"]);
    });
    assert!(dashboard.filter().lgas().is_empty());
    assert_eq!(dashboard.filtered().len(), 1);

    // 4. Small pages clamp when asked for too much
    dashboard.set_filter(FilterSpec::new());
    dashboard.set_page_size(4);
    dashboard.go_to_page(7);
    let page = dashboard.page();
    assert_eq!((page.page, page.total_pages, page.items.len()), (2, 2, 2));

    Ok(())
}

#[tokio::test]
async fn test_stats_follow_the_filter() -> anyhow::Result<()> {
    let (mut dashboard, _temp_dir) = sample_dashboard().await?;

    // 1. Whole register
    let stats = dashboard.stats();
    assert_eq!(stats.total, 6);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.ongoing, 2);
    assert_eq!(stats.completion_rate, 33);
    assert_eq!(stats.total_budget, amount("7300001.00"));
    assert_eq!(stats.pillar("Healthy Citizens").map(|p| p.count), Some(2));
    assert_eq!(
        stats.pillar("Leadership in Agriculture").map(|p| p.budget),
        Some(amount("1550000.75"))
    );

    // 2. Only Borno
    dashboard.set_filter(FilterSpec::new().with_states(["Borno"]));
    let stats = dashboard.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.by_state.len(), 1);
    assert_eq!(stats.by_state[0].lga_count, 2);
    assert_eq!(stats.completion_rate, 50);

    Ok(())
}

#[tokio::test]
async fn test_assistant_directives_reproduce_their_counts() -> anyhow::Result<()> {
    let (mut dashboard, _temp_dir) = sample_dashboard().await?;

    let cases = [
        ("Show me ongoing projects", 2),
        ("list completed work", 2),
        ("anything abandoned?", 1),
        ("projects in Borno", 2),
        ("agriculture", 2),
        ("health clinics", 2),
        ("schools", 1),
    ];
    for (question, expected) in cases {
        let answer = dashboard.ask(question);
        assert!(
            answer.summary.starts_with(&format!("Found {expected} ")),
            "{question}: {}",
            answer.summary
        );
        assert!(dashboard.apply_directive(&answer), "{question}");
        assert_eq!(dashboard.filtered().len(), expected, "{question}");
    }

    Ok(())
}

#[tokio::test]
async fn test_directive_survives_json_hand_off() -> anyhow::Result<()> {
    let (dashboard, _temp_dir) = sample_dashboard().await?;

    // 1. Ask in one view and serialize the directive
    let answer = dashboard.ask("completed agriculture projects in Borno");
    assert_eq!(answer.intent, Intent::Completed);
    let json = serde_json::to_string(&answer.directive)?;

    // 2. A second, independent view picks it up
    let spec: Option<FilterSpec> = serde_json::from_str(&json)?;
    let mut other = Dashboard::new(dashboard.snapshot().clone());
    other.set_filter(spec.expect("completed answers carry a directive"));
    assert_eq!(other.filtered().len(), 2);
    assert!(other.filtered().iter().all(|r| r.is_completed()));

    // 3. The export summary describes the same view
    let export = other.export();
    assert_eq!(export.record_count, 2);
    assert!(export.filter_description.starts_with("Pillars: All\nStates: All"));

    Ok(())
}

#[tokio::test]
async fn test_totals_and_finance_answers() -> anyhow::Result<()> {
    let (dashboard, _temp_dir) = sample_dashboard().await?;

    let totals = dashboard.ask("How many projects do we have in total?");
    assert_eq!(totals.intent, Intent::Totals);
    assert!(totals.directive.is_none());
    assert!(totals.summary.contains("Total Projects: 6"));

    let finance = dashboard.ask("What's the budget?");
    assert_eq!(finance.intent, Intent::Finance);
    assert!(finance.summary.contains("Total Budget: ₦7,300,001"), "{}", finance.summary);
    assert!(finance.summary.contains("Disbursement Rate: 0%"));

    Ok(())
}
