use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devtrack::{
    Dashboard, ProjectRecord, Snapshot, Stats, ViewPage,
    assistant::rules::format_naira,
    config::{Cli, Command, FilterArgs, ListArgs},
    core::{JsonProjectSource, ProjectDb, ProjectRepository, ProjectStore, load},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("devtrack={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &cli.command {
        Command::Import { file } => import(&cli.db, file).await,
        Command::List(args) => list(&cli, args).await,
        Command::Stats { filters, json } => stats(&cli, filters, *json).await,
        Command::Ask { question, json } => ask(&cli, &question.join(" "), *json).await,
        Command::Report { filters } => report(&cli, filters).await,
    }
}

async fn import(db_file: &Path, file: &Path) -> anyhow::Result<()> {
    let source = JsonProjectSource::new(file);
    let projects = source
        .fetch_projects()
        .await
        .with_context(|| format!("Failed to read {:?}", file))?;

    let db = ProjectDb::new(db_file).await?;
    let written = db.import_projects(&projects).await?;
    let total = db.count_projects().await?;
    db.close().await?;

    println!("Imported {written} projects into {:?} ({total} in store)", db_file);
    Ok(())
}

async fn load_snapshot(cli: &Cli) -> anyhow::Result<Snapshot> {
    let snapshot = match &cli.json {
        Some(path) => load(&JsonProjectSource::new(path)).await,
        None => {
            let db = ProjectDb::open_existing(&cli.db).await?;
            let snapshot = load(&db).await;
            db.close().await?;
            snapshot
        }
    };
    snapshot.context("Failed to load projects")
}

async fn dashboard(cli: &Cli, filters: &FilterArgs) -> anyhow::Result<Dashboard> {
    let mut dashboard = Dashboard::new(load_snapshot(cli).await?);
    dashboard.set_filter(filters.to_spec()?);
    Ok(dashboard)
}

fn cell(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn print_row(record: &ProjectRecord) {
    let sn = record.sn.map(|sn| sn.to_string()).unwrap_or_default();
    let amount = record.contract_amount.map(format_naira).unwrap_or_default();
    println!(
        "{:>5}  {:<8} {:<16} {:<28} {:>18}  {}",
        sn,
        cell(&record.state),
        cell(&record.lga),
        cell(&record.status),
        amount,
        cell(&record.description),
    );
}

fn print_page(page: &ViewPage) {
    for record in &page.items {
        print_row(record);
    }
    println!();
    println!("{}", page.showing());
    println!("Page {} of {}", page.page, page.total_pages.max(1));
}

async fn list(cli: &Cli, args: &ListArgs) -> anyhow::Result<()> {
    let mut dashboard = dashboard(cli, &args.filters).await?;
    dashboard.set_query(args.query.clone());
    dashboard.set_sort(args.sort_state());
    dashboard.set_page_size(args.page_size);
    dashboard.go_to_page(args.page);
    print_page(&dashboard.page());
    Ok(())
}

fn print_stats(stats: &Stats) {
    println!("Total projects:      {}", stats.total);
    println!("Completed:           {}", stats.completed);
    println!("Ongoing:             {}", stats.ongoing);
    println!("Abandoned:           {}", stats.abandoned);
    println!("Yet to commence:     {}", stats.yet_to_commence);
    println!("Completion rate:     {}%", stats.completion_rate);
    println!("Total budget:        {}", format_naira(stats.total_budget));
    println!("Total disbursed:     {}", format_naira(stats.total_disbursed));
    println!("Disbursement rate:   {}%", stats.disbursement_rate);
    println!("Average budget:      {}", format_naira(stats.average_budget));
    println!(
        "Coverage:            {} states, {} LGAs",
        stats.coverage.states, stats.coverage.lgas
    );

    println!("\nBy status");
    for status in &stats.by_status {
        println!("  {:<30} {:>6} {:>4}%", status.status, status.count, status.percent);
    }

    println!("\nBy state");
    for state in &stats.by_state {
        println!(
            "  {:<12} {:>6} projects {:>4} LGAs {:>20} budget {:>20} disbursed {:>4}% complete",
            state.state,
            state.count,
            state.lga_count,
            format_naira(state.budget),
            format_naira(state.disbursed),
            state.completion_rate,
        );
    }

    println!("\nBy pillar");
    for pillar in &stats.by_pillar {
        println!(
            "  {:<28} {:>6} projects {:>20} budget {:>4}% complete",
            pillar.pillar,
            pillar.count,
            format_naira(pillar.budget),
            pillar.completion_rate,
        );
    }
}

async fn stats(cli: &Cli, filters: &FilterArgs, json: bool) -> anyhow::Result<()> {
    let stats = dashboard(cli, filters).await?.stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats);
    }
    Ok(())
}

async fn ask(cli: &Cli, question: &str, json: bool) -> anyhow::Result<()> {
    let dashboard = Dashboard::new(load_snapshot(cli).await?);
    let answer = dashboard.ask(question);
    if json {
        println!("{}", serde_json::to_string(&answer.directive)?);
        return Ok(());
    }
    println!("{}", answer.summary);
    if let Some(directive) = &answer.directive {
        println!("\nFilter: {}", serde_json::to_string(directive)?);
    }
    Ok(())
}

async fn report(cli: &Cli, filters: &FilterArgs) -> anyhow::Result<()> {
    let summary = dashboard(cli, filters).await?.export();
    println!("Subject: {}", summary.email_subject());
    println!();
    println!("{}", summary.email_body());
    println!("{}", summary.mailto_link());
    Ok(())
}
