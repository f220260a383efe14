use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use focus_planner::config::{Config, ConfigOverrides};
use focus_planner::coverage::{analyze_coverage, CoverageResult};
use focus_planner::goals::rows::{available_months, read_goal_rows, rows_for_month};
use focus_planner::goals::{build_catalog, EmptyCellPolicy, GoalCatalog, GoalId};
use focus_planner::optimizer::diff::diff_plans;
use focus_planner::optimizer::simulator::simulate_plan;
use focus_planner::optimizer::suggestions::summarize_actions;
use focus_planner::optimizer::{SimulationResult, SuggestedAction, WeekDiff};
use focus_planner::output::csv::{
    actions_to_csv, catalog_to_csv, coverage_to_csv, plan_to_csv, progress_to_csv,
    simulation_to_csv, weeks_to_csv,
};
use focus_planner::output::render_json;
use focus_planner::output::table::{
    render_actions_table, render_catalog_table, render_coverage_table, render_plan_table,
    render_progress_table, render_simulation_table, render_weeks_table,
};
use focus_planner::plan::{Bucket, WeekCalendar, WeekKey};
use focus_planner::progress::{compute_progress, set_done, ProgressReport};
use focus_planner::snapshot::store::StateStore;
use focus_planner::snapshot::AppState;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CellPolicyArg {
    Fallback,
    Drop,
}

impl From<CellPolicyArg> for EmptyCellPolicy {
    fn from(value: CellPolicyArg) -> Self {
        match value {
            CellPolicyArg::Fallback => EmptyCellPolicy::Fallback,
            CellPolicyArg::Drop => EmptyCellPolicy::Drop,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "focus-planner",
    about = "Monthly goal coverage for weekly focus and background slots"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    state: Option<String>,
    #[arg(short, long)]
    goals: Option<String>,
    #[arg(short, long)]
    month: Option<String>,
    #[arg(long = "empty-cells", value_enum)]
    empty_cells: Option<CellPolicyArg>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Init {
        #[arg(long)]
        year: i32,
        #[arg(long = "month-number")]
        month_number: u32,
    },
    Weeks,
    Catalog,
    Plan,
    Assign {
        #[arg(long)]
        week: String,
        #[arg(long, default_value = "")]
        focus: String,
        #[arg(long, default_value = "")]
        background: String,
    },
    Coverage,
    Suggest,
    Simulate {
        #[arg(long)]
        commit: bool,
    },
    Check {
        #[arg(long)]
        week: String,
        #[arg(long, default_value = "focus")]
        bucket: String,
        #[arg(long)]
        goal: String,
        #[arg(long)]
        undo: bool,
    },
    Progress,
    Note {
        #[arg(long)]
        week: String,
        #[arg(long, default_value = "")]
        text: String,
    },
    Reset,
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        state_path: cli.state.clone(),
        goals_path: cli.goals.clone(),
        empty_cell_policy: cli.empty_cells.map(Into::into),
    });

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }

    let store = StateStore::open(&config.resolved_state_path());
    let mut state = store.load()?;

    match &cli.command {
        Commands::Init { year, month_number } => {
            let calendar = WeekCalendar::for_month(*year, *month_number)?;
            let month = cli
                .month
                .clone()
                .unwrap_or_else(|| month_number.to_string());
            info!(month = %month, weeks = calendar.weeks.len(), "starting new month");
            state = AppState::for_calendar(month, calendar);
            store.save(&state)?;
            print_weeks(&state, cli.output)?;
        }
        Commands::Weeks => print_weeks(&state, cli.output)?,
        Commands::Catalog => {
            let catalog = load_catalog(&config, &state, cli.month.as_deref())?;
            match cli.output {
                OutputFormat::Table => println!("{}", render_catalog_table(&catalog)),
                OutputFormat::Json => println!("{}", render_json(&catalog)?),
                OutputFormat::Csv => println!("{}", catalog_to_csv(&catalog)?),
            }
        }
        Commands::Plan => {
            let catalog = load_catalog_or_empty(&config, &state, cli.month.as_deref())?;
            print_plan(&state, &catalog, cli.output)?;
        }
        Commands::Assign {
            week,
            focus,
            background,
        } => {
            let week = resolve_week(&state, week)?;
            let catalog = load_catalog_or_empty(&config, &state, cli.month.as_deref())?;
            let focus = split_labels(focus);
            let background = split_labels(background);
            warn_unknown_goals(&catalog, &focus);
            warn_unknown_goals(&catalog, &background);
            let outcome = state.plan.assign(&week, focus, background);
            if outcome.was_clamped() {
                println!(
                    "Slot caps applied: ignored {} focus and {} background goals",
                    outcome.focus_clamped.len(),
                    outcome.background_clamped.len()
                );
            }
            store.save(&state)?;
            print_plan(&state, &catalog, cli.output)?;
        }
        Commands::Coverage => {
            let catalog = load_catalog(&config, &state, cli.month.as_deref())?;
            let result = analyze_coverage(&require_weeks(&state)?, &state.plan, &catalog);
            print_coverage(&result, cli.output)?;
        }
        Commands::Suggest => {
            let catalog = load_catalog(&config, &state, cli.month.as_deref())?;
            let result = analyze_coverage(&require_weeks(&state)?, &state.plan, &catalog);
            if result.is_fully_covered() {
                info!(goals = result.num_max_goals, "every must-do goal has a focus slot");
                if matches!(cli.output, OutputFormat::Table) {
                    println!("All must-do goals already have a focus slot.");
                }
            }
            let actions = summarize_actions(&result);
            let unresolved = result.unresolved();
            if !unresolved.is_empty() {
                warn!(count = unresolved.len(), "some must-do goals cannot be placed");
            }
            print_actions(&actions, &catalog, &state, cli.output)?;
        }
        Commands::Simulate { commit } => {
            let catalog = load_catalog(&config, &state, cli.month.as_deref())?;
            let week_keys = require_weeks(&state)?;
            let result = analyze_coverage(&week_keys, &state.plan, &catalog);
            let actions = summarize_actions(&result);
            let simulation = simulate_plan(&state.plan, &actions, &catalog);
            let diffs = diff_plans(&week_keys, &state.plan, &simulation.virtual_plan);
            print_simulation(&simulation, &diffs, &catalog, &state, cli.output)?;
            if *commit {
                state.plan = simulation.virtual_plan;
                store.save(&state)?;
                info!(changed_weeks = diffs.len(), "committed simulated plan");
            }
        }
        Commands::Check {
            week,
            bucket,
            goal,
            undo,
        } => {
            let week = resolve_week(&state, week)?;
            let bucket: Bucket = bucket.parse()?;
            let goal_id = GoalId::from_label(goal);
            let planned = state
                .plan
                .week(&week)
                .map(|slots| slots.bucket(bucket).contains(&goal_id))
                .unwrap_or(false);
            if !planned {
                return Err(anyhow!("{goal} is not planned in {week} {bucket}"));
            }
            if !set_done(&mut state.completions, &week, bucket, &goal_id, !*undo) {
                warn!(week = %week, goal = %goal_id, "check mark unchanged");
            }
            store.save(&state)?;
            let report = compute_progress(&state.week_keys(), &state.plan, &state.completions);
            print_progress(&report, &state, cli.output)?;
        }
        Commands::Progress => {
            let report = compute_progress(&state.week_keys(), &state.plan, &state.completions);
            print_progress(&report, &state, cli.output)?;
        }
        Commands::Note { week, text } => {
            let week = resolve_week(&state, week)?;
            state.set_note(&week, text);
            store.save(&state)?;
            match state.notes.get(&week) {
                Some(note) => println!("{week}: {note}"),
                None => println!("{week}: note cleared"),
            }
        }
        Commands::Reset => {
            state.reset();
            store.save(&state)?;
            println!("State cleared: {}", store.path().display());
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &Path) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn load_catalog(config: &Config, state: &AppState, month: Option<&str>) -> Result<GoalCatalog> {
    let path = config
        .resolved_goals_path()
        .ok_or_else(|| anyhow!("no goal sheet given; pass --goals or set storage.goals_path"))?;
    let rows = read_goal_rows(&path, &config.goals.columns())?;
    let month = month
        .map(str::to_string)
        .or_else(|| state.month.clone())
        .ok_or_else(|| {
            anyhow!(
                "no month selected; pass --month (available: {})",
                available_months(&rows).join(", ")
            )
        })?;
    let month_rows = rows_for_month(&rows, &month);
    if month_rows.is_empty() {
        warn!(month = %month, "no goal rows for month");
    }
    let catalog = build_catalog(&month_rows, &config.goals.catalog_options());
    info!(month = %month, goals = catalog.len(), "loaded goal catalog");
    Ok(catalog)
}

fn load_catalog_or_empty(
    config: &Config,
    state: &AppState,
    month: Option<&str>,
) -> Result<GoalCatalog> {
    if config.resolved_goals_path().is_none() {
        return Ok(GoalCatalog::new());
    }
    load_catalog(config, state, month).context("failed loading goal catalog")
}

fn require_weeks(state: &AppState) -> Result<Vec<WeekKey>> {
    let keys = state.week_keys();
    if keys.is_empty() {
        return Err(anyhow!("no month initialized; run `init --year --month-number` first"));
    }
    Ok(keys)
}

fn resolve_week(state: &AppState, input: &str) -> Result<WeekKey> {
    let calendar = state
        .calendar
        .as_ref()
        .ok_or_else(|| anyhow!("no month initialized; run `init` first"))?;
    Ok(calendar.resolve(input)?)
}

fn warn_unknown_goals(catalog: &GoalCatalog, ids: &[GoalId]) {
    if catalog.is_empty() {
        return;
    }
    for id in catalog.unknown_ids(ids) {
        match catalog.find_by_item(id.as_str()) {
            Some(goal) => warn!(goal = %id, did_you_mean = %goal.label, "goal not in catalog"),
            None => warn!(goal = %id, "goal not in catalog; coverage will ignore it"),
        }
    }
}

fn split_labels(raw: &str) -> Vec<GoalId> {
    raw.split('|')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(GoalId::from_label)
        .collect()
}

fn print_weeks(state: &AppState, format: OutputFormat) -> Result<()> {
    let Some(calendar) = state.calendar.as_ref() else {
        println!("No month initialized.");
        return Ok(());
    };
    match format {
        OutputFormat::Table => println!("{}", render_weeks_table(calendar)),
        OutputFormat::Json => println!("{}", render_json(calendar)?),
        OutputFormat::Csv => println!("{}", weeks_to_csv(calendar)?),
    }
    Ok(())
}

fn print_plan(state: &AppState, catalog: &GoalCatalog, format: OutputFormat) -> Result<()> {
    let keys = state.week_keys();
    let calendar = state.calendar.as_ref();
    match format {
        OutputFormat::Table => println!(
            "{}",
            render_plan_table(&keys, &state.plan, catalog, calendar)
        ),
        OutputFormat::Json => println!("{}", render_json(&state.plan)?),
        OutputFormat::Csv => println!("{}", plan_to_csv(&keys, &state.plan, catalog, calendar)?),
    }
    Ok(())
}

fn print_coverage(result: &CoverageResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_coverage_table(result)),
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Csv => println!("{}", coverage_to_csv(result)?),
    }
    Ok(())
}

fn print_actions(
    actions: &[SuggestedAction],
    catalog: &GoalCatalog,
    state: &AppState,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!(
            "{}",
            render_actions_table(actions, catalog, state.calendar.as_ref())
        ),
        OutputFormat::Json => println!("{}", render_json(actions)?),
        OutputFormat::Csv => println!("{}", actions_to_csv(actions, catalog)?),
    }
    Ok(())
}

#[derive(Serialize)]
struct SimulationView<'a> {
    #[serde(flatten)]
    simulation: &'a SimulationResult,
    diff: &'a [WeekDiff],
}

fn print_simulation(
    simulation: &SimulationResult,
    diffs: &[WeekDiff],
    catalog: &GoalCatalog,
    state: &AppState,
    format: OutputFormat,
) -> Result<()> {
    let calendar = state.calendar.as_ref();
    match format {
        OutputFormat::Table => {
            println!(
                "{}",
                render_simulation_table(simulation, diffs, catalog, calendar)
            );
            println!(
                "{}",
                render_plan_table(
                    &state.week_keys(),
                    &simulation.virtual_plan,
                    catalog,
                    calendar
                )
            );
        }
        OutputFormat::Json => println!(
            "{}",
            render_json(&SimulationView {
                simulation,
                diff: diffs,
            })?
        ),
        OutputFormat::Csv => println!(
            "{}",
            simulation_to_csv(simulation, &state.week_keys(), catalog, calendar)?
        ),
    }
    Ok(())
}

fn print_progress(report: &ProgressReport, state: &AppState, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!(
            "{}",
            render_progress_table(report, state.calendar.as_ref())
        ),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => println!("{}", progress_to_csv(report)?),
    }
    Ok(())
}
