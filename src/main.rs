use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pitch_ledger::api::build_router;
use pitch_ledger::api::state::AppState;
use pitch_ledger::calculate::{
    available_tournaments, compute_goal_progress, compute_season_table, evaluate_condition,
    matches_in_year, recent_form, AnalyticsSnapshot,
};
use pitch_ledger::config::AppConfig;
use pitch_ledger::ledger::MatchLedger;
use pitch_ledger::models::{
    AchievementCondition, AchievementMetric, DuelRole, DuelStats, Goal, GoalMetric, GoalPeriod,
    GoalType, MatchId, MatchRecord, MatchResult, NewMatch, PeriodStats, PlayerContribution,
    YearMonth,
};
use pitch_ledger::parse_contribution;
use pitch_ledger::storage::StorageConfig;

#[derive(Parser)]
#[command(name = "pitch-ledger")]
#[command(about = "Personal football match log with streak, morale and campaign analytics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Tracked player's name (overrides the config file)
    #[arg(long)]
    player: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Fields shared by `add` and `edit`.
#[derive(clap::Args)]
struct MatchArgs {
    /// Goals scored by you
    #[arg(long)]
    goals: Option<u32>,

    /// Assists given by you
    #[arg(long)]
    assists: Option<u32>,

    /// Final goal difference from your side
    #[arg(long, allow_hyphen_values = true)]
    diff: Option<i32>,

    /// Tournament or league label
    #[arg(long)]
    tournament: Option<String>,

    #[arg(long)]
    notes: Option<String>,

    /// Teammate as name[:goals[:assists]], repeatable
    #[arg(long = "teammate", value_parser = parse_contribution)]
    teammates: Vec<PlayerContribution>,

    /// Opponent as name[:goals[:assists]], repeatable
    #[arg(long = "opponent", value_parser = parse_contribution)]
    opponents: Vec<PlayerContribution>,
}

impl MatchArgs {
    /// Overlay the given flags on `base`. Player lists are replaced only
    /// when at least one player of that side is given.
    fn apply(self, mut base: NewMatch) -> NewMatch {
        if let Some(goals) = self.goals {
            base.goals_for = goals;
        }
        if let Some(assists) = self.assists {
            base.assists = assists;
        }
        if self.diff.is_some() {
            base.goal_differential = self.diff;
        }
        if self.tournament.is_some() {
            base.tournament = self.tournament;
        }
        if self.notes.is_some() {
            base.notes = self.notes;
        }
        if !self.teammates.is_empty() {
            base.teammates = self.teammates;
        }
        if !self.opponents.is_empty() {
            base.opponents = self.opponents;
        }
        base
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Log a match
    Add {
        /// Match date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// win, draw or loss
        #[arg(long)]
        result: MatchResult,

        #[command(flatten)]
        fields: MatchArgs,
    },

    /// Change a logged match (the campaign is not replayed)
    Edit {
        id: String,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        result: Option<MatchResult>,

        #[command(flatten)]
        fields: MatchArgs,
    },

    /// Remove a logged match (the campaign is not replayed)
    Delete { id: String },

    /// List matches, most recent first
    List {
        #[arg(long)]
        year: Option<i32>,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show all-time records
    Records {
        #[arg(long)]
        year: Option<i32>,
    },

    /// Show streaks still running
    Streaks {
        #[arg(long)]
        year: Option<i32>,
    },

    /// Show morale level and trend
    Morale {
        #[arg(long)]
        year: Option<i32>,
    },

    /// Rank teammates and opponents by impact
    Duels {
        #[arg(long)]
        year: Option<i32>,

        /// Rows per list
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Show one player's rows only
        #[arg(long)]
        player: Option<String>,
    },

    /// Players leaderboard
    Players {
        #[arg(long)]
        year: Option<i32>,
    },

    /// Per-year and per-tournament table
    Table {
        #[arg(long)]
        year: Option<i32>,
    },

    /// Check a streak achievement condition
    Achievement {
        /// e.g. win_streak, goal_drought, break_win_after_loss_streak
        #[arg(long, value_parser = parse_name::<AchievementMetric>)]
        metric: AchievementMetric,

        #[arg(long)]
        threshold: u32,

        /// Most recent matches to consider (0 = all)
        #[arg(long, default_value = "0")]
        window: usize,
    },

    /// Check progress towards a personal goal
    Goal {
        /// goals, assists, wins, win_rate, undefeated_rate, goals_per_match,
        /// longest_win_streak or longest_undefeated_streak
        #[arg(long, value_parser = parse_name::<GoalMetric>)]
        metric: GoalMetric,

        /// accumulate, percentage, average, streak or peak
        #[arg(long = "type", value_parser = parse_name::<GoalType>)]
        goal_type: Option<GoalType>,

        #[arg(long)]
        target: f64,

        /// Calendar year the goal covers
        #[arg(long)]
        year: Option<i32>,

        /// First month of the goal (YYYY-MM)
        #[arg(long)]
        from: Option<YearMonth>,

        /// Last month of the goal (YYYY-MM)
        #[arg(long)]
        to: Option<YearMonth>,
    },

    /// Show campaign progress and history
    Campaign,

    /// Start the next campaign after winning the final
    ClearChampion,

    /// Replay every match into a fresh campaign
    RebuildCampaign,

    /// Start the API server
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Parse a snake_case enum name the way it is written in JSON.
fn parse_name<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.trim().to_lowercase()))
        .map_err(|_| format!("unknown name '{}'", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&PathBuf::from(&cli.config))
        .with_context(|| format!("Failed to load config from {}", cli.config))?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(data_dir);
    }
    if let Some(player) = &cli.player {
        config.player.name = player.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.validate()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::debug!("Starting pitch-ledger v{}", env!("CARGO_PKG_VERSION"));

    let mut ledger = MatchLedger::open(StorageConfig::new(config.data_dir.clone()))?;
    let player = config.player.name.clone();

    match cli.command {
        Commands::Add {
            date,
            result,
            fields,
        } => {
            let new = fields.apply(NewMatch::new(date, result));
            let (record, step) = ledger.record_match(new)?;
            println!("Logged {} on {} ({})", record.result, record.date, record.id);

            let progress = &step.progress;
            println!(
                "Campaign {}: {:?}, now at {}",
                progress.campaign_number, step.outcome, progress.current_stage
            );
            if let Some(entry) = &step.archived {
                println!(
                    "Campaign {} archived: reached {}{}",
                    entry.campaign_number,
                    entry.final_stage,
                    if entry.champion { " (champion)" } else { "" }
                );
            }
        }
        Commands::Edit {
            id,
            date,
            result,
            fields,
        } => {
            let id = MatchId::from(id);
            let Some(existing) = ledger.get(&id) else {
                bail!("No match with id {}", id);
            };
            let mut base = existing.to_new();
            if let Some(date) = date {
                base.date = date;
            }
            if let Some(result) = result {
                base.result = result;
            }
            let updated = ledger.update_match(&id, fields.apply(base))?;
            print_match(&updated);
        }
        Commands::Delete { id } => {
            let removed = ledger.delete_match(&MatchId::from(id))?;
            println!("Deleted:");
            print_match(&removed);
        }
        Commands::List { year, limit } => {
            let mut matches = select(&ledger, year);
            matches.sort_by_key(|m| std::cmp::Reverse((m.date, m.created_at)));
            for m in matches.iter().take(limit) {
                print_match(m);
            }
            println!("{} of {} matches", matches.len().min(limit), matches.len());
        }
        Commands::Records { year } => {
            let records = snapshot(&ledger, year, &player).records;
            println!("=== Records ===");
            let rows = [
                ("Win streak", records.longest_win_streak),
                ("Undefeated streak", records.longest_undefeated_streak),
                ("Draw streak", records.longest_draw_streak),
                ("Loss streak", records.longest_loss_streak),
                ("Winless streak", records.longest_winless_streak),
                ("Goal streak", records.longest_goal_streak),
                ("Assist streak", records.longest_assist_streak),
                ("Goal drought", records.longest_goal_drought),
                ("Assist drought", records.longest_assist_drought),
                ("Goals in a match", records.best_goal_performance),
                ("Assists in a match", records.best_assist_performance),
            ];
            for (label, record) in rows {
                println!("{:<20} {:>3}  (x{})", label, record.value, record.count);
            }
        }
        Commands::Streaks { year } => {
            let matches = select(&ledger, year);
            let streaks = AnalyticsSnapshot::compute(&matches, &player).current_streaks;
            println!("=== Current streaks ===");
            println!("Form:           {}", recent_form(&matches, 5));
            match streaks.result_streak {
                Some(s) => println!("Results:        {} x{}", s.result, s.count),
                None => println!("Results:        -"),
            }
            println!("Scoring:        {}", streaks.goal_streak);
            println!("Assisting:      {}", streaks.assist_streak);
            println!("Goal drought:   {}", streaks.goal_drought);
            println!("Assist drought: {}", streaks.assist_drought);
            println!("Without a win:  {}", streaks.winless_streak);
        }
        Commands::Morale { year } => match snapshot(&ledger, year, &player).morale {
            Some(morale) => {
                println!("Morale: {} ({:.1}/100), trend {}", morale.level, morale.score, morale.trend);
                let recent = morale.recent;
                println!(
                    "Last {}: {}, {} goals, {} assists",
                    recent.matches_considered, recent.record, recent.goals, recent.assists
                );
            }
            None => println!("No matches logged yet"),
        },
        Commands::Duels {
            year,
            limit,
            player: Some(name),
        } => {
            let report = snapshot(&ledger, year, &player).duels;
            let rows: Vec<DuelStats> = [DuelRole::Teammate, DuelRole::Opponent]
                .into_iter()
                .filter_map(|role| report.find(role, &name).cloned())
                .collect();
            if rows.is_empty() {
                bail!("{} does not appear in any logged match", name);
            }
            for row in &rows {
                println!("=== {} as {:?} ===", row.name, row.role);
                print_duels(std::slice::from_ref(row), limit);
            }
        }
        Commands::Duels {
            year,
            limit,
            player: None,
        } => {
            let report = snapshot(&ledger, year, &player).duels;
            println!("=== Teammates ===");
            print_duels(&report.teammates, limit);
            println!("\n=== Opponents ===");
            print_duels(&report.opponents, limit);
        }
        Commands::Players { year } => {
            let leaderboard = snapshot(&ledger, year, &player).leaderboard;
            println!(
                "{:<20} {:>4} {:>10} {:>4} {:>6} {:>4} {:>4}",
                "Player", "MP", "Record", "Pts", "Win%", "G", "A"
            );
            for entry in &leaderboard {
                println!(
                    "{:<20} {:>4} {:>10} {:>4} {:>5.1}% {:>4} {:>4}",
                    entry.name,
                    entry.matches_played,
                    entry.record.to_string(),
                    entry.points,
                    entry.win_rate,
                    entry.goals,
                    entry.assists
                );
            }
        }
        Commands::Table { year } => {
            let matches = select(&ledger, year);
            let table = compute_season_table(&matches);
            println!("=== Years ===");
            print_periods(&table.years);
            println!("\n=== Tournaments ===");
            print_periods(&table.tournaments);
            let labels = available_tournaments(&matches);
            if !labels.is_empty() {
                println!("\nTournaments: {}", labels.join(", "));
            }
        }
        Commands::Achievement {
            metric,
            threshold,
            window,
        } => {
            let condition = AchievementCondition::new(metric, threshold, window);
            let met = evaluate_condition(&condition, ledger.matches());
            println!(
                "{:?} >= {} over {}: {}",
                metric,
                threshold,
                if window == 0 {
                    "all matches".to_string()
                } else {
                    format!("last {} matches", window)
                },
                if met { "met" } else { "not met" }
            );
        }
        Commands::Goal {
            metric,
            goal_type,
            target,
            year,
            from,
            to,
        } => {
            let goal_type = goal_type.unwrap_or_else(|| metric.default_goal_type());
            let goal = Goal::new(metric, goal_type, target)?
                .with_period(GoalPeriod::from_parts(year, from, to)?)?;
            let progress = compute_goal_progress(&goal, ledger.matches());

            let period = match goal.bounds() {
                Some((first, last)) => format!("{} .. {}", first, last),
                None => "all time".to_string(),
            };
            println!("=== {} ({}) over {} ===", metric, goal_type, period);
            let digits = if metric.is_fractional() { 2 } else { 0 };
            println!(
                "Current: {:.*} / {:.*}  ({:.0}%){}",
                digits,
                progress.current,
                digits,
                progress.target,
                progress.percent,
                if progress.achieved { "  achieved" } else { "" }
            );
            println!("Best:    {:.*}", digits, progress.historical_best);
            println!("Level:   {:?}", progress.difficulty);
        }
        Commands::Campaign => {
            let campaign = ledger.campaign();
            let progress = &campaign.progress;
            println!("=== Campaign {} ===", progress.campaign_number);
            match progress.champion_of_campaign {
                Some(n) => println!("Champion of campaign {}! Run clear-champion to start the next one.", n),
                None => println!("Stage: {}", progress.current_stage),
            }
            println!(
                "Group: {} played, {} points",
                progress.group_stage.matches_played, progress.group_stage.points
            );
            if let Some(start) = progress.start_date {
                println!("Started: {}", start);
            }

            if !campaign.history.is_empty() {
                println!("\n=== History ===");
                for entry in &campaign.history {
                    println!(
                        "#{:<3} {} .. {}  {}{}",
                        entry.campaign_number,
                        entry.start_date,
                        entry.end_date,
                        entry.final_stage,
                        if entry.champion { " (champion)" } else { "" }
                    );
                }
            }
        }
        Commands::ClearChampion => {
            let progress = ledger.clear_champion()?;
            println!("Campaign {} started", progress.campaign_number);
        }
        Commands::RebuildCampaign => {
            let campaign = ledger.rebuild_campaign()?;
            println!(
                "Rebuilt: campaign {} at {}, {} archived",
                campaign.progress.campaign_number,
                campaign.progress.current_stage,
                campaign.history.len()
            );
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            tracing::info!(
                "Serving {} matches from {:?} for {}",
                ledger.matches().len(),
                ledger.storage().data_dir,
                player
            );

            let state = AppState::new(ledger, player);
            let app = build_router(state, &config.server.cors_origin);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn select(ledger: &MatchLedger, year: Option<i32>) -> Vec<MatchRecord> {
    match year {
        Some(year) => matches_in_year(ledger.matches(), year),
        None => ledger.matches().to_vec(),
    }
}

fn snapshot(ledger: &MatchLedger, year: Option<i32>, player: &str) -> AnalyticsSnapshot {
    AnalyticsSnapshot::compute(&select(ledger, year), player)
}

fn print_match(m: &MatchRecord) {
    let diff = m
        .goal_differential
        .map(|d| format!(" ({:+})", d))
        .unwrap_or_default();
    println!(
        "{}  {}  {:<4}{}  G{} A{}  {}  [{} players]",
        m.id,
        m.date,
        m.result.to_string(),
        diff,
        m.goals_for,
        m.assists,
        m.tournament.as_deref().unwrap_or("-"),
        m.teammates.len() + m.opponents.len()
    );
}

fn print_duels(rows: &[DuelStats], limit: usize) {
    if rows.is_empty() {
        println!("(none)");
        return;
    }
    for (rank, row) in rows.iter().take(limit).enumerate() {
        println!(
            "{:>2}. {:<20} {:>6.2}  {:>3} MP  {:>10}  G+A {:>3}  {:?}",
            rank + 1,
            row.name,
            row.impact_score,
            row.matches_played,
            row.record.to_string(),
            row.tracked_contributions(),
            row.rank_change
        );
    }
}

fn print_periods(rows: &[PeriodStats]) {
    for row in rows {
        println!(
            "{:<20} {:>4} MP  {:>10}  {:>4} pts  {:>5.1}%  G{} A{}",
            row.label,
            row.matches_played,
            row.record.to_string(),
            row.points,
            row.effectiveness,
            row.goals,
            row.assists
        );
    }
}
