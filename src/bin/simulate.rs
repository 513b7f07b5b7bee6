use clap::Parser;
use maze_chase::constants::{CELL_SIZE, MAX_WAVE};
use maze_chase::engine::{choose_intent, Session, SessionOptions};
use maze_chase::rng::entropy_seed;
use maze_chase::types::{RuntimeEvent, SessionStatus, Snapshot};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const DEFAULT_TICKS: u64 = 20_000;
const DEFAULT_MAX_LEVELS: u32 = 3;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    seed: Option<u64>,
    /// Tick budget for the whole run.
    #[arg(long)]
    ticks: Option<u64>,
    /// Level to start from.
    #[arg(long)]
    level: Option<u8>,
    /// Stop after this many levels were won or lost.
    #[arg(long)]
    max_levels: Option<u32>,
    #[arg(long)]
    run_id: Option<String>,
    /// Text file with one maze row per line.
    #[arg(long)]
    layout: Option<PathBuf>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct RunConfig {
    seed: u32,
    ticks: u64,
    #[serde(rename = "startLevel")]
    start_level: u8,
    #[serde(rename = "maxLevels")]
    max_levels: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum LevelResult {
    Cleared,
    Lost,
    Unfinished,
}

#[derive(Clone, Debug, Serialize)]
struct LevelOutcome {
    level: u8,
    result: LevelResult,
    ticks: u64,
    #[serde(rename = "pelletsLeft")]
    pellets_left: usize,
}

#[derive(Clone, Debug, Default, Serialize)]
struct EventCounts {
    #[serde(rename = "energizersEaten")]
    energizers_eaten: u32,
    #[serde(rename = "ghostsCaught")]
    ghosts_caught: u32,
    #[serde(rename = "ghostsRecovered")]
    ghosts_recovered: u32,
    #[serde(rename = "waveChanges")]
    wave_changes: u32,
    deaths: u32,
}

#[derive(Clone, Debug, Serialize)]
struct RunResultLine {
    #[serde(rename = "runId")]
    run_id: String,
    seed: u32,
    #[serde(rename = "ticksRun")]
    ticks_run: u64,
    #[serde(rename = "levelsAttempted")]
    levels_attempted: usize,
    #[serde(rename = "levelsCleared")]
    levels_cleared: usize,
    #[serde(rename = "highestLevel")]
    highest_level: u8,
    events: EventCounts,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug)]
struct RunOutput {
    result: RunResultLine,
    levels: Vec<LevelOutcome>,
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    config: RunConfig,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    #[serde(rename = "averageLevelTicks")]
    average_level_ticks: u64,
    levels: Vec<LevelOutcome>,
    result: RunResultLine,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

fn main() {
    let cli = Cli::parse();
    let config = resolve_config(&cli);
    let run_started_at_ms = now_ms();
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(config.seed, run_started_at_ms));

    let layout = match cli.layout.as_deref().map(read_layout_rows).transpose() {
        Ok(rows) => rows,
        Err(error) => {
            emit_log(
                "error",
                "layout_read_failed",
                &run_id,
                Some(config.seed),
                None,
                json!({
                    "path": cli.layout.as_ref().map(|path| path.to_string_lossy().to_string()),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
    };

    let session = match Session::new(SessionOptions {
        seed: config.seed,
        start_level: config.start_level,
        layout,
    }) {
        Ok(session) => session,
        Err(error) => {
            emit_log(
                "error",
                "layout_invalid",
                &run_id,
                Some(config.seed),
                None,
                json!({ "error": error.to_string() }),
            );
            std::process::exit(2);
        }
    };

    emit_log(
        "info",
        "run_started",
        &run_id,
        Some(config.seed),
        None,
        json!({
            "ticks": config.ticks,
            "startLevel": config.start_level,
            "maxLevels": config.max_levels,
        }),
    );

    let output = run_session(session, &config, &run_id);

    for anomaly in &output.anomaly_records {
        emit_log(
            "warn",
            "anomaly_detected",
            &run_id,
            Some(config.seed),
            Some(anomaly.tick),
            json!({
                "message": anomaly.message,
            }),
        );
    }

    println!(
        "{}",
        serde_json::to_string(&output.result).expect("run result should serialize")
    );

    let summary = build_run_summary(
        run_id.clone(),
        run_started_at_ms,
        now_ms(),
        config.clone(),
        &output,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &run_id,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &run_id,
        Some(config.seed),
        Some(output.result.ticks_run),
        json!({
            "levelsAttempted": output.result.levels_attempted,
            "levelsCleared": output.result.levels_cleared,
            "anomalyCount": summary.anomaly_count,
            "outcomeCounts": summary.outcome_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if !output.result.anomalies.is_empty() {
        std::process::exit(1);
    }
}

fn run_session(mut session: Session, config: &RunConfig, run_id: &str) -> RunOutput {
    let pixel_width = session.grid().pixel_width();
    let mut counts = EventCounts::default();
    let mut levels = Vec::new();
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();
    let mut highest_level = session.level();
    let mut level_started_tick = 0u64;
    let mut last_pellets: Option<usize> = None;
    let mut ticks_run = 0u64;

    while ticks_run < config.ticks && (levels.len() as u32) < config.max_levels {
        let intent = choose_intent(&session);
        session.step(intent);
        ticks_run += 1;

        let snapshot = session.build_snapshot(true);
        for message in collect_snapshot_anomalies(&snapshot, last_pellets, pixel_width) {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                snapshot.tick,
                message,
            );
        }
        last_pellets = Some(snapshot.pellets_remaining);
        tally_events(&snapshot.events, &mut counts);

        if snapshot.status != SessionStatus::Playing && snapshot.player.animation_over {
            let result = if snapshot.status == SessionStatus::LevelComplete {
                LevelResult::Cleared
            } else {
                LevelResult::Lost
            };
            emit_log(
                "info",
                "level_finished",
                run_id,
                Some(config.seed),
                Some(snapshot.tick),
                json!({
                    "level": snapshot.level,
                    "result": result,
                    "pelletsLeft": snapshot.pellets_remaining,
                }),
            );
            levels.push(LevelOutcome {
                level: snapshot.level,
                result,
                ticks: snapshot.tick - level_started_tick,
                pellets_left: snapshot.pellets_remaining,
            });

            session.restart();
            level_started_tick = snapshot.tick;
            last_pellets = None;
            highest_level = highest_level.max(session.level());
        }
    }

    if (levels.len() as u32) < config.max_levels {
        levels.push(LevelOutcome {
            level: session.level(),
            result: LevelResult::Unfinished,
            ticks: ticks_run - level_started_tick,
            pellets_left: session.grid().pellets_remaining(),
        });
    }

    let levels_attempted = levels
        .iter()
        .filter(|outcome| outcome.result != LevelResult::Unfinished)
        .count();
    let levels_cleared = levels
        .iter()
        .filter(|outcome| outcome.result == LevelResult::Cleared)
        .count();

    RunOutput {
        result: RunResultLine {
            run_id: run_id.to_string(),
            seed: config.seed,
            ticks_run,
            levels_attempted,
            levels_cleared,
            highest_level,
            events: counts,
            anomalies,
        },
        levels,
        anomaly_records,
    }
}

fn tally_events(events: &[RuntimeEvent], counts: &mut EventCounts) {
    for event in events {
        match event {
            RuntimeEvent::EnergizerEaten { .. } => counts.energizers_eaten += 1,
            RuntimeEvent::GhostCaught { .. } => counts.ghosts_caught += 1,
            RuntimeEvent::GhostRecovered { .. } => counts.ghosts_recovered += 1,
            RuntimeEvent::WaveChanged { .. } => counts.wave_changes += 1,
            RuntimeEvent::PlayerDown { .. } => counts.deaths += 1,
            _ => {}
        }
    }
}

fn collect_snapshot_anomalies(
    snapshot: &Snapshot,
    last_pellets: Option<usize>,
    pixel_width: i32,
) -> Vec<String> {
    let mut anomalies = Vec::new();
    if snapshot.wave > MAX_WAVE {
        anomalies.push(format!("wave index out of range: {}", snapshot.wave));
    }

    if let Some(first) = snapshot.ghosts.first() {
        if snapshot.ghosts.iter().any(|ghost| ghost.mode != first.mode) {
            anomalies.push("ghosts disagree on scatter/chase mode".to_string());
        }
    }

    if let Some(before) = last_pellets {
        if snapshot.pellets_remaining > before {
            anomalies.push(format!(
                "pellet count increased within level: {before} -> {}",
                snapshot.pellets_remaining
            ));
        }
    }

    let x = snapshot.player.x;
    if x < -CELL_SIZE || x >= pixel_width {
        anomalies.push(format!("player outside tunnel band: x={x}"));
    }
    for ghost in &snapshot.ghosts {
        if ghost.x < -CELL_SIZE || ghost.x >= pixel_width {
            anomalies.push(format!("ghost {} outside tunnel band: x={}", ghost.id, ghost.x));
        }
    }
    anomalies
}

fn resolve_config(cli: &Cli) -> RunConfig {
    let seed = cli.seed.map(normalize_seed).unwrap_or_else(entropy_seed);
    RunConfig {
        seed,
        ticks: cli.ticks.unwrap_or(DEFAULT_TICKS),
        start_level: cli.level.unwrap_or(0),
        max_levels: cli.max_levels.unwrap_or(DEFAULT_MAX_LEVELS).max(1),
    }
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

fn read_layout_rows(path: &Path) -> io::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    tick: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        tick,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_run_id(seed: u32, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn build_run_summary(
    run_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    config: RunConfig,
    output: &RunOutput,
) -> RunSummary {
    let mut outcome_counts: BTreeMap<String, usize> = BTreeMap::new();
    for outcome in &output.levels {
        *outcome_counts
            .entry(level_result_key(outcome.result))
            .or_insert(0) += 1;
    }
    let finished: Vec<&LevelOutcome> = output
        .levels
        .iter()
        .filter(|outcome| outcome.result != LevelResult::Unfinished)
        .collect();
    let average_level_ticks = if finished.is_empty() {
        0
    } else {
        finished.iter().map(|outcome| outcome.ticks).sum::<u64>() / finished.len() as u64
    };

    RunSummary {
        run_id,
        started_at_ms,
        finished_at_ms,
        config,
        anomaly_count: output.anomaly_records.len(),
        outcome_counts,
        average_level_ticks,
        levels: output.levels.clone(),
        result: output.result.clone(),
    }
}

fn emit_log(
    level: &str,
    event: &str,
    run_id: &str,
    seed: Option<u32>,
    tick: Option<u64>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        run_id: run_id.to_string(),
        seed,
        tick,
        details,
    };
    eprintln!(
        "{}",
        serde_json::to_string(&log_line).expect("structured log should serialize")
    );
}

fn level_result_key(result: LevelResult) -> String {
    match result {
        LevelResult::Cleared => "cleared",
        LevelResult::Lost => "lost",
        LevelResult::Unfinished => "unfinished",
    }
    .to_string()
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).expect("run summary should serialize");
    std::fs::write(path, summary_text)
}
