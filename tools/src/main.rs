//! panel-runner: headless driver for the NPL projection desk.
//!
//! Usage:
//!   panel-runner --dataset data/history.db --model data/model.json
//!   panel-runner --dataset demo.db --model demo-model.json --ipc-mode
//!   panel-runner --seed-demo --dataset demo.db --model demo-model.json

use anyhow::Result;
use npldesk_core::{
    command::PanelCommand,
    dataset::DatasetStore,
    demo,
    engine::DeskEngine,
    event::DeskEvent,
    history,
    scenario::{DisplayMode, InputCell, ScenarioId},
    types::TimeMs,
    DeskContext,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetOutputs,
    SetInput {
        scenario: ScenarioId,
        cell:     InputCell,
        value:    f64,
    },
    SetDisplayMode {
        mode: DisplayMode,
    },
    Poll,
    Flush,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let dataset = str_arg(&args, "--dataset", "data/history.db");
    let model = str_arg(&args, "--model", "data/model.json");
    let debounce_ms: TimeMs = parse_arg(&args, "--debounce-ms", 400);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    if args.iter().any(|a| a == "--seed-demo") {
        seed_demo(dataset, model)?;
        println!("demo fixtures written: {dataset}, {model}");
        return Ok(());
    }

    let context = DeskContext::load(dataset, model)?;
    let mut engine = DeskEngine::build_with_debounce(context, debounce_ms)?;

    if ipc_mode {
        run_ipc_loop(&mut engine)
    } else {
        print_summary(&engine);
        Ok(())
    }
}

fn seed_demo(dataset_path: &str, model_path: &str) -> Result<()> {
    let store = DatasetStore::create(dataset_path)?;
    for record in demo::demo_records() {
        store.insert_record(&record)?;
    }
    let artifact = serde_json::to_string_pretty(&demo::demo_artifact())?;
    std::fs::write(model_path, artifact)?;
    Ok(())
}

fn run_ipc_loop(engine: &mut DeskEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut buffer = String::new();
    let mut handle = stdin.lock();

    loop {
        buffer.clear();
        if handle.read_line(&mut buffer)? == 0 {
            break; // EOF
        }

        let command: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        let now = now_ms();
        let reply = match command {
            IpcCommand::Quit => break,
            IpcCommand::GetOutputs => outputs_reply(engine, Vec::new()),
            IpcCommand::Poll => {
                let events = engine.poll(now);
                outputs_reply(engine, events)
            }
            IpcCommand::Flush => {
                let events = engine.flush(now);
                outputs_reply(engine, events)
            }
            IpcCommand::SetInput {
                scenario,
                cell,
                value,
            } => {
                let command = PanelCommand::SetInput {
                    scenario,
                    cell,
                    value,
                };
                match engine.apply(command, now) {
                    Ok(events) => outputs_reply(engine, events),
                    Err(e) => serde_json::json!({ "error": e.to_string() }),
                }
            }
            IpcCommand::SetDisplayMode { mode } => {
                match engine.apply(PanelCommand::SetDisplayMode { mode }, now) {
                    Ok(events) => outputs_reply(engine, events),
                    Err(e) => serde_json::json!({ "error": e.to_string() }),
                }
            }
        };

        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn outputs_reply(engine: &DeskEngine, events: Vec<DeskEvent>) -> serde_json::Value {
    let outputs: Vec<_> = ScenarioId::ALL
        .iter()
        .filter_map(|id| engine.published(*id))
        .collect();
    serde_json::json!({
        "events": events,
        "next_deadline": engine.next_deadline(),
        "outputs": outputs,
    })
}

fn print_summary(engine: &DeskEngine) {
    let current_year = engine.context().baselines().current_year();
    println!("NPL projection desk");
    println!("  baseline window: records before {current_year}");

    let (channeling, npl) = history::yearly_totals(engine.context().records(), current_year);
    if let (Some(first), Some(last)) = (channeling.points.first(), channeling.points.last()) {
        println!(
            "  {current_year} channeling: {:.1} to {:.1} bn Rp ({} months on record)",
            first.value,
            last.value,
            npl.points.len()
        );
    }
    println!();

    for id in ScenarioId::ALL {
        let Some(snapshot) = engine.published(id) else {
            continue;
        };
        println!("[{}]", id.name());
        println!("  total credit:   {}", snapshot.total_credit);
        println!("  projected NPL:  {}", snapshot.total_npl_percent);
        println!("  fee rate:       {}", snapshot.fee_rate);
        if let Some(budget) = &snapshot.fee_budget {
            println!("  fee budget:     {budget}");
        }
        if let Some(loss_limit) = &snapshot.loss_limit_budget {
            println!("  loss limit:     {loss_limit}");
        }
        if let Some(chart) = &snapshot.comparison {
            println!("  top sectors ({:?}):", chart.mode);
            for bar in chart.bars.iter().take(3) {
                let label = &snapshot.sectors[bar.sector].label;
                println!("    {label}: {:.2}", bar.value);
            }
        }
        println!();
    }
}

fn now_ms() -> TimeMs {
    chrono::Utc::now().timestamp_millis() as TimeMs
}

fn str_arg<'a>(args: &'a [String], name: &str, default: &'a str) -> &'a str {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
        .unwrap_or(default)
}

fn parse_arg<T: std::str::FromStr>(args: &[String], name: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == name)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
