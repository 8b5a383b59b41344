// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Orgchart CLI entrypoint.
//!
//! Loads a chart (the built-in sample unless `--chart` is given), lays it out
//! and prints the result as JSON. `--demo` additionally replays a scripted drag
//! that moves "Subsidiary 2-1" next to "Subsidiary 1" and prints both states.

use std::collections::BTreeMap;
use std::error::Error;
use std::time::Instant;

use orgchart::layout::TreeLayout;
use orgchart::model::{sample_chart, ChartData, NodeId};
use orgchart::surface::{MemorySurface, Surface};
use orgchart::{Editor, EditorConfig};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--chart <chart.json>] [--config <config.json>]\n  {program} --demo [--config <config.json>]\n\nPrints the laid-out chart as JSON on stdout.\n--demo replays a drag on the built-in sample chart and cannot be combined with --chart.\nSet RUST_LOG (e.g. RUST_LOG=orgchart=debug) for diagnostics on stderr."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    chart: Option<String>,
    config: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--chart" => {
                if options.chart.is_some() {
                    return Err(());
                }
                options.chart = Some(args.next().ok_or(())?);
            }
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(args.next().ok_or(())?);
            }
            _ => return Err(()),
        }
    }

    if options.demo && options.chart.is_some() {
        return Err(());
    }

    Ok(options)
}

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    rev: u64,
    children_order: BTreeMap<NodeId, Vec<NodeId>>,
    layout: &'a TreeLayout,
}

fn snapshot(editor: &Editor<MemorySurface>) -> Snapshot<'_> {
    Snapshot {
        rev: editor.tree().rev(),
        children_order: editor.tree().children_order(),
        layout: editor.layout(),
    }
}

/// Drags node `3` onto the upper-right quadrant of node `1` and drops it.
fn replay_demo_drag(editor: &mut Editor<MemorySurface>) -> Result<(), Box<dyn Error>> {
    let dragged = NodeId::new("3")?;
    let target = NodeId::new("1")?;
    let (Some(dragged_box), Some(target_box)) = (
        editor.cell_of(&dragged).and_then(|cell| editor.surface().bounding_box(cell)),
        editor.cell_of(&target).and_then(|cell| editor.surface().bounding_box(cell)),
    ) else {
        return Err("demo chart is missing nodes 1 and 3".into());
    };

    let now = Instant::now();
    let press = dragged_box.center();
    // Aim the ghost's center slightly right of and above the target's center.
    let aim = target_box.center().offset(target_box.width / 3.0, -target_box.height / 3.0);
    editor.on_node_pressed(&dragged, press);
    editor.on_pointer_move(aim, now);
    if let Some(pending) = editor.pending_move() {
        tracing::info!(?pending, "demo drop staged");
    }
    editor.on_pointer_up(now);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "orgchart".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let config = match &options.config {
            Some(path) => EditorConfig::load(path)?,
            None => EditorConfig::default(),
        };
        let chart: ChartData = match &options.chart {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => sample_chart(),
        };

        let mut editor = Editor::from_chart(&chart, MemorySurface::new(), config)?;
        if !options.demo {
            println!("{}", serde_json::to_string_pretty(&snapshot(&editor))?);
            return Ok(());
        }

        let before = serde_json::to_value(snapshot(&editor))?;
        replay_demo_drag(&mut editor)?;
        let after = serde_json::to_value(snapshot(&editor))?;
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "before": before, "after": after }))?
        );
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, replay_demo_drag, CliOptions};
    use orgchart::model::{sample_chart, NodeId};
    use orgchart::surface::MemorySurface;
    use orgchart::{Editor, EditorConfig};

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values.iter().map(|value| (*value).to_owned()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_demo_with_config() {
        let options = parse_options(args(&["--config", "c.json", "--demo"])).expect("parse");
        assert!(options.demo);
        assert_eq!(options.config.as_deref(), Some("c.json"));
        assert_eq!(options.chart, None);
    }

    #[test]
    fn rejects_demo_with_chart_and_unknown_args() {
        assert!(parse_options(args(&["--demo", "--chart", "x.json"])).is_err());
        assert!(parse_options(args(&["--verbose"])).is_err());
        assert!(parse_options(args(&["--chart"])).is_err());
        assert!(parse_options(args(&["--demo", "--demo"])).is_err());
    }

    #[test]
    fn demo_drag_moves_node_next_to_target() {
        let mut editor =
            Editor::from_chart(&sample_chart(), MemorySurface::new(), EditorConfig::default())
                .expect("editor");
        replay_demo_drag(&mut editor).expect("demo");

        let id = |value: &str| NodeId::new(value).expect("id");
        assert_eq!(editor.tree().children(&id("0")), vec![id("1"), id("3"), id("2")]);
    }
}
