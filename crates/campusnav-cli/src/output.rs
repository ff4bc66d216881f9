//! Output formatting for CLI results.
//!
//! Every renderer returns a `String` so callers decide where it goes and
//! tests can inspect it. JSON output goes through [`render_json`].

use std::io::{self, Write};
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;

use campusnav_lib::{
    location_label, Directions, IntegratedPath, LatLng, LegOutcome, MultiDestinationReport,
    PathResult, Segment, WeatherSnapshot,
};

use crate::terminal::{format_distance, format_duration, supports_unicode, ColorPalette};

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    pub fn is_text(self) -> bool {
        matches!(self, OutputFormat::Text)
    }
}

/// One row of the `campuses` listing.
#[derive(Debug, Clone, Serialize)]
pub struct CampusSummary {
    pub name: String,
    pub nodes: usize,
    pub edges: usize,
    pub exits: Vec<String>,
    pub entrances: Vec<String>,
}

/// One connector of the `campuses` listing.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectorSummary {
    pub from: String,
    pub to: String,
    /// Declared length, `None` when the configured default applies.
    pub distance: Option<f64>,
}

/// Print the CLI banner, boxed when the locale supports Unicode.
pub fn print_logo(palette: &ColorPalette) {
    let (cyan, orange, reset) = (palette.cyan, palette.orange, palette.reset);
    if supports_unicode() {
        println!(
            "{cyan}╭──────────────────────────────────╮{reset}
{cyan}│{orange}  C A M P U S N A V              {cyan}│{reset}
{cyan}│{orange}  indoor · outdoor · tunnels      {cyan}│{reset}
{cyan}╰──────────────────────────────────╯{reset}"
        );
    } else {
        println!(
            "{orange}+----------------------------------+
|  CAMPUSNAV                       |
|  >> CAMPUS ROUTING TOOLS         |
+----------------------------------+{reset}"
        );
    }
}

/// Print the footer with elapsed time.
pub fn print_footer(palette: &ColorPalette, elapsed: Duration) {
    let elapsed_ms = elapsed.as_millis();
    let time_str = if elapsed_ms < 1000 {
        format!("{elapsed_ms}ms")
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    };
    println!("\n{}Completed in {}{}", palette.gray, time_str, palette.reset);
}

/// Write `value` to stdout as pretty JSON followed by a newline.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

/// A single indoor path with start and goal badges.
pub fn render_path(path: &PathResult, palette: &ColorPalette) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Path from {} to {} ({} nodes):\n",
        location_label(path.start().unwrap_or_default()),
        location_label(path.goal().unwrap_or_default()),
        path.path.len()
    ));
    write_node_list(&mut out, &path.path, palette);
    out.push_str(&format!(
        "\nTotal distance: {} (weight {:.2})\n",
        format_distance(path.distance),
        path.weight
    ));
    out
}

/// Ranked alternatives from a k-shortest-paths query.
pub fn render_k_paths(paths: &[PathResult], palette: &ColorPalette) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} alternative path(s):\n", paths.len()));
    for (rank, path) in paths.iter().enumerate() {
        out.push_str(&format!(
            "\n{}#{}{} {} {}(weight {:.2}){}\n",
            palette.white_bold,
            rank + 1,
            palette.reset,
            format_distance(path.distance),
            palette.gray,
            path.weight,
            palette.reset
        ));
        out.push_str(&format!("   {}\n", path.path.join(" -> ")));
    }
    out
}

/// Step-by-step walking directions.
pub fn render_directions(directions: &Directions) -> String {
    format!("{directions}\n")
}

/// Per-leg outcome of a multi-stop route.
pub fn render_report(report: &MultiDestinationReport, palette: &ColorPalette) -> String {
    let mut out = String::new();
    let routed = report.legs.iter().filter(|leg| leg.is_routed()).count();
    out.push_str(&format!(
        "Multi-stop route ({} of {} legs routed):\n",
        routed,
        report.legs.len()
    ));
    for (index, leg) in report.legs.iter().enumerate() {
        match leg {
            LegOutcome::Routed { path, distance, .. } => {
                out.push_str(&format!(
                    " {}. {}{}{} {}\n",
                    index + 1,
                    palette.green,
                    path.join(" -> "),
                    palette.reset,
                    format_distance(*distance)
                ));
            }
            LegOutcome::Failed { destination, error } => {
                out.push_str(&format!(
                    " {}. {}{} unreachable{}: {}\n",
                    index + 1,
                    palette.red,
                    destination,
                    palette.reset,
                    error
                ));
            }
        }
    }
    out.push_str(&format!(
        "\nTotal distance: {}\n",
        format_distance(report.total_distance)
    ));
    out
}

/// Segment-by-segment view of an integrated route.
pub fn render_integrated(path: &IntegratedPath, palette: &ColorPalette) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Integrated route ({} segments, {}):\n",
        path.segments.len(),
        format_distance(path.total_distance)
    ));
    if let Some(weather) = &path.weather {
        out.push_str(&format!("{}\n", describe_weather(weather, palette)));
    }
    for segment in &path.segments {
        let tag = palette.segment_tag(segment.kind());
        let badge = format!("{tag} {} {}", segment.kind().to_uppercase(), palette.reset);
        let body = match segment {
            Segment::Indoor { campus, path, .. } => {
                format!("{campus}: {}", path.join(" -> "))
            }
            Segment::Tunnel {
                from_campus,
                from_node,
                to_campus,
                to_node,
                ..
            } => format!("{from_campus}:{from_node} -> {to_campus}:{to_node}"),
            Segment::Outdoor {
                route,
                weather_adjusted,
                ..
            } => {
                let duration = Duration::try_from_secs_f64(route.duration).unwrap_or_default();
                let mut body = format!("{} for {}", route.mode, format_duration(duration));
                if *weather_adjusted {
                    body.push_str(" [weather adjusted]");
                }
                body
            }
        };
        out.push_str(&format!(
            "{badge} {body} ({})\n",
            format_distance(segment.distance())
        ));
        if let Segment::Outdoor { route, .. } = segment {
            for step in &route.steps {
                out.push_str(&format!(
                    "    {}- {}{}\n",
                    palette.gray, step.instruction, palette.reset
                ));
            }
        }
    }
    out.push_str(&format!(
        "\nTotal distance: {} (outdoors {})\n",
        format_distance(path.total_distance),
        format_distance(path.outdoor_distance())
    ));
    out
}

/// Current conditions at `point`.
pub fn render_weather(point: LatLng, snapshot: &WeatherSnapshot, palette: &ColorPalette) -> String {
    format!("Weather at {point}\n{}\n", describe_weather(snapshot, palette))
}

/// Loaded campuses and the connectors between them.
pub fn render_campuses(campuses: &[CampusSummary], connectors: &[ConnectorSummary]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} campus(es):\n", campuses.len()));
    for campus in campuses {
        out.push_str(&format!(
            " - {} ({} nodes, {} edges, {} exits, {} entrances)\n",
            campus.name,
            campus.nodes,
            campus.edges,
            campus.exits.len(),
            campus.entrances.len()
        ));
    }
    if !connectors.is_empty() {
        out.push_str(&format!("\nConnectors:\n"));
        for connector in connectors {
            let length = connector
                .distance
                .map(format_distance)
                .unwrap_or_else(|| "default length".to_string());
            out.push_str(&format!(" - {} <-> {} ({})\n", connector.from, connector.to, length));
        }
    }
    out
}

fn describe_weather(snapshot: &WeatherSnapshot, palette: &ColorPalette) -> String {
    let verdict = if snapshot.is_bad() {
        format!("{}bad for walking{}", palette.red, palette.reset)
    } else {
        format!("{}fine for walking{}", palette.green, palette.reset)
    };
    format!(
        "{}{:.1}°C{}, precipitation {:.1} mm, wind {:.1} m/s, code {} ({})",
        palette.cyan,
        snapshot.temperature,
        palette.reset,
        snapshot.precipitation,
        snapshot.wind_speed,
        snapshot.weather_code,
        verdict
    )
}

fn write_node_list(out: &mut String, nodes: &[String], palette: &ColorPalette) {
    let last = nodes.len().saturating_sub(1);
    for (index, node) in nodes.iter().enumerate() {
        let line = if index == 0 {
            format!(
                "{} STRT {} {}{}{}",
                palette.tag_start, palette.reset, palette.white_bold, node, palette.reset
            )
        } else if index == last {
            format!(
                "{} GOAL {} {}{}{}",
                palette.tag_goal, palette.reset, palette.white_bold, node, palette.reset
            )
        } else {
            format!("{}  |  {} {}", palette.gray, palette.reset, node)
        };
        out.push_str(&format!("{line}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusnav_lib::{
        route_through, CostModel, GraphBuilder, Node, OutdoorRoute, PoiType, TravelMode,
    };

    fn sample_path() -> PathResult {
        PathResult {
            path: vec!["h2_209".into(), "h2_hw8".into(), "h2_290".into()],
            distance: 12.0,
            weight: 12.0,
        }
    }

    #[test]
    fn path_lists_start_and_goal() {
        let text = render_path(&sample_path(), &ColorPalette::plain());
        assert!(text.starts_with("Path from H-209 (Floor 2) to H-290 (Floor 2) (3 nodes):"));
        assert!(text.contains(" STRT  h2_209"));
        assert!(text.contains(" GOAL  h2_290"));
        assert!(text.contains("Total distance: 12.0 m (weight 12.00)"));
    }

    #[test]
    fn path_text_has_one_line_per_node() {
        let text = render_path(&sample_path(), &ColorPalette::plain());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[2].ends_with("h2_hw8"));
        assert_eq!(lines[4], "");
        assert!(text.ends_with(")\n"));
    }

    #[test]
    fn failed_legs_are_marked() {
        let mut builder = GraphBuilder::new("hall", CostModel::default());
        for (id, x) in [("h2_209", 0.0), ("h2_hw8", 2000.0)] {
            builder.add_node(Node {
                id: id.into(),
                x,
                y: 0.0,
                poi_type: PoiType::Hallway,
            });
        }
        builder.add_edge("h2_209", "h2_hw8");
        let graph = builder.build();

        let report = route_through(&graph, "h2_209", &["h2_hw8", "h9_000"]);
        let text = render_report(&report, &ColorPalette::plain());
        assert!(text.contains("1 of 2 legs routed"));
        assert!(text.contains(" 1. h2_209 -> h2_hw8 10.0 m"));
        assert!(text.contains("2. h9_000 unreachable: unknown node 'h9_000'"));
    }

    #[test]
    fn integrated_segments_are_badged() {
        let path = IntegratedPath::from_segments(vec![
            Segment::Indoor {
                campus: "hall".into(),
                path: vec!["h1_110".into(), "h1_exit_side".into()],
                distance: 10.0,
            },
            Segment::Outdoor {
                route: OutdoorRoute {
                    mode: TravelMode::Walking,
                    distance: 140.0,
                    duration: 100.0,
                    steps: Vec::new(),
                    coordinates: Vec::new(),
                },
                distance: 140.0,
                weather_adjusted: true,
            },
        ]);
        let text = render_integrated(&path, &ColorPalette::plain());
        assert!(text.contains(" INDOOR  hall: h1_110 -> h1_exit_side (10.0 m)"));
        assert!(text.contains(" OUTDOOR  walking for 1 min 40 s [weather adjusted] (140.0 m)"));
        assert!(text.contains("Total distance: 150.0 m (outdoors 140.0 m)"));
    }

    #[test]
    fn connectors_without_length_use_default() {
        let text = render_campuses(
            &[],
            &[ConnectorSummary {
                from: "hall:h1_tunnel".into(),
                to: "mb:mbs2_tunnel".into(),
                distance: None,
            }],
        );
        assert!(text.contains("hall:h1_tunnel <-> mb:mbs2_tunnel (default length)"));
    }
}
