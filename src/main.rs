// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! SonoROI command line.
//!
//! Operates on one acquisition directory: list its time-series groups,
//! edit the ROIs stored in its sidecar file, compute intensity statistics
//! and export a summary report.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sonoroi::models::RoiShape;
use sonoroi::Session;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sonoroi", about = "Time-series ROI analysis for ultrasound acquisitions", version)]
struct Cli {
    /// Directory containing acquisitions.json and the ROI sidecar
    dir: PathBuf,

    /// Grouping window in seconds (overrides the folder settings)
    #[arg(long, global = true)]
    window: Option<f64>,

    /// Target pixel spacing for CEUS (overrides the folder settings)
    #[arg(long, global = true)]
    ceus: Option<f64>,

    /// Target pixel spacing for SHI (overrides the folder settings)
    #[arg(long, global = true)]
    shi: Option<f64>,

    /// Write the effective settings back to the folder
    #[arg(long, global = true)]
    save_settings: bool,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List groups with their acquisitions and classifications
    Groups {
        /// Only show acquisitions whose name or tags match
        #[arg(long)]
        filter: Option<String>,
    },
    /// List the ROIs of a group
    Rois {
        #[arg(long)]
        group: String,
    },
    /// Add an ROI to a group
    AddRoi {
        #[arg(long)]
        group: String,
        #[arg(long, value_enum)]
        shape: ShapeArg,
        /// Bounding box as x,y,width,height (rectangle and ellipse)
        #[arg(long)]
        rect: Option<String>,
        /// Vertices as x,y;x,y;... (freeform)
        #[arg(long)]
        points: Option<String>,
    },
    /// Replace the shape of an ROI, keeping its id and computed means
    ReplaceRoi {
        #[arg(long)]
        group: String,
        #[arg(long)]
        id: String,
        #[arg(long, value_enum)]
        shape: ShapeArg,
        /// Bounding box as x,y,width,height (rectangle and ellipse)
        #[arg(long)]
        rect: Option<String>,
        /// Vertices as x,y;x,y;... (freeform)
        #[arg(long)]
        points: Option<String>,
    },
    /// Remove an ROI by id
    RemoveRoi {
        #[arg(long)]
        group: String,
        #[arg(long)]
        id: String,
    },
    /// Remove every ROI of a group
    Clear {
        #[arg(long)]
        group: String,
    },
    /// Undo the last ROI edit of a group made in this process
    Undo {
        #[arg(long)]
        group: String,
    },
    /// Show which ROI of a group contains a point
    Hit {
        #[arg(long)]
        group: String,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
    },
    /// Compute mean intensities for every acquisition of a group
    Stats {
        #[arg(long)]
        group: String,
    },
    /// Export the per-acquisition and group summary report (.yaml, .yml or .json)
    Report {
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ShapeArg {
    Rectangle,
    Ellipse,
    Freeform,
}

fn parse_numbers(text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid number: {:?}", part))
        })
        .collect()
}

fn build_shape(shape: ShapeArg, rect: Option<&str>, points: Option<&str>) -> Result<RoiShape> {
    match shape {
        ShapeArg::Rectangle | ShapeArg::Ellipse => {
            let Some(rect) = rect else {
                bail!("--rect x,y,width,height is required for {:?}", shape);
            };
            let numbers = parse_numbers(rect)?;
            let [x, y, w, h] = numbers[..] else {
                bail!("--rect needs exactly four numbers");
            };
            Ok(match shape {
                ShapeArg::Rectangle => RoiShape::rectangle(x, y, w, h),
                _ => RoiShape::ellipse(x, y, w, h),
            })
        }
        ShapeArg::Freeform => {
            let Some(points) = points else {
                bail!("--points x,y;x,y;... is required for freeform");
            };
            let vertices = points
                .split(';')
                .filter(|p| !p.trim().is_empty())
                .map(|p| -> Result<(f64, f64)> {
                    let numbers = parse_numbers(p)?;
                    match numbers[..] {
                        [x, y] => Ok((x, y)),
                        _ => bail!("Invalid vertex: {:?}", p),
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(RoiShape::freeform(vertices))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut session = Session::open(&cli.dir)?;

    let mut settings = *session.settings();
    if let Some(window) = cli.window {
        settings.time_window_seconds = window;
    }
    if let Some(ceus) = cli.ceus {
        settings.ceus_spacing = ceus;
    }
    if let Some(shi) = cli.shi {
        settings.shi_spacing = shi;
    }
    if settings != *session.settings() {
        session.apply_settings(settings);
    }
    if cli.save_settings {
        session.save_settings()?;
    }

    match cli.command {
        Command::Groups { filter } => {
            for group in session.groups() {
                println!("{}  {}  ({} acquisitions)", group.id, group.label, group.len());
                for acquisition in &group.acquisitions {
                    let display = acquisition.display_name();
                    let shown = filter
                        .as_deref()
                        .map_or(true, |f| {
                            sonoroi::analysis::filter::matches_filter(&display, f, acquisition.tags.as_deref())
                        });
                    if shown {
                        println!("    {}", display);
                    }
                }
            }
        }
        Command::Rois { group } => {
            for region in session.store().regions(&group) {
                println!("{}  {:?}  {:?}", region.id, region.shape.kind(), region.shape);
            }
        }
        Command::AddRoi {
            group,
            shape,
            rect,
            points,
        } => {
            let shape = build_shape(shape, rect.as_deref(), points.as_deref())?;
            let id = session.add_roi(&group, shape)?;
            println!("{}", id);
        }
        Command::ReplaceRoi {
            group,
            id,
            shape,
            rect,
            points,
        } => {
            let shape = build_shape(shape, rect.as_deref(), points.as_deref())?;
            if !session.replace_roi(&group, &id, shape)? {
                eprintln!("No ROI {} in {}", id, group);
            }
        }
        Command::RemoveRoi { group, id } => {
            if !session.remove_roi(&group, &id)? {
                eprintln!("No ROI {} in {}", id, group);
            }
        }
        Command::Clear { group } => session.clear_rois(&group)?,
        Command::Undo { group } => {
            if !session.undo(&group)? {
                eprintln!("Nothing to undo in {}", group);
            }
        }
        Command::Hit { group, x, y } => match session.store().hit_test(&group, x, y) {
            Some(region) => println!("{}", region.id),
            None => eprintln!("No ROI at ({}, {})", x, y),
        },
        Command::Stats { group } => {
            if !session.compute_group_means(&group)? {
                bail!("Group {} has no ROI", group);
            }
            session.wait_for_means()?;
            if let Some(region) = session.store().lead_region(&group) {
                for (name, mean) in &region.file_means {
                    println!("{}  {:.3}", name, mean);
                }
            }
            for row in session.report().summary.iter().filter(|r| r.group_id == group) {
                let s = &row.summary;
                println!(
                    "{}: n={} mean={:.3} min={:.3} max={:.3} sd={:.3}",
                    row.label, s.count, s.mean, s.min, s.max, s.std_dev
                );
            }
        }
        Command::Report { out } => session.export_report(&out)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rect_and_ellipse() {
        let rect = build_shape(ShapeArg::Rectangle, Some("1, 2, 3, 4"), None).unwrap();
        assert_eq!(rect, RoiShape::rectangle(1.0, 2.0, 3.0, 4.0));

        let ellipse = build_shape(ShapeArg::Ellipse, Some("0,0,10,5"), None).unwrap();
        assert_eq!(ellipse, RoiShape::ellipse(0.0, 0.0, 10.0, 5.0));

        assert!(build_shape(ShapeArg::Rectangle, Some("1,2,3"), None).is_err());
        assert!(build_shape(ShapeArg::Rectangle, None, None).is_err());
    }

    #[test]
    fn test_build_freeform() {
        let shape = build_shape(ShapeArg::Freeform, None, Some("0,0;100,0;50,100;")).unwrap();
        assert_eq!(shape, RoiShape::freeform([(0.0, 0.0), (100.0, 0.0), (50.0, 100.0)]));

        assert!(build_shape(ShapeArg::Freeform, None, Some("0,0;1")).is_err());
        assert!(build_shape(ShapeArg::Freeform, None, Some("a,b")).is_err());
    }
}
