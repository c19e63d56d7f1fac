// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session state for one acquisition directory.
//!
//! This module ties the pieces together the way an interactive host does:
//! load and classify the acquisitions, group them, drive the ROI store,
//! and compute per-acquisition means in the background, attaching only the
//! results that are still current when they arrive.

use crate::analysis::classifier::Classifier;
use crate::analysis::grouping::group_acquisitions;
use crate::analysis::statistics::{self, Report};
use crate::error::SonoError;
use crate::io::manifest;
use crate::io::media::ImageSequence;
use crate::io::serialization;
use crate::models::{Acquisition, FolderSettings, RoiShape, TimeSeriesGroup};
use crate::store::RoiStore;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};

/// Result of one background mean computation.
struct MeanUpdate {
    generation: u64,
    group_id: String,
    acquisition: String,
    mean: f64,
}

/// Main session state.
pub struct Session {
    /// Directory holding the manifest, settings and ROI sidecar
    directory: PathBuf,

    settings: FolderSettings,

    /// Every loaded acquisition, classified
    acquisitions: Vec<Acquisition>,

    /// Groups for the current window
    groups: Vec<TimeSeriesGroup>,

    store: RoiStore,

    /// Per-group edit counter; background results from an older edit are stale
    generations: HashMap<String, u64>,

    /// Receiver for background mean computation
    mean_loader: Option<Receiver<MeanUpdate>>,
}

impl Session {
    /// Load a directory: settings, acquisitions, classification, groups and ROIs.
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        let settings = FolderSettings::load(&directory);
        let acquisitions = manifest::load_directory(&directory)
            .with_context(|| format!("Failed to load acquisitions from {}", directory.display()))?;
        let mut store = RoiStore::new();
        store.load(&directory);

        let mut session = Self {
            directory,
            settings,
            acquisitions,
            groups: Vec::new(),
            store,
            generations: HashMap::new(),
            mean_loader: None,
        };
        session.apply_settings(settings);
        Ok(session)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn settings(&self) -> &FolderSettings {
        &self.settings
    }

    pub fn acquisitions(&self) -> &[Acquisition] {
        &self.acquisitions
    }

    pub fn groups(&self) -> &[TimeSeriesGroup] {
        &self.groups
    }

    pub fn store(&self) -> &RoiStore {
        &self.store
    }

    pub fn group(&self, group_id: &str) -> Option<&TimeSeriesGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    fn require_group(&self, group_id: &str) -> Result<&TimeSeriesGroup> {
        self.group(group_id)
            .ok_or_else(|| SonoError::UnknownGroup(group_id.to_string()).into())
    }

    /// Reclassify and regroup everything under new settings.
    pub fn apply_settings(&mut self, settings: FolderSettings) {
        self.settings = settings;
        Classifier::from(&settings).classify_all(&mut self.acquisitions);
        self.regroup(settings.time_window_seconds);
    }

    /// Persist the current settings next to the acquisitions.
    pub fn save_settings(&self) -> Result<()> {
        self.settings
            .save(&self.directory)
            .context("Failed to save folder settings")
    }

    /// Recompute groups from scratch for a new window.
    pub fn regroup(&mut self, window_seconds: f64) {
        self.settings.time_window_seconds = window_seconds;
        self.groups = group_acquisitions(&self.acquisitions, window_seconds);
        log::info!("{} groups at {}s window", self.groups.len(), window_seconds);
    }

    fn generation(&self, group_id: &str) -> u64 {
        self.generations.get(group_id).copied().unwrap_or(0)
    }

    fn after_edit(&mut self, group_id: &str) -> Result<()> {
        *self.generations.entry(group_id.to_string()).or_default() += 1;
        self.store
            .save(&self.directory)
            .context("Failed to save ROIs")
    }

    /// Add an ROI to a group and persist.
    pub fn add_roi(&mut self, group_id: &str, shape: RoiShape) -> Result<String> {
        self.require_group(group_id)?;
        let id = self.store.add_shape(group_id, shape);
        self.after_edit(group_id)?;
        Ok(id)
    }

    pub fn replace_roi(&mut self, group_id: &str, id: &str, shape: RoiShape) -> Result<bool> {
        let replaced = self.store.replace_shape(group_id, id, shape);
        self.after_edit(group_id)?;
        Ok(replaced)
    }

    pub fn remove_roi(&mut self, group_id: &str, id: &str) -> Result<bool> {
        let removed = self.store.remove_region(group_id, id);
        self.after_edit(group_id)?;
        Ok(removed)
    }

    pub fn clear_rois(&mut self, group_id: &str) -> Result<()> {
        self.store.clear_group(group_id);
        self.after_edit(group_id)
    }

    pub fn undo(&mut self, group_id: &str) -> Result<bool> {
        if !self.store.undo(group_id) {
            return Ok(false);
        }
        self.after_edit(group_id)?;
        Ok(true)
    }

    /// Compute the mean for one acquisition of a group synchronously,
    /// attach it to the lead region and persist.
    ///
    /// Returns `None` when the group has no ROI.
    pub fn compute_mean(&mut self, group_id: &str, acquisition: &str) -> Result<Option<f64>> {
        let group = self.require_group(group_id)?;
        let target = group
            .find(acquisition)
            .ok_or_else(|| SonoError::UnknownAcquisition(acquisition.to_string()))?;
        let Some(region) = self.store.lead_region(group_id) else {
            return Ok(None);
        };

        let mean = statistics::compute_mean_intensity(&ImageSequence::for_acquisition(target), region);
        self.store.attach_mean(group_id, acquisition, mean);
        self.store
            .save(&self.directory)
            .context("Failed to save ROIs")?;
        Ok(Some(mean))
    }

    /// Start computing the lead region's mean for every acquisition of a
    /// group on a background thread.
    ///
    /// Returns `false` when the group has no ROI. Results are picked up by
    /// [`Session::poll_means`] or [`Session::wait_for_means`]. Starting a
    /// new computation abandons the previous one. Results are dropped if
    /// this group's ROIs are edited before they arrive; edits to other
    /// groups leave them alone.
    pub fn compute_group_means(&mut self, group_id: &str) -> Result<bool> {
        let acquisitions = self.require_group(group_id)?.acquisitions.clone();
        let Some(region) = self.store.lead_region(group_id).cloned() else {
            return Ok(false);
        };

        let (sender, receiver) = channel();
        self.mean_loader = Some(receiver);
        let generation = self.generation(group_id);
        let group_id = group_id.to_string();

        log::info!("Computing means for {} acquisitions of {}", acquisitions.len(), group_id);

        // Spawn background thread for computation
        std::thread::spawn(move || {
            for acquisition in &acquisitions {
                let provider = ImageSequence::for_acquisition(acquisition);
                let mean = statistics::compute_mean_intensity(&provider, &region);
                log::debug!("Mean of {} in {}: {:.3}", acquisition.name, group_id, mean);

                let update = MeanUpdate {
                    generation,
                    group_id: group_id.clone(),
                    acquisition: acquisition.name.clone(),
                    mean,
                };
                if sender.send(update).is_err() {
                    log::debug!("Mean computation for {} abandoned", group_id);
                    break;
                }
            }
        });

        Ok(true)
    }

    pub fn is_computing(&self) -> bool {
        self.mean_loader.is_some()
    }

    /// Attach whatever background results have arrived, without blocking.
    pub fn poll_means(&mut self) -> Result<usize> {
        self.drain_means(false)
    }

    /// Block until the background computation finishes and attach its results.
    pub fn wait_for_means(&mut self) -> Result<usize> {
        self.drain_means(true)
    }

    fn drain_means(&mut self, blocking: bool) -> Result<usize> {
        let Some(receiver) = self.mean_loader.take() else {
            return Ok(0);
        };

        let mut attached = 0;
        let mut finished = false;
        loop {
            let update = if blocking {
                match receiver.recv() {
                    Ok(update) => update,
                    Err(_) => {
                        finished = true;
                        break;
                    }
                }
            } else {
                match receiver.try_recv() {
                    Ok(update) => update,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        finished = true;
                        break;
                    }
                }
            };

            if update.generation != self.generation(&update.group_id) {
                log::debug!("Discarding stale mean for {}", update.acquisition);
                continue;
            }
            self.store.attach_mean(&update.group_id, &update.acquisition, update.mean);
            attached += 1;
        }

        if !finished {
            self.mean_loader = Some(receiver);
        }
        if attached > 0 {
            self.store
                .save(&self.directory)
                .context("Failed to save ROIs")?;
        }
        Ok(attached)
    }

    /// Per-acquisition rows and per-group summaries for the current grouping.
    pub fn report(&self) -> Report {
        Report::build(&self.groups, &self.store)
    }

    /// Write the report as YAML or JSON, by extension.
    pub fn export_report(&self, path: &Path) -> Result<()> {
        let report = self.report();
        serialization::export_report(&report, path)
            .with_context(|| format!("Failed to export report to {}", path.display()))?;
        log::info!(
            "Exported {} acquisition rows and {} group summaries to {}",
            report.acquisitions.len(),
            report.summary.len(),
            path.display()
        );
        Ok(())
    }
}
