// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Acquisition mode classification by pixel spacing.
//!
//! Each acquisition is assigned to whichever target spacing its row
//! spacing is closer to. Only the first spacing element is consulted.

use crate::models::{Acquisition, Classification, FolderSettings};

/// Default target spacing for contrast-enhanced acquisitions.
pub const DEFAULT_CEUS_TARGET: f64 = 0.5;

/// Default target spacing for second harmonic acquisitions.
pub const DEFAULT_SHI_TARGET: f64 = 0.3;

/// Classify by nearest target spacing.
///
/// Missing or empty spacing and exact ties resolve to [`Classification::Ceus`].
pub fn classify(spacing: Option<&[f64]>, ceus_target: f64, shi_target: f64) -> Classification {
    let Some(&row) = spacing.and_then(|s| s.first()) else {
        return Classification::Ceus;
    };
    let ceus_distance = (row - ceus_target).abs();
    let shi_distance = (row - shi_target).abs();
    if shi_distance < ceus_distance {
        Classification::Shi
    } else {
        Classification::Ceus
    }
}

/// Classifier bound to a pair of target spacings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    pub ceus_target: f64,
    pub shi_target: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            ceus_target: DEFAULT_CEUS_TARGET,
            shi_target: DEFAULT_SHI_TARGET,
        }
    }
}

impl From<&FolderSettings> for Classifier {
    fn from(settings: &FolderSettings) -> Self {
        Self {
            ceus_target: settings.ceus_spacing,
            shi_target: settings.shi_spacing,
        }
    }
}

impl Classifier {
    pub fn classify(&self, spacing: Option<&[f64]>) -> Classification {
        classify(spacing, self.ceus_target, self.shi_target)
    }

    /// Tag every acquisition in place.
    pub fn classify_all(&self, acquisitions: &mut [Acquisition]) {
        for acquisition in acquisitions.iter_mut() {
            acquisition.classification = self.classify(acquisition.pixel_spacing.as_ref().map(|s| &s[..]));
        }
        let shi = acquisitions
            .iter()
            .filter(|a| a.classification == Classification::Shi)
            .count();
        log::debug!(
            "Classified {} acquisitions: {} CEUS, {} SHI",
            acquisitions.len(),
            acquisitions.len() - shi,
            shi
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_default(spacing: &[f64]) -> Classification {
        Classifier::default().classify(Some(spacing))
    }

    #[test]
    fn test_near_shi_target() {
        assert_eq!(classify_default(&[0.29, 0.29]), Classification::Shi);
        assert_eq!(classify_default(&[0.31, 0.31]), Classification::Shi);
    }

    #[test]
    fn test_near_ceus_target() {
        assert_eq!(classify_default(&[0.49, 0.49]), Classification::Ceus);
        assert_eq!(classify_default(&[0.51, 0.51]), Classification::Ceus);
    }

    #[test]
    fn test_missing_spacing_is_ceus() {
        assert_eq!(classify(None, 0.5, 0.3), Classification::Ceus);
        assert_eq!(classify(Some(&[]), 0.5, 0.3), Classification::Ceus);
    }

    #[test]
    fn test_midpoint_tie_is_ceus() {
        assert_eq!(classify_default(&[0.4, 0.4]), Classification::Ceus);
        assert_eq!(classify(Some(&[2.0]), 1.0, 3.0), Classification::Ceus);
    }

    #[test]
    fn test_only_row_spacing_is_consulted() {
        assert_eq!(classify_default(&[0.3, 0.5]), Classification::Shi);
        assert_eq!(classify_default(&[0.5, 0.3]), Classification::Ceus);
    }

    #[test]
    fn test_custom_targets() {
        let classifier = Classifier {
            ceus_target: 0.2,
            shi_target: 0.8,
        };
        assert_eq!(classifier.classify(Some(&[0.7, 0.7])), Classification::Shi);
        assert_eq!(classifier.classify(Some(&[0.3, 0.3])), Classification::Ceus);
    }

    #[test]
    fn test_classify_all_tags_in_place() {
        let mut acquisitions = vec![
            Acquisition::new("a", 10, 10).with_spacing([0.3, 0.3]),
            Acquisition::new("b", 10, 10).with_spacing([0.5, 0.5]),
            Acquisition::new("c", 10, 10),
        ];

        Classifier::from(&FolderSettings::default()).classify_all(&mut acquisitions);

        let labels: Vec<_> = acquisitions.iter().map(|a| a.classification).collect();
        assert_eq!(labels, vec![Classification::Shi, Classification::Ceus, Classification::Ceus]);
    }
}
