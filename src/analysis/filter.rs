// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text filtering of acquisition listings.

/// Case-insensitive match of `filter` against a display name, falling back
/// to the acquisition's tag strings when the name does not match.
pub fn matches_filter(display_name: &str, filter: &str, tags: Option<&[String]>) -> bool {
    let needle = filter.to_lowercase();
    if display_name.to_lowercase().contains(&needle) {
        return true;
    }
    tags.is_some_and(|tags| tags.iter().any(|t| t.to_lowercase().contains(&needle)))
}
