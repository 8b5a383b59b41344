// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{NodeId, Point, Rect};

/// The candidate the dragged box overlaps the most.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    pub node_id: NodeId,
    pub bounds: Rect,
    pub overlap_area: f64,
    pub overlap_center: Point,
}

/// Finds the candidate with the largest overlap with `dragged_box`.
///
/// Candidates listed in `excluded` are ignored. Ties keep the first candidate
/// seen; touching boxes count with a zero area.
pub fn detect_intersection<'a, I>(
    dragged_box: &Rect,
    candidates: I,
    excluded: &[&NodeId],
) -> Option<Intersection>
where
    I: IntoIterator<Item = (&'a NodeId, Rect)>,
{
    let mut best: Option<Intersection> = None;
    for (node_id, bounds) in candidates {
        if excluded.contains(&node_id) {
            continue;
        }
        let Some(overlap) = dragged_box.overlap(&bounds) else {
            continue;
        };
        let area = overlap.area();
        if best.as_ref().is_some_and(|current| current.overlap_area >= area) {
            continue;
        }
        best = Some(Intersection {
            node_id: node_id.clone(),
            bounds,
            overlap_area: area,
            overlap_center: overlap.center(),
        });
    }
    best
}
