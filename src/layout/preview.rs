// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::SmallVec;

use crate::config::DragConfig;
use crate::drag::DropIntent;
use crate::model::{Point, Rect};

use super::tree::route_edge;

/// Marker box and preview edge for a staged drop.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewPlacement {
    pub marker: Rect,
    pub bends: SmallVec<[Point; 2]>,
}

/// Places the drop marker next to (or under) `candidate`.
///
/// `parent` is the box of the would-be parent: the candidate's parent for
/// sibling intents, the candidate itself for child intents. `first_child` is
/// the candidate's first child, used to pick the marker row for child intents.
pub fn place_preview(
    intent: DropIntent,
    candidate: &Rect,
    parent: &Rect,
    first_child: Option<&Rect>,
    config: &DragConfig,
) -> PreviewPlacement {
    let spacing = config.preview_spacing;
    let right_of = candidate.right() + spacing;
    let left_of = candidate.x - config.preview_width - spacing;

    let origin = match (intent, first_child) {
        (DropIntent::SiblingAfter, _) => Point::new(right_of, candidate.y),
        (DropIntent::SiblingBefore, _) => Point::new(left_of, candidate.y),
        (DropIntent::LastChild, Some(child)) => Point::new(right_of, child.y),
        (DropIntent::FirstChild, Some(child)) => Point::new(left_of, child.y),
        (DropIntent::FirstChild | DropIntent::LastChild, None) => Point::new(
            candidate.center_x() - config.preview_width / 2.0,
            candidate.bottom() + spacing,
        ),
    };

    let marker = Rect::at(origin, config.preview_width, config.preview_height);
    let bends = route_edge(parent, &marker);
    PreviewPlacement { marker, bends }
}
