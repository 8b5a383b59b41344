// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Gesture-side building blocks: overlap detection, drop resolution, click
//! discrimination and the per-gesture session state.

pub mod click;
pub mod intersect;
pub mod quadrant;
pub mod session;

pub use click::{ClickDiscriminator, ClickKind};
pub use intersect::{detect_intersection, Intersection};
pub use quadrant::{resolve_drop, DropIntent, PendingMove};
pub use session::{DragPhase, DragSession, DragState, MoveCoalescer, PreviewCells, Release};
