// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout engine.
//!
//! A rank pass assigns vertical bands, a centering pass places every sibling
//! group under its parent in ChildrenOrder sequence, and each edge gets a
//! single-elbow orthogonal route.

pub mod preview;
pub mod rank;
pub mod tree;

pub use preview::{place_preview, PreviewPlacement};
pub use rank::{LayeredRanker, RankLayout, RankPlacement};
pub use tree::{layout_tree, layout_with, route_edge, EdgeRoute, TreeLayout};
