// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: node ids, geometry and the canonical tree store.

pub mod fixtures;
pub mod geometry;
pub mod ids;
pub mod tree;

pub use fixtures::{balanced_chart, sample_chart};
pub use geometry::{Point, Rect};
pub use ids::{IdError, NodeId, NodeIndex};
pub use tree::{ChartData, ChartNode, OrgNode, OrgTree, TreeEdge, TreeLoadError};
