// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Orgchart: drag-driven restructuring engine for organization charts.
//!
//! The tree store lives in [`model`], [`ops`] is its only writer, [`layout`]
//! turns a tree into boxes and edge bends, [`drag`] holds the gesture
//! building blocks and [`editor`] wires them to a [`surface::Surface`].

pub mod config;
pub mod drag;
pub mod editor;
pub mod layout;
pub mod model;
pub mod ops;
pub mod surface;

pub use config::{ConfigError, DragConfig, EditorConfig, LayoutConfig};
pub use editor::{Editor, EventOutcome, Key, NoopReason};
