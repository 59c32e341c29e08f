// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout for parsed dot graphs.
//!
//! Assigns every node to a layer (column) and an order within that layer. Geometry is left to
//! the renderer.

pub mod layered;

pub use layered::{layout_graph, EdgePath, GraphLayout, LayoutError, LayoutSlot};
