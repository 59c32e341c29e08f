// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! The viewer pipeline only deals in [`FileName`] and [`GraphSource`]; the graph types are owned
//! by the rendering engine.

pub mod graph;
pub mod ids;
pub mod source;

pub use graph::{Attributes, Cluster, DotGraph, GraphEdge, GraphKind, GraphNode, RankDir};
pub use ids::{ClusterId, Id, IdError, NodeId};
pub use source::{FileName, FileNameError, GraphSource};
