// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────────┐
//! │ Depth frame  │ ──▶ │ Presence pipeline │ ──▶ │ Presentation     │
//! │  (u16 mm)    │     │  - Mapping        │     │ sink             │
//! │              │     │  - Spatial filter │     │  - Triggers      │
//! │              │     │  - Reductions     │     │  - Box and mask  │
//! └──────────────┘     └───────────────────┘     └──────────────────┘
//! ```
//!
//! Each tick is a pure function of the frame and a configuration snapshot;
//! the only state carried between ticks is the last committed box and mask.

pub mod presence;
