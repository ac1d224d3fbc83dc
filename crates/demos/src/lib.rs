//! The texture-map demos as data: which textures each one loads, how its
//! material starts out, and which controls its panel exposes.
//!
//! Nothing here knows about windows or widgets; the platform layer draws a
//! [`ControlPanel`] and feeds [`ControlChange`]s back in.

pub mod assets;
pub mod controls;
pub mod kind;
pub mod scene;

pub use assets::DemoAssets;
pub use controls::{Axis, Control, ControlChange, ControlEntry, ControlError, ControlPanel};
pub use kind::{DemoKind, ParseDemoKindError};
pub use scene::DemoScene;
