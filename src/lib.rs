//! Canvas core for an interactive vector-drawing editor.
//!
//! The crate owns the geometry and interaction engine behind the canvas:
//! affine transform algebra, anchor resolution, hit testing, the mode-driven
//! gesture state machine that turns pointer motion into a live candidate
//! transform, committing that candidate into an object's transform chain, and
//! a three-layer compositor that keeps redraw cheap while dragging. File
//! parsing, settings storage and window wiring belong to the host, which talks
//! to the engine through the [`doc::Model`] trait, [`config::Settings`] and the
//! [`engine::Action`]s returned from every handler.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Editor session [`engine::EngineCore`] and host-facing actions |
//! | [`transform`] | [`transform::AffineTransform`] value type |
//! | [`anchor`] | Anchor modes and resolution against a bounding box |
//! | [`drawable`] | Drawables, bounding boxes and the owning registry |
//! | [`hit`] | Topmost-drawable hit testing |
//! | [`input`] | Modes, locks, selection snapshot and the gesture state machine |
//! | [`commit`] | Local/global composition into the transform chain |
//! | [`render`] | Background/content/overlay layers and compositing |
//! | [`camera`] | Points and the Y-up canvas ↔ screen camera |
//! | [`doc`] | Model collaborator trait and an in-memory model |
//! | [`config`] | Editor settings |
//! | [`consts`] | Shared numeric constants |

pub mod anchor;
pub mod camera;
pub mod commit;
pub mod config;
pub mod consts;
pub mod doc;
pub mod drawable;
pub mod engine;
pub mod hit;
pub mod input;
pub mod render;
pub mod transform;
