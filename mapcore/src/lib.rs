//! District selection and annotation core for the city project map.
//!
//! This crate is compiled to WebAssembly and runs in the browser, but all of
//! its state logic also builds natively for tests and the CLI. It owns the two
//! map views: an overview where districts are selected, and a detail view
//! focused on the selection behind a darkening mask where project drawings
//! are shown, picked, nudged and dragged. The host page draws base tiles,
//! wires DOM events to [`engine::EngineCore`], and applies the returned
//! [`engine::Action`]s. Backend flows go through [`session::Session`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`session`] | Composition root running the flows that need the backend |
//! | [`geometry`] | GeoJSON geometry model and bounds |
//! | [`doc`] | District catalog, projects, drawings and drafts |
//! | [`mask`] | World polygon with the selected districts cut out |
//! | [`selection`] | Selected district set and its label |
//! | [`overview`] | Overview map: district boundaries styled by selection |
//! | [`detail`] | Detail map: outlines, mask and the edit layer |
//! | [`annotations`] | Projects' drawings rendered as primitives |
//! | [`edit`] | Active primitive, keyboard nudging and dragging |
//! | [`sync`] | Sidebar card and map highlight reconciliation |
//! | [`persistence`] | Replace-all drawing batches |
//! | [`stats`] | Per-status project counts for the selection |
//! | [`layer`] | Rendered primitives and their paint order |
//! | [`hit`] | Hit-testing against primitives |
//! | [`camera`] | Web Mercator viewport and coordinate conversions |
//! | [`render`] | Canvas rendering |
//! | [`input`] | Keys, modifiers, tabs and the pointer state |
//! | [`api`] | Backend trait and errors |
//! | [`notify`] | Notices and the notifier trait |
//! | [`style`] | Fixed visual palette |
//! | [`config`] | Editing settings |
//! | [`consts`] | Shared numeric constants (zoom levels, padding, steps) |

pub mod annotations;
pub mod api;
pub mod camera;
pub mod config;
pub mod consts;
pub mod detail;
pub mod doc;
pub mod edit;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod layer;
pub mod mask;
pub mod notify;
pub mod overview;
pub mod persistence;
pub mod render;
pub mod selection;
pub mod session;
pub mod stats;
pub mod style;
pub mod sync;

#[cfg(test)]
mod test_helpers;
