//! Pipeline stages for card generation.
//!
//! Each submodule implements exactly one transformation step and is usable
//! on its own; [`crate::generate`] strings them together.
//!
//! ## Data Flow
//!
//! ```text
//! sheet ──▶ normalize ──▶ template ──▶ rasterize ──▶ grid
//! (xlsx)     (rows)        (SVGs)       (PNGs)       (merged PNG)
//! ```
//!
//! 1. [`sheet`]    : read the header and data rows of one worksheet
//! 2. [`normalize`]: turn a row into a [`normalize::CardRecord`] of strings
//! 3. [`template`] : literal placeholder substitution into an SVG template
//! 4. [`rasterize`]: SVG → PNG through an external tool or resvg
//! 5. [`grid`]     : measure the first raster and tile all rasters

pub mod grid;
pub mod normalize;
pub mod rasterize;
pub mod sheet;
pub mod template;
