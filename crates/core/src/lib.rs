//! Panorama dashboard core.
//!
//! Pure domain logic shared by the API server and any other consumer:
//! template variables, query token substitution, and line color palettes.

pub mod color_palette;
pub mod error;
pub mod template;
pub mod template_registry;
pub mod template_resolver;
pub mod template_store;
pub mod tempvar_masking;
