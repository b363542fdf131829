pub mod colors;
pub mod template_set;
pub mod templates;
