/// User-facing preview/export settings.
pub mod settings;
