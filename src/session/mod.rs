/// History of loaded sprite sheets.
pub mod history;
