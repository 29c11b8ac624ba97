/// Export orchestration: sequence -> extraction -> encoder hand-off.
pub mod pipeline;
