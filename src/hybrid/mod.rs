pub mod early_termination;
pub mod executor;
pub mod reflection;
pub mod scorer;
