pub mod incremental;
