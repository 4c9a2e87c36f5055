// Application layer: terminal presentation of session snapshots.

pub mod render;
