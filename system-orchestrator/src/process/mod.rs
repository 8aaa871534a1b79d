pub mod manager;
pub mod models;
pub mod topology;
