pub mod focus;
pub mod recommend;
pub mod stats;
