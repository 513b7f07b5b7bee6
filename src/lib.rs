pub mod clock;
pub mod constants;
pub mod engine;
pub mod level;
pub mod rng;
pub mod server_protocol;
pub mod server_utils;
pub mod types;
pub mod world;
