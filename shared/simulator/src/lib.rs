pub mod collision;
pub mod color;
pub mod config;
pub mod effect;
pub mod game;
pub mod invoker;
pub mod model;
pub mod physics;
pub mod registry;
pub mod rng;
pub mod rocket;
pub mod scan;
pub mod ship;
pub mod simulation;
pub mod snapshot;
