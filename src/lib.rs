//! Oval Racer - single-player arcade driving on an elliptical track
//!
//! The simulation is headless and deterministic given its inputs:
//! - `track`: ring geometry, asphalt test, checkpoint gates
//! - `game`: vehicle physics, containment, laps, coins, props, camera
//! - `session`: start/stop lifecycle, tick scheduling, host loop
//! - `present`: the contract renderers and HUD overlays implement

pub mod config;
pub mod driver;
pub mod game;
pub mod hud;
pub mod input;
pub mod present;
pub mod session;
pub mod track;
pub mod util;
