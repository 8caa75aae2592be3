//! Beatglider library - audio-reactive Game of Life for light panels
//!
//! Beats detected per audio channel spawn gliders of light cells over a panel
//! layout. Every frame the panels are coloured from the cells around them and
//! the cells then advance one cellular-automaton generation.

pub mod audio;
pub mod cell;
pub mod cli;
pub mod compositor;
pub mod detector;
pub mod error;
pub mod generation;
pub mod layout;
pub mod params;
pub mod pool;
pub mod preview;
pub mod session;

pub use error::{Error, Result};
pub use session::{PanelFrame, Session};
