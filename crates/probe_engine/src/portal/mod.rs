//! Portals: trigger volumes that send the player somewhere else
//!
//! A portal listens for collision-start notifications addressed to its
//! entity and, when the other party is the player, asks a [`Navigator`] to
//! leave for the configured URL.

pub mod navigator;
pub mod teleporter;

pub use navigator::{LogNavigator, NavigationError, Navigator};
pub use teleporter::{PortalTeleporter, TeleporterError};
