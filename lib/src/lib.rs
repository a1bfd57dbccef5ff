//! # Commander Deck Construction Engine
//!
//! deckforge builds legal 100-card singleton Commander decks from a tagged
//! card catalog: a deterministic multi-phase pipeline of filtering, weighted
//! sampling, and rebalancing honoring color identity, bracket policy caps,
//! and mana-base invariants. Used by the `deckbuild` CLI.

#[macro_use]
extern crate serde_derive;
extern crate serde;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate bincode;
extern crate chrono;
extern crate flate2;
extern crate rand;
extern crate regex;
extern crate serde_json;
extern crate serde_yaml;
extern crate thiserror;

pub mod brackets;
pub mod builder;
pub mod card;
pub mod catalog;
pub mod color_balance;
pub mod compliance;
pub mod config;
pub mod constants;
pub mod creatures;
pub mod deck;
pub mod enforcement;
pub mod error;
pub mod export;
pub mod lands;
pub mod random_entry;
pub mod resolver;
pub mod sampling;
pub mod spells;
pub mod summary;
pub mod tabular;
pub mod themes;

#[cfg(test)]
pub mod testutil;

pub use crate::builder::{BuildResult, DeckBuilder};
pub use crate::catalog::{Catalog, CatalogService};
pub use crate::compliance::PolicyStore;
pub use crate::config::BuildConfig;
pub use crate::error::BuildError;
