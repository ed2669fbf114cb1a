#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region resolution for the mausam map.
//!
//! Ties the capital registry, the static datasets, and live weather
//! together:
//!
//! * [`normalize`] canonicalizes region names for matching
//! * [`registry`] holds the capitals and the shared capital policy
//! * [`mode`] turns a mode name into a [`mode::ModeDescriptor`]
//! * [`markers`] builds the map markers for a descriptor
//! * [`detail`] resolves a single region drill-down
//! * [`summary`] derives chart views from tabular records

pub mod detail;
pub mod markers;
pub mod mode;
pub mod normalize;
pub mod registry;
pub mod summary;
