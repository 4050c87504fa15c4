//! Any combination of the following mapping systems are supported for any given minecraft version:
//! - `yarn` - Fabric's crowd sourced deobfuscated names
//!   - These have an independent build number, which defaults to the latest build for the version.
//! - `intermediary` - Fabric's stable names, which stay the same across minecraft versions
//! - `obf` - The obfuscated mojang names, as found in the game jar
//! - `mojmap` - Mojang's official deobfuscated names, published with each version since 1.14.4
//!
//! Every pair of neighbouring systems is linked by one source (yarn, intermediary and mojmap),
//! so any other pair is computed by joining the sources in between.
//!
//! Mapping targets have a string representation of the form `{original}2{renamed}` with an optional modifier at the end.
//! For example, `yarn2mojmap` specifies mappings from the yarn names into the mojang names.
//! Two modifiers are supported:
//! - `classes` - Restricts the mappings to just class names.
//! - `members` - Restricts the mappings to just member names.
extern crate failure;
extern crate failure_derive;
extern crate indexmap;
extern crate crossbeam;
extern crate log;

pub mod join;
mod target;
mod triple;
mod computer;

pub use self::target::{TargetMapping, TargetFlags, TargetFilter, MappingSystem, InvalidTarget};
pub use self::triple::{MappingsTriple, MappingsSource};
pub use self::computer::{MappingsTargetComputer, TargetComputeError};
pub use self::join::{JoinNamespaces, JoinError};
