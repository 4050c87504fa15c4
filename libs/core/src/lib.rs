extern crate indexmap;
extern crate failure;
extern crate failure_derive;
extern crate serde;
extern crate serde_json;
extern crate serde_derive;
extern crate itertools;
extern crate curl;
extern crate scopeguard;
extern crate zip;
extern crate log;

pub mod descriptor;
pub mod tree;
pub mod format;
pub mod sink;
pub mod cache;
pub mod mojmap;
pub mod fabric;
mod version;
mod utils;

pub use self::version::{
    MinecraftVersion, YarnVersion, VersionManifest, VersionInfo,
    InvalidMinecraftVersion, UnknownMinecraftVersion, InvalidYarnVersion
};
pub use self::utils::{CancellationToken, Cancelled, HttpNotFound};
pub use self::tree::{MappingTree, MappingTreeBuilder, Names, Namespace};
pub use self::format::MappingFormat;

/// The namespace names used by each mapping source
pub mod namespaces {
    /// Obfuscated names, as found in the game jar
    pub const OFFICIAL: &str = "official";
    pub const INTERMEDIARY: &str = "intermediary";
    /// Yarn's human readable names
    pub const NAMED: &str = "named";
    pub const MOJANG: &str = "mojang";
}
