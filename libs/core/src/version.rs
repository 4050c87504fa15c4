use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use failure::Error;
use failure_derive::Fail;
use log::debug;
use serde::{Deserialize, Deserializer};
use serde::de;
use serde_derive::Deserialize;

use crate::utils::{self, CancellationToken};

pub const VERSION_MANIFEST_URL: &str = "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// A minecraft version id, like `1.19.2` or `22w42a`.
///
/// Snapshots don't follow any numbering scheme, so this is kept as an opaque id.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct MinecraftVersion(String);
impl MinecraftVersion {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
    #[inline]
    pub(crate) fn unknown(&self) -> UnknownMinecraftVersion {
        UnknownMinecraftVersion(self.clone())
    }
}
impl FromStr for MinecraftVersion {
    type Err = InvalidMinecraftVersion;

    fn from_str(s: &str) -> Result<Self, InvalidMinecraftVersion> {
        // Old ids like `1.14 Pre-Release 5` contain spaces, but they must stay usable as a cache directory
        if s.trim().is_empty() || s.contains(|c: char| c == '/' || c == '\\') || s.contains("..") {
            return Err(InvalidMinecraftVersion(s.into()))
        }
        Ok(MinecraftVersion(s.into()))
    }
}
impl Display for MinecraftVersion {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
impl<'de> Deserialize<'de> for MinecraftVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where
        D: Deserializer<'de> {
        struct VersionVisitor;
        impl<'de> de::Visitor<'de> for VersionVisitor {
            type Value = MinecraftVersion;

            fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
                formatter.write_str("a MinecraftVersion")
            }

            fn visit_str<E>(self, v: &str) -> Result<MinecraftVersion, E> where
                E: de::Error, {
                MinecraftVersion::from_str(v).map_err(de::Error::custom)
            }
        }
        deserializer.deserialize_str(VersionVisitor)
    }
}

/// A specific yarn build for a minecraft version, like `1.19.2+build.28`
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct YarnVersion {
    pub minecraft: MinecraftVersion,
    pub build: u32,
}
impl YarnVersion {
    pub const SEPARATOR: &'static str = "+build.";
    #[inline]
    pub fn new(minecraft: MinecraftVersion, build: u32) -> YarnVersion {
        YarnVersion { minecraft, build }
    }
}
impl FromStr for YarnVersion {
    type Err = InvalidYarnVersion;

    fn from_str(s: &str) -> Result<Self, InvalidYarnVersion> {
        let error = || InvalidYarnVersion(s.into());
        let index = s.rfind(YarnVersion::SEPARATOR).ok_or_else(error)?;
        let minecraft = s[..index].parse().map_err(|_| error())?;
        let build = s[index + YarnVersion::SEPARATOR.len()..].parse().map_err(|_| error())?;
        Ok(YarnVersion { minecraft, build })
    }
}
impl Display for YarnVersion {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.minecraft, YarnVersion::SEPARATOR, self.build)
    }
}
impl<'de> Deserialize<'de> for YarnVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where
        D: Deserializer<'de> {
        struct VersionVisitor;
        impl<'de> de::Visitor<'de> for VersionVisitor {
            type Value = YarnVersion;

            fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
                formatter.write_str("a yarn version like 1.19.2+build.28")
            }

            fn visit_str<E>(self, v: &str) -> Result<YarnVersion, E> where
                E: de::Error, {
                YarnVersion::from_str(v).map_err(de::Error::custom)
            }
        }
        deserializer.deserialize_str(VersionVisitor)
    }
}

/// Mojang's list of every released version.
///
/// This is never cached, since we always want the latest info.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub latest: LatestVersions,
    pub versions: Vec<VersionInfo>,
}
#[derive(Debug, Deserialize)]
pub struct LatestVersions {
    pub release: MinecraftVersion,
    pub snapshot: MinecraftVersion,
}
#[derive(Clone, Debug, Deserialize)]
pub struct VersionInfo {
    pub id: MinecraftVersion,
    #[serde(rename = "type")]
    pub kind: String,
    /// The location of the version's client json
    pub url: String,
}
impl VersionManifest {
    pub fn download(token: &CancellationToken) -> Result<VersionManifest, Error> {
        let buffer = utils::download_buffer(VERSION_MANIFEST_URL, token)?;
        let manifest = VersionManifest::parse(&buffer)?;
        debug!("Loaded {} versions from the version manifest", manifest.versions.len());
        Ok(manifest)
    }
    #[inline]
    pub fn parse(buffer: &[u8]) -> Result<VersionManifest, Error> {
        Ok(::serde_json::from_slice(buffer)?)
    }
    #[inline]
    pub fn find(&self, version: &MinecraftVersion) -> Option<&VersionInfo> {
        self.versions.iter().find(|info| info.id == *version)
    }
    /// Resolve the requested version, defaulting to the latest release
    pub fn resolve(&self, requested: Option<&MinecraftVersion>) -> Result<&VersionInfo, UnknownMinecraftVersion> {
        let version = requested.unwrap_or(&self.latest.release);
        self.find(version).ok_or_else(|| version.unknown())
    }
}

#[derive(Debug, Fail)]
#[fail(display = "Invalid minecraft version {:?}", _0)]
pub struct InvalidMinecraftVersion(String);
#[derive(Debug, Fail)]
#[fail(display = "Unknown minecraft version {}", _0)]
pub struct UnknownMinecraftVersion(pub MinecraftVersion);
#[derive(Debug, Fail)]
#[fail(display = "Invalid yarn version {:?}", _0)]
pub struct InvalidYarnVersion(String);
