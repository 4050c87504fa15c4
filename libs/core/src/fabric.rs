//! Fabric's intermediary and yarn mappings, published on their maven.
use std::io::Cursor;

use failure::Error;
use failure_derive::Fail;
use log::debug;
use serde_derive::Deserialize;

use crate::format::tiny;
use crate::tree::MappingTree;
use crate::utils::{self, CancellationToken};
use crate::version::{MinecraftVersion, YarnVersion};

pub const YARN_META_URL: &str = "https://meta.fabricmc.net/v2/versions/yarn";
pub const MAVEN_URL: &str = "https://maven.fabricmc.net";
/// The location of the tiny file inside both the intermediary and yarn jars
pub const MAPPINGS_ENTRY: &str = "mappings/mappings.tiny";

/// A single yarn build, as listed by fabric's meta server
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YarnBuild {
    pub game_version: MinecraftVersion,
    pub separator: String,
    pub build: u32,
    pub maven: String,
    pub version: YarnVersion,
    #[serde(default)]
    pub stable: bool,
}

/// List the yarn builds for the specified version.
///
/// Like the version manifest, this is never cached.
pub fn list_yarn_builds(minecraft: &MinecraftVersion, token: &CancellationToken) -> Result<Vec<YarnBuild>, Error> {
    let url = format!("{}/{}", YARN_META_URL, minecraft);
    let buffer = utils::download_buffer(&url, token)?;
    let builds = parse_yarn_builds(&buffer)?;
    debug!("Found {} yarn builds for {}", builds.len(), minecraft);
    Ok(builds)
}

#[inline]
pub fn parse_yarn_builds(buffer: &[u8]) -> Result<Vec<YarnBuild>, Error> {
    Ok(::serde_json::from_slice(buffer)?)
}

#[inline]
pub fn latest_yarn_build(builds: &[YarnBuild]) -> Option<&YarnBuild> {
    builds.iter().max_by_key(|build| build.build)
}

/// Pick the requested yarn build, looking up the latest one if none was given
pub fn resolve_yarn_version(
    minecraft: &MinecraftVersion,
    requested: Option<u32>,
    token: &CancellationToken
) -> Result<YarnVersion, Error> {
    if let Some(build) = requested {
        return Ok(YarnVersion::new(minecraft.clone(), build))
    }
    let builds = list_yarn_builds(minecraft, token)?;
    let latest = latest_yarn_build(&builds)
        .ok_or_else(|| MissingYarnVersion(minecraft.clone()))?;
    Ok(latest.version.clone())
}

#[inline]
pub fn intermediary_url(minecraft: &MinecraftVersion) -> String {
    format!("{0}/net/fabricmc/intermediary/{1}/intermediary-{1}-v2.jar", MAVEN_URL, minecraft)
}

#[inline]
pub fn yarn_url(version: &YarnVersion) -> String {
    format!("{0}/net/fabricmc/yarn/{1}/yarn-{1}-v2.jar", MAVEN_URL, version)
}

/// Download a mappings jar and extract its tiny file
pub fn download_mappings_jar(url: &str, token: &CancellationToken) -> Result<Vec<u8>, Error> {
    let buffer = utils::download_buffer(url, token)?;
    utils::read_zip_entry(&buffer, MAPPINGS_ENTRY)
}

#[inline]
pub fn parse_tiny_mappings(buffer: &[u8]) -> Result<MappingTree, Error> {
    tiny::parse_tiny_v2(Cursor::new(buffer))
}

#[derive(Debug, Fail)]
#[fail(display = "Couldn't find a yarn version for minecraft {}", _0)]
pub struct MissingYarnVersion(pub MinecraftVersion);

#[cfg(test)]
mod test {
    use super::*;

    const BUILDS: &str = r#"[
        {"gameVersion": "1.19.2", "separator": "+build.", "build": 28, "maven": "net.fabricmc:yarn:1.19.2+build.28", "version": "1.19.2+build.28", "stable": true},
        {"gameVersion": "1.19.2", "separator": "+build.", "build": 4, "maven": "net.fabricmc:yarn:1.19.2+build.4", "version": "1.19.2+build.4", "stable": false},
        {"gameVersion": "1.19.2", "separator": "+build.", "build": 11, "maven": "net.fabricmc:yarn:1.19.2+build.11", "version": "1.19.2+build.11", "stable": false}
    ]"#;

    #[test]
    fn latest_build() {
        let builds = parse_yarn_builds(BUILDS.as_bytes()).unwrap();
        assert_eq!(builds.len(), 3);
        let latest = latest_yarn_build(&builds).unwrap();
        assert_eq!(latest.build, 28);
        assert_eq!(format!("{}", latest.version), "1.19.2+build.28");
        assert!(latest_yarn_build(&[]).is_none());
        assert!(parse_yarn_builds(b"[]").unwrap().is_empty());
    }
    #[test]
    fn explicit_build() {
        // An explicit build never needs the meta server
        let token = CancellationToken::new();
        token.cancel();
        let minecraft: MinecraftVersion = "1.19.2".parse().unwrap();
        let version = resolve_yarn_version(&minecraft, Some(7), &token).unwrap();
        assert_eq!(format!("{}", version), "1.19.2+build.7");
        assert!(resolve_yarn_version(&minecraft, None, &token).is_err());
    }
    #[test]
    fn urls() {
        let minecraft: MinecraftVersion = "1.19.2".parse().unwrap();
        assert_eq!(
            intermediary_url(&minecraft),
            "https://maven.fabricmc.net/net/fabricmc/intermediary/1.19.2/intermediary-1.19.2-v2.jar"
        );
        assert_eq!(
            yarn_url(&YarnVersion::new(minecraft, 28)),
            "https://maven.fabricmc.net/net/fabricmc/yarn/1.19.2+build.28/yarn-1.19.2+build.28-v2.jar"
        );
    }
}
