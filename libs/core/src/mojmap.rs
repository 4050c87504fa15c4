//! Mojang's official mappings, downloaded through the version's client json.
use std::io::Cursor;

use failure::Error;
use failure_derive::Fail;
use indexmap::IndexMap;
use log::info;
use serde_derive::Deserialize;

use crate::format::proguard;
use crate::tree::MappingTree;
use crate::utils::{self, CancellationToken};
use crate::version::{MinecraftVersion, VersionInfo};

pub const CLIENT_MAPPINGS: &str = "client_mappings";

/// The parts of a version's client json that we care about
#[derive(Debug, Deserialize)]
pub struct VersionDetails {
    pub id: MinecraftVersion,
    pub downloads: IndexMap<String, Download>,
}
#[derive(Clone, Debug, Deserialize)]
pub struct Download {
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}
impl VersionDetails {
    pub fn download(info: &VersionInfo, token: &CancellationToken) -> Result<VersionDetails, Error> {
        let buffer = utils::download_buffer(&info.url, token)?;
        VersionDetails::parse(&buffer)
    }
    #[inline]
    pub fn parse(buffer: &[u8]) -> Result<VersionDetails, Error> {
        Ok(::serde_json::from_slice(buffer)?)
    }
    pub fn client_mappings(&self) -> Result<&Download, MissingMojangMappings> {
        self.downloads.get(CLIENT_MAPPINGS)
            .ok_or_else(|| MissingMojangMappings(self.id.clone()))
    }
}

/// Download the raw ProGuard mappings for the specified version
pub fn download_client_mappings(info: &VersionInfo, token: &CancellationToken) -> Result<Vec<u8>, Error> {
    let details = VersionDetails::download(info, token)?;
    info!("Loaded {} download URLs", details.downloads.len());
    let download = details.client_mappings()?;
    let buffer = utils::download_buffer(&download.url, token)?;
    if let Some(expected) = download.size {
        if buffer.len() as u64 != expected {
            return Err(TruncatedDownload { url: download.url.clone(), expected, actual: buffer.len() as u64 }.into())
        }
    }
    Ok(buffer)
}

#[inline]
pub fn parse_client_mappings(buffer: &[u8]) -> Result<MappingTree, Error> {
    proguard::parse_proguard(Cursor::new(buffer))
}

#[derive(Debug, Fail)]
#[fail(display = "Minecraft {} doesn't have official mappings", _0)]
pub struct MissingMojangMappings(pub MinecraftVersion);

#[derive(Debug, Fail)]
#[fail(display = "Expected {} bytes from {}, but got {}", expected, url, actual)]
pub struct TruncatedDownload {
    pub url: String,
    pub expected: u64,
    pub actual: u64,
}
