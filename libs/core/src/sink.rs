//! Destinations for the finished mappings.
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use failure::Error;
use failure_derive::Fail;
use scopeguard::ScopeGuard;

use crate::format::MappingFormat;
use crate::tree::MappingTree;

pub trait MappingSink {
    /// Serialize the tree in the specified format.
    ///
    /// On failure, nothing partial is left behind.
    fn accept(&mut self, tree: &MappingTree, format: MappingFormat) -> Result<(), Error>;
}

impl MappingSink for Vec<u8> {
    fn accept(&mut self, tree: &MappingTree, format: MappingFormat) -> Result<(), Error> {
        let mut buffer = Vec::new();
        format.write(tree, &mut buffer)?;
        self.extend_from_slice(&buffer);
        Ok(())
    }
}

/// Writes the mappings to a file, replacing it atomically
#[derive(Clone, Debug)]
pub struct FileSink {
    path: PathBuf,
}
impl FileSink {
    #[inline]
    pub fn new<P: Into<PathBuf>>(path: P) -> FileSink {
        FileSink { path: path.into() }
    }
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
impl MappingSink for FileSink {
    fn accept(&mut self, tree: &MappingTree, format: MappingFormat) -> Result<(), Error> {
        let mut buffer = Vec::with_capacity(4096);
        format.write(tree, &mut buffer)?;
        write_atomically(&self.path, &buffer)
    }
}

/// Write to a temporary sibling file, then rename it over the destination
pub(crate) fn write_atomically(path: &Path, data: &[u8]) -> Result<(), Error> {
    let file_name = path.file_name()
        .ok_or_else(|| InvalidOutputPath(path.display().to_string()))?;
    let mut temp_name = OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(".tmp");
    let temp_path = scopeguard::guard(path.with_file_name(temp_name), |temp_path| {
        // Nothing more we can do if this fails too
        let _ = fs::remove_file(&temp_path);
    });
    {
        let mut file = File::create(&*temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
    }
    fs::rename(&*temp_path, path)?;
    // It's been renamed into place, so there's nothing to clean up
    ScopeGuard::into_inner(temp_path);
    Ok(())
}

#[derive(Debug, Fail)]
#[fail(display = "Invalid output path {}", _0)]
pub struct InvalidOutputPath(String);
