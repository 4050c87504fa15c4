use std::fs;
use std::path::{Path, PathBuf};

use failure::Error;
use log::debug;

use crate::{fabric, mojmap};
use crate::sink::write_atomically;
use crate::tree::MappingTree;
use crate::utils::CancellationToken;
use crate::version::{MinecraftVersion, VersionInfo, YarnVersion};

/// Caches downloaded mapping files on disk.
///
/// Version manifests and yarn build lists are always downloaded fresh.
pub struct MinecraftMappingsCache {
    location: PathBuf,
}
impl MinecraftMappingsCache {
    pub fn setup(location: PathBuf) -> Result<MinecraftMappingsCache, Error> {
        fs::create_dir_all(&location)?;
        for directory in &["mojmap", "intermediary", "yarn"] {
            fs::create_dir_all(location.join(directory))?;
        }
        Ok(MinecraftMappingsCache { location })
    }
    #[inline]
    pub fn location(&self) -> &Path {
        &self.location
    }
    pub fn load_mojmap(&self, version: &VersionInfo, token: &CancellationToken) -> Result<MappingTree, Error> {
        let file = self.location.join(format!("mojmap/{}/client.txt", version.id));
        let buffer = self.load_cached(&file, || mojmap::download_client_mappings(version, token))?;
        token.check()?;
        mojmap::parse_client_mappings(&buffer)
    }
    pub fn load_intermediary(&self, minecraft: &MinecraftVersion, token: &CancellationToken) -> Result<MappingTree, Error> {
        let file = self.location.join(format!("intermediary/{}/mappings.tiny", minecraft));
        let buffer = self.load_cached(&file, || {
            fabric::download_mappings_jar(&fabric::intermediary_url(minecraft), token)
        })?;
        token.check()?;
        fabric::parse_tiny_mappings(&buffer)
    }
    pub fn load_yarn(&self, version: &YarnVersion, token: &CancellationToken) -> Result<MappingTree, Error> {
        let file = self.location.join(format!("yarn/{}/mappings.tiny", version));
        let buffer = self.load_cached(&file, || {
            fabric::download_mappings_jar(&fabric::yarn_url(version), token)
        })?;
        token.check()?;
        fabric::parse_tiny_mappings(&buffer)
    }
    fn load_cached<F>(&self, file: &Path, download: F) -> Result<Vec<u8>, Error>
        where F: FnOnce() -> Result<Vec<u8>, Error> {
        if file.exists() {
            debug!("Using cached {}", file.display());
            return Ok(fs::read(file)?)
        }
        debug!("Downloading {}", file.display());
        let buffer = download()?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        write_atomically(file, &buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::env;
    use std::process;

    use crate::namespaces::{INTERMEDIARY, NAMED, OFFICIAL};

    fn setup(name: &str) -> MinecraftMappingsCache {
        let dir = env::temp_dir().join(format!("yarn-to-mojmap-cache-{}-{}", name, process::id()));
        let _ = fs::remove_dir_all(&dir);
        MinecraftMappingsCache::setup(dir).unwrap()
    }

    #[test]
    fn cached_files_skip_downloads() {
        let cache = setup("hits");
        assert!(cache.location().join("yarn").is_dir());
        let minecraft: MinecraftVersion = "1.19.2".parse().unwrap();
        let directory = cache.location().join("intermediary/1.19.2");
        fs::create_dir_all(&directory).unwrap();
        fs::write(directory.join("mappings.tiny"), "tiny\t2\t0\tofficial\tintermediary\nc\ta\tnet/minecraft/class_1\n").unwrap();
        let token = CancellationToken::new();
        let tree = cache.load_intermediary(&minecraft, &token).unwrap();
        let official = tree.namespace(OFFICIAL).unwrap();
        let intermediary = tree.namespace(INTERMEDIARY).unwrap();
        assert_eq!(tree.map_class("a", official, intermediary), Some("net/minecraft/class_1"));

        let yarn = YarnVersion::new(minecraft, 3);
        let directory = cache.location().join("yarn/1.19.2+build.3");
        fs::create_dir_all(&directory).unwrap();
        fs::write(directory.join("mappings.tiny"), "tiny\t2\t0\tintermediary\tnamed\nc\tnet/minecraft/class_1\tnet/minecraft/Foo\n").unwrap();
        let tree = cache.load_yarn(&yarn, &token).unwrap();
        assert!(tree.namespace(NAMED).is_some());

        // Cancelled loads stop before parsing anything
        token.cancel();
        assert!(cache.load_yarn(&yarn, &token).is_err());
        fs::remove_dir_all(cache.location()).unwrap();
    }
}
