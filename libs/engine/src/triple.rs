use std::panic;

use failure::Error;
use log::info;

use mappings::cache::MinecraftMappingsCache;
use mappings::fabric;
use mappings::{CancellationToken, Cancelled, MappingTree, MinecraftVersion, VersionInfo, YarnVersion};

/// Everything the mapping sources need to provide
pub trait MappingsSource: Sync {
    fn load_mojmap(&self, version: &VersionInfo, token: &CancellationToken) -> Result<MappingTree, Error>;
    fn load_intermediary(&self, minecraft: &MinecraftVersion, token: &CancellationToken) -> Result<MappingTree, Error>;
    /// Pick the requested yarn build, or the latest one if there's no request
    fn resolve_yarn(&self, minecraft: &MinecraftVersion, build: Option<u32>, token: &CancellationToken) -> Result<YarnVersion, Error>;
    fn load_yarn(&self, version: &YarnVersion, token: &CancellationToken) -> Result<MappingTree, Error>;
}
impl MappingsSource for MinecraftMappingsCache {
    #[inline]
    fn load_mojmap(&self, version: &VersionInfo, token: &CancellationToken) -> Result<MappingTree, Error> {
        MinecraftMappingsCache::load_mojmap(self, version, token)
    }
    #[inline]
    fn load_intermediary(&self, minecraft: &MinecraftVersion, token: &CancellationToken) -> Result<MappingTree, Error> {
        MinecraftMappingsCache::load_intermediary(self, minecraft, token)
    }
    #[inline]
    fn resolve_yarn(&self, minecraft: &MinecraftVersion, build: Option<u32>, token: &CancellationToken) -> Result<YarnVersion, Error> {
        fabric::resolve_yarn_version(minecraft, build, token)
    }
    #[inline]
    fn load_yarn(&self, version: &YarnVersion, token: &CancellationToken) -> Result<MappingTree, Error> {
        MinecraftMappingsCache::load_yarn(self, version, token)
    }
}

/// The three mapping sources, which are only kept around until they've been joined
pub struct MappingsTriple {
    pub mojmap: MappingTree,
    pub intermediary: MappingTree,
    pub yarn: MappingTree,
}
impl MappingsTriple {
    #[inline]
    pub fn total_classes(&self) -> usize {
        self.mojmap.classes().len() + self.intermediary.classes().len() + self.yarn.classes().len()
    }
    /// Load all three sources concurrently.
    ///
    /// The first failure cancels the other loads, and is the error that gets reported.
    pub fn load<S: MappingsSource>(source: &S, version: &VersionInfo, yarn_build: Option<u32>) -> Result<MappingsTriple, Error> {
        let token = CancellationToken::new();
        let minecraft = &version.id;
        let results = crossbeam::thread::scope(|scope| {
            let token = &token;
            let mojmap = scope.spawn(move |_| cancel_on_error(token, || {
                let tree = source.load_mojmap(version, token)?;
                info!("Loaded {} classes from Mojmap", tree.classes().len());
                Ok(tree)
            }));
            let intermediary = scope.spawn(move |_| cancel_on_error(token, || {
                let tree = source.load_intermediary(minecraft, token)?;
                info!("Loaded {} classes from Intermediary", tree.classes().len());
                Ok(tree)
            }));
            let yarn = scope.spawn(move |_| cancel_on_error(token, || {
                let yarn_version = source.resolve_yarn(minecraft, yarn_build, token)?;
                info!("Using yarn version {}", yarn_version);
                let tree = source.load_yarn(&yarn_version, token)?;
                info!("Loaded {} classes from Yarn", tree.classes().len());
                Ok(tree)
            }));
            (join_thread(mojmap.join()), join_thread(intermediary.join()), join_thread(yarn.join()))
        }).unwrap_or_else(|payload| panic::resume_unwind(payload));
        match results {
            (Ok(mojmap), Ok(intermediary), Ok(yarn)) => Ok(MappingsTriple { mojmap, intermediary, yarn }),
            (mojmap, intermediary, yarn) => {
                let errors = vec![mojmap.err(), intermediary.err(), yarn.err()];
                Err(first_real_error(errors.into_iter().flatten().collect()))
            }
        }
    }
}

#[inline]
fn cancel_on_error<T, F>(token: &CancellationToken, func: F) -> Result<T, Error>
    where F: FnOnce() -> Result<T, Error> {
    let result = func();
    if result.is_err() {
        token.cancel();
    }
    result
}

#[inline]
fn join_thread<T>(result: std::thread::Result<T>) -> T {
    result.unwrap_or_else(|payload| panic::resume_unwind(payload))
}

/// The cancellations are only a consequence of the actual failure
fn first_real_error(mut errors: Vec<Error>) -> Error {
    let index = errors.iter()
        .position(|error| error.downcast_ref::<Cancelled>().is_none())
        .unwrap_or(0);
    errors.swap_remove(index)
}
