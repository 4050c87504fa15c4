#[macro_use]
extern crate clap;
extern crate failure;
extern crate log;
extern crate env_logger;

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::exit;
use std::time::Instant;

use env_logger::Env;
use failure::{Error, ResultExt};
use log::{error, info};

use mappings::cache::MinecraftMappingsCache;
use mappings::sink::{FileSink, MappingSink};
use mappings::{CancellationToken, MappingFormat, MinecraftVersion, VersionManifest};
use engine::{MappingsTargetComputer, MappingsTriple, TargetMapping};

fn app() -> clap::App<'static, 'static> {
    clap_app!(yarn_to_mojmap =>
        (version: crate_version!())
        (author: crate_authors!())
        (about: crate_description!())
        (@arg minecraft: -m --minecraft +takes_value "The target minecraft version, defaulting to the latest release")
        (@arg yarn: -y --yarn +takes_value "The source yarn build, defaulting to the latest build")
        (@arg format: -f --format +takes_value default_value[tiny2] "The format to export the mappings in, either a file extension or a format id")
        (@arg target: -t --target +takes_value default_value[yarn2mojmap] "The mappings to generate, like yarn2mojmap or obf2yarn-classes")
        (@arg output: -o --output +takes_value default_value("mappings.txt") "The file to write the mappings to")
        (@arg cache: --cache +takes_value default_value[cache] "Specify an alternate cache location")
    )
}

/// Replace every `@file` argument with the arguments listed in that file
fn expand_arguments<I: IntoIterator<Item=OsString>>(args: I) -> Result<Vec<OsString>, Error> {
    let mut result = Vec::new();
    for (index, arg) in args.into_iter().enumerate() {
        let file = match arg.to_str() {
            Some(arg) if index > 0 && arg.len() > 1 && arg.starts_with('@') => PathBuf::from(&arg[1..]),
            _ => {
                result.push(arg);
                continue
            }
        };
        let contents = fs::read_to_string(&file)
            .with_context(|_| format!("Unable to read arguments from {}", file.display()))?;
        result.extend(contents.split_whitespace().map(OsString::from));
    }
    Ok(result)
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(error) = run() {
        error!("{}", error);
        for cause in error.iter_causes() {
            error!("Caused by: {}", cause);
        }
        exit(1);
    }
}

fn run() -> Result<(), Error> {
    let matches = app().get_matches_from(expand_arguments(env::args_os())?);
    let minecraft_version = if matches.is_present("minecraft") {
        Some(value_t!(matches, "minecraft", MinecraftVersion).unwrap_or_else(|e| e.exit()))
    } else {
        None
    };
    let yarn_build = if matches.is_present("yarn") {
        Some(value_t!(matches, "yarn", u32).unwrap_or_else(|e| e.exit()))
    } else {
        None
    };
    let format = value_t!(matches, "format", MappingFormat).unwrap_or_else(|e| e.exit());
    let target = value_t!(matches, "target", TargetMapping).unwrap_or_else(|e| e.exit());
    let output = PathBuf::from(matches.value_of("output").unwrap_or("mappings.txt"));
    let cache_location = PathBuf::from(matches.value_of("cache").unwrap_or("cache"));

    let cache = MinecraftMappingsCache::setup(cache_location)?;
    let manifest = VersionManifest::download(&CancellationToken::new())?;
    let version = manifest.resolve(minecraft_version.as_ref())?;
    info!("Using minecraft version {}", version.id);
    let triple = MappingsTriple::load(&cache, version, yarn_build)?;
    info!("Loaded {} class mappings in total", triple.total_classes());

    info!("Building {} mappings", target);
    let start = Instant::now();
    let computer = MappingsTargetComputer::new(&triple);
    let mappings = computer.compute_target(target)?;
    let mut sink = FileSink::new(output);
    sink.accept(&mappings, format)?;
    info!("Finished building the mappings in {:.2?}", start.elapsed());
    info!("Wrote {} classes to {}", mappings.classes().len(), sink.path().display());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::process;

    fn args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn argument_files() {
        let file = env::temp_dir().join(format!("yarn-to-mojmap-args-{}.txt", process::id()));
        fs::write(&file, "-m 1.19.2\n--format\ttsrg\n\n").unwrap();
        let expanded = expand_arguments(args(&[
            "yarn-to-mojmap", &format!("@{}", file.display()), "-y", "28", "@"
        ])).unwrap();
        fs::remove_file(&file).unwrap();
        assert_eq!(expanded, args(&["yarn-to-mojmap", "-m", "1.19.2", "--format", "tsrg", "-y", "28", "@"]));

        // A lone `@` isn't a file, so it's left for clap to reject
        let error = app().get_matches_from_safe(expanded.clone()).unwrap_err();
        assert_eq!(error.kind, clap::ErrorKind::UnknownArgument);

        let matches = app().get_matches_from_safe(expanded[..expanded.len() - 1].to_vec()).unwrap();
        assert_eq!(matches.value_of("minecraft"), Some("1.19.2"));
        assert_eq!(matches.value_of("format"), Some("tsrg"));
        assert_eq!(matches.value_of("target"), Some("yarn2mojmap"));
        assert_eq!(matches.value_of("output"), Some("mappings.txt"));
    }
    #[test]
    fn missing_argument_file() {
        assert!(expand_arguments(args(&["yarn-to-mojmap", "@/nonexistent/yarn-to-mojmap-args"])).is_err());
    }
    #[test]
    fn defaults() {
        let matches = app().get_matches_from_safe(args(&["yarn-to-mojmap"])).unwrap();
        assert!(!matches.is_present("minecraft"));
        assert!(!matches.is_present("yarn"));
        assert_eq!(value_t!(matches, "format", MappingFormat).unwrap(), MappingFormat::TinyV2);
        assert_eq!(value_t!(matches, "target", TargetMapping).unwrap(), TargetMapping::YARN2MOJMAP);
        assert_eq!(matches.value_of("cache"), Some("cache"));
    }
}
