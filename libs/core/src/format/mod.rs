//! Reading and writing the on-disk mapping formats.
use std::fmt::{self, Display, Formatter};
use std::io::Write;
use std::str::FromStr;

use failure::Error;
use failure_derive::Fail;

use crate::tree::{MappingTree, MalformedMapping, Names, Namespace};

pub mod tiny;
pub mod proguard;
pub mod srg;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MappingFormat {
    TinyV2,
    Tiny,
    Srg,
    Xsrg,
    Csrg,
    Tsrg,
    TsrgV2,
    Proguard,
}
impl MappingFormat {
    pub const ALL: [MappingFormat; 8] = [
        MappingFormat::TinyV2, MappingFormat::Tiny,
        MappingFormat::Srg, MappingFormat::Xsrg, MappingFormat::Csrg,
        MappingFormat::Tsrg, MappingFormat::TsrgV2, MappingFormat::Proguard,
    ];
    #[inline]
    pub fn id(self) -> &'static str {
        match self {
            MappingFormat::TinyV2 => "tiny2",
            MappingFormat::Tiny => "tiny1",
            MappingFormat::Srg => "srg",
            MappingFormat::Xsrg => "xsrg",
            MappingFormat::Csrg => "csrg",
            MappingFormat::Tsrg => "tsrg",
            MappingFormat::TsrgV2 => "tsrg2",
            MappingFormat::Proguard => "proguard",
        }
    }
    #[inline]
    pub fn extension(self) -> &'static str {
        match self {
            MappingFormat::TinyV2 | MappingFormat::Tiny => "tiny",
            MappingFormat::Srg => "srg",
            MappingFormat::Xsrg => "xsrg",
            MappingFormat::Csrg => "csrg",
            MappingFormat::Tsrg | MappingFormat::TsrgV2 => "tsrg",
            MappingFormat::Proguard => "txt",
        }
    }
    /// The number of namespaces the format can hold, if it's restricted
    #[inline]
    pub fn required_namespaces(self) -> Option<usize> {
        match self {
            MappingFormat::TinyV2 | MappingFormat::Tiny => None,
            _ => Some(2)
        }
    }
    pub fn write<W: Write>(self, tree: &MappingTree, output: W) -> Result<(), Error> {
        if let Some(expected) = self.required_namespaces() {
            let actual = tree.namespaces().count();
            if actual != expected {
                return Err(UnsupportedNamespaceCount { format: self, expected, actual }.into())
            }
        }
        match self {
            MappingFormat::TinyV2 => tiny::write_tiny_v2(tree, output),
            MappingFormat::Tiny => tiny::write_tiny_v1(tree, output),
            MappingFormat::Srg => srg::write_srg(tree, output, false),
            MappingFormat::Xsrg => srg::write_srg(tree, output, true),
            MappingFormat::Csrg => srg::write_csrg(tree, output),
            MappingFormat::Tsrg => srg::write_tsrg(tree, output, false),
            MappingFormat::TsrgV2 => srg::write_tsrg(tree, output, true),
            MappingFormat::Proguard => proguard::write_proguard(tree, output),
        }
    }
}
impl FromStr for MappingFormat {
    type Err = UnknownFormat;

    /// Accepts either a format id or a file extension
    fn from_str(s: &str) -> Result<MappingFormat, UnknownFormat> {
        let normalized: String = s.trim_start_matches('.').chars()
            .filter(|&c| c != '_' && c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Ok(match normalized.as_str() {
            "tiny" | "tiny2" | "tinyv2" | "tiny2file" => MappingFormat::TinyV2,
            "tiny1" | "tinyv1" | "tinyfile" => MappingFormat::Tiny,
            "srg" | "srgfile" => MappingFormat::Srg,
            "xsrg" | "xsrgfile" => MappingFormat::Xsrg,
            "csrg" | "csrgfile" => MappingFormat::Csrg,
            "tsrg" | "tsrgfile" => MappingFormat::Tsrg,
            "tsrg2" | "tsrgv2" | "tsrg2file" => MappingFormat::TsrgV2,
            "proguard" | "proguardfile" | "txt" | "map" => MappingFormat::Proguard,
            _ => return Err(UnknownFormat(s.into()))
        })
    }
}
impl Display for MappingFormat {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Pick the source and target names of an entry.
///
/// Entries without a source name can't be written at all,
/// while a missing target name falls back to the source name.
#[inline]
pub(crate) fn name_pair(names: &Names, source: Namespace, target: Namespace) -> Option<(&str, &str)> {
    let source_name = names.get(source)?;
    Some((source_name, names.get(target).unwrap_or(source_name)))
}

#[inline]
pub(crate) fn syntax_error<S: Into<String>>(line: usize, message: S) -> Error {
    MalformedMapping::Syntax { line, message: message.into() }.into()
}

#[derive(Debug, Fail)]
#[fail(display = "Unknown mapping format {:?}", _0)]
pub struct UnknownFormat(String);

#[derive(Debug, Fail)]
#[fail(display = "The {} format needs exactly {} namespaces, but the mappings have {}", format, expected, actual)]
pub struct UnsupportedNamespaceCount {
    pub format: MappingFormat,
    pub expected: usize,
    pub actual: usize,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_formats() {
        assert_eq!(MappingFormat::TinyV2, "tiny".parse().unwrap());
        assert_eq!(MappingFormat::TinyV2, "TINY_2_FILE".parse().unwrap());
        assert_eq!(MappingFormat::TinyV2, ".tiny".parse().unwrap());
        assert_eq!(MappingFormat::Tiny, "TINY_FILE".parse().unwrap());
        assert_eq!(MappingFormat::Tiny, "tinyv1".parse().unwrap());
        assert_eq!(MappingFormat::Srg, "srg".parse().unwrap());
        assert_eq!(MappingFormat::Xsrg, "XSRG_FILE".parse().unwrap());
        assert_eq!(MappingFormat::Csrg, "csrg".parse().unwrap());
        assert_eq!(MappingFormat::Tsrg, "tsrg".parse().unwrap());
        assert_eq!(MappingFormat::TsrgV2, "tsrg-2".parse().unwrap());
        assert_eq!(MappingFormat::Proguard, "PROGUARD_FILE".parse().unwrap());
        assert_eq!(MappingFormat::Proguard, ".txt".parse().unwrap());
        assert!("enigma".parse::<MappingFormat>().is_err());
        assert!("".parse::<MappingFormat>().is_err());
    }
    #[test]
    fn ids_round_trip() {
        for &format in &MappingFormat::ALL {
            assert_eq!(format, format.id().parse().unwrap());
            assert_eq!(format!("{}", format), format.id());
        }
    }
}
