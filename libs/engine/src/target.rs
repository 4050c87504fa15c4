use std::str::FromStr;
use std::fmt::{self, Display, Formatter};

use failure_derive::Fail;
use mappings::namespaces;

/// The mapping systems form a chain, where each neighbouring pair
/// is linked by exactly one of the downloaded mapping sources.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MappingSystem {
    Yarn,
    Intermediary,
    Obf,
    Mojmap
}
impl MappingSystem {
    pub const CHAIN: [MappingSystem; 4] = [
        MappingSystem::Yarn, MappingSystem::Intermediary,
        MappingSystem::Obf, MappingSystem::Mojmap
    ];
    #[inline]
    pub fn id(self) -> &'static str {
        match self {
            MappingSystem::Yarn => "yarn",
            MappingSystem::Intermediary => "intermediary",
            MappingSystem::Obf => "obf",
            MappingSystem::Mojmap => "mojmap",
        }
    }
    fn from_id(id: &str) -> Option<MappingSystem> {
        Some(match id {
            "yarn" => MappingSystem::Yarn,
            "intermediary" => MappingSystem::Intermediary,
            "obf" => MappingSystem::Obf,
            "mojmap" => MappingSystem::Mojmap,
            _ => return None
        })
    }
    /// The name of this system's namespace in the mapping trees
    #[inline]
    pub fn namespace(self) -> &'static str {
        match self {
            MappingSystem::Yarn => namespaces::NAMED,
            MappingSystem::Intermediary => namespaces::INTERMEDIARY,
            MappingSystem::Obf => namespaces::OFFICIAL,
            MappingSystem::Mojmap => namespaces::MOJANG,
        }
    }
    #[inline]
    pub(crate) fn position(self) -> usize {
        match self {
            MappingSystem::Yarn => 0,
            MappingSystem::Intermediary => 1,
            MappingSystem::Obf => 2,
            MappingSystem::Mojmap => 3,
        }
    }
    /// The next system along the chain in the direction of the other one
    pub(crate) fn step_towards(self, other: MappingSystem) -> Option<MappingSystem> {
        let (position, other) = (self.position(), other.position());
        if position < other {
            Some(MappingSystem::CHAIN[position + 1])
        } else if position > other {
            Some(MappingSystem::CHAIN[position - 1])
        } else {
            None
        }
    }
    #[inline]
    pub(crate) fn create_target(self, renamed: MappingSystem) -> TargetMapping {
        TargetMapping::new(self, renamed)
    }
}
impl Display for MappingSystem {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TargetMapping {
    pub original: MappingSystem,
    pub renamed: MappingSystem,
    pub flags: TargetFlags
}
impl TargetMapping {
    pub const YARN2MOJMAP: TargetMapping = TargetMapping::new(MappingSystem::Yarn, MappingSystem::Mojmap);
    #[inline]
    pub const fn new(original: MappingSystem, renamed: MappingSystem) -> TargetMapping {
        TargetMapping { original, renamed, flags: TargetFlags::default() }
    }
    #[inline]
    pub const fn reversed(self) -> TargetMapping {
        TargetMapping { original: self.renamed, renamed: self.original, flags: self.flags }
    }
    #[inline]
    pub fn with_default_flags(mut self) -> TargetMapping {
        self.flags = TargetFlags::default();
        self
    }
    /// The number of mapping sources that need to be joined
    #[inline]
    pub fn distance(&self) -> usize {
        let (original, renamed) = (self.original.position(), self.renamed.position());
        if original > renamed { original - renamed } else { renamed - original }
    }
}
impl Default for TargetMapping {
    #[inline]
    fn default() -> Self {
        TargetMapping::YARN2MOJMAP
    }
}
impl FromStr for TargetMapping {
    type Err = InvalidTarget;

    fn from_str(s: &str) -> Result<Self, InvalidTarget> {
        let invalid_target = || InvalidTarget::Target(s.into());
        let first_dash = s.find('-');
        let first = first_dash.map_or(s, |index| &s[..index]);
        let mapping_separator = first.find('2').ok_or_else(invalid_target)?;
        let original = MappingSystem::from_id(&first[..mapping_separator])
            .ok_or_else(invalid_target)?;
        let renamed = MappingSystem::from_id(&first[(mapping_separator + 1)..])
            .ok_or_else(invalid_target)?;
        if original == renamed {
            return Err(InvalidTarget::Redundant(s.into()))
        }
        let flags = match first_dash {
            Some(dash) => {
                TargetFlags::from_str(&s[(dash + 1)..])?
            },
            None => {
                TargetFlags::default()
            }
        };
        Ok(TargetMapping { original, renamed, flags })
    }
}
impl Display for TargetMapping {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}2{}", self.original.id(), self.renamed.id())?;
        if let Some(filter) = self.flags.filter() {
            write!(f, "-{}", filter)?;
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TargetFlags {
    filter: Option<TargetFilter>,
}
impl TargetFlags {
    #[inline]
    pub const fn default() -> TargetFlags {
        TargetFlags { filter: None }
    }
    #[inline]
    pub const fn new(filter: Option<TargetFilter>) -> TargetFlags {
        TargetFlags { filter }
    }
    #[inline]
    pub fn filter(&self) -> Option<TargetFilter> {
        self.filter
    }
    #[inline]
    pub fn is_default(&self) -> bool {
        *self == TargetFlags::default()
    }
}
impl Default for TargetFlags {
    #[inline]
    fn default() -> Self {
        TargetFlags::default()
    }
}
impl FromStr for TargetFlags {
    type Err = InvalidTarget;

    #[inline]
    fn from_str(s: &str) -> Result<TargetFlags, InvalidTarget> {
        let mut result = TargetFlags::default();
        if s.is_empty() { return Ok(result) }
        let invalid_target = || InvalidTarget::Flags(s.into());
        for flag in s.split('-') {
            let filter = match flag {
                "classes" => TargetFilter::Classes,
                "members" => TargetFilter::Members,
                _ => return Err(invalid_target())
            };
            if result.filter.is_some() { return Err(invalid_target()) }
            result.filter = Some(filter);
        }
        Ok(result)
    }
}
impl Display for TargetFlags {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.filter {
            None => Ok(()),
            Some(filter) => write!(f, "{}", filter),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TargetFilter {
    /// Only keep the class names
    Classes,
    /// Only keep the member names, leaving the classes unchanged
    Members
}
impl Display for TargetFilter {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match *self {
            TargetFilter::Classes => "classes",
            TargetFilter::Members => "members",
        })
    }
}

#[derive(Debug, Fail)]
pub enum InvalidTarget {
    #[fail(display = "Invalid target {:?}", _0)]
    Target(String),
    #[fail(display = "Invalid flags {:?}", _0)]
    Flags(String),
    #[fail(display = "Redundant target {:?}", _0)]
    Redundant(String),
}
