//! Joins two mapping trees on a namespace they share.
//!
//! The first tree provides the source names and decides the order of the output,
//! while the second provides the target names.
//! Anything that can't be matched on the pivot namespace is silently omitted.
use std::collections::{HashMap, HashSet};

use failure_derive::Fail;
use log::debug;

use mappings::tree::{ClassEntry, FieldEntry, MalformedMapping, MappingTree, MappingTreeBuilder, MethodEntry, Names, Namespace};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct JoinNamespaces<'a> {
    /// Shared by both trees
    pub pivot: &'a str,
    /// Taken from the first tree
    pub source: &'a str,
    /// Taken from the second tree
    pub target: &'a str,
}

/// Join the trees, producing a tree with the namespaces `[source, target]`.
///
/// All the namespaces are checked before any output is built.
pub fn join(a: &MappingTree, b: &MappingTree, namespaces: JoinNamespaces) -> Result<MappingTree, JoinError> {
    let a_pivot = pivot_namespace(a, namespaces.pivot)?;
    let b_pivot = pivot_namespace(b, namespaces.pivot)?;
    let source = a.namespace(namespaces.source)
        .ok_or_else(|| JoinError::unknown_namespace(a, namespaces.source))?;
    let target = b.namespace(namespaces.target)
        .ok_or_else(|| JoinError::unknown_namespace(b, namespaces.target))?;
    let joiner = Joiner {
        a, b,
        a_pivot, b_pivot, source, target,
        inherited: InheritedMembers::index(b, b_pivot),
        stats: JoinStats::default(),
    };
    joiner.run(namespaces)
}

/// Restrict a single tree to two of its namespaces
#[inline]
pub fn project(tree: &MappingTree, source: &str, target: &str) -> Result<MappingTree, JoinError> {
    join(tree, tree, JoinNamespaces { pivot: source, source, target })
}

fn pivot_namespace(tree: &MappingTree, pivot: &str) -> Result<Namespace, JoinError> {
    match tree.namespace(pivot) {
        // An empty tree matches nothing, but that's no reason to fail
        Some(namespace) if tree.classes().is_empty() || tree.has_names_in(namespace) => Ok(namespace),
        _ => Err(JoinError::PivotNamespaceMissing {
            namespace: pivot.into(),
            tree: tree.to_string()
        })
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct JoinStats {
    pub classes: usize,
    pub dropped_classes: usize,
    pub fields: usize,
    pub dropped_fields: usize,
    pub methods: usize,
    pub dropped_methods: usize,
    /// Members resolved through another class of the second tree
    pub inherited: usize,
}

struct Joiner<'a> {
    a: &'a MappingTree,
    b: &'a MappingTree,
    a_pivot: Namespace,
    b_pivot: Namespace,
    source: Namespace,
    target: Namespace,
    inherited: InheritedMembers<'a>,
    stats: JoinStats,
}
impl<'a> Joiner<'a> {
    fn run(mut self, namespaces: JoinNamespaces) -> Result<MappingTree, JoinError> {
        let mut builder = MappingTreeBuilder::new(vec![namespaces.source, namespaces.target], namespaces.source)?;
        let a = self.a;
        for a_class in a.classes() {
            let matched = a_class.name(self.a_pivot)
                .and_then(|pivot_name| self.b.class(self.b_pivot, pivot_name))
                .and_then(|b_class| {
                    let source_name = a_class.name(self.source)?;
                    let target_name = b_class.name(self.target)?;
                    Some((b_class, source_name, target_name))
                });
            let (b_class, source_name, target_name) = match matched {
                Some(matched) => matched,
                None => {
                    self.stats.dropped_classes += 1;
                    continue
                }
            };
            self.stats.classes += 1;
            let output = builder.add_class(Names::new(vec![Some(source_name), Some(target_name)]));
            self.join_fields(a_class, b_class, output);
            self.join_methods(a_class, b_class, output);
        }
        let stats = self.stats;
        debug!(
            "Joined {} on {:?}: {} classes ({} dropped), {} fields ({} dropped), {} methods ({} dropped), {} inherited",
            namespaces.target, namespaces.pivot,
            stats.classes, stats.dropped_classes,
            stats.fields, stats.dropped_fields,
            stats.methods, stats.dropped_methods,
            stats.inherited
        );
        Ok(builder.build()?)
    }
    fn join_fields(&mut self, a_class: &'a ClassEntry, b_class: &'a ClassEntry, output: &mut ClassEntry) {
        // Target names must stay unique, so the first field to claim one wins
        let mut claimed: HashSet<&str> = HashSet::new();
        for a_field in a_class.fields() {
            let pivot_name = match a_field.name(self.a_pivot) {
                Some(name) => name,
                None => {
                    self.stats.dropped_fields += 1;
                    continue
                }
            };
            let b_field = match b_class.field(self.b_pivot, pivot_name) {
                Some(field) => Some(field),
                None => self.inherited.field(pivot_name),
            };
            let names = b_field.and_then(|b_field| {
                let source_name = a_field.name(self.source)?;
                let target_name = b_field.name(self.target)?;
                Some((source_name, target_name))
            });
            match names {
                Some((source_name, target_name)) if claimed.insert(target_name) => {
                    if b_class.field(self.b_pivot, pivot_name).is_none() {
                        self.stats.inherited += 1;
                    }
                    self.stats.fields += 1;
                    let descriptor = self.a.translate_descriptor(a_field.descriptor(), self.source);
                    output.add_field(Names::new(vec![Some(source_name), Some(target_name)]), descriptor);
                },
                _ => self.stats.dropped_fields += 1,
            }
        }
    }
    fn join_methods(&mut self, a_class: &'a ClassEntry, b_class: &'a ClassEntry, output: &mut ClassEntry) {
        let mut declared: HashSet<(&str, String)> = HashSet::new();
        for a_method in a_class.methods() {
            let pivot_name = match a_method.name(self.a_pivot) {
                Some(name) => name,
                None => {
                    self.stats.dropped_methods += 1;
                    continue
                }
            };
            let pivot_descriptor = self.a.translate_descriptor(a_method.descriptor(), self.a_pivot);
            let direct = b_class.method(self.b_pivot, pivot_name, &pivot_descriptor);
            let b_method = match direct {
                Some(method) => Some(method),
                None => self.inherited.method(pivot_name, &pivot_descriptor),
            };
            let names = b_method.and_then(|b_method| {
                let source_name = a_method.name(self.source)?;
                let target_name = b_method.name(self.target)?;
                Some((source_name, target_name))
            });
            let (source_name, target_name) = match names {
                Some(names) => names,
                None => {
                    self.stats.dropped_methods += 1;
                    continue
                }
            };
            let descriptor = self.a.translate_descriptor(a_method.descriptor(), self.source);
            // Overloads that only differed by classes unmapped in the source namespace
            if !declared.insert((source_name, descriptor.clone())) {
                self.stats.dropped_methods += 1;
                continue
            }
            if direct.is_none() {
                self.stats.inherited += 1;
            }
            self.stats.methods += 1;
            output.add_method(Names::new(vec![Some(source_name), Some(target_name)]), descriptor);
        }
    }
}

/// Every member of the second tree, keyed by its pivot name (and descriptor).
///
/// No inheritance information is available, so a member that isn't declared
/// by the matching class can only be resolved through its pivot name
/// when that name identifies a single member across the whole game.
/// Only intermediary names (`field_123`, `method_456`, `comp_789`) do,
/// and even then the name must have exactly one declaring class.
struct InheritedMembers<'a> {
    fields: HashMap<&'a str, Vec<&'a FieldEntry>>,
    methods: HashMap<(&'a str, String), Vec<&'a MethodEntry>>,
}
impl<'a> InheritedMembers<'a> {
    fn index(tree: &'a MappingTree, pivot: Namespace) -> InheritedMembers<'a> {
        let mut fields: HashMap<&'a str, Vec<&'a FieldEntry>> = HashMap::new();
        let mut methods: HashMap<(&'a str, String), Vec<&'a MethodEntry>> = HashMap::new();
        for class in tree.classes() {
            for field in class.fields() {
                if let Some(name) = field.name(pivot).filter(|name| is_unique_member_name(name)) {
                    fields.entry(name).or_insert_with(Vec::new).push(field);
                }
            }
            let mut declared = HashSet::new();
            for method in class.methods() {
                if let Some(name) = method.name(pivot).filter(|name| is_unique_member_name(name)) {
                    let descriptor = tree.translate_descriptor(method.descriptor(), pivot);
                    // A class counts as a single owner, even if its declarations collide
                    if declared.insert((name, descriptor.clone())) {
                        methods.entry((name, descriptor)).or_insert_with(Vec::new).push(method);
                    }
                }
            }
        }
        InheritedMembers { fields, methods }
    }
    #[inline]
    fn field(&self, name: &str) -> Option<&'a FieldEntry> {
        match self.fields.get(name) {
            Some(owners) if owners.len() == 1 => Some(owners[0]),
            _ => None
        }
    }
    #[inline]
    fn method(&self, name: &'a str, descriptor: &str) -> Option<&'a MethodEntry> {
        match self.methods.get(&(name, descriptor.to_owned())) {
            Some(owners) if owners.len() == 1 => Some(owners[0]),
            _ => None
        }
    }
}

/// Intermediary member names are never reused, unlike obfuscated or human readable ones
fn is_unique_member_name(name: &str) -> bool {
    ["field_", "method_", "comp_"].iter().any(|prefix| {
        name.len() > prefix.len() && name.starts_with(prefix)
            && name[prefix.len()..].bytes().all(|b| b.is_ascii_digit())
    })
}

#[derive(Debug, Fail)]
pub enum JoinError {
    #[fail(display = "Missing pivot namespace {:?} in {}", namespace, tree)]
    PivotNamespaceMissing {
        namespace: String,
        tree: String,
    },
    #[fail(display = "Unknown namespace {:?} in {}", namespace, tree)]
    UnknownNamespace {
        namespace: String,
        tree: String,
    },
    #[fail(display = "Invalid joined mappings: {}", _0)]
    Malformed(#[cause] MalformedMapping),
}
impl JoinError {
    #[inline]
    fn unknown_namespace(tree: &MappingTree, namespace: &str) -> JoinError {
        JoinError::UnknownNamespace { namespace: namespace.into(), tree: tree.to_string() }
    }
}
impl From<MalformedMapping> for JoinError {
    #[inline]
    fn from(cause: MalformedMapping) -> Self {
        JoinError::Malformed(cause)
    }
}
