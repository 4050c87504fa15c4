//! The in-memory representation of a mapping source.
//!
//! Every class, field and method carries one name per namespace of its tree.
//! Member descriptors are written using the class names of a single namespace,
//! the tree's descriptor namespace.
use std::fmt::{self, Display, Formatter};
use std::iter::FromIterator;

use failure_derive::Fail;
use indexmap::{IndexMap, IndexSet};
use indexmap::map::Entry;

use crate::descriptor::{self, ClassNameLookup, DescriptorTranslator, MalformedDescriptor};

/// The index of a namespace within a specific tree
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Namespace(usize);
impl Namespace {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// The names of an entry in each namespace.
///
/// A missing name means the entry is unmapped in that namespace.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Names(Box<[Option<String>]>);
impl Names {
    pub fn new<I, S>(names: I) -> Names where I: IntoIterator<Item=Option<S>>, S: Into<String> {
        names.into_iter().collect()
    }
    #[inline]
    pub fn get(&self, namespace: Namespace) -> Option<&str> {
        self.0.get(namespace.0).and_then(|name| name.as_ref()).map(String::as_str)
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Iterate over the namespaces that actually have a name
    pub fn iter<'a>(&'a self) -> impl Iterator<Item=(Namespace, &'a str)> + 'a {
        self.0.iter().enumerate()
            .filter_map(|(index, name)| name.as_ref().map(|name| (Namespace(index), name.as_str())))
    }
    /// Some name suitable for error messages
    fn describe(&self) -> &str {
        self.iter().next().map_or("<unnamed>", |(_, name)| name)
    }
    fn check_count(&self, expected: usize) -> Result<(), MalformedMapping> {
        if self.len() != expected {
            return Err(MalformedMapping::NameCount { entry: self.describe().into(), expected, actual: self.len() })
        }
        Ok(())
    }
}
impl<S: Into<String>> FromIterator<Option<S>> for Names {
    fn from_iter<I: IntoIterator<Item=Option<S>>>(iter: I) -> Self {
        Names(iter.into_iter().map(|name| name.map(Into::into)).collect())
    }
}

#[derive(Clone, Debug)]
pub struct FieldEntry {
    names: Names,
    descriptor: String,
}
impl FieldEntry {
    #[inline]
    pub fn name(&self, namespace: Namespace) -> Option<&str> {
        self.names.get(namespace)
    }
    #[inline]
    pub fn names(&self) -> &Names {
        &self.names
    }
    /// The type of the field, in the descriptor namespace of its tree
    #[inline]
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

#[derive(Clone, Debug)]
pub struct MethodEntry {
    names: Names,
    descriptor: String,
}
impl MethodEntry {
    #[inline]
    pub fn name(&self, namespace: Namespace) -> Option<&str> {
        self.names.get(namespace)
    }
    #[inline]
    pub fn names(&self) -> &Names {
        &self.names
    }
    #[inline]
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

#[derive(Clone, Debug)]
pub struct ClassEntry {
    names: Names,
    fields: Vec<FieldEntry>,
    methods: Vec<MethodEntry>,
    index: MemberIndex,
}
impl ClassEntry {
    #[inline]
    pub fn name(&self, namespace: Namespace) -> Option<&str> {
        self.names.get(namespace)
    }
    #[inline]
    pub fn names(&self) -> &Names {
        &self.names
    }
    #[inline]
    pub fn fields(&self) -> &[FieldEntry] {
        &self.fields
    }
    #[inline]
    pub fn methods(&self) -> &[MethodEntry] {
        &self.methods
    }
    pub fn field(&self, namespace: Namespace, name: &str) -> Option<&FieldEntry> {
        self.index.fields.get(namespace.0)
            .and_then(|fields| fields.get(name))
            .map(|&index| &self.fields[index])
    }
    /// Lookup a method by its name and descriptor, both in the specified namespace
    pub fn method(&self, namespace: Namespace, name: &str, descriptor: &str) -> Option<&MethodEntry> {
        self.index.methods.get(namespace.0)
            .and_then(|methods| methods.get(&(name.to_owned(), descriptor.to_owned())))
            .map(|&index| &self.methods[index])
    }
    pub fn add_field<D: Into<String>>(&mut self, names: Names, descriptor: D) -> &mut FieldEntry {
        let index = self.fields.len();
        self.fields.push(FieldEntry { names, descriptor: descriptor.into() });
        &mut self.fields[index]
    }
    pub fn add_method<D: Into<String>>(&mut self, names: Names, descriptor: D) -> &mut MethodEntry {
        let index = self.methods.len();
        self.methods.push(MethodEntry { names, descriptor: descriptor.into() });
        &mut self.methods[index]
    }
}

#[derive(Clone, Debug, Default)]
struct MemberIndex {
    fields: Vec<IndexMap<String, usize>>,
    methods: Vec<IndexMap<(String, String), usize>>,
}

pub struct MappingTreeBuilder {
    namespaces: IndexSet<String>,
    descriptor_namespace: Namespace,
    classes: Vec<ClassEntry>,
}
impl MappingTreeBuilder {
    pub fn new<I, S>(namespaces: I, descriptor_namespace: &str) -> Result<MappingTreeBuilder, MalformedMapping>
        where I: IntoIterator<Item=S>, S: Into<String> {
        let mut set = IndexSet::new();
        for namespace in namespaces {
            let namespace = namespace.into();
            if set.contains(&namespace) {
                return Err(MalformedMapping::DuplicateNamespace(namespace))
            }
            set.insert(namespace);
        }
        let descriptor_namespace = set.get_full(descriptor_namespace)
            .map(|(index, _)| Namespace(index))
            .ok_or_else(|| MalformedMapping::UnknownNamespace(descriptor_namespace.into()))?;
        Ok(MappingTreeBuilder { namespaces: set, descriptor_namespace, classes: Vec::new() })
    }
    #[inline]
    pub fn namespace(&self, name: &str) -> Option<Namespace> {
        self.namespaces.get_full(name).map(|(index, _)| Namespace(index))
    }
    #[inline]
    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }
    pub fn add_class(&mut self, names: Names) -> &mut ClassEntry {
        let index = self.classes.len();
        self.classes.push(ClassEntry {
            names, fields: Vec::new(), methods: Vec::new(), index: MemberIndex::default()
        });
        &mut self.classes[index]
    }
    #[inline]
    pub fn last_class_mut(&mut self) -> Option<&mut ClassEntry> {
        self.classes.last_mut()
    }
    pub fn build(self) -> Result<MappingTree, MalformedMapping> {
        let count = self.namespaces.len();
        let mut class_index = vec![IndexMap::new(); count];
        for (index, class) in self.classes.iter().enumerate() {
            class.names.check_count(count)?;
            for (namespace, name) in class.names.iter() {
                match class_index[namespace.0].entry(name.to_owned()) {
                    Entry::Occupied(_) => return Err(MalformedMapping::DuplicateClass {
                        name: name.into(),
                        namespace: self.namespaces[namespace.0].clone()
                    }),
                    Entry::Vacant(entry) => { entry.insert(index); }
                }
            }
            let members = class.fields.iter().map(|f| (&f.names, &f.descriptor))
                .chain(class.methods.iter().map(|m| (&m.names, &m.descriptor)));
            for (names, descriptor) in members {
                names.check_count(count)?;
                descriptor::validate_descriptor(descriptor).map_err(|cause| MalformedMapping::Descriptor {
                    member: format!("{}.{}", class.names.describe(), names.describe()),
                    cause
                })?;
            }
        }
        let mut tree = MappingTree {
            namespaces: self.namespaces,
            descriptor_namespace: self.descriptor_namespace,
            classes: self.classes,
            class_index
        };
        // Descriptors are valid now, so we can translate them to index the members
        let member_indexes = tree.classes.iter()
            .map(|class| tree.index_members(class))
            .collect::<Result<Vec<_>, _>>()?;
        for (class, index) in tree.classes.iter_mut().zip(member_indexes) {
            class.index = index;
        }
        Ok(tree)
    }
}

/// A complete mapping source, which is immutable once built.
#[derive(Clone, Debug)]
pub struct MappingTree {
    namespaces: IndexSet<String>,
    descriptor_namespace: Namespace,
    classes: Vec<ClassEntry>,
    class_index: Vec<IndexMap<String, usize>>,
}
impl MappingTree {
    #[inline]
    pub fn namespace(&self, name: &str) -> Option<Namespace> {
        self.namespaces.get_full(name).map(|(index, _)| Namespace(index))
    }
    #[inline]
    pub fn namespace_name(&self, namespace: Namespace) -> &str {
        &self.namespaces[namespace.0]
    }
    pub fn namespaces<'a>(&'a self) -> impl Iterator<Item=Namespace> + 'a {
        (0..self.namespaces.len()).map(Namespace)
    }
    #[inline]
    pub fn namespace_names(&self) -> impl Iterator<Item=&str> {
        self.namespaces.iter().map(String::as_str)
    }
    #[inline]
    pub fn descriptor_namespace(&self) -> Namespace {
        self.descriptor_namespace
    }
    #[inline]
    pub fn classes(&self) -> &[ClassEntry] {
        &self.classes
    }
    #[inline]
    pub fn class(&self, namespace: Namespace, name: &str) -> Option<&ClassEntry> {
        self.class_index.get(namespace.0)
            .and_then(|index| index.get(name))
            .map(|&index| &self.classes[index])
    }
    /// If any class has a name in the specified namespace
    #[inline]
    pub fn has_names_in(&self, namespace: Namespace) -> bool {
        self.class_index.get(namespace.0).map_or(false, |index| !index.is_empty())
    }
    #[inline]
    pub fn map_class(&self, name: &str, from: Namespace, to: Namespace) -> Option<&str> {
        self.class(from, name).and_then(|class| class.name(to))
    }
    #[inline]
    pub fn class_mapper(&self, from: Namespace, to: Namespace) -> ClassMapper {
        ClassMapper { tree: self, from, to }
    }
    /// Translate a descriptor from the descriptor namespace into the specified namespace.
    ///
    /// Classes that are unmapped in the target namespace keep their original names.
    pub fn translate_descriptor(&self, descriptor: &str, namespace: Namespace) -> String {
        if namespace == self.descriptor_namespace {
            return descriptor.into()
        }
        let translator = DescriptorTranslator::lenient(self.class_mapper(self.descriptor_namespace, namespace));
        // Only validated descriptors make it into the tree, and lenient translation can't fail otherwise
        translator.translate(descriptor).unwrap_or_else(|_| descriptor.into())
    }
    fn index_members(&self, class: &ClassEntry) -> Result<MemberIndex, MalformedMapping> {
        let mut index = MemberIndex {
            fields: vec![IndexMap::new(); self.namespaces.len()],
            methods: vec![IndexMap::new(); self.namespaces.len()],
        };
        for (field_index, field) in class.fields.iter().enumerate() {
            for (namespace, name) in field.names.iter() {
                if index.fields[namespace.0].insert(name.to_owned(), field_index).is_some() {
                    return Err(MalformedMapping::DuplicateField {
                        class: class.names.describe().into(),
                        name: name.into(),
                        namespace: self.namespace_name(namespace).into()
                    })
                }
            }
        }
        for (method_index, method) in class.methods.iter().enumerate() {
            for (namespace, name) in method.names.iter() {
                let descriptor = self.translate_descriptor(&method.descriptor, namespace);
                match index.methods[namespace.0].entry((name.to_owned(), descriptor)) {
                    Entry::Vacant(entry) => { entry.insert(method_index); },
                    Entry::Occupied(_) if namespace == self.descriptor_namespace => {
                        return Err(MalformedMapping::DuplicateMethod {
                            class: class.names.describe().into(),
                            name: name.into(),
                            descriptor: method.descriptor.clone(),
                            namespace: self.namespace_name(namespace).into()
                        })
                    },
                    /*
                     * Unmapped classes in another namespace can make two distinct
                     * descriptors look the same, so the first declaration wins there.
                     */
                    Entry::Occupied(_) => {}
                }
            }
        }
        Ok(index)
    }
}
impl Display for MappingTree {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "MappingTree[")?;
        for (index, namespace) in self.namespaces.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(namespace)?;
        }
        write!(f, "] with {} classes", self.classes.len())
    }
}

/// Maps class names between two namespaces of the same tree
#[derive(Copy, Clone, Debug)]
pub struct ClassMapper<'a> {
    tree: &'a MappingTree,
    from: Namespace,
    to: Namespace,
}
impl<'a> ClassNameLookup for ClassMapper<'a> {
    #[inline]
    fn lookup_class(&self, name: &str) -> Option<&str> {
        self.tree.map_class(name, self.from, self.to)
    }
}

#[derive(Debug, Fail)]
pub enum MalformedMapping {
    #[fail(display = "Duplicate namespace {:?}", _0)]
    DuplicateNamespace(String),
    #[fail(display = "Unknown namespace {:?}", _0)]
    UnknownNamespace(String),
    #[fail(display = "Expected {} names for {:?}, but got {}", expected, entry, actual)]
    NameCount {
        entry: String,
        expected: usize,
        actual: usize,
    },
    #[fail(display = "Duplicate class {:?} in namespace {:?}", name, namespace)]
    DuplicateClass {
        name: String,
        namespace: String,
    },
    #[fail(display = "Duplicate field {:?} in class {:?} (namespace {:?})", name, class, namespace)]
    DuplicateField {
        class: String,
        name: String,
        namespace: String,
    },
    #[fail(display = "Duplicate method {:?}{} in class {:?} (namespace {:?})", name, descriptor, class, namespace)]
    DuplicateMethod {
        class: String,
        name: String,
        descriptor: String,
        namespace: String,
    },
    #[fail(display = "Invalid descriptor for {}: {}", member, cause)]
    Descriptor {
        member: String,
        #[cause]
        cause: MalformedDescriptor,
    },
    #[fail(display = "Line {}: {}", line, message)]
    Syntax {
        line: usize,
        message: String,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    fn names(names: &[&str]) -> Names {
        Names::new(names.iter().map(|&name| if name.is_empty() { None } else { Some(name) }))
    }
    fn sample() -> MappingTree {
        let mut builder = MappingTreeBuilder::new(vec!["official", "intermediary"], "official").unwrap();
        {
            let class = builder.add_class(names(&["a", "net/minecraft/class_1"]));
            class.add_field(names(&["a", "field_1"]), "I");
            class.add_method(names(&["a", "method_1"]), "(Lb;)V");
            class.add_method(names(&["a", "method_2"]), "(I)V");
        }
        builder.add_class(names(&["b", "net/minecraft/class_2"]));
        builder.add_class(names(&["c", ""]));
        builder.build().unwrap()
    }

    #[test]
    fn lookup_classes() {
        let tree = sample();
        let official = tree.namespace("official").unwrap();
        let intermediary = tree.namespace("intermediary").unwrap();
        assert_eq!(tree.namespace("named"), None);
        assert_eq!(tree.classes().len(), 3);
        assert_eq!(tree.class(official, "b").unwrap().name(intermediary), Some("net/minecraft/class_2"));
        assert_eq!(tree.map_class("net/minecraft/class_1", intermediary, official), Some("a"));
        assert_eq!(tree.map_class("c", official, intermediary), None);
        assert!(tree.class(intermediary, "c").is_none());
        assert_eq!(format!("{}", tree), "MappingTree[official, intermediary] with 3 classes");
    }
    #[test]
    fn lookup_members() {
        let tree = sample();
        let official = tree.namespace("official").unwrap();
        let intermediary = tree.namespace("intermediary").unwrap();
        let class = tree.class(official, "a").unwrap();
        assert_eq!(class.field(intermediary, "field_1").unwrap().name(official), Some("a"));
        // Overloads are told apart by their descriptor
        assert_eq!(class.method(official, "a", "(I)V").unwrap().name(intermediary), Some("method_2"));
        assert_eq!(class.method(official, "a", "(Lb;)V").unwrap().name(intermediary), Some("method_1"));
        // Descriptors are translated into the namespace they're looked up in
        let method = class.method(intermediary, "method_1", "(Lnet/minecraft/class_2;)V").unwrap();
        assert_eq!(method.descriptor(), "(Lb;)V");
        assert!(class.method(intermediary, "method_1", "(Lb;)V").is_none());
        assert_eq!(tree.translate_descriptor("(Lb;Lc;)La;", intermediary), "(Lnet/minecraft/class_2;Lc;)Lnet/minecraft/class_1;");
    }
    #[test]
    fn duplicate_classes() {
        let mut builder = MappingTreeBuilder::new(vec!["official", "named"], "official").unwrap();
        builder.add_class(names(&["a", "Foo"]));
        builder.add_class(names(&["b", "Foo"]));
        match builder.build() {
            Err(MalformedMapping::DuplicateClass { name, namespace }) => {
                assert_eq!(name, "Foo");
                assert_eq!(namespace, "named");
            },
            other => panic!("Unexpected result {:?}", other),
        }
    }
    #[test]
    fn duplicate_members() {
        let mut builder = MappingTreeBuilder::new(vec!["official", "named"], "official").unwrap();
        {
            let class = builder.add_class(names(&["a", "Foo"]));
            class.add_field(names(&["a", "bar"]), "I");
            class.add_field(names(&["b", "bar"]), "J");
        }
        assert!(match builder.build() { Err(MalformedMapping::DuplicateField { .. }) => true, _ => false });

        let mut builder = MappingTreeBuilder::new(vec!["official", "named"], "official").unwrap();
        {
            let class = builder.add_class(names(&["a", "Foo"]));
            class.add_method(names(&["a", "bar"]), "()V");
            class.add_method(names(&["a", "baz"]), "()V");
        }
        assert!(match builder.build() { Err(MalformedMapping::DuplicateMethod { .. }) => true, _ => false });
    }
    #[test]
    fn malformed_entries() {
        let mut builder = MappingTreeBuilder::new(vec!["official", "named"], "official").unwrap();
        builder.add_class(names(&["a", "Foo"])).add_method(names(&["a", "bar"]), "(I");
        assert!(match builder.build() { Err(MalformedMapping::Descriptor { .. }) => true, _ => false });

        let mut builder = MappingTreeBuilder::new(vec!["official", "named"], "official").unwrap();
        builder.add_class(Names::new(vec![Some("a")]));
        assert!(match builder.build() { Err(MalformedMapping::NameCount { expected: 2, actual: 1, .. }) => true, _ => false });

        assert!(MappingTreeBuilder::new(vec!["official", "official"], "official").is_err());
        assert!(MappingTreeBuilder::new(vec!["official"], "named").is_err());
    }
}
