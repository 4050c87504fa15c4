//! Field and method descriptors, along with the generic signatures that embed them.
//!
//! Descriptors are always written with internal class names (`net/minecraft/Foo`),
//! so translating one from one namespace into another only ever touches the class tokens.
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter, Write};
use std::hash::BuildHasher;

use failure_derive::Fail;
use indexmap::IndexMap;

/// Looks up the name of a class in some other namespace.
pub trait ClassNameLookup {
    fn lookup_class(&self, name: &str) -> Option<&str>;
}
impl<S: BuildHasher> ClassNameLookup for HashMap<String, String, S> {
    #[inline]
    fn lookup_class(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}
impl<S: BuildHasher> ClassNameLookup for IndexMap<String, String, S> {
    #[inline]
    fn lookup_class(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}
impl<'a, L: ClassNameLookup + ?Sized> ClassNameLookup for &'a L {
    #[inline]
    fn lookup_class(&self, name: &str) -> Option<&str> {
        (**self).lookup_class(name)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PrimitiveType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}
impl PrimitiveType {
    pub fn from_code(code: u8) -> Option<PrimitiveType> {
        Some(match code {
            b'B' => PrimitiveType::Byte,
            b'C' => PrimitiveType::Char,
            b'D' => PrimitiveType::Double,
            b'F' => PrimitiveType::Float,
            b'I' => PrimitiveType::Int,
            b'J' => PrimitiveType::Long,
            b'S' => PrimitiveType::Short,
            b'Z' => PrimitiveType::Boolean,
            _ => return None
        })
    }
    #[inline]
    pub fn code(self) -> char {
        match self {
            PrimitiveType::Byte => 'B',
            PrimitiveType::Char => 'C',
            PrimitiveType::Double => 'D',
            PrimitiveType::Float => 'F',
            PrimitiveType::Int => 'I',
            PrimitiveType::Long => 'J',
            PrimitiveType::Short => 'S',
            PrimitiveType::Boolean => 'Z',
        }
    }
    #[inline]
    pub fn java_name(self) -> &'static str {
        match self {
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Double => "double",
            PrimitiveType::Float => "float",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Short => "short",
            PrimitiveType::Boolean => "boolean",
        }
    }
    pub fn from_java_name(name: &str) -> Option<PrimitiveType> {
        Some(match name {
            "byte" => PrimitiveType::Byte,
            "char" => PrimitiveType::Char,
            "double" => PrimitiveType::Double,
            "float" => PrimitiveType::Float,
            "int" => PrimitiveType::Int,
            "long" => PrimitiveType::Long,
            "short" => PrimitiveType::Short,
            "boolean" => PrimitiveType::Boolean,
            _ => return None
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum FieldType {
    Primitive(PrimitiveType),
    /// A class reference, by internal name
    Object(String),
    Array(Box<FieldType>),
}
impl FieldType {
    pub fn parse(descriptor: &str) -> Result<FieldType, MalformedDescriptor> {
        let mut reader = DescriptorReader::new(descriptor);
        let result = reader.read_field_type()
            .and_then(|parsed| reader.finish().map(|()| parsed));
        result.map_err(|reason| MalformedDescriptor { descriptor: descriptor.into(), reason })
    }
    /// Convert a java source type like `java.lang.String[]` into its descriptor form.
    pub fn from_java(name: &str) -> Result<FieldType, MalformedDescriptor> {
        let error = |reason| MalformedDescriptor { descriptor: name.into(), reason };
        let mut element = name.trim();
        let mut dimensions = 0;
        while element.ends_with("[]") {
            element = element[..element.len() - 2].trim_end();
            dimensions += 1;
        }
        if element.is_empty() {
            return Err(error("empty type name"))
        }
        let mut result = match PrimitiveType::from_java_name(element) {
            Some(primitive) => FieldType::Primitive(primitive),
            None => {
                if element == "void" {
                    return Err(error("void is not a value type"))
                }
                let invalid = |c: char| {
                    c != '.' && (INVALID_NAME_CHARS.contains(&c) || c == '/' || c.is_whitespace())
                };
                if element.contains(invalid) || element.starts_with('.') || element.ends_with('.') {
                    return Err(error("invalid character in class name"))
                }
                FieldType::Object(element.replace('.', "/"))
            }
        };
        for _ in 0..dimensions {
            result = FieldType::Array(Box::new(result));
        }
        Ok(result)
    }
    /// The java source form of this type, like `java.lang.String[]`
    pub fn java_name(&self) -> String {
        match *self {
            FieldType::Primitive(primitive) => primitive.java_name().into(),
            FieldType::Object(ref name) => name.replace('/', "."),
            FieldType::Array(ref element) => format!("{}[]", element.java_name()),
        }
    }
    pub fn remap<L: ClassNameLookup>(&self, translator: &DescriptorTranslator<L>) -> Result<FieldType, UnresolvedClass> {
        Ok(match *self {
            FieldType::Primitive(primitive) => FieldType::Primitive(primitive),
            FieldType::Object(ref name) => FieldType::Object(translator.remap_class(name)?.into()),
            FieldType::Array(ref element) => FieldType::Array(Box::new(element.remap(translator)?)),
        })
    }
}
impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            FieldType::Primitive(primitive) => f.write_char(primitive.code()),
            FieldType::Object(ref name) => write!(f, "L{};", name),
            FieldType::Array(ref element) => write!(f, "[{}", element),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MethodDescriptor {
    pub parameters: Vec<FieldType>,
    /// The return type, or `None` for `void`
    pub return_type: Option<FieldType>,
}
impl MethodDescriptor {
    pub fn parse(descriptor: &str) -> Result<MethodDescriptor, MalformedDescriptor> {
        let mut reader = DescriptorReader::new(descriptor);
        reader.read_method_descriptor()
            .map_err(|reason| MalformedDescriptor { descriptor: descriptor.into(), reason })
    }
    pub fn from_java(parameters: &[&str], return_type: &str) -> Result<MethodDescriptor, MalformedDescriptor> {
        let parameters = parameters.iter()
            .map(|parameter| FieldType::from_java(parameter))
            .collect::<Result<Vec<_>, _>>()?;
        let return_type = if return_type.trim() == "void" {
            None
        } else {
            Some(FieldType::from_java(return_type)?)
        };
        Ok(MethodDescriptor { parameters, return_type })
    }
    pub fn remap<L: ClassNameLookup>(&self, translator: &DescriptorTranslator<L>) -> Result<MethodDescriptor, UnresolvedClass> {
        let parameters = self.parameters.iter()
            .map(|parameter| parameter.remap(translator))
            .collect::<Result<Vec<_>, _>>()?;
        let return_type = match self.return_type {
            Some(ref return_type) => Some(return_type.remap(translator)?),
            None => None
        };
        Ok(MethodDescriptor { parameters, return_type })
    }
}
impl Display for MethodDescriptor {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_char('(')?;
        for parameter in &self.parameters {
            write!(f, "{}", parameter)?;
        }
        f.write_char(')')?;
        match self.return_type {
            Some(ref return_type) => write!(f, "{}", return_type),
            None => f.write_char('V'),
        }
    }
}

/// Validate a member descriptor, which is a method descriptor if it starts with `(`
pub fn validate_descriptor(descriptor: &str) -> Result<(), MalformedDescriptor> {
    if descriptor.starts_with('(') {
        MethodDescriptor::parse(descriptor).map(|_| ())
    } else {
        FieldType::parse(descriptor).map(|_| ())
    }
}

/// Rewrites the class names inside descriptors and signatures.
///
/// In strict mode any class the lookup doesn't know about is an error,
/// otherwise the class keeps its original name.
#[derive(Copy, Clone, Debug)]
pub struct DescriptorTranslator<L> {
    lookup: L,
    strict: bool,
}
impl<L: ClassNameLookup> DescriptorTranslator<L> {
    #[inline]
    pub fn lenient(lookup: L) -> Self {
        DescriptorTranslator { lookup, strict: false }
    }
    #[inline]
    pub fn strict(lookup: L) -> Self {
        DescriptorTranslator { lookup, strict: true }
    }
    #[inline]
    pub fn is_strict(&self) -> bool {
        self.strict
    }
    fn remap_class<'a>(&'a self, name: &'a str) -> Result<&'a str, UnresolvedClass> {
        match self.lookup.lookup_class(name) {
            Some(remapped) => Ok(remapped),
            None if self.strict => Err(UnresolvedClass(name.into())),
            None => Ok(name)
        }
    }
    pub fn translate_field(&self, descriptor: &str) -> Result<String, DescriptorError> {
        let parsed = FieldType::parse(descriptor)?;
        let remapped = parsed.remap(self)
            .map_err(|e| e.in_descriptor(descriptor))?;
        Ok(remapped.to_string())
    }
    pub fn translate_method(&self, descriptor: &str) -> Result<String, DescriptorError> {
        let parsed = MethodDescriptor::parse(descriptor)?;
        let remapped = parsed.remap(self)
            .map_err(|e| e.in_descriptor(descriptor))?;
        Ok(remapped.to_string())
    }
    /// Translate either kind of member descriptor
    #[inline]
    pub fn translate(&self, descriptor: &str) -> Result<String, DescriptorError> {
        if descriptor.starts_with('(') {
            self.translate_method(descriptor)
        } else {
            self.translate_field(descriptor)
        }
    }
    /// Translate a generic class, method or field signature.
    pub fn translate_signature(&self, signature: &str) -> Result<String, DescriptorError> {
        let mut rewriter = SignatureRewriter {
            reader: DescriptorReader::new(signature),
            output: String::with_capacity(signature.len()),
            translator: self
        };
        match rewriter.rewrite() {
            Ok(()) => Ok(rewriter.output),
            Err(SignatureError::Malformed(reason)) => Err(MalformedDescriptor {
                descriptor: signature.into(), reason
            }.into()),
            Err(SignatureError::Unresolved(e)) => Err(e.in_descriptor(signature).into()),
        }
    }
}

const INVALID_NAME_CHARS: &[char] = &['.', ';', '[', '<', '>', '(', ')'];

struct DescriptorReader<'a> {
    text: &'a str,
    position: usize,
}
impl<'a> DescriptorReader<'a> {
    #[inline]
    fn new(text: &'a str) -> Self {
        DescriptorReader { text, position: 0 }
    }
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.position).cloned()
    }
    #[inline]
    fn next(&mut self) -> Option<u8> {
        let result = self.peek();
        if result.is_some() {
            self.position += 1;
        }
        result
    }
    fn expect(&mut self, expected: u8, reason: &'static str) -> Result<(), &'static str> {
        if self.next() == Some(expected) { Ok(()) } else { Err(reason) }
    }
    fn finish(&self) -> Result<(), &'static str> {
        if self.position == self.text.len() { Ok(()) } else { Err("trailing characters") }
    }
    /// Read up to (but not including) the first of the specified terminators
    fn read_until(&mut self, terminators: &[char]) -> Result<&'a str, &'static str> {
        let remaining = &self.text[self.position..];
        let end = remaining.find(terminators)
            .ok_or("unterminated name")?;
        self.position += end;
        Ok(&remaining[..end])
    }
    fn read_class_name(&mut self) -> Result<&'a str, &'static str> {
        let name = self.read_until(&[';'])?;
        self.position += 1; // ';'
        if name.is_empty() {
            return Err("empty class name")
        }
        if name.contains(INVALID_NAME_CHARS) {
            return Err("invalid character in class name")
        }
        Ok(name)
    }
    fn read_field_type(&mut self) -> Result<FieldType, &'static str> {
        match self.next() {
            Some(b'L') => Ok(FieldType::Object(self.read_class_name()?.into())),
            Some(b'[') => Ok(FieldType::Array(Box::new(self.read_field_type()?))),
            Some(code) => PrimitiveType::from_code(code)
                .map(FieldType::Primitive)
                .ok_or("unknown type code"),
            None => Err("unexpected end of descriptor")
        }
    }
    fn read_method_descriptor(&mut self) -> Result<MethodDescriptor, &'static str> {
        self.expect(b'(', "expected '('")?;
        let mut parameters = Vec::new();
        loop {
            match self.peek() {
                Some(b')') => {
                    self.position += 1;
                    break
                },
                Some(_) => parameters.push(self.read_field_type()?),
                None => return Err("unterminated parameter list")
            }
        }
        let return_type = if self.peek() == Some(b'V') {
            self.position += 1;
            None
        } else {
            Some(self.read_field_type()?)
        };
        self.finish()?;
        Ok(MethodDescriptor { parameters, return_type })
    }
}

enum SignatureError {
    Malformed(&'static str),
    Unresolved(UnresolvedClass),
}
impl From<&'static str> for SignatureError {
    #[inline]
    fn from(reason: &'static str) -> Self {
        SignatureError::Malformed(reason)
    }
}
impl From<UnresolvedClass> for SignatureError {
    #[inline]
    fn from(e: UnresolvedClass) -> Self {
        SignatureError::Unresolved(e)
    }
}

struct SignatureRewriter<'a, 't, L> {
    reader: DescriptorReader<'a>,
    output: String,
    translator: &'t DescriptorTranslator<L>,
}
impl<'a, 't, L: ClassNameLookup> SignatureRewriter<'a, 't, L> {
    fn rewrite(&mut self) -> Result<(), SignatureError> {
        if self.reader.peek() == Some(b'<') {
            self.type_parameters()?;
        }
        if self.reader.peek() == Some(b'(') {
            self.copy_byte();
            while self.reader.peek() != Some(b')') {
                self.java_type()?;
            }
            self.copy_byte();
            if self.reader.peek() == Some(b'V') {
                self.copy_byte();
            } else {
                self.java_type()?;
            }
            while self.reader.peek() == Some(b'^') {
                self.copy_byte();
                self.reference_type()?;
            }
        } else {
            // Superclass followed by interfaces, or just the type of a field
            if self.reader.peek().is_none() {
                return Err("empty signature".into())
            }
            while self.reader.peek().is_some() {
                self.reference_type()?;
            }
        }
        self.reader.finish()?;
        Ok(())
    }
    #[inline]
    fn copy_byte(&mut self) {
        if let Some(b) = self.reader.next() {
            self.output.push(b as char);
        }
    }
    fn type_parameters(&mut self) -> Result<(), SignatureError> {
        self.copy_byte(); // '<'
        loop {
            match self.reader.peek() {
                Some(b'>') => {
                    self.copy_byte();
                    return Ok(())
                },
                Some(_) => {
                    let identifier = self.reader.read_until(&[':'])?;
                    if identifier.is_empty() {
                        return Err("empty type parameter".into())
                    }
                    self.output.push_str(identifier);
                    // The class bound may be empty, interface bounds may not
                    while self.reader.peek() == Some(b':') {
                        self.copy_byte();
                        match self.reader.peek() {
                            Some(b'L') | Some(b'T') | Some(b'[') => self.reference_type()?,
                            _ => {}
                        }
                    }
                },
                None => return Err("unterminated type parameters".into())
            }
        }
    }
    fn java_type(&mut self) -> Result<(), SignatureError> {
        match self.reader.peek() {
            Some(code) if PrimitiveType::from_code(code).is_some() => {
                self.copy_byte();
                Ok(())
            },
            Some(_) => self.reference_type(),
            None => Err("unexpected end of signature".into())
        }
    }
    fn reference_type(&mut self) -> Result<(), SignatureError> {
        match self.reader.peek() {
            Some(b'L') => self.class_type(),
            Some(b'T') => {
                self.copy_byte();
                let variable = self.reader.read_until(&[';'])?;
                self.output.push_str(variable);
                self.copy_byte();
                Ok(())
            },
            Some(b'[') => {
                self.copy_byte();
                self.java_type()
            },
            _ => Err("expected reference type".into())
        }
    }
    fn class_type(&mut self) -> Result<(), SignatureError> {
        self.copy_byte(); // 'L'
        let mut original = self.reader.read_until(&['<', '.', ';'])?.to_owned();
        if original.is_empty() {
            return Err("empty class name".into())
        }
        let mut remapped = self.translator.remap_class(&original)?.to_owned();
        self.output.push_str(&remapped);
        loop {
            match self.reader.peek() {
                Some(b'<') => self.type_arguments()?,
                Some(b'.') => {
                    self.copy_byte();
                    let simple_name = self.reader.read_until(&['<', '.', ';'])?;
                    let inner = format!("{}${}", original, simple_name);
                    let remapped_inner = self.translator.remap_class(&inner)?.to_owned();
                    // Inner classes are written relative to their outer class
                    let prefix_len = remapped.len() + 1;
                    let remapped_simple = if remapped_inner.len() > prefix_len
                        && remapped_inner.starts_with(remapped.as_str())
                        && remapped_inner.as_bytes()[remapped.len()] == b'$' {
                        &remapped_inner[prefix_len..]
                    } else {
                        remapped_inner.rsplit('$').next().unwrap_or(simple_name)
                    };
                    self.output.push_str(remapped_simple);
                    original = inner;
                    remapped = remapped_inner;
                },
                Some(b';') => {
                    self.copy_byte();
                    return Ok(())
                },
                _ => return Err("unterminated class type".into())
            }
        }
    }
    fn type_arguments(&mut self) -> Result<(), SignatureError> {
        self.copy_byte(); // '<'
        loop {
            match self.reader.peek() {
                Some(b'>') => {
                    self.copy_byte();
                    return Ok(())
                },
                Some(b'*') => self.copy_byte(),
                Some(b'+') | Some(b'-') => {
                    self.copy_byte();
                    self.reference_type()?;
                },
                Some(_) => self.reference_type()?,
                None => return Err("unterminated type arguments".into())
            }
        }
    }
}

#[derive(Debug, Fail)]
#[fail(display = "Malformed descriptor {:?}: {}", descriptor, reason)]
pub struct MalformedDescriptor {
    pub descriptor: String,
    pub reason: &'static str,
}

/// A class that couldn't be resolved, before we know which descriptor it came from
#[derive(Debug)]
pub struct UnresolvedClass(String);
impl UnresolvedClass {
    #[inline]
    fn in_descriptor(self, descriptor: &str) -> UnresolvedClassInDescriptor {
        UnresolvedClassInDescriptor { class: self.0, descriptor: descriptor.into() }
    }
}

#[derive(Debug, Fail)]
#[fail(display = "Unable to resolve class {:?} in descriptor {:?}", class, descriptor)]
pub struct UnresolvedClassInDescriptor {
    pub class: String,
    pub descriptor: String,
}

#[derive(Debug, Fail)]
pub enum DescriptorError {
    #[fail(display = "{}", _0)]
    Malformed(#[cause] MalformedDescriptor),
    #[fail(display = "{}", _0)]
    Unresolved(#[cause] UnresolvedClassInDescriptor),
}
impl From<MalformedDescriptor> for DescriptorError {
    #[inline]
    fn from(e: MalformedDescriptor) -> Self {
        DescriptorError::Malformed(e)
    }
}
impl From<UnresolvedClassInDescriptor> for DescriptorError {
    #[inline]
    fn from(e: UnresolvedClassInDescriptor) -> Self {
        DescriptorError::Unresolved(e)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn lookup() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("a".to_owned(), "net/minecraft/class_1".to_owned());
        map.insert("b".to_owned(), "net/minecraft/class_2".to_owned());
        map.insert("b$c".to_owned(), "net/minecraft/class_2$class_3".to_owned());
        map
    }
    fn inverse(map: &HashMap<String, String>) -> HashMap<String, String> {
        map.iter().map(|(k, v)| (v.clone(), k.clone())).collect()
    }

    #[test]
    fn parse_field_types() {
        assert_eq!(FieldType::parse("I").unwrap(), FieldType::Primitive(PrimitiveType::Int));
        assert_eq!(
            FieldType::parse("[[Ljava/lang/String;").unwrap(),
            FieldType::Array(Box::new(FieldType::Array(Box::new(FieldType::Object("java/lang/String".into())))))
        );
        assert!(FieldType::parse("").is_err());
        assert!(FieldType::parse("V").is_err());
        assert!(FieldType::parse("Ljava/lang/String").is_err());
        assert!(FieldType::parse("L;").is_err());
        assert!(FieldType::parse("II").is_err());
        assert!(FieldType::parse("Ljava.lang.String;").is_err());
    }
    #[test]
    fn parse_method_descriptors() {
        let parsed = MethodDescriptor::parse("(I[JLa;)V").unwrap();
        assert_eq!(parsed.parameters.len(), 3);
        assert_eq!(parsed.return_type, None);
        assert_eq!(parsed.to_string(), "(I[JLa;)V");
        assert_eq!(MethodDescriptor::parse("()La;").unwrap().to_string(), "()La;");
        assert!(MethodDescriptor::parse("I)V").is_err());
        assert!(MethodDescriptor::parse("(I").is_err());
        assert!(MethodDescriptor::parse("(I)").is_err());
        assert!(MethodDescriptor::parse("(V)V").is_err());
        assert!(MethodDescriptor::parse("()VV").is_err());
    }
    #[test]
    fn java_types() {
        assert_eq!(FieldType::from_java("int").unwrap().to_string(), "I");
        assert_eq!(FieldType::from_java("java.lang.String[][]").unwrap().to_string(), "[[Ljava/lang/String;");
        assert_eq!(FieldType::from_java("net.minecraft.Foo$Bar").unwrap().to_string(), "Lnet/minecraft/Foo$Bar;");
        assert!(FieldType::from_java("void").is_err());
        assert!(FieldType::from_java("[]").is_err());
        assert_eq!(
            MethodDescriptor::from_java(&["int", "java.lang.Object"], "void").unwrap().to_string(),
            "(ILjava/lang/Object;)V"
        );
        assert_eq!(MethodDescriptor::from_java(&[], "boolean[]").unwrap().to_string(), "()[Z");
        assert_eq!(FieldType::parse("[[Ljava/lang/String;").unwrap().java_name(), "java.lang.String[][]");
        assert_eq!(FieldType::parse("J").unwrap().java_name(), "long");
    }
    #[test]
    fn translate_leaves_primitives_alone() {
        let lookup = lookup();
        let translator = DescriptorTranslator::lenient(&lookup);
        assert_eq!(translator.translate("(IJZ)D").unwrap(), "(IJZ)D");
        assert_eq!(translator.translate("[[La;").unwrap(), "[[Lnet/minecraft/class_1;");
        assert_eq!(
            translator.translate("(La;[Lb;Ljava/lang/String;)La;").unwrap(),
            "(Lnet/minecraft/class_1;[Lnet/minecraft/class_2;Ljava/lang/String;)Lnet/minecraft/class_1;"
        );
    }
    #[test]
    fn strict_translation_rejects_unknown_classes() {
        let lookup = lookup();
        let translator = DescriptorTranslator::strict(&lookup);
        assert!(translator.is_strict());
        assert_eq!(translator.translate("(La;)V").unwrap(), "(Lnet/minecraft/class_1;)V");
        match translator.translate("(La;Lzz;)V") {
            Err(DescriptorError::Unresolved(e)) => {
                assert_eq!(e.class, "zz");
                assert_eq!(e.descriptor, "(La;Lzz;)V");
            },
            other => panic!("Unexpected result {:?}", other),
        }
        // Lenient mode keeps the original
        assert_eq!(DescriptorTranslator::lenient(&lookup).translate("Lzz;").unwrap(), "Lzz;");
    }
    #[test]
    fn malformed_descriptors_are_errors_in_both_modes() {
        let lookup = lookup();
        for translator in &[DescriptorTranslator::strict(&lookup), DescriptorTranslator::lenient(&lookup)] {
            match translator.translate("(La)V") {
                Err(DescriptorError::Malformed(_)) => {},
                other => panic!("Unexpected result {:?}", other),
            }
        }
    }
    #[test]
    fn round_trip() {
        let forward = lookup();
        let backward = inverse(&forward);
        let descriptors = [
            "(La;[[Lb;ILjava/lang/Object;)Lb$c;",
            "[La;",
            "()V",
            "(DDLb;)[[I",
        ];
        for &descriptor in &descriptors {
            let translated = DescriptorTranslator::lenient(&forward).translate(descriptor).unwrap();
            let back = DescriptorTranslator::lenient(&backward).translate(&translated).unwrap();
            assert_eq!(back, descriptor);
        }
    }
    #[test]
    fn translate_signatures() {
        let lookup = lookup();
        let translator = DescriptorTranslator::lenient(&lookup);
        assert_eq!(
            translator.translate_signature("Ljava/util/List<La;>;").unwrap(),
            "Ljava/util/List<Lnet/minecraft/class_1;>;"
        );
        assert_eq!(
            translator.translate_signature("<T:La;>(TT;Ljava/util/Map<+Lb;*>;)[TT;^La;").unwrap(),
            "<T:Lnet/minecraft/class_1;>(TT;Ljava/util/Map<+Lnet/minecraft/class_2;*>;)[TT;^Lnet/minecraft/class_1;"
        );
        assert_eq!(
            translator.translate_signature("<K::Ljava/lang/Comparable<TK;>;>Ljava/lang/Object;").unwrap(),
            "<K::Ljava/lang/Comparable<TK;>;>Ljava/lang/Object;"
        );
        // Inner classes are named relative to their outer class
        assert_eq!(
            translator.translate_signature("Lb<TT;>.c;").unwrap(),
            "Lnet/minecraft/class_2<TT;>.class_3;"
        );
        assert!(translator.translate_signature("Ljava/util/List<La;;").is_err());
        assert!(translator.translate_signature("").is_err());
    }
}
