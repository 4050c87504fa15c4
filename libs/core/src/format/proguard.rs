//! Mojang's official mappings, which are published in the ProGuard format.
//!
//! The deobfuscated names come first, so the resulting tree uses
//! the `mojang` namespace for its descriptors.
use std::collections::HashSet;
use std::io::{BufRead, Cursor, Write};

use failure::Error;
use itertools::Itertools;

use crate::descriptor::{FieldType, MethodDescriptor};
use crate::namespaces::{MOJANG, OFFICIAL};
use crate::tree::{MappingTree, MappingTreeBuilder, Names};

use super::{name_pair, srg, syntax_error, MappingFormat};

pub fn parse_text(text: &str) -> Result<MappingTree, Error> {
    parse_proguard(Cursor::new(text))
}

pub fn parse_proguard<R: BufRead>(reader: R) -> Result<MappingTree, Error> {
    let mut builder = MappingTreeBuilder::new(vec![MOJANG, OFFICIAL], MOJANG)?;
    // Inlined code repeats the same member once for each line range
    let mut seen_fields: HashSet<String> = HashSet::new();
    let mut seen_methods: HashSet<(String, String)> = HashSet::new();
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue
        }
        let (declaration, obfuscated) = split_arrow(trimmed)
            .ok_or_else(|| syntax_error(line_number, "Expected a mapping of the form `name -> obfuscated`"))?;
        if !line.starts_with(char::is_whitespace) {
            let obfuscated = obfuscated.strip_suffix(':')
                .ok_or_else(|| syntax_error(line_number, "Class mappings must end with a colon"))?;
            builder.add_class(Names::new(vec![
                Some(internal_name(declaration)),
                Some(internal_name(obfuscated))
            ]));
            seen_fields.clear();
            seen_methods.clear();
            continue
        }
        let class = builder.last_class_mut()
            .ok_or_else(|| syntax_error(line_number, "Member outside of a class"))?;
        if declaration.contains('(') {
            let declaration = strip_line_numbers(declaration);
            let close = declaration.rfind(')')
                .ok_or_else(|| syntax_error(line_number, "Unclosed parameter list"))?;
            let open = declaration.find('(')
                .filter(|&open| open < close)
                .ok_or_else(|| syntax_error(line_number, "Invalid parameter list"))?;
            let (return_type, name) = split_type(&declaration[..open])
                .ok_or_else(|| syntax_error(line_number, "Missing return type"))?;
            if name.contains('.') {
                // Inlined from another class
                continue
            }
            if name == "<init>" || name == "<clinit>" {
                continue
            }
            let arguments = &declaration[open + 1..close];
            let parameters: Vec<&str> = if arguments.trim().is_empty() {
                Vec::new()
            } else {
                arguments.split(',').collect()
            };
            let descriptor = MethodDescriptor::from_java(&parameters, return_type)
                .map_err(|cause| syntax_error(line_number, cause.to_string()))?
                .to_string();
            if seen_methods.insert((name.to_owned(), descriptor.clone())) {
                class.add_method(Names::new(vec![Some(name), Some(obfuscated)]), descriptor);
            }
        } else {
            let (field_type, name) = split_type(declaration)
                .ok_or_else(|| syntax_error(line_number, "Missing field type"))?;
            let descriptor = FieldType::from_java(field_type)
                .map_err(|cause| syntax_error(line_number, cause.to_string()))?
                .to_string();
            if seen_fields.insert(name.to_owned()) {
                class.add_field(Names::new(vec![Some(name), Some(obfuscated)]), descriptor);
            }
        }
    }
    Ok(builder.build()?)
}

/// Write any pair of namespaces in the ProGuard format, with the source names on the left
pub fn write_proguard<W: Write>(tree: &MappingTree, mut output: W) -> Result<(), Error> {
    let (source, target) = srg::source_and_target(tree, MappingFormat::Proguard)?;
    for (class, original, renamed) in srg::named_classes(tree, source, target) {
        writeln!(output, "{} -> {}:", dotted_name(original), dotted_name(renamed))?;
        for field in class.fields() {
            if let Some((original, renamed)) = name_pair(field.names(), source, target) {
                let field_type = FieldType::parse(&tree.translate_descriptor(field.descriptor(), source))?;
                writeln!(output, "    {} {} -> {}", field_type.java_name(), original, renamed)?;
            }
        }
        for method in class.methods() {
            if let Some((original, renamed)) = name_pair(method.names(), source, target) {
                let descriptor = MethodDescriptor::parse(&tree.translate_descriptor(method.descriptor(), source))?;
                let return_type = descriptor.return_type.as_ref()
                    .map_or_else(|| "void".to_owned(), FieldType::java_name);
                let parameters = descriptor.parameters.iter().map(FieldType::java_name).join(",");
                writeln!(output, "    {} {}({}) -> {}", return_type, original, parameters, renamed)?;
            }
        }
    }
    output.flush()?;
    Ok(())
}

fn split_arrow(line: &str) -> Option<(&str, &str)> {
    let index = line.find(" -> ")?;
    let (left, right) = (line[..index].trim(), line[index + 4..].trim());
    if left.is_empty() || right.is_empty() {
        return None
    }
    Some((left, right))
}

/// Split `type name` into its parts
fn split_type(declaration: &str) -> Option<(&str, &str)> {
    let declaration = declaration.trim();
    let index = declaration.rfind(' ')?;
    let (member_type, name) = (declaration[..index].trim(), &declaration[index + 1..]);
    if member_type.is_empty() || name.is_empty() {
        return None
    }
    Some((member_type, name))
}

/// Strip the `start:end:` prefix and `:start:end` suffix of method line ranges
fn strip_line_numbers(declaration: &str) -> &str {
    let mut declaration = declaration;
    for _ in 0..2 {
        match declaration.find(':') {
            Some(index) if index > 0 && declaration[..index].bytes().all(|b| b.is_ascii_digit()) => {
                declaration = &declaration[index + 1..];
            },
            _ => break
        }
    }
    match declaration.rfind(')') {
        Some(close) => &declaration[..=close],
        None => declaration
    }
}

#[inline]
fn internal_name(name: &str) -> String {
    name.replace('.', "/")
}

#[inline]
fn dotted_name(name: &str) -> String {
    name.replace('/', ".")
}
