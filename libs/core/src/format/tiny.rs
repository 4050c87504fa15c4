//! Fabric's tiny mapping formats.
//!
//! Intermediary and yarn are both published as tiny v2,
//! where descriptors are written using the first namespace.
use std::io::{BufRead, Cursor, Write};

use failure::Error;
use itertools::Itertools;

use crate::tree::{MappingTree, MappingTreeBuilder, Names, Namespace};

use super::syntax_error;

pub fn parse_text(text: &str) -> Result<MappingTree, Error> {
    parse_tiny_v2(Cursor::new(text))
}

pub fn parse_tiny_v2<R: BufRead>(reader: R) -> Result<MappingTree, Error> {
    let mut lines = reader.lines().enumerate()
        .map(|(index, line)| line.map(|line| (index + 1, line)));
    let (_, header) = lines.next()
        .ok_or_else(|| syntax_error(1, "Missing header"))??;
    let header = header.trim_end_matches('\r');
    let mut header_parts = header.split('\t');
    if header_parts.next() != Some("tiny") || header_parts.next() != Some("2") {
        return Err(syntax_error(1, format!("Expected a tiny v2 header, but got {:?}", header)))
    }
    if header_parts.next().and_then(|minor| minor.parse::<u32>().ok()).is_none() {
        return Err(syntax_error(1, "Invalid minor version"))
    }
    let namespaces: Vec<&str> = header_parts.collect();
    if namespaces.len() < 2 {
        return Err(syntax_error(1, "Expected at least two namespaces"))
    }
    let mut builder = MappingTreeBuilder::new(namespaces.iter().cloned(), namespaces[0])?;
    let namespace_count = namespaces.len();
    let mut escaped_names = false;
    let mut in_header = true;
    // The depth of an unknown section we're skipping
    let mut skip_depth: Option<usize> = None;
    for line in lines {
        let (line_number, line) = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue
        }
        let depth = line.bytes().take_while(|&b| b == b'\t').count();
        let parts: Vec<&str> = line[depth..].split('\t').collect();
        if in_header {
            if depth == 1 {
                if parts[0] == "escaped-names" {
                    escaped_names = true;
                }
                continue
            }
            in_header = false;
        }
        if let Some(skipped) = skip_depth {
            if depth > skipped {
                continue
            }
            skip_depth = None;
        }
        let names_at = |offset: usize| -> Result<Names, Error> {
            let names = parts.get(offset..offset + namespace_count)
                .ok_or_else(|| syntax_error(line_number, format!("Expected {} names", namespace_count)))?;
            if names[0].is_empty() {
                return Err(syntax_error(line_number, "Missing name in the first namespace"))
            }
            Ok(names.iter().map(|&name| {
                if name.is_empty() {
                    None
                } else if escaped_names {
                    Some(unescape(name))
                } else {
                    Some(name.to_owned())
                }
            }).collect())
        };
        match (depth, parts[0]) {
            (0, "c") => {
                builder.add_class(names_at(1)?);
            },
            (0, _) => skip_depth = Some(0),
            (1, kind @ "f") | (1, kind @ "m") => {
                let descriptor = parts.get(1)
                    .filter(|descriptor| !descriptor.is_empty())
                    .ok_or_else(|| syntax_error(line_number, "Missing descriptor"))?;
                let names = names_at(2)?;
                let class = builder.last_class_mut()
                    .ok_or_else(|| syntax_error(line_number, "Member outside of a class"))?;
                if kind == "f" {
                    class.add_field(names, *descriptor);
                } else {
                    class.add_method(names, *descriptor);
                }
            },
            // Comments, parameters and local variables
            (_, _) => skip_depth = Some(depth),
        }
    }
    Ok(builder.build()?)
}

fn unescape(name: &str) -> String {
    if !name.contains('\\') {
        return name.into()
    }
    let mut result = String::with_capacity(name.len());
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('0') => result.push('\0'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            },
            None => result.push('\\'),
        }
    }
    result
}

fn escape(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\0' => result.push_str("\\0"),
            _ => result.push(c),
        }
    }
    result
}

fn needs_escape(name: &str) -> bool {
    name.contains(|c| c == '\\' || c == '\n' || c == '\r' || c == '\t' || c == '\0')
}

pub fn write_tiny_v2<W: Write>(tree: &MappingTree, mut output: W) -> Result<(), Error> {
    let namespaces: Vec<Namespace> = tree.namespaces().collect();
    let primary = namespaces[0];
    let escaped = tree.classes().iter().any(|class| {
        class.names().iter().any(|(_, name)| needs_escape(name))
            || class.fields().iter().any(|field| field.names().iter().any(|(_, name)| needs_escape(name)))
            || class.methods().iter().any(|method| method.names().iter().any(|(_, name)| needs_escape(name)))
    });
    let format_names = |names: &Names| -> String {
        namespaces.iter().map(|&namespace| {
            let name = names.get(namespace).unwrap_or("");
            if escaped { escape(name) } else { name.to_owned() }
        }).join("\t")
    };
    writeln!(output, "tiny\t2\t0\t{}", tree.namespace_names().join("\t"))?;
    if escaped {
        writeln!(output, "\tescaped-names")?;
    }
    for class in tree.classes() {
        if class.name(primary).is_none() {
            continue
        }
        writeln!(output, "c\t{}", format_names(class.names()))?;
        for field in class.fields() {
            if field.name(primary).is_none() { continue }
            let descriptor = tree.translate_descriptor(field.descriptor(), primary);
            writeln!(output, "\tf\t{}\t{}", descriptor, format_names(field.names()))?;
        }
        for method in class.methods() {
            if method.name(primary).is_none() { continue }
            let descriptor = tree.translate_descriptor(method.descriptor(), primary);
            writeln!(output, "\tm\t{}\t{}", descriptor, format_names(method.names()))?;
        }
    }
    output.flush()?;
    Ok(())
}

/// Write the legacy tiny v1 format, which has no support for escaping
pub fn write_tiny_v1<W: Write>(tree: &MappingTree, mut output: W) -> Result<(), Error> {
    let namespaces: Vec<Namespace> = tree.namespaces().collect();
    let primary = namespaces[0];
    let format_names = |names: &Names| -> String {
        namespaces.iter().map(|&namespace| names.get(namespace).unwrap_or("")).join("\t")
    };
    writeln!(output, "v1\t{}", tree.namespace_names().join("\t"))?;
    for class in tree.classes() {
        let owner = match class.name(primary) {
            Some(owner) => owner,
            None => continue
        };
        writeln!(output, "CLASS\t{}", format_names(class.names()))?;
        for field in class.fields() {
            if field.name(primary).is_none() { continue }
            let descriptor = tree.translate_descriptor(field.descriptor(), primary);
            writeln!(output, "FIELD\t{}\t{}\t{}", owner, descriptor, format_names(field.names()))?;
        }
        for method in class.methods() {
            if method.name(primary).is_none() { continue }
            let descriptor = tree.translate_descriptor(method.descriptor(), primary);
            writeln!(output, "METHOD\t{}\t{}\t{}", owner, descriptor, format_names(method.names()))?;
        }
    }
    output.flush()?;
    Ok(())
}
