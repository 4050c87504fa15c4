//! The SRG family of formats, which only support a single source and target namespace.
use std::io::Write;

use failure::Error;

use crate::tree::{ClassEntry, MappingTree, Namespace};

use super::{name_pair, MappingFormat, UnsupportedNamespaceCount};

pub(super) fn source_and_target(tree: &MappingTree, format: MappingFormat) -> Result<(Namespace, Namespace), UnsupportedNamespaceCount> {
    let namespaces: Vec<Namespace> = tree.namespaces().collect();
    match namespaces[..] {
        [source, target] => Ok((source, target)),
        _ => Err(UnsupportedNamespaceCount { format, expected: 2, actual: namespaces.len() })
    }
}

/// Iterate over the classes that can be written, along with their source and target names
pub(super) fn named_classes<'a>(tree: &'a MappingTree, source: Namespace, target: Namespace)
    -> impl Iterator<Item=(&'a ClassEntry, &'a str, &'a str)> + 'a {
    tree.classes().iter().filter_map(move |class| {
        name_pair(class.names(), source, target).map(|(original, renamed)| (class, original, renamed))
    })
}

pub fn write_srg<W: Write>(tree: &MappingTree, mut output: W, xsrg: bool) -> Result<(), Error> {
    let format = if xsrg { MappingFormat::Xsrg } else { MappingFormat::Srg };
    let (source, target) = source_and_target(tree, format)?;
    for (_, original, renamed) in named_classes(tree, source, target) {
        writeln!(output, "CL: {} {}", original, renamed)?;
    }
    for (class, original_class, renamed_class) in named_classes(tree, source, target) {
        for field in class.fields() {
            if let Some((original, renamed)) = name_pair(field.names(), source, target) {
                if xsrg {
                    writeln!(
                        output, "FD: {}/{} {} {}/{} {}",
                        original_class, original, tree.translate_descriptor(field.descriptor(), source),
                        renamed_class, renamed, tree.translate_descriptor(field.descriptor(), target)
                    )?;
                } else {
                    writeln!(output, "FD: {}/{} {}/{}", original_class, original, renamed_class, renamed)?;
                }
            }
        }
    }
    for (class, original_class, renamed_class) in named_classes(tree, source, target) {
        for method in class.methods() {
            if let Some((original, renamed)) = name_pair(method.names(), source, target) {
                writeln!(
                    output, "MD: {}/{} {} {}/{} {}",
                    original_class, original, tree.translate_descriptor(method.descriptor(), source),
                    renamed_class, renamed, tree.translate_descriptor(method.descriptor(), target)
                )?;
            }
        }
    }
    output.flush()?;
    Ok(())
}

pub fn write_csrg<W: Write>(tree: &MappingTree, mut output: W) -> Result<(), Error> {
    let (source, target) = source_and_target(tree, MappingFormat::Csrg)?;
    for (_, original, renamed) in named_classes(tree, source, target) {
        writeln!(output, "{} {}", original, renamed)?;
    }
    for (class, owner, _) in named_classes(tree, source, target) {
        for field in class.fields() {
            if let Some((original, renamed)) = name_pair(field.names(), source, target) {
                writeln!(output, "{} {} {}", owner, original, renamed)?;
            }
        }
        for method in class.methods() {
            if let Some((original, renamed)) = name_pair(method.names(), source, target) {
                let descriptor = tree.translate_descriptor(method.descriptor(), source);
                writeln!(output, "{} {} {} {}", owner, original, descriptor, renamed)?;
            }
        }
    }
    output.flush()?;
    Ok(())
}

/// Write the tsrg format, where members are indented below their class.
///
/// Version two adds a header with the namespaces and includes field descriptors.
pub fn write_tsrg<W: Write>(tree: &MappingTree, mut output: W, v2: bool) -> Result<(), Error> {
    let format = if v2 { MappingFormat::TsrgV2 } else { MappingFormat::Tsrg };
    let (source, target) = source_and_target(tree, format)?;
    if v2 {
        writeln!(output, "tsrg2 {} {}", tree.namespace_name(source), tree.namespace_name(target))?;
    }
    for (class, original_class, renamed_class) in named_classes(tree, source, target) {
        writeln!(output, "{} {}", original_class, renamed_class)?;
        for field in class.fields() {
            if let Some((original, renamed)) = name_pair(field.names(), source, target) {
                if v2 {
                    let descriptor = tree.translate_descriptor(field.descriptor(), source);
                    writeln!(output, "\t{} {} {}", original, descriptor, renamed)?;
                } else {
                    writeln!(output, "\t{} {}", original, renamed)?;
                }
            }
        }
        for method in class.methods() {
            if let Some((original, renamed)) = name_pair(method.names(), source, target) {
                let descriptor = tree.translate_descriptor(method.descriptor(), source);
                writeln!(output, "\t{} {} {}", original, descriptor, renamed)?;
            }
        }
    }
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::format::{tiny, MappingFormat};

    const NAMED: &str = "tiny\t2\t0\tnamed\tmojang
c\tnet/minecraft/block/Block\tnet/minecraft/world/level/block/Block
\tf\tI\tluminance\tlightEmission
\tm\t(Lnet/minecraft/world/World;)V\tonPlaced\tonPlace
c\tnet/minecraft/world/World\tnet/minecraft/world/level/Level
c\tnet/minecraft/Unmapped\t
\tm\t()V\tfoo\t
";

    fn write(format: MappingFormat) -> String {
        let tree = tiny::parse_text(NAMED).unwrap();
        let mut output = Vec::new();
        format.write(&tree, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn srg() {
        assert_eq!(write(MappingFormat::Srg), "\
CL: net/minecraft/block/Block net/minecraft/world/level/block/Block
CL: net/minecraft/world/World net/minecraft/world/level/Level
CL: net/minecraft/Unmapped net/minecraft/Unmapped
FD: net/minecraft/block/Block/luminance net/minecraft/world/level/block/Block/lightEmission
MD: net/minecraft/block/Block/onPlaced (Lnet/minecraft/world/World;)V net/minecraft/world/level/block/Block/onPlace (Lnet/minecraft/world/level/Level;)V
MD: net/minecraft/Unmapped/foo ()V net/minecraft/Unmapped/foo ()V
");
    }
    #[test]
    fn xsrg() {
        let written = write(MappingFormat::Xsrg);
        assert!(written.contains("FD: net/minecraft/block/Block/luminance I net/minecraft/world/level/block/Block/lightEmission I\n"));
    }
    #[test]
    fn csrg() {
        assert_eq!(write(MappingFormat::Csrg), "\
net/minecraft/block/Block net/minecraft/world/level/block/Block
net/minecraft/world/World net/minecraft/world/level/Level
net/minecraft/Unmapped net/minecraft/Unmapped
net/minecraft/block/Block luminance lightEmission
net/minecraft/block/Block onPlaced (Lnet/minecraft/world/World;)V onPlace
net/minecraft/Unmapped foo ()V foo
");
    }
    #[test]
    fn tsrg() {
        assert_eq!(write(MappingFormat::Tsrg), "\
net/minecraft/block/Block net/minecraft/world/level/block/Block
\tluminance lightEmission
\tonPlaced (Lnet/minecraft/world/World;)V onPlace
net/minecraft/world/World net/minecraft/world/level/Level
net/minecraft/Unmapped net/minecraft/Unmapped
\tfoo ()V foo
");
        let written = write(MappingFormat::TsrgV2);
        assert!(written.starts_with("tsrg2 named mojang\n"));
        assert!(written.contains("\tluminance I lightEmission\n"));
    }
    #[test]
    fn needs_two_namespaces() {
        let tree = tiny::parse_text("tiny\t2\t0\ta\tb\tc\nc\tx\ty\tz\n").unwrap();
        assert!(MappingFormat::Srg.write(&tree, Vec::new()).is_err());
        assert!(write_csrg(&tree, Vec::new()).is_err());
        assert!(MappingFormat::TinyV2.write(&tree, Vec::new()).is_ok());
    }
}
