use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use failure::Error;
use failure_derive::Fail;
use log::debug;

use mappings::{MappingTree, MappingTreeBuilder, Names};

use super::join::{self, JoinNamespaces};
use super::target::{TargetMapping, TargetFilter, MappingSystem};
use super::triple::MappingsTriple;

/// Computes any target by joining the sources along the chain
/// `yarn - intermediary - obf - mojmap`.
pub struct MappingsTargetComputer<'a> {
    triple: &'a MappingsTriple,
    computed_targets: RefCell<IndexMap<TargetMapping, Rc<MappingTree>>>,
}
impl<'a> MappingsTargetComputer<'a> {
    pub fn new(triple: &'a MappingsTriple) -> Self {
        MappingsTargetComputer { triple, computed_targets: Default::default() }
    }
    pub fn compute_target(&self, target: TargetMapping) -> Result<Rc<MappingTree>, Error> {
        {
            let computed_targets = self.computed_targets.borrow();
            if let Some(mappings) = computed_targets.get(&target) {
                return Ok(mappings.clone())
            }
        }
        let mappings = self.fallback_compute_target(target)
            .map_err(|cause| TargetComputeError { target, cause })?;
        let mappings = Rc::new(mappings);
        self.computed_targets.borrow_mut().insert(target, mappings.clone());
        Ok(mappings)
    }
    /// The source linking two neighbouring systems
    fn edge(&self, first: MappingSystem, second: MappingSystem) -> &'a MappingTree {
        let triple = self.triple;
        match (first.position().min(second.position()), first.position().max(second.position())) {
            (0, 1) => &triple.yarn,
            (1, 2) => &triple.intermediary,
            (2, 3) => &triple.mojmap,
            _ => unreachable!("{} and {} aren't neighbours", first, second)
        }
    }
    fn fallback_compute_target(&self, target: TargetMapping) -> Result<MappingTree, Error> {
        if !target.flags.is_default() {
            let unfiltered = self.compute_target(target.with_default_flags())?;
            return Ok(apply_filter(&unfiltered, target.flags.filter())?)
        }
        let (original, renamed) = (target.original, target.renamed);
        let previous = renamed.step_towards(original)
            .ok_or_else(|| RedundantTarget(target))?;
        let edge = self.edge(previous, renamed);
        let mappings = if previous == original {
            join::project(edge, original.namespace(), renamed.namespace())?
        } else {
            let partial = self.compute_target(original.create_target(previous))?;
            join::join(&partial, edge, JoinNamespaces {
                pivot: previous.namespace(),
                source: original.namespace(),
                target: renamed.namespace(),
            })?
        };
        debug!(
            "Computed {} from {} sources, with {} classes",
            target, target.distance(), mappings.classes().len()
        );
        Ok(mappings)
    }
}

/// Rebuild the mappings with only the names the filter asks for
fn apply_filter(mappings: &MappingTree, filter: Option<TargetFilter>) -> Result<MappingTree, Error> {
    let namespaces: Vec<&str> = mappings.namespace_names().collect();
    let descriptor_namespace = mappings.namespace_name(mappings.descriptor_namespace());
    let mut builder = MappingTreeBuilder::new(namespaces, descriptor_namespace)?;
    let source = mappings.descriptor_namespace();
    for class in mappings.classes() {
        match filter {
            None | Some(TargetFilter::Classes) => {
                builder.add_class(class.names().clone());
            },
            Some(TargetFilter::Members) => {
                // Classes keep their original names
                let names: Names = mappings.namespaces()
                    .map(|namespace| if namespace == source { class.name(source) } else { None })
                    .collect();
                let output = builder.add_class(names);
                for field in class.fields() {
                    output.add_field(field.names().clone(), field.descriptor());
                }
                for method in class.methods() {
                    output.add_method(method.names().clone(), method.descriptor());
                }
            }
        }
    }
    Ok(builder.build()?)
}

#[derive(Debug, Fail)]
#[fail(display = "Unable to compute {}: {}", target, cause)]
pub struct TargetComputeError {
    target: TargetMapping,
    cause: Error
}

#[derive(Debug, Fail)]
#[fail(display = "Redundant target {}", _0)]
pub struct RedundantTarget(TargetMapping);

#[cfg(test)]
mod test {
    use super::*;
    use mappings::format::{proguard, tiny, MappingFormat};
    use mappings::namespaces::{INTERMEDIARY, MOJANG, NAMED, OFFICIAL};

    use crate::target::TargetFlags;

    fn triple() -> MappingsTriple {
        MappingsTriple {
            mojmap: proguard::parse_text("\
net.minecraft.world.level.block.Block -> cfz:
    int lightEmission -> a
    void onPlace(net.minecraft.world.level.Level) -> a
net.minecraft.world.level.Level -> cmm:
net.minecraft.server.Main -> zz:
").unwrap(),
            intermediary: tiny::parse_text("tiny\t2\t0\tofficial\tintermediary
c\tcfz\tnet/minecraft/class_2248
\tf\tI\ta\tfield_10634
\tm\t(Lcmm;)V\ta\tmethod_9615
c\tcmm\tnet/minecraft/class_1937
c\tzz\tnet/minecraft/server/Main
").unwrap(),
            yarn: tiny::parse_text("tiny\t2\t0\tintermediary\tnamed
c\tnet/minecraft/class_2248\tnet/minecraft/block/Block
\tf\tI\tfield_10634\tluminance
\tm\t(Lnet/minecraft/class_1937;)V\tmethod_9615\tonPlaced
c\tnet/minecraft/class_1937\tnet/minecraft/world/World
").unwrap(),
        }
    }

    #[test]
    fn yarn_to_mojmap() {
        let triple = triple();
        let computer = MappingsTargetComputer::new(&triple);
        let mappings = computer.compute_target(TargetMapping::YARN2MOJMAP).unwrap();
        let named = mappings.namespace(NAMED).unwrap();
        let mojang = mappings.namespace(MOJANG).unwrap();
        assert_eq!(mappings.namespace_names().collect::<Vec<_>>(), vec![NAMED, MOJANG]);
        // net/minecraft/server/Main isn't in yarn
        assert_eq!(mappings.classes().len(), 2);
        let block = mappings.class(named, "net/minecraft/block/Block").unwrap();
        assert_eq!(block.name(mojang), Some("net/minecraft/world/level/block/Block"));
        assert_eq!(block.field(named, "luminance").unwrap().name(mojang), Some("lightEmission"));
        let method = block.method(named, "onPlaced", "(Lnet/minecraft/world/World;)V").unwrap();
        assert_eq!(method.name(mojang), Some("onPlace"));
        assert_eq!(
            mappings.translate_descriptor(method.descriptor(), mojang),
            "(Lnet/minecraft/world/level/Level;)V"
        );

        let mut output = Vec::new();
        MappingFormat::TinyV2.write(&mappings, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "tiny\t2\t0\tnamed\tmojang
c\tnet/minecraft/block/Block\tnet/minecraft/world/level/block/Block
\tf\tI\tluminance\tlightEmission
\tm\t(Lnet/minecraft/world/World;)V\tonPlaced\tonPlace
c\tnet/minecraft/world/World\tnet/minecraft/world/level/Level
");
    }
    #[test]
    fn other_directions() {
        let triple = triple();
        let computer = MappingsTargetComputer::new(&triple);
        let mojmap2yarn = computer.compute_target("mojmap2yarn".parse().unwrap()).unwrap();
        let mojang = mojmap2yarn.namespace(MOJANG).unwrap();
        let named = mojmap2yarn.namespace(NAMED).unwrap();
        assert_eq!(mojmap2yarn.map_class("net/minecraft/world/level/Level", mojang, named), Some("net/minecraft/world/World"));

        let obf2intermediary = computer.compute_target("obf2intermediary".parse().unwrap()).unwrap();
        let official = obf2intermediary.namespace(OFFICIAL).unwrap();
        let intermediary = obf2intermediary.namespace(INTERMEDIARY).unwrap();
        assert_eq!(obf2intermediary.classes().len(), 3);
        assert_eq!(obf2intermediary.map_class("zz", official, intermediary), Some("net/minecraft/server/Main"));
        // Sub-targets are remembered
        assert!(computer.computed_targets.borrow().contains_key(&"mojmap2obf".parse::<TargetMapping>().unwrap()));
    }
    #[test]
    fn filters() {
        let triple = triple();
        let computer = MappingsTargetComputer::new(&triple);
        let classes = computer.compute_target("yarn2mojmap-classes".parse().unwrap()).unwrap();
        assert_eq!(classes.classes().len(), 2);
        assert!(classes.classes().iter().all(|class| class.fields().is_empty() && class.methods().is_empty()));

        let members = computer.compute_target(TargetMapping {
            flags: TargetFlags::new(Some(TargetFilter::Members)),
            ..TargetMapping::YARN2MOJMAP
        }).unwrap();
        let named = members.namespace(NAMED).unwrap();
        let mojang = members.namespace(MOJANG).unwrap();
        let block = members.class(named, "net/minecraft/block/Block").unwrap();
        assert_eq!(block.name(mojang), None);
        assert_eq!(block.field(named, "luminance").unwrap().name(mojang), Some("lightEmission"));
    }
}
