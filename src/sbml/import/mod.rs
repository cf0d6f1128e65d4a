use crate::sbml::import::_convert_mathml_to_fn_update::sbml_transition_to_update_function;
use crate::sbml::import::_read_layout::read_sbml_layout;
use crate::sbml::import::_read_species::{read_species, SbmlSpecie};
use crate::sbml::import::_read_transitions::{read_transitions, SbmlTransition};
use crate::sbml::Layout;
use crate::{BooleanNetwork, Monotonicity, RegulatoryGraph};
use log::warn;
use regex::Regex;
use roxmltree::Node;
use std::collections::{HashMap, HashSet};

const SBML: &str = "http://www.sbml.org/sbml/level3/version1/core";
const SBML_QUAL: &str = "http://www.sbml.org/sbml/level3/version1/qual/version1";
const SBML_LAYOUT: &str = "http://www.sbml.org/sbml/level3/version1/layout/version1";
const MATHML: &str = "http://www.w3.org/1998/Math/MathML";

mod _convert_mathml_to_fn_update;
mod _read_layout;
mod _read_mathml;
mod _read_species;
mod _read_transitions;

lazy_static! {
    /// Matches characters that cannot appear in a variable name.
    static ref INVALID_NAME_CHAR: Regex = Regex::new(r"[^a-zA-Z0-9_]").unwrap();
}

impl BooleanNetwork {
    /// Try to read a `BooleanNetwork` from an SBML string.
    ///
    /// Variables are created in the order of species, regulations in the order of transitions
    /// and their inputs. Also reads `Layout` information from the file. If there is no layout,
    /// an empty map is returned. Recoverable problems (renamed species, unknown glyphs) are
    /// reported as warnings through the `log` facade.
    pub fn try_from_sbml(model_file: &str) -> Result<(BooleanNetwork, Layout), String> {
        let document =
            roxmltree::Document::parse(model_file).map_err(|e| format!("XML Error: {}", e))?;
        let sbml = document.root_element();
        if sbml.tag_name().name() != "sbml" {
            return Err("Root element is not <sbml>.".into());
        }
        if sbml.tag_name().namespace() != Some(SBML) {
            return Err("The document does not use the SBML Level3 namespace.".into());
        }
        if sbml.attribute((SBML_QUAL, "required")) != Some("true") {
            warn!("This model does not declare SBML-qual as a requirement.");
        }

        let model = read_unique_child(sbml, (SBML, "model"))?;
        let species = read_species(model)?;
        let transitions = read_transitions(model)?;

        for specie in &species {
            if let Some(level) = specie.max_level.filter(|level| *level != 1) {
                return Err(format!(
                    "Specie with ID {} is not Boolean (max level {}).",
                    specie.id, level
                ));
            }
        }

        let (names, specie_to_name) = create_normalized_names(&species)?;
        let mut regulatory_graph = RegulatoryGraph::new(names);
        create_regulations(&mut regulatory_graph, &transitions, &specie_to_name)?;

        let mut network = BooleanNetwork::new(regulatory_graph);
        for transition in &transitions {
            // Transitions without terms leave the update function implicit.
            if transition.default_term.is_none() {
                continue;
            }
            create_explicit_parameters(transition, &mut network)?;
            let out_var = &specie_to_name[&transition.outputs[0]];
            let out_var = network
                .as_graph()
                .find_variable(out_var)
                .ok_or_else(|| format!("Unknown output variable `{}`.", out_var))?;
            let update_function =
                sbml_transition_to_update_function(&network, transition, &specie_to_name)?;
            network.add_update_function(out_var, update_function)?;
        }

        let mut layout = Layout::new();
        for (id, position) in read_sbml_layout(model)? {
            match specie_to_name.get(&id) {
                Some(name) => {
                    layout.insert(name.clone(), position);
                }
                None => warn!("Unknown layout glyph `{}`.", id),
            }
        }

        Ok((network, layout))
    }
}

/// **(internal)** Find the given tag in a parent `Node`. Returns error if the tag does
/// not exist or is present in multiple instances.
fn read_unique_child<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    name: (&'static str, &'static str),
) -> Result<Node<'a, 'input>, String> {
    let mut tags = parent.children().filter(|node| node.has_tag_name(name));
    match (tags.next(), tags.next()) {
        (Some(tag), None) => Ok(tag),
        (Some(_), Some(_)) => Err(format!(
            "Multiple {} found in {}.",
            name.1,
            parent.tag_name().name()
        )),
        (None, _) => Err(format!(
            "Could not find tag {} in {}.",
            name.1,
            parent.tag_name().name()
        )),
    }
}

/// **(internal)** Find all child `Nodes` that have a given name.
fn child_tags<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    name: (&'static str, &'static str),
) -> Vec<Node<'a, 'input>> {
    parent
        .children()
        .filter(|node| node.has_tag_name(name))
        .collect()
}

/// **(internal)** Assigns every specie a valid variable name. Returns the names in species
/// order together with a mapping from SBML IDs to these names.
///
/// Invalid characters are replaced with `_` and a name that is already taken gets
/// a numeric suffix.
fn create_normalized_names(
    species: &[SbmlSpecie],
) -> Result<(Vec<String>, HashMap<String, String>), String> {
    let mut names = Vec::with_capacity(species.len());
    let mut id_to_name = HashMap::new();
    let mut used = HashSet::new();
    for specie in species {
        let name = specie.name.as_ref().unwrap_or(&specie.id);
        let normalized = INVALID_NAME_CHAR.replace_all(name, "_").to_string();
        if normalized.is_empty() {
            return Err(format!("Specie `{}` has an empty name.", specie.id));
        }
        if &normalized != name {
            warn!(
                "Renamed `{}` to `{}`. Original name contains invalid symbols.",
                name, normalized
            );
        }
        let mut unique = normalized.clone();
        let mut suffix = 0;
        while used.contains(&unique) {
            unique = format!("{}_{}", normalized, suffix);
            suffix += 1;
        }
        if unique != normalized {
            warn!("Renamed `{}` to `{}` to avoid duplicates.", normalized, unique);
        }
        if id_to_name.insert(specie.id.clone(), unique.clone()).is_some() {
            return Err(format!("Duplicate specie ID found: `{}`", specie.id));
        }
        used.insert(unique.clone());
        names.push(unique);
    }
    Ok((names, id_to_name))
}

/// **(internal)** Add regulations to a `RegulatoryGraph` based on the collection
/// of `SbmlTransition`s, in the order of transitions and their inputs.
///
/// Monotonicity is inferred from the `sign` property of the input.
fn create_regulations(
    rg: &mut RegulatoryGraph,
    transitions: &[SbmlTransition],
    id_to_var: &HashMap<String, String>,
) -> Result<(), String> {
    for transition in transitions {
        if transition.outputs.len() != 1 {
            return Err(format!(
                "Every transition can have only one output. `{}` has {}.",
                transition.id,
                transition.outputs.len()
            ));
        }
        let out_specie = &transition.outputs[0];
        let out_variable = id_to_var.get(out_specie).ok_or_else(|| {
            format!(
                "Unknown output specie `{}` used in transition `{}`.",
                out_specie, transition.id
            )
        })?;
        let target = rg
            .find_variable(out_variable)
            .ok_or_else(|| format!("Unknown variable `{}`.", out_variable))?;

        for input in &transition.inputs {
            let in_variable = id_to_var.get(&input.qual_species).ok_or_else(|| {
                format!(
                    "Unknown input specie `{}` used in transition `{}`.",
                    input.qual_species, transition.id
                )
            })?;
            let regulator = rg
                .find_variable(in_variable)
                .ok_or_else(|| format!("Unknown variable `{}`.", in_variable))?;
            let monotonicity = input
                .sign
                .as_deref()
                .and_then(Monotonicity::from_sbml_sign);

            // Some models declare the same input more than once.
            if let Some(existing) = rg.find_regulation(regulator, target) {
                if existing.get_monotonicity() != monotonicity {
                    return Err(format!(
                        "Variable `{}` declared as both {:?} and {:?} in `{}`",
                        in_variable,
                        existing.get_monotonicity(),
                        monotonicity,
                        out_variable
                    ));
                }
            } else {
                rg.add_regulation_by_id(regulator, target, monotonicity)?;
            }
        }
    }
    Ok(())
}

/// **(internal)** Create the explicit parameters used in the function terms of the given
/// transition, in the order of their first appearance.
fn create_explicit_parameters(
    transition: &SbmlTransition,
    network: &mut BooleanNetwork,
) -> Result<(), String> {
    for term in &transition.function_terms {
        let Some(math) = term.math.as_ref() else {
            continue;
        };
        math.for_each_symbol(&mut |name, arity| {
            let arity = u32::try_from(arity)
                .map_err(|_| format!("Parameter `{}` has too many arguments.", name))?;
            if let Some(p) = network.find_parameter(name) {
                let current = network.get_parameter(p).get_arity();
                if current != arity {
                    return Err(format!(
                        "Parameter `{}` is used with cardinality {} as well as {}",
                        name, current, arity
                    ));
                }
            } else {
                network.add_parameter(name, arity)?;
            }
            Ok(())
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::sbml::Layout;
    use crate::test_utils::{init_logger, network_from_signs};
    use crate::Monotonicity::{Activation, Inhibition};
    use crate::{BooleanNetwork, FnUpdate, VariableId};
    use pretty_assertions::assert_eq;

    fn example_network() -> BooleanNetwork {
        let mut bn = network_from_signs(
            4,
            &[(2, 0, false), (1, 0, true), (3, 0, true), (0, 1, false), (0, 3, true)],
        );
        let x0 = VariableId(0);
        let x1 = VariableId(1);
        let x2 = VariableId(2);
        let x3 = VariableId(3);
        let p = bn.add_parameter("F0_2", 2).unwrap();
        let fun = FnUpdate::mk_literal(x2, false)
            .or(FnUpdate::mk_literal(x1, true))
            .and(FnUpdate::mk_basic_param(p, &[x3, x2]));
        bn.add_update_function(x0, fun).unwrap();
        bn.add_update_function(x1, FnUpdate::mk_literal(x0, false))
            .unwrap();
        bn
    }

    #[test]
    fn test_sbml_round_trip() {
        init_logger();
        let bn = example_network();
        let mut layout = Layout::new();
        layout.insert("X0".to_string(), (200.0, 0.0));
        layout.insert("X2".to_string(), (-200.0, 0.5));

        let sbml = bn.to_sbml(&layout);
        let (read, read_layout) = BooleanNetwork::try_from_sbml(&sbml).unwrap();
        assert_eq!(layout, read_layout);
        assert_eq!(sbml, read.to_sbml(&read_layout));

        assert_eq!(read.num_vars(), 4);
        assert_eq!(
            read.regulators(VariableId(0)),
            vec![VariableId(2), VariableId(1), VariableId(3)]
        );
        assert_eq!(read.get_update_function(VariableId(0)), bn.get_update_function(VariableId(0)));
        assert_eq!(read.get_update_function(VariableId(1)), bn.get_update_function(VariableId(1)));
        // X3 has a regulator but no explicit function, X2 has no regulators at all.
        assert_eq!(read.get_update_function(VariableId(3)), &None);
        assert_eq!(read.get_update_function(VariableId(2)), &None);
        let p = read.find_parameter("F0_2").unwrap();
        assert_eq!(read[p].get_arity(), 2);
        let graph = read.as_graph();
        let monotonicity = |r: usize, t: usize| {
            graph
                .find_regulation(VariableId(r), VariableId(t))
                .and_then(|it| it.get_monotonicity())
        };
        assert_eq!(monotonicity(2, 0), Some(Inhibition));
        assert_eq!(monotonicity(0, 3), Some(Activation));
    }

    #[test]
    fn test_name_normalization() {
        init_logger();
        let sbml = "<?xml version='1.0' encoding='UTF-8'?><sbml xmlns=\"http://www.sbml.org/sbml/level3/version1/core\" level=\"3\" version=\"1\" xmlns:qual=\"http://www.sbml.org/sbml/level3/version1/qual/version1\" qual:required=\"true\"><model><qual:listOfQualitativeSpecies><qual:qualitativeSpecies qual:id=\"s1\" qual:name=\"CtrA(+)\" qual:maxLevel=\"1\"/><qual:qualitativeSpecies qual:id=\"s2\" qual:name=\"CtrA___\"/><qual:qualitativeSpecies qual:id=\"s3\"/></qual:listOfQualitativeSpecies><qual:listOfTransitions><qual:transition qual:id=\"t1\"><qual:listOfInputs><qual:input qual:id=\"i1\" qual:qualitativeSpecies=\"s1\" qual:sign=\"negative\"/><qual:input qual:qualitativeSpecies=\"s3\"/></qual:listOfInputs><qual:listOfOutputs><qual:output qual:qualitativeSpecies=\"s2\"/></qual:listOfOutputs><qual:listOfFunctionTerms><qual:defaultTerm qual:resultLevel=\"0\"/><qual:functionTerm qual:resultLevel=\"1\"><math xmlns=\"http://www.w3.org/1998/Math/MathML\"><apply><and/><apply><eq/><ci>i1</ci><cn type=\"integer\">0</cn></apply><apply><neq/><ci>s3</ci><cn type=\"integer\">0</cn></apply></apply></math></qual:functionTerm></qual:listOfFunctionTerms></qual:transition></qual:listOfTransitions></model></sbml>";
        let (bn, layout) = BooleanNetwork::try_from_sbml(sbml).unwrap();
        assert!(layout.is_empty());
        let names: Vec<&String> = bn.variables().map(|v| bn.get_variable_name(v)).collect();
        assert_eq!(names, vec!["CtrA___", "CtrA____0", "s3"]);
        let target = VariableId(1);
        let expected = FnUpdate::mk_literal(VariableId(0), false).and(FnUpdate::mk_var(VariableId(2)));
        assert_eq!(bn.get_update_function(target), &Some(expected));
        let unknown = bn
            .as_graph()
            .find_regulation(VariableId(2), target)
            .unwrap();
        assert_eq!(unknown.get_monotonicity(), None);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(BooleanNetwork::try_from_sbml("not xml").is_err());
        assert!(BooleanNetwork::try_from_sbml("<model/>").is_err());
        let multi_valued = "<sbml xmlns=\"http://www.sbml.org/sbml/level3/version1/core\" xmlns:qual=\"http://www.sbml.org/sbml/level3/version1/qual/version1\"><model><qual:listOfQualitativeSpecies><qual:qualitativeSpecies qual:id=\"a\" qual:maxLevel=\"2\"/></qual:listOfQualitativeSpecies></model></sbml>";
        assert!(BooleanNetwork::try_from_sbml(multi_valued).is_err());
    }
}
