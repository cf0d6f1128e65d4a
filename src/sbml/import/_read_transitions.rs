use crate::sbml::import::_read_mathml::{read_mathml, MathMl};
use crate::sbml::import::{child_tags, read_unique_child, MATHML, SBML_QUAL};
use roxmltree::Node;

/// Maps almost directly to the SBML transition input tag.
#[derive(Clone, Debug)]
pub struct SbmlTransitionInput {
    // A missing ID is not entirely valid SBML, but such models exist.
    pub id: Option<String>,
    pub qual_species: String,
    pub sign: Option<String>,
}

/// A function term of a transition. The default term never has math in it.
#[derive(Clone, Debug)]
pub struct SbmlTransitionTerm {
    pub result_level: u32,
    pub math: Option<MathMl>,
}

#[derive(Clone, Debug)]
pub struct SbmlTransition {
    pub id: String,
    pub inputs: Vec<SbmlTransitionInput>,
    pub outputs: Vec<String>,
    // Is none if the whole function is unspecified.
    pub default_term: Option<SbmlTransitionTerm>,
    pub function_terms: Vec<SbmlTransitionTerm>,
}

/// Read all transitions of the `model`, in document order. A model without a list of
/// transitions simply has no transitions.
pub fn read_transitions(model: Node) -> Result<Vec<SbmlTransition>, String> {
    match read_unique_child(model, (SBML_QUAL, "listOfTransitions")) {
        Err(_) => Ok(Vec::new()),
        Ok(list) => child_tags(list, (SBML_QUAL, "transition"))
            .into_iter()
            .map(read_transition)
            .collect(),
    }
}

fn read_transition(transition: Node) -> Result<SbmlTransition, String> {
    let id = transition
        .attribute((SBML_QUAL, "id"))
        .ok_or_else(|| "Transition with a missing id found.".to_string())?;

    // Inputs and terms are optional.
    let inputs = match read_unique_child(transition, (SBML_QUAL, "listOfInputs")) {
        Ok(list) => child_tags(list, (SBML_QUAL, "input"))
            .into_iter()
            .map(|input| read_transition_input(input, id))
            .collect::<Result<Vec<_>, String>>()?,
        Err(_) => Vec::new(),
    };
    let outputs = read_unique_child(transition, (SBML_QUAL, "listOfOutputs"))?;
    let outputs = child_tags(outputs, (SBML_QUAL, "output"))
        .into_iter()
        .map(|output| {
            output
                .attribute((SBML_QUAL, "qualitativeSpecies"))
                .map(|s| s.to_string())
                .ok_or_else(|| format!("Transition output in {} is missing a species.", id))
        })
        .collect::<Result<Vec<_>, String>>()?;

    let (default_term, function_terms) =
        match read_unique_child(transition, (SBML_QUAL, "listOfFunctionTerms")) {
            Err(_) => (None, Vec::new()),
            Ok(terms) => {
                let default_term = read_unique_child(terms, (SBML_QUAL, "defaultTerm"))?;
                let default_term = read_transition_term(default_term, id)?;
                if default_term.math.is_some() {
                    return Err(format!("Default term in transition {} has math.", id));
                }
                let function_terms = child_tags(terms, (SBML_QUAL, "functionTerm"))
                    .into_iter()
                    .map(|term| read_transition_term(term, id))
                    .collect::<Result<Vec<_>, String>>()?;
                (Some(default_term), function_terms)
            }
        };

    Ok(SbmlTransition {
        id: id.to_string(),
        inputs,
        outputs,
        default_term,
        function_terms,
    })
}

fn read_transition_input(input: Node, transition_id: &str) -> Result<SbmlTransitionInput, String> {
    let species = input
        .attribute((SBML_QUAL, "qualitativeSpecies"))
        .ok_or_else(|| format!("Transition {} is missing an input species.", transition_id))?;
    Ok(SbmlTransitionInput {
        id: input.attribute((SBML_QUAL, "id")).map(|s| s.to_string()),
        qual_species: species.to_string(),
        sign: input.attribute((SBML_QUAL, "sign")).map(|s| s.to_string()),
    })
}

fn read_transition_term(term: Node, transition_id: &str) -> Result<SbmlTransitionTerm, String> {
    let result_level = term
        .attribute((SBML_QUAL, "resultLevel"))
        .ok_or_else(|| format!("Term result level not specified in {}.", transition_id))?;
    let result_level = result_level.parse::<u32>().map_err(|_| {
        format!(
            "Term result level is not a number in {}. {} given.",
            transition_id, result_level
        )
    })?;
    let math = match read_unique_child(term, (MATHML, "math")) {
        Ok(math) => Some(read_mathml(math)?),
        Err(_) => None,
    };
    Ok(SbmlTransitionTerm { result_level, math })
}
