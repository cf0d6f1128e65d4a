use crate::sbml::import::{child_tags, read_unique_child, SBML_QUAL};
use roxmltree::Node;

/// Approximate representation of an SBML specie. Only the ID is required.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SbmlSpecie {
    pub id: String,
    pub name: Option<String>,
    pub max_level: Option<u32>,
}

/// Read all qualitative species of the `model`, in document order.
pub fn read_species(model: Node) -> Result<Vec<SbmlSpecie>, String> {
    let list = read_unique_child(model, (SBML_QUAL, "listOfQualitativeSpecies"))?;
    child_tags(list, (SBML_QUAL, "qualitativeSpecies"))
        .into_iter()
        .map(read_specie)
        .collect()
}

fn read_specie(specie: Node) -> Result<SbmlSpecie, String> {
    let id = specie
        .attribute((SBML_QUAL, "id"))
        .ok_or_else(|| "Qualitative specie with a missing ID.".to_string())?;
    let max_level = match specie.attribute((SBML_QUAL, "maxLevel")) {
        Some(level) => Some(
            level
                .parse::<u32>()
                .map_err(|_| format!("Invalid maxLevel value: {}", level))?,
        ),
        None => None,
    };
    Ok(SbmlSpecie {
        id: id.to_string(),
        name: specie.attribute((SBML_QUAL, "name")).map(|s| s.to_string()),
        max_level,
    })
}
