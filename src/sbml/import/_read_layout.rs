//! Used for reading SBML layout specifications.

use crate::sbml::import::{child_tags, read_unique_child, SBML_LAYOUT};
use roxmltree::Node;

/// Read the glyph positions of the first layout of the `model` as `(SBML id, (x, y))` pairs,
/// in document order.
///
/// A missing layout is not an error, it simply yields no positions. Glyphs without a
/// position are skipped.
pub fn read_sbml_layout(model: Node) -> Result<Vec<(String, (f64, f64))>, String> {
    let Ok(layout_list) = read_unique_child(model, (SBML_LAYOUT, "listOfLayouts")) else {
        return Ok(Vec::new());
    };
    // If there are multiple layouts, just pick the first one.
    let Some(layout) = child_tags(layout_list, (SBML_LAYOUT, "layout")).into_iter().next() else {
        return Ok(Vec::new());
    };
    let Ok(glyph_list) = read_unique_child(layout, (SBML_LAYOUT, "listOfAdditionalGraphicalObjects"))
    else {
        return Ok(Vec::new());
    };

    let mut result = Vec::new();
    for glyph in child_tags(glyph_list, (SBML_LAYOUT, "generalGlyph")) {
        let Some(reference) = glyph.attribute((SBML_LAYOUT, "reference")) else {
            continue;
        };
        let position = read_unique_child(glyph, (SBML_LAYOUT, "boundingBox"))
            .and_then(|bounding_box| read_unique_child(bounding_box, (SBML_LAYOUT, "position")));
        if let Ok(position) = position {
            let x = read_coordinate(position, "x")?;
            let y = read_coordinate(position, "y")?;
            result.push((reference.to_string(), (x, y)));
        }
    }
    Ok(result)
}

/// Missing coordinates default to zero.
fn read_coordinate(position: Node, name: &'static str) -> Result<f64, String> {
    match position.attribute((SBML_LAYOUT, name)) {
        None => Ok(0.0),
        Some(value) => value
            .parse::<f64>()
            .map_err(|_| format!("Invalid numeric value: {}.", value)),
    }
}
