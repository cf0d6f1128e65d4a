use crate::sbml::import::MATHML;
use roxmltree::Node;

/// A raw MathML expression tree, before identifiers are resolved against the network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MathMl {
    Boolean(bool),
    Integer(i64),
    Identifier(String),
    /// A built-in operator (`and`, `eq`, ...) applied to arguments.
    Apply(String, Vec<MathMl>),
    /// An uninterpreted function (`<csymbol>`) applied to arguments.
    SymbolApply(String, Vec<MathMl>),
}

/// Read the single expression stored in a `<math>` tag.
pub fn read_mathml(math: Node) -> Result<MathMl, String> {
    let mut children = math.children().filter(|c| c.is_element());
    let Some(expression) = children.next() else {
        return Err("Tag <math> has no children.".to_string());
    };
    if children.next().is_some() {
        return Err("More than one child in a <math> tag.".to_string());
    }
    read_expression(expression)
}

fn read_expression(math: Node) -> Result<MathMl, String> {
    if math.tag_name().namespace() != Some(MATHML) {
        return Err(format!(
            "Tag `{}` is not in the MathML namespace.",
            math.tag_name().name()
        ));
    }
    match math.tag_name().name() {
        "true" => Ok(MathMl::Boolean(true)),
        "false" => Ok(MathMl::Boolean(false)),
        "ci" => {
            let id = trimmed_text(math);
            if id.is_empty() {
                Err("Empty math identifier.".to_string())
            } else {
                Ok(MathMl::Identifier(id))
            }
        }
        "cn" => {
            // The `type` attribute is unprefixed, hence it has no namespace.
            if let Some(num_type) = math.attribute("type") {
                if num_type != "integer" {
                    return Err(format!(
                        "Non-integer numeric types ({}) are not supported.",
                        num_type
                    ));
                }
            }
            let value = trimmed_text(math);
            value
                .parse::<i64>()
                .map(MathMl::Integer)
                .map_err(|_| format!("Invalid integer constant: `{}`.", value))
        }
        "apply" => {
            let Some(op_tag) = math.first_element_child() else {
                return Err("MathML <apply> with no child elements.".to_string());
            };
            let mut args = Vec::new();
            let mut arg = op_tag.next_sibling_element();
            while let Some(inner) = arg {
                args.push(read_expression(inner)?);
                arg = inner.next_sibling_element();
            }
            if op_tag.tag_name().name() == "csymbol" {
                let symbol = trimmed_text(op_tag);
                if symbol.is_empty() {
                    Err("Empty <csymbol> in MathML.".to_string())
                } else {
                    Ok(MathMl::SymbolApply(symbol, args))
                }
            } else {
                Ok(MathMl::Apply(op_tag.tag_name().name().to_string(), args))
            }
        }
        other => Err(format!("Unexpected MathML tag `{}`.", other)),
    }
}

fn trimmed_text(node: Node) -> String {
    node.text().map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Some utility methods for working with MathML trees.
impl MathMl {
    /// Visit every uninterpreted function application (in document order) together with
    /// the number of its arguments.
    pub fn for_each_symbol<F>(&self, action: &mut F) -> Result<(), String>
    where
        F: FnMut(&str, usize) -> Result<(), String>,
    {
        match self {
            MathMl::Boolean(_) | MathMl::Integer(_) | MathMl::Identifier(_) => Ok(()),
            MathMl::Apply(_, args) => {
                for arg in args {
                    arg.for_each_symbol(action)?;
                }
                Ok(())
            }
            MathMl::SymbolApply(name, args) => {
                action(name, args.len())?;
                for arg in args {
                    arg.for_each_symbol(action)?;
                }
                Ok(())
            }
        }
    }
}
