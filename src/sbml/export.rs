use crate::sbml::Layout;
use crate::{BooleanNetwork, FnUpdate, Monotonicity, Regulation, VariableId};
use std::io::{Error, Write};

const SBML_QUAL: &str = "http://www.sbml.org/sbml/level3/version1/qual/version1";
const SBML_LAYOUT: &str = "http://www.sbml.org/sbml/level3/version1/layout/version1";

impl BooleanNetwork {
    /// Write this network (together with the given `layout`) as an SBML-qual string.
    pub fn to_sbml(&self, layout: &Layout) -> String {
        let mut buffer: Vec<u8> = Vec::new();
        self.write_as_sbml(&mut buffer, layout)
            .expect("Cannot write model to SBML.");
        String::from_utf8(buffer).expect("Invalid UTF formatting in string.")
    }

    /// Write this network as an SBML-qual document into the given output.
    ///
    /// The document is written as a single line. Variables appear in the order of their ids
    /// and every variable with at least one regulator has a transition (with a function term
    /// only if the update function is explicit). Regulators are written in the order in which
    /// the regulations were added, so that the document fully determines the network.
    pub fn write_as_sbml(&self, out: &mut dyn Write, layout: &Layout) -> Result<(), Error> {
        write!(
            out,
            "<?xml version='1.0' encoding='UTF-8' standalone='no'?>"
        )?;
        write!(out, "<sbml xmlns=\"http://www.sbml.org/sbml/level3/version1/core\" layout:required=\"false\" level=\"3\" qual:required=\"true\" xmlns:layout=\"{}\" version=\"1\" xmlns:qual=\"{}\">", SBML_LAYOUT, SBML_QUAL)?;
        write!(out, "<model>")?;
        if !layout.is_empty() {
            self.write_layout(out, layout)?;
        }
        self.write_species(out)?;
        self.write_transitions(out)?;
        write!(out, "</model>")?;
        write!(out, "</sbml>")?;
        Ok(())
    }

    /// **(internal)** Write the position of every variable which appears in the `layout`.
    fn write_layout(&self, out: &mut dyn Write, layout: &Layout) -> Result<(), Error> {
        write!(out, "<layout:listOfLayouts xmlns:layout=\"{}\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">", SBML_LAYOUT)?;
        write!(out, "<layout:layout layout:id=\"__layout__\">")?;
        write!(out, "<layout:listOfAdditionalGraphicalObjects>")?;
        for var in self.variables() {
            let name = self.get_variable_name(var);
            let Some((x, y)) = layout.get(name) else {
                continue;
            };
            write!(
                out,
                "<layout:generalGlyph layout:id=\"_ly_{}\" layout:reference=\"{}\">",
                name, name
            )?;
            write!(out, "<layout:boundingBox>")?;
            write!(
                out,
                "<layout:position layout:x=\"{}\" layout:y=\"{}\"/>",
                // Imported `-0` coordinates are written as `0`.
                x + 0.0,
                y + 0.0
            )?;
            write!(
                out,
                "<layout:dimensions layout:height=\"25\" layout:width=\"45\"/>"
            )?;
            write!(out, "</layout:boundingBox>")?;
            write!(out, "</layout:generalGlyph>")?;
        }
        write!(out, "</layout:listOfAdditionalGraphicalObjects>")?;
        write!(out, "</layout:layout>")?;
        write!(out, "</layout:listOfLayouts>")?;
        Ok(())
    }

    fn write_species(&self, out: &mut dyn Write) -> Result<(), Error> {
        write!(
            out,
            "<qual:listOfQualitativeSpecies xmlns:qual=\"{}\">",
            SBML_QUAL
        )?;
        for v in &self.graph.variables {
            write!(out, "<qual:qualitativeSpecies qual:maxLevel=\"1\" qual:constant=\"false\" qual:name=\"{}\" qual:id=\"{}\"/>", v.name, v.name)?;
        }
        write!(out, "</qual:listOfQualitativeSpecies>")?;
        Ok(())
    }

    fn write_transitions(&self, out: &mut dyn Write) -> Result<(), Error> {
        write!(out, "<qual:listOfTransitions xmlns:qual=\"{}\">", SBML_QUAL)?;
        let by_target = self.graph.regulations_by_target();
        for id in self.variables() {
            let inputs = &by_target[id.0];
            if !inputs.is_empty() {
                self.write_transition(out, id, inputs)?;
            }
        }
        write!(out, "</qual:listOfTransitions>")?;
        Ok(())
    }

    /// **(internal)** Write one transition of the `target` variable.
    fn write_transition(
        &self,
        out: &mut dyn Write,
        target: VariableId,
        inputs: &[&Regulation],
    ) -> Result<(), Error> {
        let var_name = self.get_variable_name(target);
        write!(out, "<qual:transition qual:id=\"tr_{}\">", var_name)?;

        write!(out, "<qual:listOfInputs>")?;
        for regulation in inputs {
            let r_var_name = self.get_variable_name(regulation.regulator);
            let sign = Monotonicity::sbml_sign(regulation.monotonicity);
            write!(out, "<qual:input qual:qualitativeSpecies=\"{}\" qual:transitionEffect=\"none\" qual:sign=\"{}\" qual:id=\"tr_{}_in_{}\"/>", r_var_name, sign, var_name, r_var_name)?;
        }
        write!(out, "</qual:listOfInputs>")?;

        write!(out, "<qual:listOfOutputs>")?;
        write!(out, "<qual:output qual:qualitativeSpecies=\"{}\" qual:transitionEffect=\"assignmentLevel\" qual:id=\"tr_{}_out\"/>", var_name, var_name)?;
        write!(out, "</qual:listOfOutputs>")?;

        if let Some(update_function) = self.get_update_function(target) {
            write!(out, "<qual:listOfFunctionTerms>")?;
            write!(
                out,
                "<qual:defaultTerm qual:resultLevel=\"0\"></qual:defaultTerm>"
            )?;
            write!(out, "<qual:functionTerm qual:resultLevel=\"1\">")?;
            write!(out, "<math xmlns=\"http://www.w3.org/1998/Math/MathML\">")?;
            self.write_update_function(out, update_function)?;
            write!(out, "</math>")?;
            write!(out, "</qual:functionTerm>")?;
            write!(out, "</qual:listOfFunctionTerms>")?;
        }
        write!(out, "</qual:transition>")?;
        Ok(())
    }

    fn write_update_function(&self, out: &mut dyn Write, function: &FnUpdate) -> Result<(), Error> {
        match function {
            FnUpdate::Const(true) => write!(out, "<true/>")?,
            FnUpdate::Const(false) => write!(out, "<false/>")?,
            FnUpdate::Var(id) => {
                write!(
                    out,
                    "<apply><eq/><ci>{}</ci><cn type=\"integer\">1</cn></apply>",
                    self.get_variable_name(*id)
                )?;
            }
            FnUpdate::Not(inner) => {
                write!(out, "<apply><not/>")?;
                self.write_update_function(out, inner)?;
                write!(out, "</apply>")?;
            }
            FnUpdate::Binary(op, l, r) => {
                write!(out, "<apply><{}/>", op.mathml_tag())?;
                self.write_update_function(out, l)?;
                self.write_update_function(out, r)?;
                write!(out, "</apply>")?;
            }
            FnUpdate::Param(id, args) => {
                write!(out, "<apply><csymbol>{}</csymbol>", self[*id].get_name())?;
                for arg in args {
                    write!(out, "<ci>{}</ci>", self.get_variable_name(*arg))?;
                }
                write!(out, "</apply>")?;
            }
        }
        Ok(())
    }
}
