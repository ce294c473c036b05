//! Model input table reader
//!
//! The input is comma separated text in three sections, each opened by one or
//! more header lines:
//!
//! ```text
//! Material,Young,Poisson,Thickness
//! 1,210000,0.3,1
//! Node,X,Y,ConstraintX,ConstraintY,DisplacementX,DisplacementY,ForceX,ForceY
//! 1,0,0,True,True,0,0,0,0
//! ...
//! Element,Node1,Node2,Node3,Node4,Material
//! 1,1,2,5,4,1
//! ```
//!
//! A line whose first field is non-empty and not a number is a header. Element
//! rows carry 4 (Quad4) or 8 (Quad8) node numbers, both may appear in one file.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::elements::{Material, Node};
use crate::error::{FEMError, FEMResult};
use crate::model::{ElementDef, Mesh};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Materials,
    Nodes,
    Elements,
}

impl Section {
    fn next(self) -> Option<Self> {
        match self {
            Self::Materials => Some(Self::Nodes),
            Self::Nodes => Some(Self::Elements),
            Self::Elements => None,
        }
    }
}

/// One data row split into trimmed fields, trailing empty fields dropped
struct Row<'a> {
    line: usize,
    fields: Vec<&'a str>,
}

impl<'a> Row<'a> {
    fn split(line: usize, text: &'a str) -> Self {
        let mut fields: Vec<&str> = text.split(',').map(str::trim).collect();
        while fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        Self { line, fields }
    }

    fn is_blank(&self) -> bool {
        self.fields.is_empty()
    }

    fn is_header(&self) -> bool {
        self.fields
            .first()
            .is_some_and(|f| !f.is_empty() && f.parse::<f64>().is_err())
    }

    fn fail(&self, message: impl Into<String>) -> FEMError {
        FEMError::ParseFailure {
            line: self.line,
            message: message.into(),
        }
    }

    fn expect_len(&self, what: &str, allowed: &[usize]) -> FEMResult<()> {
        if allowed.contains(&self.fields.len()) {
            return Ok(());
        }
        let allowed: Vec<String> = allowed.iter().map(usize::to_string).collect();
        Err(self.fail(format!(
            "{} row has {} fields, expected {}",
            what,
            self.fields.len(),
            allowed.join(" or ")
        )))
    }

    fn parse<T: FromStr>(&self, index: usize, name: &str) -> FEMResult<T> {
        let field = self.fields[index];
        field
            .parse()
            .map_err(|_| self.fail(format!("invalid {name} '{field}'")))
    }

    fn flag(&self, index: usize, name: &str) -> FEMResult<bool> {
        let field = self.fields[index];
        match field.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(self.fail(format!("invalid {name} '{field}', expected True or False"))),
        }
    }
}

/// Parse a model from the text of an input table
pub fn parse_mesh(input: &str) -> FEMResult<Mesh> {
    let mut mesh = Mesh::new();
    let mut section = Section::Materials;
    let mut section_has_data = false;

    for (index, text) in input.lines().enumerate() {
        let row = Row::split(index + 1, text);
        if row.is_blank() {
            continue;
        }

        if row.is_header() {
            if section_has_data {
                section = section
                    .next()
                    .ok_or_else(|| row.fail("unexpected header after the element section"))?;
                section_has_data = false;
            }
            continue;
        }

        section_has_data = true;
        match section {
            Section::Materials => parse_material(&mut mesh, &row)?,
            Section::Nodes => parse_node(&mut mesh, &row)?,
            Section::Elements => parse_element(&mut mesh, &row)?,
        }
    }

    debug!(
        "Parsed {} materials, {} nodes, {} elements",
        mesh.materials().len(),
        mesh.node_count(),
        mesh.element_count()
    );
    Ok(mesh)
}

/// Read and parse an input table file
pub fn read_mesh(path: impl AsRef<Path>) -> FEMResult<Mesh> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_mesh(&text)
}

fn parse_material(mesh: &mut Mesh, row: &Row) -> FEMResult<()> {
    row.expect_len("material", &[4])?;
    let number: usize = row.parse(0, "material number")?;
    let material = Material::new(
        row.parse(1, "Young's modulus")?,
        row.parse(2, "Poisson's ratio")?,
        row.parse(3, "thickness")?,
    );

    let expected = mesh.materials().len() + 1;
    if number != expected {
        return Err(row.fail(format!(
            "material {number} out of sequence, expected material {expected}"
        )));
    }
    mesh.add_material(material);
    Ok(())
}

fn parse_node(mesh: &mut Mesh, row: &Row) -> FEMResult<()> {
    row.expect_len("node", &[9])?;
    let node = Node::new(row.parse(0, "node number")?, row.parse(1, "x")?, row.parse(2, "y")?)
        .with_constraint(row.flag(3, "x constraint")?, row.flag(4, "y constraint")?)
        .with_displacement(row.parse(5, "x displacement")?, row.parse(6, "y displacement")?)
        .with_force(row.parse(7, "x force")?, row.parse(8, "y force")?);

    mesh.add_node(node).map_err(|e| row.fail(e.to_string()))
}

fn parse_element(mesh: &mut Mesh, row: &Row) -> FEMResult<()> {
    row.expect_len("element", &[6, 10])?;
    let last = row.fields.len() - 1;

    let number = row.parse(0, "element number")?;
    let nodes = (1..last)
        .map(|i| row.parse(i, "node number"))
        .collect::<FEMResult<Vec<usize>>>()?;
    let material = row.parse(last, "material number")?;

    let def = ElementDef::new(number, nodes, material).map_err(|e| row.fail(e.to_string()))?;
    mesh.add_element(def).map_err(|e| row.fail(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;
    use approx::assert_relative_eq;

    const STRIP: &str = "\
Material,Young,Poisson,Thickness
1,1000,0.3,1

Node,X,Y,ConstraintX,ConstraintY,DisplacementX,DisplacementY,ForceX,ForceY
1,0,0,True,True,0,0,0,0
2,1,0,False,False,0,0,0,0
3,2,0,false,false,0,0,0,0
4,0,1,TRUE,1,0,0,0,0
5,1,1,0,0,0,0,0,0
6,2,1,False,False,0,0,1,0
,,,,,,,,
Element,Node1,Node2,Node3,Node4,Material
1,1,2,5,4,1,,,,
2,2,3,6,5,1
";

    #[test]
    fn test_parse_strip() {
        let mesh = parse_mesh(STRIP).unwrap();
        assert_eq!(mesh.materials().len(), 1);
        assert_eq!(mesh.node_count(), 6);
        assert_eq!(mesh.element_count(), 2);

        assert_relative_eq!(mesh.materials()[0].poisson, 0.3);
        let n4 = mesh.node(4).unwrap();
        assert_eq!(n4.constraint, [true, true]);
        assert_relative_eq!(mesh.node(6).unwrap().force[0], 1.0);
        assert_eq!(mesh.elements()[0].nodes, vec![1, 2, 5, 4]);
        assert_eq!(mesh.elements()[1].kind, ElementKind::Quad4);
    }

    #[test]
    fn test_quad8_row() {
        let mut input = String::from("Material\n1,1,0,1\nNode\n");
        for i in 1..=8 {
            input.push_str(&format!("{i},{i},0,False,False,0,0,0,0\n"));
        }
        input.push_str("Element\n1,1,2,3,4,5,6,7,8,1\n");
        let mesh = parse_mesh(&input).unwrap();
        assert_eq!(mesh.elements()[0].kind, ElementKind::Quad8);
    }

    #[test]
    fn test_bad_boolean_reports_line() {
        let input = "Material\n1,1,0,1\nNode\n1,0,0,yes,False,0,0,0,0\n";
        match parse_mesh(input) {
            Err(FEMError::ParseFailure { line, message }) => {
                assert_eq!(line, 4);
                assert!(message.contains("yes"));
            }
            other => panic!("expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_element_width() {
        let input = "Material\n1,1,0,1\nNode\n1,0,0,0,0,0,0,0,0\nElement\n1,1,1,1,1\n";
        assert!(matches!(parse_mesh(input), Err(FEMError::ParseFailure { line: 6, .. })));
    }

    #[test]
    fn test_missing_node_reference() {
        let input = "Material\n1,1,0,1\nNode\n1,0,0,0,0,0,0,0,0\nElement\n1,1,2,3,4,1\n";
        match parse_mesh(input) {
            Err(FEMError::ParseFailure { line, message }) => {
                assert_eq!(line, 6);
                assert!(message.contains("missing node 2"));
            }
            other => panic!("expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_header_rejected() {
        let input = "Material\n1,1,0,1\nNode\n1,0,0,0,0,0,0,0,0\nElement\n1,1,1,1,1,1\nMore\n";
        assert!(matches!(parse_mesh(input), Err(FEMError::ParseFailure { line: 7, .. })));
    }
}
