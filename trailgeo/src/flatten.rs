//! Aplatissement des géométries linéaires imbriquées (fusion de la rivière)

use geo::{LineString, MultiLineString};

/// Nœud de géométrie linéaire : ligne simple ou multi-ligne (éventuellement imbriquée)
#[derive(Debug, Clone, PartialEq)]
pub enum LineNode {
    Line(LineString<f64>),
    Multi(Vec<LineNode>),
}

impl From<LineString<f64>> for LineNode {
    fn from(line: LineString<f64>) -> Self {
        LineNode::Line(line)
    }
}

impl From<MultiLineString<f64>> for LineNode {
    fn from(multi: MultiLineString<f64>) -> Self {
        LineNode::Multi(multi.0.into_iter().map(LineNode::Line).collect())
    }
}

/// Aplatit les nœuds en lignes simples, en profondeur d'abord, ordre de rencontre conservé.
///
/// Pile explicite : pas de récursion, quelle que soit la profondeur d'imbrication.
pub fn flatten_lines(nodes: Vec<LineNode>) -> Vec<LineString<f64>> {
    let mut lines = Vec::with_capacity(nodes.len());
    let mut stack: Vec<LineNode> = nodes.into_iter().rev().collect();

    while let Some(node) = stack.pop() {
        match node {
            LineNode::Line(line) => lines.push(line),
            LineNode::Multi(children) => stack.extend(children.into_iter().rev()),
        }
    }

    lines
}

/// Aplatit puis regroupe toutes les lignes en un seul MultiLineString
pub fn merge_lines(nodes: Vec<LineNode>) -> MultiLineString<f64> {
    MultiLineString::new(flatten_lines(nodes))
}
