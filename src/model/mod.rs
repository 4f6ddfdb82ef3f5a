//! The assembled frame model
//!
//! A [`FrameModel`] is produced once by the [`builder`] and is read-only
//! afterwards: load cases and analyses never change its geometry.

pub mod builder;
mod registry;

pub use builder::{build, ModelBuilder};
pub use registry::Registry;

use crate::elements::{Constraint, Element, ElementId, Material, Node, NodeId, Section};
use crate::error::{EntityKind, FrameError, FrameResult, RowRef};

/// Materials, sections, nodes, constraints and elements of one structure
#[derive(Debug, Clone, Default)]
pub struct FrameModel {
    pub(crate) materials: Registry<String, Material>,
    pub(crate) sections: Registry<String, Section>,
    pub(crate) nodes: Registry<NodeId, Node>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) elements: Registry<ElementId, Element>,
}

impl FrameModel {
    pub fn materials(&self) -> &Registry<String, Material> {
        &self.materials
    }

    pub fn sections(&self) -> &Registry<String, Section> {
        &self.sections
    }

    pub fn nodes(&self) -> &Registry<NodeId, Node> {
        &self.nodes
    }

    /// Constraint rows in table order, duplicates included
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn elements(&self) -> &Registry<ElementId, Element> {
        &self.elements
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Node ids in registration order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Look up a node on behalf of a table row
    pub fn resolve_node(&self, id: NodeId, referrer: RowRef) -> FrameResult<&Node> {
        self.node(id)
            .ok_or_else(|| FrameError::undefined(EntityKind::Node, id, referrer))
    }

    /// Look up a section on behalf of a table row
    pub fn resolve_section(&self, name: &str, referrer: RowRef) -> FrameResult<&Section> {
        self.section(name)
            .ok_or_else(|| FrameError::undefined(EntityKind::Section, name, referrer))
    }

    /// Look up a material on behalf of a table row
    pub fn resolve_material(&self, name: &str, referrer: RowRef) -> FrameResult<&Material> {
        self.material(name)
            .ok_or_else(|| FrameError::undefined(EntityKind::Material, name, referrer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableKind;

    #[test]
    fn test_resolve_names_the_referrer() {
        let mut model = FrameModel::default();
        model.nodes.insert(1, Node::new(1, 0.0, 0.0, 0.0)).unwrap();

        assert!(model.resolve_node(1, RowRef::at(TableKind::Loads, 0)).is_ok());
        let err = model
            .resolve_node(7, RowRef::at(TableKind::Loads, 2))
            .unwrap_err();
        assert_eq!(err.to_string(), "loads row 3 references undefined node '7'");

        let err = model
            .resolve_material("steel", RowRef::at(TableKind::Sections, 0))
            .unwrap_err();
        assert!(matches!(
            err,
            FrameError::ReferentialIntegrity { kind: EntityKind::Material, .. }
        ));
    }
}
