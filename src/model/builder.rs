//! Staged construction of a [`FrameModel`]
//!
//! Tables are consumed in dependency order: materials, sections, nodes,
//! constraints, elements. Each stage checks its references against the
//! earlier ones and mirrors its registrations to the solver. The stage is part
//! of the builder's type, so a stage cannot be skipped or repeated.

use std::marker::PhantomData;

use super::FrameModel;
use crate::elements::{Constraint, Element, Material, Node, Section, TransformTag};
use crate::error::{EntityKind, FrameError, FrameResult, RowRef, TableKind};
use crate::solver::{ElementDefinition, Solver};
use crate::tables::{ConstraintRow, ElementRow, MaterialRow, ModelTables, NodeRow, SectionRow};

/// Builder stage: nothing registered yet
#[derive(Debug)]
pub struct Empty;
/// Builder stage: materials registered
#[derive(Debug)]
pub struct MaterialsLoaded;
/// Builder stage: sections registered
#[derive(Debug)]
pub struct SectionsLoaded;
/// Builder stage: nodes registered
#[derive(Debug)]
pub struct NodesLoaded;
/// Builder stage: constraints registered
#[derive(Debug)]
pub struct ConstraintsLoaded;

fn duplicate(kind: EntityKind, id: impl ToString, referrer: RowRef) -> FrameError {
    FrameError::DuplicateIdentifier {
        kind,
        id: id.to_string(),
        referrer,
    }
}

/// Builds a [`FrameModel`] while mirroring it into a solver
pub struct ModelBuilder<'s, S: Solver + ?Sized, Stage> {
    solver: &'s mut S,
    model: FrameModel,
    next_transform: TransformTag,
    _stage: PhantomData<Stage>,
}

impl<'s, S: Solver + ?Sized, Stage> ModelBuilder<'s, S, Stage> {
    fn advance<Next>(self) -> ModelBuilder<'s, S, Next> {
        ModelBuilder {
            solver: self.solver,
            model: self.model,
            next_transform: self.next_transform,
            _stage: PhantomData,
        }
    }

    /// The model as registered so far
    pub fn model(&self) -> &FrameModel {
        &self.model
    }
}

impl<'s, S: Solver + ?Sized> ModelBuilder<'s, S, Empty> {
    /// Start a new 3D model with 6 dofs per node, discarding whatever the solver held
    pub fn new(solver: &'s mut S) -> FrameResult<Self> {
        solver.reset_model(3, 6)?;
        Ok(Self {
            solver,
            model: FrameModel::default(),
            next_transform: 1,
            _stage: PhantomData,
        })
    }

    pub fn materials(
        mut self,
        rows: &[MaterialRow],
    ) -> FrameResult<ModelBuilder<'s, S, MaterialsLoaded>> {
        for (index, row) in rows.iter().enumerate() {
            let material = Material::new(&row.name, row.e, row.g, row.density);
            self.model
                .materials
                .insert(row.name.clone(), material)
                .map_err(|_| {
                    duplicate(
                        EntityKind::Material,
                        &row.name,
                        RowRef::at(TableKind::Materials, index),
                    )
                })?;
        }
        log::debug!("Registered {} materials", self.model.materials.len());
        Ok(self.advance())
    }
}

impl<'s, S: Solver + ?Sized> ModelBuilder<'s, S, MaterialsLoaded> {
    pub fn sections(
        mut self,
        rows: &[SectionRow],
    ) -> FrameResult<ModelBuilder<'s, S, SectionsLoaded>> {
        for (index, row) in rows.iter().enumerate() {
            let referrer = RowRef::at(TableKind::Sections, index);
            let material = self.model.resolve_material(&row.material, referrer)?;
            let section = Section::resolve(&row.name, row.area, row.iz, row.iy, row.j, material);
            self.model
                .sections
                .insert(row.name.clone(), section)
                .map_err(|_| duplicate(EntityKind::Section, &row.name, referrer))?;
        }
        log::debug!("Registered {} sections", self.model.sections.len());
        Ok(self.advance())
    }
}

impl<'s, S: Solver + ?Sized> ModelBuilder<'s, S, SectionsLoaded> {
    pub fn nodes(mut self, rows: &[NodeRow]) -> FrameResult<ModelBuilder<'s, S, NodesLoaded>> {
        for (index, row) in rows.iter().enumerate() {
            let referrer = RowRef::at(TableKind::Nodes, index);
            if self.model.nodes.contains(&row.node) {
                return Err(duplicate(EntityKind::Node, row.node, referrer));
            }
            let node = Node::new(row.node, row.x, row.y, row.z);
            self.solver.define_node(node.id, node.coords())?;
            self.model
                .nodes
                .insert(node.id, node)
                .map_err(|_| duplicate(EntityKind::Node, row.node, referrer))?;
        }
        log::debug!("Registered {} nodes", self.model.nodes.len());
        Ok(self.advance())
    }
}

impl<'s, S: Solver + ?Sized> ModelBuilder<'s, S, NodesLoaded> {
    /// Repeated rows for one node are all forwarded; the solver keeps the last
    pub fn constraints(
        mut self,
        rows: &[ConstraintRow],
    ) -> FrameResult<ModelBuilder<'s, S, ConstraintsLoaded>> {
        for (index, row) in rows.iter().enumerate() {
            self.model
                .resolve_node(row.node, RowRef::at(TableKind::Constraints, index))?;
            let constraint = Constraint::new(row.node, row.fixity());
            self.solver
                .define_constraint(constraint.node, constraint.fixity)?;
            self.model.constraints.push(constraint);
        }
        log::debug!(
            "Registered {} constraints restraining {} dofs",
            self.model.constraints.len(),
            self.model
                .constraints
                .iter()
                .map(Constraint::num_restrained)
                .sum::<usize>()
        );
        Ok(self.advance())
    }
}

impl<'s, S: Solver + ?Sized> ModelBuilder<'s, S, ConstraintsLoaded> {
    /// Register the elements and finish the model
    ///
    /// Every element gets a fresh transform tag, defined in the solver right
    /// before the element that uses it.
    pub fn elements(mut self, rows: &[ElementRow]) -> FrameResult<FrameModel> {
        for (index, row) in rows.iter().enumerate() {
            let referrer = RowRef::at(TableKind::Elements, index);
            if self.model.elements.contains(&row.element) {
                return Err(duplicate(EntityKind::Element, row.element, referrer));
            }
            self.model.resolve_node(row.node1, referrer)?;
            self.model.resolve_node(row.node2, referrer)?;
            let section = self.model.resolve_section(&row.section, referrer)?;

            let transform = self.next_transform;
            let element = Element::new(
                row.element,
                row.node1,
                row.node2,
                &row.section,
                row.local_xz(),
                transform,
            );
            let definition = ElementDefinition::new(&element, section);

            self.solver.define_local_axis(transform, element.local_xz)?;
            self.solver.define_element(&definition)?;
            self.next_transform += 1;

            self.model
                .elements
                .insert(element.id, element)
                .map_err(|_| duplicate(EntityKind::Element, row.element, referrer))?;
        }
        log::debug!("Registered {} elements", self.model.elements.len());

        let model = self.model;
        log::info!(
            "Built frame model: {} materials, {} sections, {} nodes, {} constraints, {} elements",
            model.materials.len(),
            model.sections.len(),
            model.nodes.len(),
            model.constraints.len(),
            model.elements.len()
        );
        Ok(model)
    }
}

/// Build a model from its five tables in dependency order
pub fn build<S: Solver + ?Sized>(solver: &mut S, tables: &ModelTables) -> FrameResult<FrameModel> {
    ModelBuilder::new(solver)?
        .materials(&tables.materials)?
        .sections(&tables.sections)?
        .nodes(&tables.nodes)?
        .constraints(&tables.constraints)?
        .elements(&tables.elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::LinearFrameSolver;

    fn tables() -> ModelTables {
        ModelTables {
            materials: vec![MaterialRow {
                name: "steel".to_string(),
                e: 2e11,
                g: 8e10,
                density: 7850.0,
            }],
            sections: vec![SectionRow {
                name: "box".to_string(),
                area: 0.01,
                iz: 1e-6,
                iy: 1e-6,
                j: 1e-6,
                material: "steel".to_string(),
            }],
            nodes: vec![
                NodeRow { node: 1, x: 0.0, y: 0.0, z: 0.0 },
                NodeRow { node: 2, x: 1.0, y: 0.0, z: 0.0 },
                NodeRow { node: 3, x: 1.0, y: 1.0, z: 0.0 },
            ],
            constraints: vec![ConstraintRow {
                node: 1,
                x: true,
                y: true,
                z: true,
                rot_x: true,
                rot_y: true,
                rot_z: true,
            }],
            elements: vec![
                ElementRow {
                    element: 10,
                    node1: 1,
                    node2: 2,
                    section: "box".to_string(),
                    localxz_x: 0.0,
                    localxz_y: 0.0,
                    localxz_z: 1.0,
                },
                ElementRow {
                    element: 20,
                    node1: 2,
                    node2: 3,
                    section: "box".to_string(),
                    localxz_x: 0.0,
                    localxz_y: 0.0,
                    localxz_z: 1.0,
                },
            ],
        }
    }

    #[test]
    fn test_build_registers_everything_in_order() {
        let mut solver = LinearFrameSolver::new();
        let model = build(&mut solver, &tables()).unwrap();

        assert_eq!(model.node_ids().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(model.elements().len(), 2);
        assert_eq!(model.section("box").unwrap().e, 2e11);
        assert_eq!(solver.node_count(), 3);
        assert_eq!(solver.element_count(), 2);
    }

    #[test]
    fn test_transform_tags_are_sequential() {
        let mut solver = LinearFrameSolver::new();
        let model = build(&mut solver, &tables()).unwrap();

        let tags: Vec<TransformTag> = model.elements().values().map(|e| e.transform).collect();
        assert_eq!(tags, vec![1, 2]);
    }

    #[test]
    fn test_section_with_unknown_material() {
        let mut tables = tables();
        tables.sections[0].material = "aluminium".to_string();

        let mut solver = LinearFrameSolver::new();
        let err = build(&mut solver, &tables).unwrap_err();
        assert_eq!(
            err.to_string(),
            "sections row 1 references undefined material 'aluminium'"
        );
    }

    #[test]
    fn test_constraint_on_unknown_node() {
        let mut tables = tables();
        tables.constraints[0].node = 42;

        let mut solver = LinearFrameSolver::new();
        let err = build(&mut solver, &tables).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ReferentialIntegrity {
                kind: EntityKind::Node,
                referrer: RowRef { table: TableKind::Constraints, row: 1 },
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut tables = tables();
        tables.nodes[2].node = 1;

        let mut solver = LinearFrameSolver::new();
        let err = build(&mut solver, &tables).unwrap_err();
        assert_eq!(err.to_string(), "duplicate node '1' at nodes row 3");
    }

    #[test]
    fn test_duplicate_element_rejected() {
        let mut tables = tables();
        tables.elements[1].element = 10;

        let mut solver = LinearFrameSolver::new();
        assert!(matches!(
            build(&mut solver, &tables),
            Err(FrameError::DuplicateIdentifier { kind: EntityKind::Element, .. })
        ));
    }

    #[test]
    fn test_solver_rejection_propagates() {
        let mut tables = tables();
        // x-z vector along the element axis
        tables.elements[0].localxz_x = 1.0;
        tables.elements[0].localxz_z = 0.0;

        let mut solver = LinearFrameSolver::new();
        assert!(matches!(
            build(&mut solver, &tables),
            Err(FrameError::InvalidDefinition(_))
        ));
    }

    #[test]
    fn test_staged_builder() {
        let tables = tables();
        let mut solver = LinearFrameSolver::new();
        let builder = ModelBuilder::new(&mut solver)
            .unwrap()
            .materials(&tables.materials)
            .unwrap();
        assert_eq!(builder.model().materials().len(), 1);

        let model = builder
            .sections(&tables.sections)
            .and_then(|b| b.nodes(&tables.nodes))
            .and_then(|b| b.constraints(&tables.constraints))
            .and_then(|b| b.elements(&tables.elements))
            .unwrap();
        assert_eq!(model.constraints().len(), 1);
    }
}
