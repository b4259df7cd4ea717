// ─────────────────────────────────────────────────────────────────────
// SCPN Discharge Kinetics — Population Tree
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Binary space partition used to merge or split a cell's particles.
//!
//! Nodes live in an arena owned by the tree and refer to each other by index.
//! A tree is built fresh from a particle list, its leaves are read out as the
//! new population, and it is dropped.

use crate::partition::{check_mass_balance, Partitioner};
use crate::point_mass::{weighted_average, HasMass, Primitive};
use kinetic_types::error::{KineticError, KineticResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
pub struct Node<P> {
    data: Vec<P>,
    mass: f64,
    parent: Option<NodeId>,
    children: Option<(NodeId, NodeId)>,
    depth: usize,
    /// Set when a partition could not produce two non-empty sides.
    frozen: bool,
}

impl<P> Node<P> {
    fn leaf(data: Vec<P>, mass: f64, parent: Option<NodeId>, depth: usize) -> Self {
        Node {
            data,
            mass,
            parent,
            children: None,
            depth,
            frozen: false,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Points held by a leaf; empty once the node has been split.
    pub fn data(&self) -> &[P] {
        &self.data
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.children
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<P: HasMass> Node<P> {
    /// More than one point, or a single point that itself can split.
    pub fn can_split<const D: usize>(&self) -> bool
    where
        P: Primitive<D>,
    {
        if !self.is_leaf() || self.frozen {
            return false;
        }
        match self.data.as_slice() {
            [] => false,
            [only] => only.can_split(),
            _ => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tree<const D: usize, P> {
    nodes: Vec<Node<P>>,
    leaves: Vec<NodeId>,
}

impl<const D: usize, P: Primitive<D>> Tree<D, P> {
    pub const ROOT: NodeId = NodeId(0);

    /// Root leaf holding all `points`. Total mass must be >= 1.
    pub fn new(points: Vec<P>) -> KineticResult<Self> {
        let mass: f64 = points.iter().map(HasMass::mass).sum();
        if !mass.is_finite() || mass < 1.0 {
            return Err(KineticError::InvalidInput(format!(
                "population tree needs total mass >= 1, got {mass}"
            )));
        }
        Ok(Tree {
            nodes: vec![Node::leaf(points, mass, None, 0)],
            leaves: vec![Self::ROOT],
        })
    }

    pub fn root(&self) -> &Node<P> {
        &self.nodes[Self::ROOT.0]
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<P>> {
        self.nodes.get(id.0)
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_leaves(&self) -> usize {
        self.leaves.len()
    }

    pub fn leaf_ids(&self) -> &[NodeId] {
        &self.leaves
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Node<P>> + '_ {
        self.leaves.iter().map(move |id| &self.nodes[id.0])
    }

    /// Sum of leaf masses.
    pub fn leaf_mass(&self) -> f64 {
        self.leaves().map(Node::mass).sum()
    }

    fn leaf_can_split(&self, id: NodeId) -> bool {
        self.nodes[id.0].can_split::<D>()
    }

    /// Split leaves breadth-first along a cycling axis until `target` leaves
    /// exist or no leaf can split.
    pub fn build<T: Partitioner<D, P>>(
        &mut self,
        first_axis: usize,
        target: usize,
        partitioner: &T,
    ) -> KineticResult<()> {
        if target < 1 {
            return Err(KineticError::ConfigError(
                "target leaf count must be >= 1".to_string(),
            ));
        }
        if first_axis >= D {
            return Err(KineticError::ConfigError(format!(
                "first split axis {first_axis} outside 0..{D}"
            )));
        }

        let mut axis = first_axis;
        while self.leaves.len() < target && self.leaves.iter().any(|&id| self.leaf_can_split(id)) {
            let mut needed = target - self.leaves.len();
            let current = std::mem::take(&mut self.leaves);
            let mut next = Vec::with_capacity(current.len() * 2);
            for id in current {
                if needed > 0 && self.leaf_can_split(id) {
                    match self.split(id, axis, partitioner)? {
                        Some((left, right)) => {
                            next.push(left);
                            next.push(right);
                            needed -= 1;
                        }
                        None => next.push(id),
                    }
                } else {
                    next.push(id);
                }
            }
            self.leaves = next;
            axis = (axis + 1) % D;
        }
        Ok(())
    }

    /// Partition leaf `id` into two new leaves. Returns `None` (and freezes
    /// the leaf) when one side would be empty.
    fn split<T: Partitioner<D, P>>(
        &mut self,
        id: NodeId,
        axis: usize,
        partitioner: &T,
    ) -> KineticResult<Option<(NodeId, NodeId)>> {
        let (mass, depth) = {
            let node = &self.nodes[id.0];
            (node.mass, node.depth)
        };
        let data = std::mem::take(&mut self.nodes[id.0].data);
        let (left, right) = partitioner.partition(data, axis)?;
        let left_mass: f64 = left.iter().map(HasMass::mass).sum();
        let right_mass: f64 = right.iter().map(HasMass::mass).sum();
        check_mass_balance(mass, left_mass, right_mass)?;

        if left.is_empty() || right.is_empty() {
            let node = &mut self.nodes[id.0];
            node.data = left;
            node.data.extend(right);
            node.frozen = true;
            return Ok(None);
        }

        let left_id = NodeId(self.nodes.len());
        let right_id = NodeId(self.nodes.len() + 1);
        self.nodes.push(Node::leaf(left, left_mass, Some(id), depth + 1));
        self.nodes.push(Node::leaf(right, right_mass, Some(id), depth + 1));
        self.nodes[id.0].children = Some((left_id, right_id));
        Ok(Some((left_id, right_id)))
    }

    /// One merged primitive per non-empty leaf: mass-weighted position and
    /// energy, summed mass.
    pub fn merged_leaves(&self) -> Vec<P> {
        self.leaves()
            .filter_map(|leaf| weighted_average::<D, P>(leaf.data()))
            .map(|(position, mass, energy)| P::with_parts(position, mass, energy))
            .collect()
    }

    /// Consume the tree, returning the raw points of every leaf.
    pub fn into_leaf_points(mut self) -> Vec<Vec<P>> {
        let leaves = std::mem::take(&mut self.leaves);
        leaves
            .into_iter()
            .map(|id| std::mem::take(&mut self.nodes[id.0].data))
            .collect()
    }
}

/// Build a tree over `points` and return the merged leaves.
pub fn rebuild<const D: usize, P: Primitive<D>, T: Partitioner<D, P>>(
    points: Vec<P>,
    first_axis: usize,
    target: usize,
    partitioner: &T,
) -> KineticResult<Vec<P>> {
    let mut tree = Tree::<D, P>::new(points)?;
    tree.build(first_axis, target, partitioner)?;
    Ok(tree.merged_leaves())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::EqualMassPartitioner;
    use crate::point_mass::PointMass;

    fn unit_line(n: usize) -> Vec<PointMass<2>> {
        (0..n)
            .map(|i| PointMass::new([i as f64, 0.0], 1.0, 1.0))
            .collect()
    }

    #[test]
    fn test_merge_five_unit_masses_to_two() {
        let mut tree = Tree::new(unit_line(5)).unwrap();
        tree.build(0, 2, &EqualMassPartitioner).unwrap();
        assert_eq!(tree.num_leaves(), 2);
        let mut masses: Vec<f64> = tree.leaves().map(Node::mass).collect();
        masses.sort_by(f64::total_cmp);
        assert_eq!(masses, vec![2.0, 3.0]);
        assert!((tree.leaf_mass() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_splittable_point_halves() {
        let mut tree = Tree::new(vec![PointMass::new([0.0, 0.0], 4.0, 2.5)]).unwrap();
        tree.build(0, 2, &EqualMassPartitioner).unwrap();
        let merged = tree.merged_leaves();
        assert_eq!(merged.len(), 2);
        for p in &merged {
            assert_eq!(p.mass, 2.0);
            assert_eq!(p.position, [0.0, 0.0]);
            assert_eq!(p.energy, 2.5);
        }
    }

    #[test]
    fn test_split_up_to_target() {
        let mut tree = Tree::new(vec![PointMass::new([0.5, 0.5, 0.5], 64.0, 1.0)]).unwrap();
        tree.build(1, 16, &EqualMassPartitioner).unwrap();
        assert_eq!(tree.num_leaves(), 16);
        assert!(tree.leaves().all(|l| (l.mass() - 4.0).abs() < 1e-12));
    }

    #[test]
    fn test_unsplittable_leaves_stop_early() {
        let mut tree = Tree::new(unit_line(3)).unwrap();
        tree.build(0, 10, &EqualMassPartitioner).unwrap();
        assert_eq!(tree.num_leaves(), 3);
        assert!(tree.leaves().all(|l| !l.can_split::<2>()));
    }

    #[test]
    fn test_parent_links_and_cleared_data() {
        let mut tree = Tree::new(unit_line(4)).unwrap();
        tree.build(0, 4, &EqualMassPartitioner).unwrap();
        assert!(!tree.root().is_leaf());
        assert!(tree.root().data().is_empty());
        for &id in tree.leaf_ids() {
            let leaf = tree.node(id).unwrap();
            assert_eq!(leaf.depth(), 2);
            let parent = tree.node(leaf.parent().unwrap()).unwrap();
            assert_eq!(tree.node(parent.parent().unwrap()).unwrap().parent(), None);
        }
        assert_eq!(tree.num_nodes(), 7);
    }

    #[test]
    fn test_axis_cycles_between_levels() {
        // Four points on a square: first cut along x, then along y.
        let points = vec![
            PointMass::new([0.0, 0.0], 1.0, 0.0),
            PointMass::new([1.0, 0.0], 1.0, 0.0),
            PointMass::new([0.0, 1.0], 1.0, 0.0),
            PointMass::new([1.0, 1.0], 1.0, 0.0),
        ];
        let mut tree = Tree::new(points).unwrap();
        tree.build(0, 4, &EqualMassPartitioner).unwrap();
        let points = tree.into_leaf_points();
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|leaf| leaf.len() == 1));
    }

    #[test]
    fn test_round_trip_to_single_point() {
        let points: Vec<PointMass<2>> = (0..9)
            .map(|i| PointMass::new([i as f64, (i * i) as f64], 1.0 + i as f64, i as f64))
            .collect();
        let first = rebuild(points.clone(), 0, 4, &EqualMassPartitioner).unwrap();
        let single = rebuild(first, 0, 1, &EqualMassPartitioner).unwrap();
        let expected = PointMass::from_points(&points).unwrap();
        assert_eq!(single.len(), 1);
        assert!((single[0].mass - expected.mass).abs() < 1e-9);
        assert!((single[0].energy - expected.energy).abs() < 1e-9);
        assert!((single[0].position[0] - expected.position[0]).abs() < 1e-9);
        assert!((single[0].position[1] - expected.position[1]).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(Tree::new(vec![PointMass::new([0.0, 0.0], 0.5, 0.0)]).is_err());
        let mut tree = Tree::new(unit_line(3)).unwrap();
        assert!(matches!(
            tree.build(0, 0, &EqualMassPartitioner),
            Err(KineticError::ConfigError(_))
        ));
        assert!(tree.build(2, 2, &EqualMassPartitioner).is_err());
    }

    #[test]
    fn test_one_sided_partition_freezes_leaf() {
        let everything_left = |points: Vec<PointMass<2>>, _axis: usize| -> KineticResult<(Vec<PointMass<2>>, Vec<PointMass<2>>)> {
            Ok((points, Vec::new()))
        };
        let mut tree = Tree::new(unit_line(3)).unwrap();
        tree.build(0, 3, &everything_left).unwrap();
        assert_eq!(tree.num_leaves(), 1);
        assert_eq!(tree.root().data().len(), 3);
    }
}
