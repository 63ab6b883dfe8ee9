//! Fields: trees of cells built over a set of points
//!
//! A field is built once from parallel input arrays and is immutable afterwards.
//! Points are copied into a store ordered so that the points under every cell are
//! contiguous. Cells live in an arena and refer to their children by [`CellId`].
use crate::cell::{Aggregate, Cell};
use crate::data::{Count, Scalar, Shear};
use crate::error::{Error, Result};
use crate::geometry::{Flat, Sphere};
use crate::options::FieldOptions;
use crate::split::split_points;
use crate::traits::{DataCategory, Geometry};
use crate::types::{CellId, Point};
use itertools::izip;
use log::{debug, warn};
use num::complex::Complex64;
use std::fmt;

/// Count-only field in flat geometry
pub type NFieldFlat = Field<Count, Flat>;
/// Count-only field in spherical geometry
pub type NFieldSphere = Field<Count, Sphere>;
/// Scalar field in flat geometry
pub type KFieldFlat = Field<Scalar, Flat>;
/// Scalar field in spherical geometry
pub type KFieldSphere = Field<Scalar, Sphere>;
/// Shear field in flat geometry
pub type GFieldFlat = Field<Shear, Flat>;
/// Shear field in spherical geometry
pub type GFieldSphere = Field<Shear, Sphere>;

/// A forest of cell trees over a point set
pub struct Field<D: DataCategory, M: Geometry> {
    options: FieldOptions,
    points: Vec<Point<D, M>>,
    cells: Vec<Cell<D, M>>,
    top: Vec<CellId>,
}

impl<D: DataCategory, M: Geometry> fmt::Debug for Field<D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("category", &D::NAME)
            .field("geometry", &M::NAME)
            .field("options", &self.options)
            .field("nobj", &self.points.len())
            .field("cells", &self.cells.len())
            .field("top", &self.top.len())
            .finish()
    }
}

/// A cell and its subtree, before being moved into the arena
struct Node<D: DataCategory, M: Geometry> {
    cell: Cell<D, M>,
    children: Option<Box<(Node<D, M>, Node<D, M>)>>,
}

impl<D: DataCategory, M: Geometry> Node<D, M> {
    fn count(&self) -> usize {
        match &self.children {
            Some(children) => 1 + children.0.count() + children.1.count(),
            None => 1,
        }
    }

    /// Move the subtree into `cells` in pre-order, returning the id of its root
    fn flatten(self, cells: &mut Vec<Cell<D, M>>) -> CellId {
        let id = CellId(cells.len());
        cells.push(self.cell);
        if let Some(children) = self.children {
            let (left, right) = *children;
            let left = left.flatten(cells);
            let right = right.flatten(cells);
            cells[id.0].set_children(left, right);
        }
        id
    }
}

/// Parameters shared by every step of a build
struct Builder {
    min_size_sq: f64,
    max_size_sq: f64,
    options: FieldOptions,
}

impl Builder {
    fn new(options: &FieldOptions) -> Self {
        let min_size = options.min_size();
        let max_size = options.max_size();
        Self {
            min_size_sq: min_size * min_size,
            max_size_sq: max_size * max_size,
            options: options.clone(),
        }
    }

    /// Seed for the split of the range starting at `start` with `n` points
    fn seed(&self, start: usize, n: usize) -> u64 {
        self.options.seed() ^ ((start as u64) << 32) ^ (n as u64)
    }

    fn split<D: DataCategory, M: Geometry>(
        &self,
        points: &mut [Point<D, M>],
        start: usize,
    ) -> usize {
        split_points(
            points,
            self.options.split_method(),
            self.seed(start, points.len()),
        )
    }

    fn join<A: Send, B: Send>(
        &self,
        n: usize,
        left: impl FnOnce() -> A + Send,
        right: impl FnOnce() -> B + Send,
    ) -> (A, B) {
        if n >= self.options.parallel_threshold() {
            rayon::join(left, right)
        } else {
            (left(), right())
        }
    }

    /// Split ranges too large to be useful whole, and build a tree for each remaining range
    fn top_level<D: DataCategory, M: Geometry>(
        &self,
        points: &mut [Point<D, M>],
        start: usize,
    ) -> Vec<Node<D, M>> {
        let aggregate = Aggregate::from_points(points);
        if aggregate.size * aggregate.size <= self.max_size_sq {
            return vec![self.node(points, start, aggregate)];
        }

        let n = points.len();
        let mid = self.split(points, start);
        let (lo, hi) = points.split_at_mut(mid);
        let (mut left, right) = self.join(
            n,
            move || self.top_level(lo, start),
            move || self.top_level(hi, start + mid),
        );
        left.extend(right);
        left
    }

    /// Build the cell for a range whose aggregate is already known, then its children
    fn node<D: DataCategory, M: Geometry>(
        &self,
        points: &mut [Point<D, M>],
        start: usize,
        aggregate: Aggregate<D, M>,
    ) -> Node<D, M> {
        let n = aggregate.n;
        let mut cell = Cell::new(aggregate, start);
        if n == 1 || cell.size_squared() <= self.min_size_sq {
            return Node {
                cell,
                children: None,
            };
        }

        let mid = self.split(points, start);
        let (lo, hi) = points.split_at_mut(mid);
        let (left, right) = self.join(
            n,
            move || {
                let aggregate = Aggregate::from_points(lo);
                self.node(lo, start, aggregate)
            },
            move || {
                let aggregate = Aggregate::from_points(hi);
                self.node(hi, start + mid, aggregate)
            },
        );
        cell.set_weight(left.cell.w() + right.cell.w());
        Node {
            cell,
            children: Some(Box::new((left, right))),
        }
    }
}

fn check_len(name: &str, len: usize, nobj: usize) -> Result<()> {
    if len != nobj {
        return Err(Error::InvalidInput(format!(
            "Length of {name} ({len}) does not match number of objects ({nobj})"
        )));
    }
    Ok(())
}

fn check_finite(name: &str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(Error::InvalidInput(format!(
            "Non-finite {name} at index {i}: {}",
            values[i]
        ))),
        None => Ok(()),
    }
}

/// Checks common to every data category, run before anything is allocated
fn validate_common(a: &[f64], b: &[f64], w: &[f64], options: &FieldOptions) -> Result<usize> {
    options.validate()?;
    let nobj = a.len();
    if nobj == 0 {
        return Err(Error::InvalidInput("No objects".to_string()));
    }
    check_len("second coordinate", b.len(), nobj)?;
    check_len("weights", w.len(), nobj)?;
    check_finite("first coordinate", a)?;
    check_finite("second coordinate", b)?;
    check_finite("weight", w)?;
    if let Some(i) = w.iter().position(|&w| w < 0.0) {
        return Err(Error::InvalidInput(format!(
            "Negative weight at index {i}: {}",
            w[i]
        )));
    }
    Ok(nobj)
}

fn collect_points<D: DataCategory, M: Geometry>(
    a: &[f64],
    b: &[f64],
    w: &[f64],
    values: impl Iterator<Item = D::Value>,
) -> Result<Vec<Point<D, M>>> {
    let mut points = Vec::new();
    points.try_reserve_exact(a.len())?;
    points.extend(
        izip!(a, b, w, values)
            .enumerate()
            .map(|(index, (&a, &b, &w, value))| Point {
                pos: M::from_coords(a, b),
                w,
                value,
                index,
            }),
    );
    Ok(points)
}

impl<M: Geometry> Field<Count, M> {
    /// Build a count-only field
    ///
    /// `a` and `b` are `x` and `y` for flat geometry, or `ra` and `dec` in radians for
    /// spherical geometry.
    pub fn new(a: &[f64], b: &[f64], w: &[f64], options: &FieldOptions) -> Result<Self> {
        validate_common(a, b, w, options)?;
        let points = collect_points(a, b, w, std::iter::repeat(()))?;
        Self::from_points(points, options)
    }
}

impl<M: Geometry> Field<Scalar, M> {
    /// Build a field of scalar values `k`
    pub fn new(
        a: &[f64],
        b: &[f64],
        k: &[f64],
        w: &[f64],
        options: &FieldOptions,
    ) -> Result<Self> {
        let nobj = validate_common(a, b, w, options)?;
        check_len("k", k.len(), nobj)?;
        check_finite("k", k)?;
        let points = collect_points(a, b, w, k.iter().copied())?;
        Self::from_points(points, options)
    }
}

impl<M: Geometry> Field<Shear, M> {
    /// Build a field of shears `g1 + i g2`
    pub fn new(
        a: &[f64],
        b: &[f64],
        g1: &[f64],
        g2: &[f64],
        w: &[f64],
        options: &FieldOptions,
    ) -> Result<Self> {
        let nobj = validate_common(a, b, w, options)?;
        check_len("g1", g1.len(), nobj)?;
        check_len("g2", g2.len(), nobj)?;
        check_finite("g1", g1)?;
        check_finite("g2", g2)?;
        let values = g1.iter().zip(g2).map(|(&g1, &g2)| Complex64::new(g1, g2));
        let points = collect_points(a, b, w, values)?;
        Self::from_points(points, options)
    }
}

impl<D: DataCategory, M: Geometry> Field<D, M> {
    /// Build a field from points that have already been checked
    fn from_points(mut points: Vec<Point<D, M>>, options: &FieldOptions) -> Result<Self> {
        if options.min_sep() == 0.0 {
            warn!("min_sep is zero: trees will be split down to single points");
        }

        let builder = Builder::new(options);
        let nodes = builder.top_level(&mut points, 0);

        let ncells = nodes.iter().map(Node::count).sum();
        let mut cells = Vec::new();
        cells.try_reserve_exact(ncells)?;
        let mut top = Vec::new();
        top.try_reserve_exact(nodes.len())?;
        for node in nodes {
            top.push(node.flatten(&mut cells));
        }

        debug!(
            "Built {}Field{} of {} points: {} top-level cells, {} cells",
            D::NAME,
            M::NAME,
            points.len(),
            top.len(),
            cells.len()
        );

        Ok(Self {
            options: options.clone(),
            points,
            cells,
            top,
        })
    }

    /// Number of top-level cells
    pub fn cell_count(&self) -> usize {
        self.top.len()
    }

    /// Top-level cells, in construction order
    pub fn top_level_cells(&self) -> &[CellId] {
        &self.top
    }

    /// Get a cell
    ///
    /// # Panics
    /// Panics if `id` was not issued by this field.
    pub fn cell(&self, id: CellId) -> &Cell<D, M> {
        &self.cells[id.0]
    }

    /// Get a cell, if `id` belongs to this field
    pub fn get_cell(&self, id: CellId) -> Option<&Cell<D, M>> {
        self.cells.get(id.0)
    }

    /// Children of a cell, or `None` for a leaf
    pub fn children(&self, cell: &Cell<D, M>) -> Option<(&Cell<D, M>, &Cell<D, M>)> {
        cell.children()
            .map(|[left, right]| (self.cell(left), self.cell(right)))
    }

    /// Every point beneath a cell
    pub fn points_of(&self, cell: &Cell<D, M>) -> &[Point<D, M>] {
        &self.points[cell.start()..cell.start() + cell.n()]
    }

    /// Points held by a leaf, or `None` for an internal cell
    pub fn leaf_points(&self, cell: &Cell<D, M>) -> Option<&[Point<D, M>]> {
        cell.is_leaf().then(|| self.points_of(cell))
    }

    /// Input indices of the points held by a leaf, or `None` for an internal cell
    pub fn leaf_indices<'a>(
        &'a self,
        cell: &Cell<D, M>,
    ) -> Option<impl Iterator<Item = usize> + 'a> {
        self.leaf_points(cell).map(|p| p.iter().map(|p| p.index))
    }

    /// All points, in tree order
    pub fn points(&self) -> &[Point<D, M>] {
        &self.points
    }

    /// Number of input points
    pub fn nobj(&self) -> usize {
        self.points.len()
    }

    /// Options the field was built with
    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// Number of cells across every tree
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    /// Every cell, each tree in depth-first pre-order
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellId, &Cell<D, M>)> {
        self.cells.iter().enumerate().map(|(i, c)| (CellId(i), c))
    }

    /// Leaf cells, in tree order
    pub fn leaves(&self) -> impl Iterator<Item = &Cell<D, M>> {
        self.cells.iter().filter(|c| c.is_leaf())
    }

    /// Number of levels in the deepest tree, counting a lone leaf as one
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut stack: Vec<(CellId, usize)> = self.top.iter().map(|&id| (id, 1)).collect();
        while let Some((id, level)) = stack.pop() {
            depth = depth.max(level);
            if let Some([left, right]) = self.cell(id).children() {
                stack.push((left, level + 1));
                stack.push((right, level + 1));
            }
        }
        depth
    }
}
