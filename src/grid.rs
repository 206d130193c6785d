//! Logical grid projected through a user adjustable quadrilateral.

use log::debug;
use nalgebra::Point2;

use crate::{Cell, Error, Homography};

const DEFAULT_SIZE: u32 = 16;

/// One of the four corners of the quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    /// Image of `(0, 0)`
    TopLeft = 0,
    /// Image of `(1, 0)`
    TopRight = 1,
    /// Image of `(1, 1)`
    BottomRight = 2,
    /// Image of `(0, 1)`
    BottomLeft = 3,
}

impl Corner {
    /// All corners, in the order the homography expects them
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// Position in [`Corner::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for Corner {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Corner::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidCornerIndex(index))
    }
}

/// Number of logical columns and rows, both at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    columns: u32,
    rows: u32,
}

impl GridDimensions {
    /// Validated dimensions
    pub fn new(columns: u32, rows: u32) -> Result<Self, Error> {
        if columns == 0 || rows == 0 {
            return Err(Error::InvalidDimensions { columns, rows });
        }
        Ok(Self { columns, rows })
    }

    /// Column count
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Row count
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of cells
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Whether `(column, row)` addresses a cell
    pub fn contains(&self, column: u32, row: u32) -> bool {
        column < self.columns && row < self.rows
    }

    fn check(&self, column: u32, row: u32) -> Result<(), Error> {
        if self.contains(column, row) {
            Ok(())
        } else {
            Err(Error::CellOutOfRange {
                column,
                row,
                columns: self.columns,
                rows: self.rows,
            })
        }
    }

    /// Normalized coordinate of a column; a single column sits at 0.
    fn u(&self, column: f64) -> f64 {
        normalize(column, self.columns)
    }

    /// Normalized coordinate of a row; a single row sits at 0.
    fn v(&self, row: f64) -> f64 {
        normalize(row, self.rows)
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self {
            columns: DEFAULT_SIZE,
            rows: DEFAULT_SIZE,
        }
    }
}

fn normalize(index: f64, count: u32) -> f64 {
    if count > 1 {
        index / (count - 1) as f64
    } else {
        0.0
    }
}

/// Physical position of every logical cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    dimensions: GridDimensions,
    points: Vec<Point2<f64>>,
}

impl Projection {
    /// Project every node of `dimensions` through the quadrilateral.
    pub fn compute(corners: &[Point2<f64>; 4], dimensions: GridDimensions) -> Result<Self, Error> {
        let h = Homography::solve(corners)?;
        let mut points = Vec::with_capacity(dimensions.cell_count());
        for row in 0..dimensions.rows {
            let v = dimensions.v(row as f64);
            for column in 0..dimensions.columns {
                points.push(h.apply(dimensions.u(column as f64), v));
            }
        }
        Ok(Self { dimensions, points })
    }

    /// Dimensions this projection was computed for
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Projected position of `(column, row)`
    pub fn get(&self, column: u32, row: u32) -> Option<Point2<f64>> {
        if !self.dimensions.contains(column, row) {
            return None;
        }
        let index = row as usize * self.dimensions.columns as usize + column as usize;
        self.points.get(index).copied()
    }

    /// All cells with their positions, row by row
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Point2<f64>)> + '_ {
        let columns = self.dimensions.columns as usize;
        self.points.iter().enumerate().map(move |(i, &p)| {
            (Cell::new((i % columns) as u32, (i / columns) as u32), p)
        })
    }
}

/// Four draggable corners and a logical grid, with a cached projection.
///
/// The projection is recomputed lazily: corner and dimension setters only
/// mark it stale.
#[derive(Debug, Clone)]
pub struct TransformableGrid {
    corners: [Point2<f64>; 4],
    dimensions: GridDimensions,
    projection: Option<Projection>,
}

impl TransformableGrid {
    /// Grid over the given corners (TL, TR, BR, BL).
    pub fn new(corners: [Point2<f64>; 4], dimensions: GridDimensions) -> Self {
        Self {
            corners,
            dimensions,
            projection: None,
        }
    }

    /// Axis aligned rectangle from `min` (top-left) to `max` (bottom-right),
    /// with 16x16 cells.
    pub fn from_rect(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self::new(
            [
                min,
                Point2::new(max.x, min.y),
                max,
                Point2::new(min.x, max.y),
            ],
            GridDimensions::default(),
        )
    }

    /// Position of one corner
    pub fn corner(&self, corner: Corner) -> Point2<f64> {
        self.corners[corner.index()]
    }

    /// All corners, TL, TR, BR, BL
    pub fn corners(&self) -> &[Point2<f64>; 4] {
        &self.corners
    }

    /// Current dimensions
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Whether the next lookup recomputes the projection
    pub fn is_dirty(&self) -> bool {
        self.projection.is_none()
    }

    /// Move one corner.
    pub fn set_corner(&mut self, corner: Corner, point: Point2<f64>) {
        self.corners[corner.index()] = point;
        self.projection = None;
    }

    /// Replace the dimensions, both must be at least one.
    pub fn set_dimensions(&mut self, columns: u32, rows: u32) -> Result<(), Error> {
        self.dimensions = GridDimensions::new(columns, rows)?;
        self.projection = None;
        Ok(())
    }

    /// One cell per pixel of a `width` x `height` image.
    pub fn fit_to_image(&mut self, width: u32, height: u32) -> Result<(), Error> {
        self.set_dimensions(width, height)
    }

    /// The cached projection, recomputed first when stale.
    ///
    /// On a degenerate quadrilateral the grid stays stale and the error is
    /// returned.
    pub fn project(&mut self) -> Result<&Projection, Error> {
        let projection = match self.projection.take() {
            Some(cached) => cached,
            None => {
                debug!(
                    "projecting {}x{} grid",
                    self.dimensions.columns, self.dimensions.rows
                );
                Projection::compute(&self.corners, self.dimensions)?
            }
        };
        Ok(&*self.projection.insert(projection))
    }

    /// Projected position of `(column, row)`.
    pub fn position_of(&mut self, column: u32, row: u32) -> Result<Point2<f64>, Error> {
        self.dimensions.check(column, row)?;
        let projection = self.project()?;
        projection.get(column, row).ok_or(Error::CellOutOfRange {
            column,
            row,
            columns: projection.dimensions.columns,
            rows: projection.dimensions.rows,
        })
    }

    /// First corner (TL, TR, BR, BL order) within `radius` of `point`.
    pub fn nearest_corner(&self, point: Point2<f64>, radius: f64) -> Option<Corner> {
        Corner::ALL
            .into_iter()
            .find(|&c| nalgebra::distance(&self.corner(c), &point) < radius)
    }

    /// Outline of the cell centered on node `(column, row)`: TL, TR, BR, BL.
    pub fn cell_quad(&self, column: u32, row: u32) -> Result<[Point2<f64>; 4], Error> {
        self.dimensions.check(column, row)?;
        let h = Homography::solve(&self.corners)?;
        let d = self.dimensions;
        let (c, r) = (column as f64, row as f64);
        let (u0, u1) = (d.u(c - 0.5), d.u(c + 0.5));
        let (v0, v1) = (d.v(r - 0.5), d.v(r + 0.5));
        Ok([
            h.apply(u0, v0),
            h.apply(u1, v0),
            h.apply(u1, v1),
            h.apply(u0, v1),
        ])
    }

    /// Logical cell nearest to a physical point.
    ///
    /// `None` when the point falls outside the grid or the corners are
    /// degenerate.
    pub fn cell_at(&self, point: Point2<f64>) -> Option<Cell> {
        let inverse = Homography::solve(&self.corners).ok()?.inverse()?;
        let uv = inverse.apply(point.x, point.y);
        let column = denormalize(uv.x, self.dimensions.columns)?;
        let row = denormalize(uv.y, self.dimensions.rows)?;
        Some(Cell::new(column, row))
    }
}

/// Node index nearest to normalized `t`, if `t` lies within half a cell of
/// one. A collapsed axis keeps a half unit extent around its only node.
fn denormalize(t: f64, count: u32) -> Option<u32> {
    if !t.is_finite() {
        return None;
    }
    if count <= 1 {
        return (t.abs() <= 0.5).then_some(0);
    }
    let span = (count - 1) as f64;
    let index = (t * span).round();
    if index < 0.0 || index > span {
        return None;
    }
    Some(index as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square(size: f64) -> TransformableGrid {
        TransformableGrid::from_rect(Point2::new(0.0, 0.0), Point2::new(size, size))
    }

    #[test]
    fn corner_indices() {
        assert_eq!(Corner::try_from(2usize), Ok(Corner::BottomRight));
        assert_eq!(Corner::try_from(4usize), Err(Error::InvalidCornerIndex(4)));
        assert_eq!(Corner::BottomLeft.index(), 3);
    }

    #[test]
    fn dimensions_must_be_positive() {
        assert_eq!(
            GridDimensions::new(0, 3),
            Err(Error::InvalidDimensions {
                columns: 0,
                rows: 3
            })
        );
        let mut grid = square(10.0);
        assert!(grid.set_dimensions(3, 0).is_err());
        assert_eq!(grid.dimensions(), GridDimensions::default());
    }

    #[test]
    fn projects_square_nodes() {
        let mut grid = square(30.0);
        grid.set_dimensions(4, 4).unwrap();
        let p = grid.position_of(1, 2).unwrap();
        assert_abs_diff_eq!(p.x, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 20.0, epsilon = 1e-9);
        let last = grid.position_of(3, 3).unwrap();
        assert_abs_diff_eq!(last.x, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn setters_mark_dirty_and_project_cleans() {
        let mut grid = square(10.0);
        assert!(grid.is_dirty());
        grid.project().unwrap();
        assert!(!grid.is_dirty());
        grid.set_corner(Corner::TopRight, Point2::new(12.0, 0.0));
        assert!(grid.is_dirty());
        grid.project().unwrap();
        grid.set_dimensions(2, 2).unwrap();
        assert!(grid.is_dirty());
    }

    #[test]
    fn repeated_projection_is_identical() {
        let mut grid = square(10.0);
        grid.set_corner(Corner::BottomRight, Point2::new(13.0, 11.0));
        let first = grid.project().unwrap().clone();
        let second = grid.project().unwrap();
        assert_eq!(&first, second);
    }

    #[test]
    fn corner_moves_are_picked_up() {
        let mut grid = square(10.0);
        grid.set_dimensions(2, 2).unwrap();
        assert_abs_diff_eq!(grid.position_of(1, 0).unwrap().x, 10.0, epsilon = 1e-9);
        grid.set_corner(Corner::TopRight, Point2::new(20.0, 0.0));
        assert_abs_diff_eq!(grid.position_of(1, 0).unwrap().x, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn single_column_collapses_to_left_edge() {
        let mut grid = square(10.0);
        grid.set_dimensions(1, 5).unwrap();
        let projection = grid.project().unwrap();
        for row in 0..5 {
            let p = projection.get(0, row).unwrap();
            assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(p.y, row as f64 * 2.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn out_of_range_lookups_fail() {
        let mut grid = square(10.0);
        grid.set_dimensions(3, 2).unwrap();
        assert_eq!(
            grid.position_of(3, 0),
            Err(Error::CellOutOfRange {
                column: 3,
                row: 0,
                columns: 3,
                rows: 2
            })
        );
        assert!(grid.position_of(0, 2).is_err());
    }

    #[test]
    fn degenerate_corners_keep_grid_dirty() {
        let mut grid = TransformableGrid::new(
            [
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(20.0, 0.0),
                Point2::new(0.0, 0.0),
            ],
            GridDimensions::default(),
        );
        assert_eq!(grid.project().unwrap_err(), Error::DegenerateQuadrilateral);
        assert!(grid.is_dirty());
        assert_eq!(grid.position_of(0, 0), Err(Error::DegenerateQuadrilateral));
    }

    #[test]
    fn projection_iterates_row_major() {
        let mut grid = square(1.0);
        grid.set_dimensions(2, 2).unwrap();
        let cells: Vec<Cell> = grid.project().unwrap().iter().map(|(c, _)| c).collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(0, 1),
                Cell::new(1, 1)
            ]
        );
    }

    #[test]
    fn finds_corner_handles() {
        let grid = square(100.0);
        assert_eq!(
            grid.nearest_corner(Point2::new(98.0, 3.0), 24.0),
            Some(Corner::TopRight)
        );
        assert_eq!(grid.nearest_corner(Point2::new(50.0, 50.0), 24.0), None);
    }

    #[test]
    fn cell_quad_surrounds_node() {
        let mut grid = square(20.0);
        grid.set_dimensions(3, 3).unwrap();
        let quad = grid.cell_quad(1, 1).unwrap();
        assert_abs_diff_eq!(quad[0].x, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(quad[0].y, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(quad[2].x, 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(quad[2].y, 15.0, epsilon = 1e-9);
    }

    #[test]
    fn inverse_lookup_finds_cell() {
        let mut grid = square(30.0);
        grid.set_dimensions(4, 4).unwrap();
        assert_eq!(grid.cell_at(Point2::new(11.0, 19.0)), Some(Cell::new(1, 2)));
        assert_eq!(grid.cell_at(Point2::new(80.0, 0.0)), None);
    }

    #[test]
    fn collapsed_grid_only_hits_near_its_node() {
        let mut grid = square(10.0);
        grid.set_dimensions(1, 1).unwrap();
        assert_eq!(grid.cell_at(Point2::new(2.0, 3.0)), Some(Cell::new(0, 0)));
        assert_eq!(grid.cell_at(Point2::new(5000.0, -5000.0)), None);
        assert_eq!(grid.cell_at(Point2::new(-6.0, 0.0)), None);

        grid.set_dimensions(1, 3).unwrap();
        assert_eq!(grid.cell_at(Point2::new(1.0, 9.0)), Some(Cell::new(0, 2)));
        assert_eq!(grid.cell_at(Point2::new(8.0, 9.0)), None);
    }
}
