use cogkit_core::{Color, Composite, Error, Game, NodeID, NodeOptions, Point, Result, Shape, Size};
use serde::{Deserialize, Serialize};

/// Rows x columns of equal cells with optional grid lines. Nodes placed with
/// [`Grid::add_at_cell`] are centered in their cell and stay children of the
/// grid across rebuilds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Grid {
    pub rows: usize,
    pub columns: usize,
    pub size: Size,
    pub background_color: Color,
    pub grid_line_color: Color,
    pub grid_line_width: f32,
    #[serde(skip)]
    cells: Vec<GridChild>,
    #[serde(skip)]
    internal: Vec<NodeID>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridChild {
    pub node: NodeID,
    pub row: usize,
    pub column: usize,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            rows: 1,
            columns: 1,
            size: Size::new(100.0, 100.0),
            background_color: Color::TRANSPARENT,
            grid_line_color: Color::BLACK,
            grid_line_width: 1.0,
            cells: Vec::new(),
            internal: Vec::new(),
        }
    }
}

impl Grid {
    pub fn new(rows: usize, columns: usize, size: Size) -> Self {
        Self {
            rows,
            columns,
            size,
            ..Self::default()
        }
    }

    pub fn cell_size(&self) -> Size {
        Size::new(
            self.size.width / self.columns.max(1) as f32,
            self.size.height / self.rows.max(1) as f32,
        )
    }

    /// Center of a cell relative to the grid's center.
    pub fn cell_center(&self, row: usize, column: usize) -> Point {
        let cell = self.cell_size();
        Point::new(
            -self.size.width / 2.0 + (column as f32 + 0.5) * cell.width,
            -self.size.height / 2.0 + (row as f32 + 0.5) * cell.height,
        )
    }

    pub fn grid_children(&self) -> &[GridChild] {
        &self.cells
    }

    /// Places `node` (detached) at the center of cell (`row`, `column`).
    pub fn add_at_cell(
        game: &mut Game,
        grid: NodeID,
        node: NodeID,
        row: usize,
        column: usize,
    ) -> Result<()> {
        game.with_composite_mut::<Self, _>(grid, |g, game| {
            if row >= g.rows || column >= g.columns {
                return Err(Error::OutOfGrid { row, column });
            }
            game.add_child(grid, node)?;
            game.set_position(node, g.cell_center(row, column))?;
            g.cells.push(GridChild { node, row, column });
            Ok(())
        })
    }

    /// Detaches every node placed with [`Grid::add_at_cell`].
    pub fn remove_all_grid_children(game: &mut Game, grid: NodeID) -> Result<()> {
        game.with_composite_mut::<Self, _>(grid, |g, game| {
            let attached: Vec<NodeID> = g
                .cells
                .drain(..)
                .map(|c| c.node)
                .filter(|id| game.nodes.get(*id).is_some_and(|n| n.parent == grid))
                .collect();
            game.remove_children(grid, &attached)
        })
    }
}

impl Composite for Grid {
    fn composite_type(&self) -> &'static str {
        "Grid"
    }

    fn size(&self) -> Size {
        self.size
    }

    fn initialize(&mut self, game: &mut Game, id: NodeID) -> Result<()> {
        crate::destroy_internal(game, &mut self.internal)?;
        crate::add_internal(
            game,
            id,
            &mut self.internal,
            NodeOptions::named("__gridBackground").z_position(-2.0),
            Shape::rectangle(self.size).fill(self.background_color),
        )?;

        let cell = self.cell_size();
        let (w, h) = (self.size.width, self.size.height);
        let line_color = self.grid_line_color;
        let line = |length: Size| Shape::rectangle(length).fill(line_color);
        if self.grid_line_width > 0.0 {
            for column in 1..self.columns {
                let x = -w / 2.0 + column as f32 * cell.width;
                crate::add_internal(
                    game,
                    id,
                    &mut self.internal,
                    NodeOptions::named(format!("__gridColumnLine{column}"))
                        .at(x, 0.0)
                        .z_position(-1.0),
                    line(Size::new(self.grid_line_width, h)),
                )?;
            }
            for row in 1..self.rows {
                let y = -h / 2.0 + row as f32 * cell.height;
                crate::add_internal(
                    game,
                    id,
                    &mut self.internal,
                    NodeOptions::named(format!("__gridRowLine{row}"))
                        .at(0.0, y)
                        .z_position(-1.0),
                    line(Size::new(w, self.grid_line_width)),
                )?;
            }
        }

        // size or dimensions may have changed since the children were placed
        self.cells.retain(|c| c.row < self.rows && c.column < self.columns);
        for child in &self.cells {
            if game.nodes.contains(child.node) {
                game.set_position(child.node, self.cell_center(child.row, child.column))?;
            }
        }
        Ok(())
    }

    impl_composite_any!();
}
