//! Canvas renderer. A stateless mapping from grid + player position to draw
//! calls; safe to run on every generation and every move.

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::grid::Grid;
use crate::session::Player;

const BACKGROUND_COLOR: &str = "#ffffff";
const GOAL_COLOR: &str = "#00ff00";
const WALL_COLOR: &str = "#000000";
const PLAYER_COLOR: &str = "#ff0000";

/// Inset of the player square from its cell edges, in pixels.
const PLAYER_INSET: f64 = 2.0;

/// Fit the canvas to the grid. Called on every generation, before the first
/// draw of the new maze.
pub fn resize_canvas(canvas: &HtmlCanvasElement, grid: &Grid, cell_size: u32) {
    canvas.set_width(grid.columns() * cell_size);
    canvas.set_height(grid.rows() * cell_size);
}

/// Draw the full scene: background, goal highlight, outer border, every
/// still-closed wall (right, top, bottom, left per cell, in that order so
/// shared edges overlap the same way each frame), then the player marker.
pub fn render(ctx: &CanvasRenderingContext2d, grid: &Grid, player: Player, cell_size: f64) {
    let width = grid.columns() as f64 * cell_size;
    let height = grid.rows() as f64 * cell_size;

    ctx.set_fill_style_str(BACKGROUND_COLOR);
    ctx.fill_rect(0.0, 0.0, width, height);

    // Goal cell sits bottom-right.
    ctx.set_fill_style_str(GOAL_COLOR);
    ctx.fill_rect(
        (grid.columns() - 1) as f64 * cell_size,
        (grid.rows() - 1) as f64 * cell_size,
        cell_size,
        cell_size,
    );

    ctx.set_stroke_style_str(WALL_COLOR);
    ctx.stroke_rect(0.0, 0.0, width, height);

    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let cell = grid.cell(column, row);
            let x = column as f64 * cell_size;
            let y = row as f64 * cell_size;
            if cell.right_wall {
                line(ctx, x + cell_size, y, x + cell_size, y + cell_size);
            }
            if cell.top_wall {
                line(ctx, x, y, x + cell_size, y);
            }
            if cell.bottom_wall {
                line(ctx, x, y + cell_size, x + cell_size, y + cell_size);
            }
            if cell.left_wall {
                line(ctx, x, y, x, y + cell_size);
            }
        }
    }

    ctx.set_fill_style_str(PLAYER_COLOR);
    ctx.fill_rect(
        player.column as f64 * cell_size + PLAYER_INSET,
        player.row as f64 * cell_size + PLAYER_INSET,
        cell_size - 2.0 * PLAYER_INSET,
        cell_size - 2.0 * PLAYER_INSET,
    );
}

fn line(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}
