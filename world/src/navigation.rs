//! Route carving and validation for generated maps.

use std::collections::HashSet;

use node_defense_core::TileCoord;
use rand::Rng;

const EAST_WEIGHT: u32 = 6;
const VERTICAL_WEIGHT: u32 = 2;

/// Carves a single route from the west edge to the east edge.
///
/// The walk never revisits a tile and never steps next to an earlier route
/// tile other than its current head, so the result is a simple path whose
/// tiles only touch their immediate neighbours in the sequence. Eastward
/// steps are always available, which guarantees the walk terminates.
pub(crate) fn carve_route<R: Rng>(rng: &mut R, columns: u32, rows: u32) -> Vec<TileCoord> {
    let start = TileCoord::new(0, rng.gen_range(0..rows));
    let mut route = vec![start];
    let mut visited: HashSet<TileCoord> = HashSet::new();
    let _ = visited.insert(start);

    let mut head = start;
    while head.column() + 1 < columns {
        let mut candidates: Vec<(TileCoord, u32)> = Vec::with_capacity(3);
        candidates.push((TileCoord::new(head.column() + 1, head.row()), EAST_WEIGHT));
        if head.row() > 0 {
            candidates.push((TileCoord::new(head.column(), head.row() - 1), VERTICAL_WEIGHT));
        }
        if head.row() + 1 < rows {
            candidates.push((TileCoord::new(head.column(), head.row() + 1), VERTICAL_WEIGHT));
        }
        candidates.retain(|(candidate, _)| is_open(*candidate, head, &visited, columns, rows));

        let total: u32 = candidates.iter().map(|(_, weight)| *weight).sum();
        let mut roll = rng.gen_range(0..total);
        let mut next = candidates[0].0;
        for (candidate, weight) in &candidates {
            if roll < *weight {
                next = *candidate;
                break;
            }
            roll -= weight;
        }

        let _ = visited.insert(next);
        route.push(next);
        head = next;
    }

    route
}

/// Reports whether the route is a simple, connected path inside the bounds.
pub(crate) fn is_valid_route(route: &[TileCoord], columns: u32, rows: u32) -> bool {
    if route.len() < 2 {
        return false;
    }

    let mut seen = HashSet::with_capacity(route.len());
    for tile in route {
        if tile.column() >= columns || tile.row() >= rows {
            return false;
        }
        if !seen.insert(*tile) {
            return false;
        }
    }

    route.windows(2).all(|pair| pair[0].is_adjacent(pair[1]))
}

fn is_open(
    candidate: TileCoord,
    head: TileCoord,
    visited: &HashSet<TileCoord>,
    columns: u32,
    rows: u32,
) -> bool {
    if visited.contains(&candidate) {
        return false;
    }

    neighbours(candidate, columns, rows)
        .into_iter()
        .flatten()
        .all(|neighbour| neighbour == head || !visited.contains(&neighbour))
}

fn neighbours(tile: TileCoord, columns: u32, rows: u32) -> [Option<TileCoord>; 4] {
    let column = tile.column();
    let row = tile.row();
    [
        row.checked_sub(1).map(|row| TileCoord::new(column, row)),
        (column + 1 < columns).then(|| TileCoord::new(column + 1, row)),
        (row + 1 < rows).then(|| TileCoord::new(column, row + 1)),
        column.checked_sub(1).map(|column| TileCoord::new(column, row)),
    ]
}
