//! Tile grid holding terrain, the enemy route, and tower occupancy.

use node_defense_core::{GenerationError, MapConfig, TileCoord, TileKind, TowerId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::navigation::{carve_route, is_valid_route};

/// Rectangular grid of tiles traversed by a single fixed route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMap {
    columns: u32,
    rows: u32,
    tiles: Vec<TileKind>,
    route: Vec<TileCoord>,
    towers: Vec<Option<TowerId>>,
}

impl GridMap {
    /// Generates a map whose route runs from the west edge to the east edge.
    ///
    /// Dimensions and the route length floor come from the configuration;
    /// identical seeds and configuration always produce identical maps.
    pub fn generate(seed: u64, config: &MapConfig) -> Result<Self, GenerationError> {
        let (columns, rows) = (config.columns, config.rows);
        ensure_dimensions(columns, rows)?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let min_length =
            usize::try_from(config.effective_min_route_length()).unwrap_or(usize::MAX);
        let attempts = config.max_attempts.max(1);

        let mut carved = None;
        for _ in 0..attempts {
            let route = carve_route(&mut rng, columns, rows);
            if route.len() >= min_length {
                carved = Some(route);
                break;
            }
        }
        let route = carved.ok_or(GenerationError::RouteNotFound { attempts })?;

        let mut map = Self::with_route(columns, rows, route);
        let blocked_percent = config.blocked_percent.min(100);
        for index in 0..map.tiles.len() {
            if map.tiles[index] == TileKind::Empty && rng.gen_range(0..100) < blocked_percent {
                map.tiles[index] = TileKind::Blocked;
            }
        }
        Ok(map)
    }

    /// Builds an obstacle-free map around an explicit route.
    pub fn from_route(
        columns: u32,
        rows: u32,
        route: Vec<TileCoord>,
    ) -> Result<Self, GenerationError> {
        ensure_dimensions(columns, rows)?;
        if !is_valid_route(&route, columns, rows) {
            return Err(GenerationError::InvalidRoute);
        }
        Ok(Self::with_route(columns, rows, route))
    }

    fn with_route(columns: u32, rows: u32, route: Vec<TileCoord>) -> Self {
        let area = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut map = Self {
            columns,
            rows,
            tiles: vec![TileKind::Empty; area],
            route: Vec::new(),
            towers: vec![None; area],
        };

        let last = route.len().saturating_sub(1);
        for (position, tile) in route.iter().enumerate() {
            let kind = match position {
                0 => TileKind::Spawn,
                _ if position == last => TileKind::Core,
                _ => TileKind::Path,
            };
            if let Some(index) = map.index(*tile) {
                map.tiles[index] = kind;
            }
        }
        map.route = route;
        map
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Terrain of the provided tile, or `None` outside the map.
    #[must_use]
    pub fn tile_at(&self, at: TileCoord) -> Option<TileKind> {
        self.index(at).map(|index| self.tiles[index])
    }

    /// Reports whether a tower may be built on the tile.
    #[must_use]
    pub fn is_buildable(&self, at: TileCoord) -> bool {
        self.index(at)
            .is_some_and(|index| {
                self.tiles[index] == TileKind::Empty && self.towers[index].is_none()
            })
    }

    /// Tower standing on the tile, if any.
    #[must_use]
    pub fn occupant(&self, at: TileCoord) -> Option<TowerId> {
        self.index(at).and_then(|index| self.towers[index])
    }

    /// Ordered route from the spawn to the core.
    #[must_use]
    pub fn route(&self) -> &[TileCoord] {
        &self.route
    }

    /// Tile where enemies enter the route.
    #[must_use]
    pub fn spawn(&self) -> TileCoord {
        self.route.first().copied().unwrap_or(TileCoord::new(0, 0))
    }

    /// Tile holding the defended core.
    #[must_use]
    pub fn core(&self) -> TileCoord {
        self.route.last().copied().unwrap_or(TileCoord::new(0, 0))
    }

    /// Iterates every tile with its coordinate in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (TileCoord, TileKind)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, kind)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (TileCoord::new(index % columns, index / columns), *kind)
        })
    }

    pub(crate) fn place_tower(&mut self, at: TileCoord, tower: TowerId) {
        if let Some(index) = self.index(at) {
            self.towers[index] = Some(tower);
        }
    }

    fn index(&self, at: TileCoord) -> Option<usize> {
        if at.column() >= self.columns || at.row() >= self.rows {
            return None;
        }
        let flat = u64::from(at.row()) * u64::from(self.columns) + u64::from(at.column());
        usize::try_from(flat).ok()
    }
}

fn ensure_dimensions(columns: u32, rows: u32) -> Result<(), GenerationError> {
    if columns < 2 || rows < 1 {
        return Err(GenerationError::InvalidDimensions { columns, rows });
    }
    Ok(())
}
