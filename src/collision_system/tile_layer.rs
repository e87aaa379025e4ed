use super::aabb_object::{raycast_box, resolve_actor_hit, sweep, Faces};
use super::actor::SweptActor;
use super::config::ConfigError;
use super::platform_object::{ObjectFrame, PlatformGeometry};
use super::response::{CollisionResponse, RaycastHit};
use crate::geo::{Aabb, Ray};
use crate::utils::{earliest, Float, EPSILON, P2, V2};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::ops::Range;

/// Stationary grid of solid tiles.
///
/// Faces shared by two solid tiles are not collidable, so actors slide over
/// rows and along columns of tiles without catching on the seams.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "TileLayerData")]
pub struct TileLayerShape {
    /// top left corner of the grid in platform local space
    pub offset: V2,
    pub tile_size: V2,
    columns: usize,
    rows: usize,
    solid: Vec<bool>,
}

// unchecked form of a deserialized layer
#[derive(Deserialize)]
struct TileLayerData {
    offset: V2,
    tile_size: V2,
    columns: usize,
    rows: usize,
    solid: Vec<bool>,
}

impl TryFrom<TileLayerData> for TileLayerShape {
    type Error = ConfigError;

    fn try_from(data: TileLayerData) -> Result<Self, Self::Error> {
        let tiles = data.columns.checked_mul(data.rows);
        if tiles != Some(data.solid.len()) {
            return Err(ConfigError::Invalid {
                field: "solid",
                reason: format!(
                    "{} tiles given for a {}x{} layer",
                    data.solid.len(),
                    data.columns,
                    data.rows
                ),
            });
        }
        Ok(TileLayerShape {
            offset: data.offset,
            tile_size: data.tile_size,
            columns: data.columns,
            rows: data.rows,
            solid: data.solid,
        })
    }
}

impl TileLayerShape {
    pub fn new(offset: V2, tile_size: V2, columns: usize, rows: usize) -> TileLayerShape {
        TileLayerShape {
            offset,
            tile_size,
            columns,
            rows,
            solid: vec![false; columns * rows],
        }
    }

    /// One string per row, `#` marks a solid tile.
    pub fn from_rows(offset: V2, tile_size: V2, rows: &[&str]) -> TileLayerShape {
        let columns = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut layer = TileLayerShape::new(offset, tile_size, columns, rows.len());
        for (row, line) in rows.iter().enumerate() {
            for (column, c) in line.chars().enumerate() {
                layer.set_solid(column, row, c == '#');
            }
        }
        layer
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// `false` if the tile is outside the grid
    pub fn set_solid(&mut self, column: usize, row: usize, solid: bool) -> bool {
        if column >= self.columns || row >= self.rows {
            return false;
        }
        match self.solid.get_mut(row * self.columns + column) {
            Some(tile) => {
                *tile = solid;
                true
            }
            None => false,
        }
    }

    /// tiles outside the grid are empty
    pub fn is_solid(&self, column: isize, row: isize) -> bool {
        if column < 0 || row < 0 || column as usize >= self.columns || row as usize >= self.rows {
            return false;
        }
        self.tile(row as usize * self.columns + column as usize)
    }

    fn tile(&self, index: usize) -> bool {
        self.solid.get(index).copied().unwrap_or(false)
    }

    pub fn tile_box(&self, origin: &P2, column: usize, row: usize) -> Aabb {
        let left = origin.x + self.offset.x + column as Float * self.tile_size.x;
        let top = origin.y + self.offset.y + row as Float * self.tile_size.y;
        Aabb::from_edges(left, top, left + self.tile_size.x, top + self.tile_size.y)
    }

    fn exposed_faces(&self, column: usize, row: usize) -> Faces {
        let (c, r) = (column as isize, row as isize);
        Faces {
            left: !self.is_solid(c - 1, r),
            right: !self.is_solid(c + 1, r),
            top: !self.is_solid(c, r - 1),
            bottom: !self.is_solid(c, r + 1),
        }
    }

    fn span(&self, min: Float, max: Float, start: Float, size: Float, count: usize) -> Option<Range<usize>> {
        if !(size > 0.0) || count == 0 {
            return None;
        }
        let first = ((min - start) / size).floor();
        let last = ((max - start) / size).floor();
        if !first.is_finite() || !last.is_finite() || last < 0.0 || first >= count as Float {
            return None;
        }
        let first = first.max(0.0) as usize;
        let last = (last as usize).min(count - 1);
        Some(first..last + 1)
    }

    /// solid tiles touching `region`, padded by `EPSILON`
    fn solid_tiles_in<'a>(&'a self, origin: &P2, region: &Aabb) -> impl Iterator<Item = (usize, usize)> + 'a {
        let columns = self.span(
            region.left() - EPSILON,
            region.right() + EPSILON,
            origin.x + self.offset.x,
            self.tile_size.x,
            self.columns,
        );
        let rows = self.span(
            region.top() - EPSILON,
            region.bottom() + EPSILON,
            origin.y + self.offset.y,
            self.tile_size.y,
            self.rows,
        );
        let (columns, rows) = match (columns, rows) {
            (Some(c), Some(r)) => (c, r),
            _ => (0..0, 0..0),
        };
        rows.flat_map(move |row| columns.clone().map(move |column| (column, row)))
            .filter(move |&(column, row)| self.tile(row * self.columns + column))
    }
}

impl PlatformGeometry for TileLayerShape {
    fn moving_actor_collision(
        &self,
        frame: &ObjectFrame,
        actor: &SweptActor,
        project_collision: bool,
        response: &mut CollisionResponse,
    ) {
        let origin = frame.end_position();
        let start = actor.bounds_at(&actor.pos0);
        let d = actor.displacement();
        let mut best = None;
        for (column, row) in self.solid_tiles_in(&origin, &actor.swept_bounds()) {
            let tile = self.tile_box(&origin, column, row);
            let hit = sweep(&start, &d, &tile, self.exposed_faces(column, row));
            best = earliest(best, hit.map(|h| (h.time, h)));
        }
        if let Some((_, hit)) = best {
            resolve_actor_hit(actor, &hit, project_collision, response);
        }
    }

    fn raycast(&self, origin: &P2, ray: &Ray, hit: &mut RaycastHit) {
        for (column, row) in self.solid_tiles_in(origin, &ray.bounds()) {
            raycast_box(&self.tile_box(origin, column, row), ray, self.exposed_faces(column, row), hit);
        }
    }

    fn rect_overlaps(&self, origin: &P2, rect: &Aabb) -> bool {
        self.solid_tiles_in(origin, rect)
            .any(|(column, row)| self.tile_box(origin, column, row).overlaps(rect))
    }
}
