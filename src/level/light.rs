use tracing::{debug, trace};

use crate::geometry::{distance_euclidean, distance_squared, MapCoord};
use crate::lighting::{LightSource, PendingLight, FULL_BRIGHT};

use super::{LevelCell, LevelMap};

impl LevelMap {
    pub fn default_light_source(&self) -> LightSource {
        self.default_source
    }

    /// Ambient source: its `max_light` is the floor every cell is cleared to,
    /// `255` switches the whole map to full-bright.
    pub fn set_default_light_source(&mut self, source: LightSource) {
        self.default_source = source;
    }

    #[inline]
    pub fn is_full_bright(&self) -> bool {
        self.default_source.max_light == FULL_BRIGHT
    }

    /// Base brightness of the tile on `layer` at `coord` (0 for unused tiles
    /// or positions off the grid).
    pub fn tile_light(&self, layer: usize, coord: MapCoord) -> u8 {
        match self.get(coord).map(|cell| cell.tile_index(layer)) {
            Some(tile) if tile >= 0 => self.light_map.get(tile as i32),
            _ => 0,
        }
    }

    /// Queued light changes not yet applied by `update_lights`.
    pub fn pending_lights(&self) -> &[PendingLight] {
        &self.pending_lights
    }

    /// Queue `source` to be added at `position`. Inert sources are ignored.
    pub fn add_light(&mut self, position: MapCoord, source: LightSource) {
        self.queue_light(position, source, false);
    }

    /// Queue `source` to be removed from `position`. Inert sources are ignored.
    pub fn remove_light(&mut self, position: MapCoord, source: LightSource) {
        self.queue_light(position, source, true);
    }

    fn queue_light(&mut self, position: MapCoord, source: LightSource, remove: bool) {
        if source.is_inert() {
            return;
        }
        self.pending_lights.push(PendingLight { position, source, remove });
    }

    /// Apply every queued change in submission order, then empty the queue.
    pub fn update_lights(&mut self) {
        if self.pending_lights.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending_lights);
        for light in &pending {
            if light.remove {
                self.undo_light(light.position, light.source);
            } else {
                self.do_light(light.position, light.source);
            }
        }
        trace!(applied = pending.len(), "pending_lights_applied");
    }

    /// Reset every cell to the ambient floor, reseed tile brightness from the
    /// light map and queue every occupant's light again.
    pub fn init_lights(&mut self) {
        let floor = self.default_source.max_light;
        for cell in &mut self.cells {
            cell.clear_lights(floor);
        }
        if self.is_full_bright() {
            debug!("lights_full_bright");
            return;
        }

        let mut ambient = self.default_source;
        let mut occupant_lights = Vec::new();
        for j in 0..self.map_size.y {
            for i in 0..self.map_size.x {
                let pos = MapCoord::new(i, j);
                let cell = &self[pos];
                ambient.max_light = self.light_map.get(cell.tile_index(0) as i32);
                occupant_lights.extend(cell.objects().iter().map(|o| o.light));
                self.do_default_light(pos, ambient);
                for light in occupant_lights.drain(..) {
                    self.add_light(pos, light);
                }
            }
        }
        debug!(pending = self.pending_lights.len(), "lights_initialised");
    }

    /// Raise the floor light around `position`.
    pub fn do_default_light(&mut self, position: MapCoord, source: LightSource) {
        self.do_light_with(position, source, LevelCell::set_default_light);
    }

    /// Add `source`'s contribution around `position` immediately.
    pub fn do_light(&mut self, position: MapCoord, source: LightSource) {
        self.do_light_with(position, source, LevelCell::add_light);
    }

    /// Remove a contribution previously applied with `do_light`.
    pub fn undo_light(&mut self, position: MapCoord, source: LightSource) {
        self.do_light_with(position, source, LevelCell::subtract_light);
    }

    /// Evaluate `source` over every cell within its radius of `position` and
    /// hand each eased value to `apply`.
    ///
    /// No-op in full-bright mode and for inert sources.
    pub fn do_light_with(
        &mut self,
        position: MapCoord,
        source: LightSource,
        mut apply: impl FnMut(&mut LevelCell, u8),
    ) {
        if self.is_full_bright() || source.is_inert() {
            return;
        }

        let radius = source.effective_radius();
        let radius_sq = radius * radius;
        let (px, py) = (position.x as i32, position.y as i32);

        let start_x = (px - radius).max(0);
        let start_y = (py - radius).max(0);
        let end_x = (px + radius + 1).min(self.map_size.x as i32);
        let end_y = (py + radius + 1).min(self.map_size.y as i32);

        for y in start_y..end_y {
            for x in start_x..end_x {
                // Clipped to the grid above, so both fit in `Coord`.
                let pos = MapCoord::new(x as i16, y as i16);
                if distance_squared(pos, position) > radius_sq {
                    continue;
                }
                let light = source.light_at(distance_euclidean(pos, position));
                apply(&mut self[pos], light);
            }
        }
    }
}
