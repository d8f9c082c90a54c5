use crate::lighting::{LightSource, FULL_BRIGHT};

/// Stable handle of a game object owned by an external entity store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// Non-owning record of an object standing on a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Occupant {
    pub id: ObjectId,
    /// Light the object emitted when it was placed.
    pub light: LightSource,
    /// Whether the object keeps others from entering the cell.
    pub blocks: bool,
}

// ── LevelCell ─────────────────────────────────────────────────────────────────

/// One tile of a `LevelMap`.
///
/// Layers `0..DRAWABLE_LAYERS` hold tile indices (`-1` = unused); layer
/// `SOL_LAYER` holds the passability class (`0` = passable).
///
/// Light is kept as a floor value plus the sum of added source contributions,
/// so removing a source restores exactly what adding it changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelCell {
    layers: [i16; LevelCell::NUMBER_OF_LAYERS],
    default_light: u8,
    added_light: u32,
    objects: Vec<Occupant>,
}

impl Default for LevelCell {
    fn default() -> Self {
        Self {
            layers: [-1, -1, -1, -1, -1, 0],
            default_light: 0,
            added_light: 0,
            objects: Vec::new(),
        }
    }
}

impl LevelCell {
    pub const DRAWABLE_LAYERS: usize = 5;
    pub const SOL_LAYER: usize = 5;
    pub const NUMBER_OF_LAYERS: usize = 6;

    /// A cell with `tile` on layer 0 and the given passability class.
    pub fn with_tile(tile: i16, sol: i16) -> Self {
        let mut cell = Self::default();
        cell.layers[0] = tile;
        cell.layers[Self::SOL_LAYER] = sol;
        cell
    }

    // ── Layers ────────────────────────────────────────────────────────────────

    /// Tile index on `layer`; `-1` for unknown layers.
    #[inline]
    pub fn tile_index(&self, layer: usize) -> i16 {
        self.layers.get(layer).copied().unwrap_or(-1)
    }

    /// Set the tile index on `layer`. Unknown layers are ignored.
    #[inline]
    pub fn set_tile_index(&mut self, layer: usize, tile: i16) {
        if let Some(slot) = self.layers.get_mut(layer) {
            *slot = tile;
        }
    }

    #[inline]
    pub fn sol(&self) -> i16 {
        self.layers[Self::SOL_LAYER]
    }

    /// Passable by terrain alone.
    #[inline]
    pub fn passable_ignore_object(&self) -> bool {
        self.sol() == 0
    }

    /// Passable by terrain and not held by a blocking object.
    pub fn passable(&self) -> bool {
        self.passable_ignore_object() && !self.objects.iter().any(|o| o.blocks)
    }

    // ── Light ─────────────────────────────────────────────────────────────────

    /// Current brightness, saturating at 255.
    pub fn light(&self) -> u8 {
        (self.default_light as u32 + self.added_light).min(FULL_BRIGHT as u32) as u8
    }

    #[inline]
    pub fn default_light(&self) -> u8 {
        self.default_light
    }

    /// Reset to `floor` and drop every accumulated contribution.
    pub fn clear_lights(&mut self, floor: u8) {
        self.default_light = floor;
        self.added_light = 0;
    }

    /// Overwrite the floor light. Accumulated contributions are left alone.
    pub fn set_default_light(&mut self, light: u8) {
        self.default_light = light;
    }

    pub fn add_light(&mut self, light: u8) {
        self.added_light = self.added_light.saturating_add(light as u32);
    }

    pub fn subtract_light(&mut self, light: u8) {
        self.added_light = self.added_light.saturating_sub(light as u32);
    }

    // ── Occupants ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn has_objects(&self) -> bool {
        !self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Occupant] {
        &self.objects
    }

    /// Topmost (most recently placed) object.
    pub fn front_object(&self) -> Option<&Occupant> {
        self.objects.last()
    }

    pub(crate) fn add_object(&mut self, occupant: Occupant) {
        self.objects.push(occupant);
    }

    pub(crate) fn remove_object(&mut self, id: ObjectId) -> Option<Occupant> {
        let pos = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(pos))
    }
}
