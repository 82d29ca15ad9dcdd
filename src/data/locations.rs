//! Location catalogs - observable save-flag checkpoints, one catalog per
//! category. Ids are unique across the whole load; a location belongs to
//! exactly one category.

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Substring identifying the goal boss location.
pub const GOAL_LOCATION_MARKER: &str = "Lord of Cinder";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationCategory {
    Boss,
    Item,
    Bonfire,
    Door,
    FogWall,
    Misc,
}

impl LocationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationCategory::Boss => "boss",
            LocationCategory::Item => "item",
            LocationCategory::Bonfire => "bonfire",
            LocationCategory::Door => "door",
            LocationCategory::FogWall => "fog_wall",
            LocationCategory::Misc => "misc",
        }
    }
}

/// One observable checkpoint: a single bit in the game's save-flag block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Archipelago location id, unique per loaded catalog.
    pub id: i64,
    pub name: String,
    /// Address of the save-flag byte.
    pub address: u64,
    /// Bit within that byte; set means completed.
    pub address_bit: u8,
    #[serde(skip, default = "default_category")]
    pub category: LocationCategory,
}

fn default_category() -> LocationCategory {
    LocationCategory::Misc
}

#[derive(Debug, Deserialize)]
struct RawCatalogs {
    boss: Vec<Location>,
    item: Vec<Location>,
    bonfire: Vec<Location>,
    door: Vec<Location>,
    fog_wall: Vec<Location>,
    misc: Vec<Location>,
}

/// All location catalogs for one session, loaded fresh per connect.
#[derive(Debug)]
pub struct LocationCatalogs {
    pub boss: Vec<Location>,
    pub item: Vec<Location>,
    pub bonfire: Vec<Location>,
    pub door: Vec<Location>,
    pub fog_wall: Vec<Location>,
    pub misc: Vec<Location>,
}

impl LocationCatalogs {
    /// Load the embedded catalogs and validate id uniqueness.
    pub fn load() -> Result<Self, DataError> {
        Self::from_json(include_str!("locations.json"))
    }

    pub fn from_json(raw: &str) -> Result<Self, DataError> {
        let raw: RawCatalogs = serde_json::from_str(raw)?;

        let mut catalogs = Self {
            boss: raw.boss,
            item: raw.item,
            bonfire: raw.bonfire,
            door: raw.door,
            fog_wall: raw.fog_wall,
            misc: raw.misc,
        };
        for (category, locations) in catalogs.by_category_mut() {
            for location in locations {
                location.category = category;
            }
        }

        let mut seen = std::collections::HashSet::new();
        for location in catalogs.all() {
            if !seen.insert(location.id) {
                return Err(DataError::Invariant(format!(
                    "duplicate location id {}",
                    location.id
                )));
            }
        }

        Ok(catalogs)
    }

    /// Per-category views, in monitor launch order.
    pub fn by_category(&self) -> [(LocationCategory, &Vec<Location>); 6] {
        [
            (LocationCategory::Boss, &self.boss),
            (LocationCategory::Item, &self.item),
            (LocationCategory::Bonfire, &self.bonfire),
            (LocationCategory::Door, &self.door),
            (LocationCategory::FogWall, &self.fog_wall),
            (LocationCategory::Misc, &self.misc),
        ]
    }

    fn by_category_mut(&mut self) -> [(LocationCategory, &mut Vec<Location>); 6] {
        [
            (LocationCategory::Boss, &mut self.boss),
            (LocationCategory::Item, &mut self.item),
            (LocationCategory::Bonfire, &mut self.bonfire),
            (LocationCategory::Door, &mut self.door),
            (LocationCategory::FogWall, &mut self.fog_wall),
            (LocationCategory::Misc, &mut self.misc),
        ]
    }

    pub fn all(&self) -> impl Iterator<Item = &Location> {
        self.by_category()
            .into_iter()
            .flat_map(|(_, locations)| locations.iter())
    }

    /// The designated goal location, if present in the boss catalog.
    pub fn goal(&self) -> Option<&Location> {
        self.boss
            .iter()
            .find(|location| location.name.contains(GOAL_LOCATION_MARKER))
    }
}
