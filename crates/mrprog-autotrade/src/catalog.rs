//! Game data consumed by the trader.
//!
//! A [`Catalog`] lists, for one game, the order in which tradable chips
//! appear under each sort of the chip trade screen and the order of tradable
//! parts on the part trade screen. Catalogs are supplied by game-data files;
//! this crate only reads them.

use mrprog_core::{Chip, Part, normalize_color};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Sort categories of the chip trade screen, in the order `+` cycles them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    Id,
    Abcde,
    Code,
    Attack,
    Element,
    No,
    Mb,
}

impl Sort {
    pub const ALL: [Sort; 7] = [
        Sort::Id,
        Sort::Abcde,
        Sort::Code,
        Sort::Attack,
        Sort::Element,
        Sort::No,
        Sort::Mb,
    ];
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sort::Id => "ID",
            Sort::Abcde => "ABCDE",
            Sort::Code => "Code",
            Sort::Attack => "Attack",
            Sort::Element => "Element",
            Sort::No => "No",
            Sort::Mb => "MB",
        };
        f.write_str(name)
    }
}

/// Tradable items of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub game: u8,
    /// Chip order under each sort.
    pub chip_orders: BTreeMap<Sort, Vec<Chip>>,
    /// Tradable parts in screen order.
    pub parts: Vec<Part>,
    /// Entry shown after the last part.
    pub nothing: Part,
    /// Label under the cursor when the part screen opens.
    pub starting_part: String,
    #[serde(default)]
    pub illegal_chips: Vec<Chip>,
    #[serde(default)]
    pub illegal_parts: Vec<Part>,
}

impl Catalog {
    /// Check that every sort has an ordering.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for sort in Sort::ALL {
            self.chip_order(sort)?;
        }
        Ok(())
    }

    pub fn chip_order(&self, sort: Sort) -> Result<&[Chip], CatalogError> {
        self.chip_orders
            .get(&sort)
            .map(Vec::as_slice)
            .ok_or(CatalogError::MissingSort {
                game: self.game,
                sort,
            })
    }

    /// Tradable chips in ID order.
    pub fn tradable_chips(&self) -> &[Chip] {
        self.chip_order(Sort::Id).unwrap_or_default()
    }

    pub fn tradable_legal_chips(&self) -> Vec<&Chip> {
        let illegal: HashSet<&Chip> = self.illegal_chips.iter().collect();
        self.tradable_chips()
            .iter()
            .filter(|chip| !illegal.contains(chip))
            .collect()
    }

    pub fn tradable_legal_parts(&self) -> Vec<&Part> {
        let illegal: HashSet<&Part> = self.illegal_parts.iter().collect();
        self.parts
            .iter()
            .filter(|part| !illegal.contains(part))
            .collect()
    }

    /// Chips whose name matches, ignoring case.
    pub fn chips_named(&self, name: &str) -> Vec<&Chip> {
        self.tradable_chips()
            .iter()
            .filter(|chip| chip.name.eq_ignore_ascii_case(name))
            .collect()
    }

    pub fn find_chip(&self, name: &str, code: char) -> Option<&Chip> {
        let code = code.to_ascii_uppercase();
        self.chips_named(name)
            .into_iter()
            .find(|chip| chip.code == code)
    }

    pub fn parts_named(&self, name: &str) -> Vec<&Part> {
        self.parts
            .iter()
            .filter(|part| part.name.eq_ignore_ascii_case(name))
            .collect()
    }

    pub fn find_part(&self, name: &str, color: &str) -> Option<&Part> {
        let color = normalize_color(color);
        self.parts_named(name)
            .into_iter()
            .find(|part| part.color == color)
    }
}

/// The catalogs a worker knows, keyed by game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogs {
    pub catalogs: Vec<Catalog>,
}

impl Catalogs {
    pub fn new(catalogs: Vec<Catalog>) -> Self {
        Self { catalogs }
    }

    pub fn for_game(&self, game: u8) -> Result<&Catalog, CatalogError> {
        self.catalogs
            .iter()
            .find(|catalog| catalog.game == game)
            .ok_or(CatalogError::UnsupportedGame(game))
    }

    pub fn games(&self) -> impl Iterator<Item = u8> + '_ {
        self.catalogs.iter().map(|catalog| catalog.game)
    }
}

/// Error reading game data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("no catalog for game {0}")]
    UnsupportedGame(u8),
    #[error("catalog for game {game} has no {sort} ordering")]
    MissingSort { game: u8, sort: Sort },
    #[error("cannot build input graph: {0}")]
    Graph(#[from] crate::graph::GraphError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let ids = vec![
            Chip::new("Cannon", 'A'),
            Chip::new("Cannon", 'B'),
            Chip::new("AirShot", '*'),
        ];
        let chip_orders = Sort::ALL
            .into_iter()
            .map(|sort| (sort, ids.clone()))
            .collect();

        Catalog {
            game: 6,
            chip_orders,
            parts: vec![Part::new("SuprArmr", "White"), Part::new("Custom1", "White")],
            nothing: Part::new("Nothing", "None"),
            starting_part: "SuprArmr".into(),
            illegal_chips: vec![Chip::new("Cannon", 'B')],
            illegal_parts: vec![Part::new("Custom1", "White")],
        }
    }

    #[test]
    fn lookups() {
        let catalog = catalog();
        assert_eq!(catalog.chips_named("cannon").len(), 2);
        assert_eq!(catalog.find_chip("CANNON", 'a'), Some(&Chip::new("Cannon", 'A')));
        assert_eq!(catalog.find_chip("Cannon", 'C'), None);
        assert_eq!(
            catalog.find_part("suprarmr", "white"),
            Some(&Part::new("SuprArmr", "White"))
        );
    }

    #[test]
    fn legal_filters() {
        let catalog = catalog();
        assert_eq!(
            catalog.tradable_legal_chips(),
            vec![&Chip::new("Cannon", 'A'), &Chip::new("AirShot", '*')]
        );
        assert_eq!(catalog.tradable_legal_parts(), vec![&Part::new("SuprArmr", "White")]);
    }

    #[test]
    fn missing_sort() {
        let mut catalog = catalog();
        assert!(catalog.validate().is_ok());
        catalog.chip_orders.remove(&Sort::Mb);
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::MissingSort {
                game: 6,
                sort: Sort::Mb
            })
        );
    }

    #[test]
    fn catalogs_by_game() {
        let catalogs = Catalogs::new(vec![catalog()]);
        assert_eq!(catalogs.for_game(6).unwrap().starting_part, "SuprArmr");
        assert_eq!(catalogs.for_game(3), Err(CatalogError::UnsupportedGame(3)));
        assert_eq!(catalogs.games().collect::<Vec<_>>(), vec![6]);
    }

    #[test]
    fn deserializes_sort_keys() {
        let text = r#"{
            "game": 3,
            "chip_orders": { "id": [{ "name": "Cannon", "code": "A" }] },
            "parts": [],
            "nothing": { "name": "Nothing", "color": "None" },
            "starting_part": "SprArmor"
        }"#;
        let catalog: Catalog = serde_json::from_str(text).unwrap();
        assert_eq!(catalog.chip_order(Sort::Id).unwrap().len(), 1);
        assert!(catalog.illegal_chips.is_empty());
        assert!(catalog.validate().is_err());
    }
}
