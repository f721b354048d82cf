//! Input planning for one game's trade screens.

use crate::builder::{build_category_graph, build_single_graph};
use crate::catalog::{Catalog, CatalogError, Sort};
use crate::graph::{GraphError, InputGraph, NodeId};
use crate::input::Input;
use mrprog_core::{Chip, Part, TradeItem};

/// Input graphs of the chip and part trade screens of one game.
///
/// The chip graph starts on the first entry of the ID sort; the part graph
/// on the first part, with the catalog's "nothing" entry after the last one.
#[derive(Debug, Clone)]
pub struct InputPlanner {
    game: u8,
    starting_part: String,
    chips: InputGraph<Chip>,
    chip_root: NodeId,
    parts: InputGraph<Part>,
    part_root: NodeId,
}

impl InputPlanner {
    pub fn new(catalog: &Catalog) -> Result<Self, CatalogError> {
        let orders = Sort::ALL
            .into_iter()
            .map(|sort| catalog.chip_order(sort).map(<[Chip]>::to_vec))
            .collect::<Result<Vec<_>, _>>()?;
        let (chips, chip_root) = build_category_graph(orders)?;
        let (parts, part_root) =
            build_single_graph(catalog.parts.clone(), catalog.nothing.clone())?;

        Ok(Self {
            game: catalog.game,
            starting_part: catalog.starting_part.clone(),
            chips,
            chip_root,
            parts,
            part_root,
        })
    }

    pub fn game(&self) -> u8 {
        self.game
    }

    /// Label under the cursor when the part screen opens.
    pub fn starting_part(&self) -> &str {
        &self.starting_part
    }

    pub fn chip_inputs(&self, chip: &Chip) -> Result<Vec<Input>, GraphError> {
        plan(&self.chips, self.chip_root, chip)
    }

    pub fn part_inputs(&self, part: &Part) -> Result<Vec<Input>, GraphError> {
        plan(&self.parts, self.part_root, part)
    }

    pub fn inputs_for(&self, item: &TradeItem) -> Result<Vec<Input>, GraphError> {
        match item {
            TradeItem::Chip(chip) => self.chip_inputs(chip),
            TradeItem::Part(part) => self.part_inputs(part),
        }
    }
}

fn plan<T>(graph: &InputGraph<T>, root: NodeId, target: &T) -> Result<Vec<Input>, GraphError>
where
    T: PartialEq + std::fmt::Debug,
{
    Ok(graph
        .search(root, target)?
        .into_iter()
        .map(|step| step.input)
        .collect())
}
