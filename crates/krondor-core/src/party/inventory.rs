//! Inventories and the item catalogue
//!
//! The meaning of an item's `quantity` depends on its kind: a stack size
//! for rations, remaining charges for lights, and a condition percentage
//! for weapons and armor.

use crate::identity::{ItemIndex, Royals};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Sword,
    Staff,
    Crossbow,
    Armor,
    Light,
    Ration,
    Note,
    Money,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemInfo {
    pub index: ItemIndex,
    pub name: &'static str,
    pub kind: ItemKind,
    pub stackable: bool,
    /// Removed once its quantity reaches zero
    pub consumable: bool,
}

pub const SWORD: ItemIndex = ItemIndex(0);
pub const QUARTERSTAFF: ItemIndex = ItemIndex(1);
pub const CROSSBOW: ItemIndex = ItemIndex(2);
pub const STANDARD_ARMOR: ItemIndex = ItemIndex(3);
pub const TORCH: ItemIndex = ItemIndex(4);
pub const LANTERN: ItemIndex = ItemIndex(5);
pub const RATIONS: ItemIndex = ItemIndex(6);
pub const SPOILED_RATIONS: ItemIndex = ItemIndex(7);
pub const POISONED_RATIONS: ItemIndex = ItemIndex(8);
pub const NAPTHA_MASK: ItemIndex = ItemIndex(9);
pub const NOTE: ItemIndex = ItemIndex(10);
pub const ALE: ItemIndex = ItemIndex(11);
pub const SOVEREIGNS: ItemIndex = ItemIndex(12);
pub const ROYALS: ItemIndex = ItemIndex(13);

const CATALOGUE: [ItemInfo; 14] = [
    item(SWORD, "Sword", ItemKind::Sword, false, false),
    item(QUARTERSTAFF, "Quarterstaff", ItemKind::Staff, false, false),
    item(CROSSBOW, "Crossbow", ItemKind::Crossbow, false, false),
    item(STANDARD_ARMOR, "Standard Armor", ItemKind::Armor, false, false),
    item(TORCH, "Torch", ItemKind::Light, false, true),
    item(LANTERN, "Lantern", ItemKind::Light, false, false),
    item(RATIONS, "Rations", ItemKind::Ration, true, true),
    item(SPOILED_RATIONS, "Spoiled Rations", ItemKind::Ration, true, true),
    item(POISONED_RATIONS, "Poisoned Rations", ItemKind::Ration, true, true),
    item(NAPTHA_MASK, "Naptha Mask", ItemKind::Other, false, false),
    item(NOTE, "Note", ItemKind::Note, false, false),
    item(ALE, "Ale", ItemKind::Other, true, true),
    item(SOVEREIGNS, "Sovereigns", ItemKind::Money, true, true),
    item(ROYALS, "Royals", ItemKind::Money, true, true),
];

const fn item(
    index: ItemIndex,
    name: &'static str,
    kind: ItemKind,
    stackable: bool,
    consumable: bool,
) -> ItemInfo {
    ItemInfo {
        index,
        name,
        kind,
        stackable,
        consumable,
    }
}

/// Catalogue entry for `index`
pub fn item_info(index: ItemIndex) -> Option<&'static ItemInfo> {
    CATALOGUE.get(usize::from(index.0))
}

pub fn item_name(index: ItemIndex) -> &'static str {
    item_info(index).map(|i| i.name).unwrap_or("Unknown Item")
}

/// Purse value of `quantity` units of a money item; `None` for anything else
pub fn money_value(index: ItemIndex, quantity: u32) -> Option<Royals> {
    match index {
        SOVEREIGNS => Some(Royals::from_sovereigns(quantity)),
        ROYALS => Some(Royals(quantity)),
        _ => None,
    }
}

/// Full condition of weapons and armor
pub const FULL_CONDITION: u16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item: ItemIndex,
    pub quantity: u16,
    #[serde(default)]
    pub equipped: bool,
}

impl InventoryItem {
    pub fn new(item: ItemIndex, quantity: u16) -> Self {
        Self {
            item,
            quantity,
            equipped: false,
        }
    }

    pub fn equipped(mut self) -> Self {
        self.equipped = true;
        self
    }

    pub fn info(&self) -> Option<&'static ItemInfo> {
        item_info(self.item)
    }

    pub fn kind(&self) -> ItemKind {
        self.info().map(|i| i.kind).unwrap_or(ItemKind::Other)
    }

    pub fn is_stackable(&self) -> bool {
        self.info().map(|i| i.stackable).unwrap_or(false)
    }

    pub fn is_weapon(&self) -> bool {
        matches!(
            self.kind(),
            ItemKind::Sword | ItemKind::Staff | ItemKind::Crossbow
        )
    }

    /// Weapons and armor below full condition can be repaired by a shop
    pub fn is_repairable(&self) -> bool {
        (self.is_weapon() || self.kind() == ItemKind::Armor) && self.quantity < FULL_CONDITION
    }
}

pub const DEFAULT_INVENTORY_SLOTS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<InventoryItem>,
    capacity: usize,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn with_items(items: impl IntoIterator<Item = InventoryItem>) -> Self {
        let mut inventory = Self::default();
        inventory.items.extend(items);
        inventory
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [InventoryItem] {
        &mut self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn find_item(&self, item: ItemIndex) -> Option<usize> {
        self.items.iter().position(|i| i.item == item)
    }

    pub fn have_item(&self, item: ItemIndex) -> bool {
        self.find_item(item).is_some()
    }

    /// Units held: summed stack sizes, or number of entries for unstackable items
    pub fn count(&self, item: ItemIndex) -> u32 {
        self.items
            .iter()
            .filter(|i| i.item == item)
            .map(|i| {
                if i.is_stackable() {
                    u32::from(i.quantity)
                } else {
                    1
                }
            })
            .sum()
    }

    pub fn can_add(&self, item: &InventoryItem) -> bool {
        (item.is_stackable() && self.have_item(item.item)) || self.items.len() < self.capacity
    }

    /// Add an item, merging stacks; returns false when there is no room
    pub fn add_item(&mut self, item: InventoryItem) -> bool {
        if item.is_stackable() {
            if let Some(existing) = self.items.iter_mut().find(|i| i.item == item.item) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
                return true;
            }
        }
        if self.items.len() >= self.capacity {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove up to `units` of `item`; returns how many were removed
    pub fn remove_units(&mut self, item: ItemIndex, units: u32) -> u32 {
        let mut removed = 0;
        while removed < units {
            let Some(pos) = self.find_item(item) else {
                break;
            };
            let entry = &mut self.items[pos];
            if entry.is_stackable() {
                let take = (units - removed).min(u32::from(entry.quantity));
                entry.quantity -= take as u16;
                removed += take;
                if entry.quantity == 0 {
                    self.items.remove(pos);
                }
            } else {
                self.items.remove(pos);
                removed += 1;
            }
        }
        removed
    }

    pub fn remove_at(&mut self, index: usize) -> Option<InventoryItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Position of the first equipped light source
    pub fn equipped_light(&self) -> Option<usize> {
        self.items
            .iter()
            .position(|i| i.equipped && i.kind() == ItemKind::Light)
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(DEFAULT_INVENTORY_SLOTS)
    }
}
