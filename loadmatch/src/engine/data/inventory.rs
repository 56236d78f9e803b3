use crate::engine::entry::{Load, LoadStatus};
use std::collections::HashMap;
use std::path::Path;

/// In-memory load store. Keeps insertion order so search results and
/// tie-breaks stay deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    loads: Vec<Load>,
    index: HashMap<u64, usize>,
}

#[allow(unused)]
impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON array of loads, typically at startup.
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let loads: Vec<Load> = serde_json::from_str(&contents)?;
        let mut inventory = Inventory::new();
        for load in loads {
            inventory
                .add_load(load)
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        Ok(inventory)
    }

    pub fn add_load(&mut self, load: Load) -> Result<(), String> {
        if self.index.contains_key(&load.load_id) {
            return Err(format!("Load {} already exists", load.load_id));
        }
        self.index.insert(load.load_id, self.loads.len());
        self.loads.push(load);
        Ok(())
    }

    pub fn get_load(&self, load_id: u64) -> Option<&Load> {
        self.index.get(&load_id).map(|&i| &self.loads[i])
    }

    /// Status transitions happen outside the matching engine, e.g. when a
    /// load gets booked.
    pub fn set_status(&mut self, load_id: u64, status: LoadStatus) -> Result<(), String> {
        match self.index.get(&load_id) {
            Some(&i) => {
                self.loads[i].status = status;
                Ok(())
            }
            None => Err(format!("Load {} does not exist", load_id)),
        }
    }

    /// Snapshot of available loads in insertion order.
    pub fn list_available(&self) -> Vec<Load> {
        self.loads
            .iter()
            .filter(|l| l.is_available())
            .cloned()
            .collect()
    }

    pub fn available_count(&self) -> usize {
        self.loads.iter().filter(|l| l.is_available()).count()
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn load(id: u64) -> Load {
        let pickup = NaiveDate::from_ymd_opt(2025, 9, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Load {
            load_id: id,
            origin: "Chicago, IL".to_string(),
            destination: "Dallas, TX".to_string(),
            pickup_datetime: pickup,
            delivery_datetime: pickup + chrono::Duration::days(2),
            equipment_type: "Dry Van".to_string(),
            rate: dec!(2.50),
            weight: 20000,
            commodity_type: "Electronics".to_string(),
            num_of_pieces: None,
            miles: None,
            dimensions: None,
            notes: None,
            status: LoadStatus::Available,
        }
    }

    #[test]
    fn test_add_and_get() {
        let mut inventory = Inventory::new();
        inventory.add_load(load(1)).unwrap();
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.get_load(1).unwrap().load_id, 1);
        assert!(inventory.get_load(2).is_none());
    }

    #[test]
    fn test_duplicate_load_id_rejected() {
        let mut inventory = Inventory::new();
        inventory.add_load(load(1)).unwrap();
        assert!(inventory.add_load(load(1)).is_err());
    }

    #[test]
    fn test_list_available_filters_and_keeps_order() {
        let mut inventory = Inventory::new();
        inventory.add_load(load(3)).unwrap();
        inventory.add_load(load(1)).unwrap();
        inventory.add_load(load(2)).unwrap();
        inventory.set_status(1, LoadStatus::Booked).unwrap();

        let available = inventory.list_available();
        let ids: Vec<u64> = available.iter().map(|l| l.load_id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(inventory.available_count(), 2);
    }

    #[test]
    fn test_set_status_unknown_load() {
        let mut inventory = Inventory::new();
        assert!(inventory.set_status(99, LoadStatus::Booked).is_err());
    }

    #[test]
    fn test_seed_file_round_trip() {
        let mut inventory = Inventory::new();
        inventory.add_load(load(1)).unwrap();
        inventory.add_load(load(2)).unwrap();

        let file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(&file, &inventory.list_available()).unwrap();

        let seeded = Inventory::from_seed_file(file.path()).unwrap();
        assert_eq!(seeded.len(), 2);
        assert_eq!(seeded.get_load(2).unwrap().origin, "Chicago, IL");
    }
}
