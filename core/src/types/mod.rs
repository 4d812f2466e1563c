//! Domain records exchanged with the backend.
//!
//! # Design
//! Defined independently from the mock server's records; the integration
//! tests catch schema drift. Field names go over the wire in camelCase,
//! optional fields deserialize as `None` when absent, and create/update
//! payloads omit unset fields so the server keeps its current values.

pub mod embryo;
pub mod haras;
pub mod horse;
pub mod stall;
pub mod veterinary;

pub use embryo::{Embryo, EmbryoActivation, EmbryoStatus, NewEmbryo, Parent, Recipient};
pub use haras::{Haras, Location};
pub use horse::{
    BreedingRole, Gender, GenderCount, Horse, HorseStats, HorseStatus, HorseUpdate, Lineage,
    NewHorse, Offspring, StallAssignment,
};
pub use stall::{Dimensions, Stall, StallOccupant, StallStats, StallStatus, StallStatusUpdate, StallType};
pub use veterinary::{
    AlertKind, AlertSeverity, CostSummary, Medicine, MedicineType, MedicineUpdate, MovementKind,
    NewMedicine, NewStock, NewStockMovement, StockAlert, StockMovement, StockStatus, StockUpdate,
    VeterinaryStock,
};
