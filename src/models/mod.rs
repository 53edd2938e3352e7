pub mod breakdown;
pub mod client;
pub mod job;
pub mod settings;
pub mod sheet;

pub use breakdown::CostBreakdown;
pub use client::{
    Address, Client, ClientCreate, ClientOverview, ClientQuery, ClientStatus, ClientType,
    ClientUpdate,
};
pub use job::{GsmPriceMode, JobSpecification, JobUpdate, LaminationType, PressCostModel};
pub use settings::{BindingOption, PaperType, PriceListSettings};
pub use sheet::{SheetSize, CUSTOM_SHEET_ID, GSM_LADDER, SHEET_SIZES};
