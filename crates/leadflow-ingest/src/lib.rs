pub mod csv_table;
pub mod error;

pub use csv_table::{LeadTable, column_samples, read_lead_table};
pub use error::IngestError;
