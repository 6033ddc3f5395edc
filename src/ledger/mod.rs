pub mod filter;
pub mod record;

pub use filter::{FilterChange, FilterState, SavingsTypeFilter, StatusFilter};
pub use record::{PaymentRecord, PaymentStatus, ReportResult, SavingsType};
