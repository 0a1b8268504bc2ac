pub mod error;
pub mod handlers;
pub mod reports;
pub mod router;
pub mod server;
pub mod state;

pub use error::{ApiError, Result};
pub use reports::{FileReportStore, ReportStore};
pub use router::create_router;
pub use server::run_server;
pub use state::{AppState, SharedState};
