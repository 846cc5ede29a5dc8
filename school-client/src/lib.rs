//! School Client - data access for the school administration store
//!
//! Repositories for the four tables, the joined assignment read, the report
//! gateway, and view controllers, all over an injected [`DataStore`].

pub mod config;
pub mod controller;
pub mod error;
pub mod join;
pub mod logger;
pub mod report;
pub mod repository;
pub mod store;

pub use config::{ClientConfig, LogConfig};
pub use controller::{
    AssignmentController, ComboOption, CrudController, Notice, NoticeLevel, ReportController,
};
pub use error::{ClientError, ClientResult};
pub use join::{AssignmentRow, Reference, join_assignments};
pub use report::{CannedQuery, ReportGateway};
pub use repository::{
    AssignmentListing, AssignmentRepository, Entity, JobTitleRepository, Repository,
    ScheduleRepository, UserRepository,
};
pub use store::{DataStore, EqFilter, MemoryStore, RestStore, SelectQuery, SortDirection};

// Re-export shared types for convenience
pub use shared::models::*;
pub use shared::{ErrorKind, Outcome, StoreError, StoreResult};
