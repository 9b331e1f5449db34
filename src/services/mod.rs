//! Service layer for Momentera
//!
//! The service layer provides business logic on top of the session and the
//! storage layer, handling validation, computed views, and cross-entity
//! operations.

pub mod auth;
pub mod budget;
pub mod event;
pub mod query;
pub mod schedule;
pub mod task;

pub use auth::AuthService;
pub use budget::{BudgetOverview, BudgetService, EventBudgetSummary};
pub use event::{EventService, NewEvent};
pub use query::{ArchiveFilter, EventFilter, EventSort, TaskSort};
pub use schedule::{Countdown, ScheduleService};
pub use task::{NewTask, TaskService};
