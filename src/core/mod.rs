pub mod action;
pub mod observer;
pub mod view_model;

pub use action::{Action, NotifyLevel};
pub use observer::{DashboardEvent, DashboardObserver};
pub use view_model::{ActiveTab, DashboardViewModel, FetchTicket, ViewState};
