// Domain layer - records, cards and the dashboard view model
pub mod card;
pub mod dashboard;
pub mod principal;
pub mod records;
pub mod route;
