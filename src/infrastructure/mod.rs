// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod fixture_repository;
pub mod route_table;
