// Application layer - dashboard composition use cases
pub mod action_builder;
pub mod card_adapters;
pub mod dashboard_repository;
pub mod dashboard_service;
pub mod fault;
pub mod route_registry;
pub mod route_resolver;
pub mod sanitizer;
pub mod shift_fallback;
