// Application layer - Use cases and the history access seam
pub mod composer;
pub mod dashboard_service;
pub mod history_repository;
