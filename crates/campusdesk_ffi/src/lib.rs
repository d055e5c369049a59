//! Flutter-facing bindings for the CampusDesk admin core.

pub mod api;
