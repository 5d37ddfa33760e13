//! Service layer for business logic.
//!
//! Separates business logic from UI handlers for better testability and maintainability.

pub mod clipboard_service;
pub mod directory_service;
pub mod file_action_service;
pub mod popover_controller;
pub mod thumbnail_service;
pub mod video_frame_service;
pub mod watch_service;

pub use directory_service::DirectoryResolver;
pub use popover_controller::PopoverController;
