pub mod analysis;
pub mod chat;
pub mod code_block;
pub mod counter;
pub mod sidebar;
pub mod toasts;
