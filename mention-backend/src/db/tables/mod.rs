//! Database model modules - extends Database with domain-specific methods
//!
//! Each module adds `impl Database` blocks with methods for a specific table group.

mod bot_state;          // bot_state (resume watermark)
mod processed_mentions; // processed_mentions (mentions already answered)
