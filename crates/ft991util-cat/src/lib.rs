//! ft991util-cat: the FT-991 CAT protocol engine.
//!
//! Layered bottom-up:
//!
//! - [`protocol`] -- frame-level encode/decode (`;` terminator, `?;` reject)
//! - [`tables`] -- CTCSS tone and DCS code wire-index tables
//! - [`commands`] -- the closed per-mnemonic command codec
//! - [`memory`] / [`menu`] -- record models with field validation
//! - [`rig`] / [`builder`] -- the [`Ft991`] device handle
//!
//! Everything below [`rig`] is pure (no I/O) and exercised by unit tests;
//! [`rig`] drives a [`Transport`](ft991util_core::Transport) and is tested
//! against the mock transport.

pub mod builder;
pub mod commands;
pub mod memory;
pub mod menu;
pub mod protocol;
pub mod rig;
pub mod tables;

pub use builder::Ft991Builder;
pub use commands::{ChannelFrame, Mnemonic, ToneMode};
pub use memory::{CHANNEL_MAX, CHANNEL_MIN, MemoryChannel, TAG_MAX_LEN};
pub use menu::{MENU_ITEM_MAX, MENU_ITEM_MIN, MenuDomain, MenuSetting};
pub use rig::Ft991;
