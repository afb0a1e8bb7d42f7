pub mod analytics;
pub mod contact;
pub mod events;
pub mod filter;
pub mod metrics;
pub mod nav;
pub mod page;
pub mod reveal;
pub mod schedule;
pub mod scroll;
pub mod store;
pub mod theme;
pub mod typing;

#[cfg(not(target_arch = "wasm32"))]
pub mod backend;

#[cfg(target_arch = "wasm32")]
pub mod frontend;
