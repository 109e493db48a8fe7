//! Aircart
//!
//! Aircart is the client-side cart and live catalog synchronization core
//! for an air-conditioner marketplace storefront: a persisted cart store
//! with derived aggregates, and a real-time listing cache reconciled from
//! a remote data service's change stream.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod notify;
pub mod source;
pub mod storage;
pub mod store;
pub mod sync;
