//! Relaymap Core Types
//!
//! This crate provides the foundational types shared by the Relaymap layout
//! engine and its callers. It includes:
//!
//! - **Geometry**: Points and bounding boxes in layout space ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Roles**: The closed set of relay roles and their visual/physical lookup table
//!   ([`role::Role`])

pub mod color;
pub mod geometry;
pub mod role;
