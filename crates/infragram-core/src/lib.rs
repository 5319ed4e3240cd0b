//! Infragram Core Types and Definitions
//!
//! This crate provides the shared vocabulary of the Infragram toolchain:
//!
//! - **Graph**: the resource graph model ([`graph`] module)
//! - **Diagram**: containers, shapes and connectors ([`diagram`] module)
//! - **Geometry**: basic geometric types ([`geometry`] module)
//! - **Colors**: CSS color parsing for styles ([`color::Color`])

pub mod color;
pub mod diagram;
pub mod geometry;
pub mod graph;
