//! Core types and operations of a heap-addressed Merkle tree commitment scheme.
//!
//! An ordered list of labels is laid out as an implicit binary heap: the label at position `i`
//! becomes a node whose children sit at positions `2i + 1` and `2i + 2`. Every node carries a
//! `(level, index)` coordinate, and the digest of the root is the commitment to the whole list.
//!
//! This crate builds such trees, generates witnesses proving that one or many nodes exist under a
//! commitment, and verifies those witnesses without access to the tree.
//!
//! The core types and verification routines of this crate do not require the standard library,
//! but do require Rust's alloc crate.

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

pub mod cursor;
pub mod hasher;
pub mod key_path;
pub mod node;
pub mod proof;
pub mod tree;

pub use hasher::{BinaryHash, Digest};
pub use key_path::KeyPath;
pub use node::Node;
pub use tree::{EmptyInput, Tree};
