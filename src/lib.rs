//! This crate contains code for an untyped lambda calculus normaliser.

pub mod box_tree_impl;
pub mod end_to_end;
pub mod lexical_analysis;
