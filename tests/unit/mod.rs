//! Unit tests for individual components

pub mod chess;
