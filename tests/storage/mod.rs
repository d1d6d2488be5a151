//! Storage layer tests against on-disk SQLite databases in temp directories
