//! studyflow-core — Answer normalization and grading engine.
//!
//! This crate turns loosely-typed question records into canonical
//! questions, parses their option lists, grades submitted answers and
//! derives the review highlighting and per-tag analytics built on top.
//! Everything is synchronous and free of I/O except the file loaders.

pub mod error;
pub mod grading;
pub mod ingest;
pub mod model;
pub mod options;
pub mod report;
pub mod statistics;

