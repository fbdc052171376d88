//! erdforge - Entity-Relationship schema transformation engine
//!
//! Takes an editor's entity list and moves it toward a star schema: infers
//! foreign keys from naming conventions, classifies fact and dimension tables,
//! splits oversized entities, and synthesizes missing dimension and date tables.
//! Also ships the editor's recommendation report, importers and grid layout.

pub mod core;
