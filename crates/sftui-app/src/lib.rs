// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod details;
pub mod edit;
pub mod filter;
pub mod focus;
pub mod index;
pub mod modal;
pub mod model;
pub mod selection;
pub mod state;
pub mod store;
pub mod usage;
pub mod viewport;

pub use details::{DetailField, DetailsFieldComposer, FieldDescriptor, FieldKind};
pub use edit::*;
pub use filter::*;
pub use focus::*;
pub use index::*;
pub use modal::*;
pub use model::*;
pub use selection::*;
pub use state::*;
pub use store::*;
pub use usage::*;
pub use viewport::*;
