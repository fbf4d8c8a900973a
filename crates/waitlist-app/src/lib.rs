// Copyright 2026 Waitlist Dashboard Contributors
// Licensed under the Apache License, Version 2.0

pub mod filters;
pub mod forms;
pub mod ids;
pub mod model;
pub mod search;
pub mod seed;
pub mod state;
pub mod store;

pub use filters::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use search::*;
pub use state::*;
pub use store::*;
