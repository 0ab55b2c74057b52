//! Prelude module - common imports for sheetcalc users
//!
//! ```rust
//! use sheetcalc::prelude::*;
//! ```

pub use crate::{
    // Main types
    Sheet,

    // Cell types
    Cell,
    CellContent,
    CellError,
    CellValue,

    // Addressing
    Position,
    Size,

    // Error types
    Error,
    Result,
};
