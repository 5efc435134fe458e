//! Block configuration schemas
//!
//! Every block kind carries its own configuration struct and renders its own
//! field list through [`BlockSchema`]; [`BlockConfig`] dispatches by variant.

mod config;
mod field;
mod kind;

pub use config::{
    BlockConfig, BlockSchema, CacheConfig, CacheOperation, ConditionalConfig, DatabaseConfig,
    FunctionCallConfig, LoopConfig, LoopType, SchemaContext, SwitchConfig,
};
pub use field::{FieldKey, FieldSpec, SelectOption, Widget};
pub use kind::{BlockKind, PaletteEntry};
