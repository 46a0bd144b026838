pub mod aggregation;
pub mod canonical;
pub mod categorization;
pub mod error;
pub mod fraction_utils;
pub mod parser;
pub mod storage;
pub mod store;
pub mod unit_system;
pub mod units;

// Re-export commonly used types
pub use aggregation::{
    AggregatedIngredient, IngredientAggregationService, aggregate_ingredients, format_aggregated,
};
pub use canonical::canonicalize;
pub use categorization::{CategorizationService, Category, categorize};
pub use error::{GroceryError, GroceryResult};
pub use parser::{ParsedIngredient, parse};
pub use storage::{
    ChangeFeed, ContextFeed, ContextWriter, ListStorage, MemoryStorage, SharedStorage,
    StorageChange, StorageContext,
};
pub use store::{GroceryEntry, GroceryList, normalized_key};
pub use unit_system::{UnitSystem, convert_ingredient_text};
pub use units::{ReferenceAmount, simple_conversion, to_reference_units};
