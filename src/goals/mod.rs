pub mod catalog;
pub mod normalize;
pub mod parser;
pub mod rows;
pub mod schema;

pub use catalog::{build_catalog, CatalogOptions, EmptyCellPolicy, GoalCatalog};
pub use normalize::normalize_text;
pub use parser::{parse_goal_text, DEFAULT_SECTION};
pub use rows::{GoalColumns, MonthRow};
pub use schema::{Goal, GoalId, GoalKind, GoalKindParseError, ParsedItem};
