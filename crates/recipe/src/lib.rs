//! Recipe aggregate: the Draft → Published → Archived workflow, owned
//! ingredients, category tagging, and the repository contracts the
//! application layer loads them through.

mod aggregate;
mod category;
mod ingredient;
mod repository;
mod types;

pub use aggregate::{CategoryAssignment, Recipe};
pub use category::Category;
pub use ingredient::RecipeIngredient;
pub use repository::{CategoryRepository, RecipeFilter, RecipeRepository};
pub use types::{DishType, RecipeStatus};
