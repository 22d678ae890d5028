mod resolver;

pub use resolver::{Lookup, NutritionFacts, NutritionResolver, NutritionixClient};
