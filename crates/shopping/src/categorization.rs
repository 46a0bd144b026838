use std::collections::BTreeMap;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Category for grocery store organization
///
/// Declaration order is display order, and also the order keywords are
/// tested in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    Serialize,
)]
pub enum Category {
    Produce,
    #[strum(serialize = "Meat & Seafood")]
    #[serde(rename = "Meat & Seafood")]
    MeatSeafood,
    #[strum(serialize = "Dairy & Eggs")]
    #[serde(rename = "Dairy & Eggs")]
    DairyEggs,
    Pantry,
    #[strum(serialize = "Grains & Pasta")]
    #[serde(rename = "Grains & Pasta")]
    GrainsPasta,
    Frozen,
    Beverages,
    Bakery,
    Snacks,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn definition(&self) -> &'static CategoryDefinition {
        CATEGORIES
            .iter()
            .find(|d| d.category == *self)
            .unwrap_or(&CATEGORIES[CATEGORIES.len() - 1])
    }

    pub fn icon(&self) -> &'static str {
        self.definition().icon
    }

    pub fn color(&self) -> &'static str {
        self.definition().color
    }
}

/// Store section and the keywords that route an ingredient to it
#[derive(Debug)]
pub struct CategoryDefinition {
    pub category: Category,
    pub keywords: &'static [&'static str],
    pub display_rank: u8,
    pub icon: &'static str,
    pub color: &'static str,
}

pub const CATEGORIES: &[CategoryDefinition] = &[
    CategoryDefinition {
        category: Category::Produce,
        keywords: &[
            "apple",
            "banana",
            "orange",
            "lemon",
            "lime",
            "grape",
            "berry",
            "strawberry",
            "blueberry",
            "tomato",
            "onion",
            "garlic",
            "potato",
            "carrot",
            "celery",
            "lettuce",
            "spinach",
            "kale",
            "broccoli",
            "cauliflower",
            "cabbage",
            "pepper",
            "bell pepper",
            "cucumber",
            "zucchini",
            "mushroom",
            "avocado",
            "corn",
            "peas",
            "bean",
            "green bean",
            "asparagus",
            "artichoke",
            "eggplant",
            "squash",
            "pumpkin",
            "radish",
            "turnip",
            "beet",
            "herb",
            "basil",
            "parsley",
            "cilantro",
            "rosemary",
            "thyme",
            "oregano",
            "mint",
            "ginger",
            "scallion",
            "shallot",
            "leek",
        ],
        display_rank: 0,
        icon: "🥬",
        color: "emerald",
    },
    CategoryDefinition {
        category: Category::MeatSeafood,
        keywords: &[
            "chicken",
            "beef",
            "pork",
            "lamb",
            "turkey",
            "duck",
            "bacon",
            "sausage",
            "ham",
            "fish",
            "salmon",
            "tuna",
            "cod",
            "shrimp",
            "crab",
            "lobster",
            "mussel",
            "clam",
            "oyster",
            "scallop",
            "ground beef",
            "ground turkey",
            "ground pork",
            "steak",
            "ribs",
        ],
        display_rank: 1,
        icon: "🥩",
        color: "red",
    },
    CategoryDefinition {
        category: Category::DairyEggs,
        keywords: &[
            "milk",
            "cheese",
            "butter",
            "cream",
            "yogurt",
            "sour cream",
            "cottage cheese",
            "cream cheese",
            "mozzarella",
            "cheddar",
            "parmesan",
            "feta",
            "ricotta",
            "egg",
            "eggs",
            "heavy cream",
            "half and half",
            "buttermilk",
            "greek yogurt",
        ],
        display_rank: 2,
        icon: "🥛",
        color: "blue",
    },
    CategoryDefinition {
        category: Category::Pantry,
        keywords: &[
            "flour",
            "sugar",
            "salt",
            "pepper",
            "oil",
            "olive oil",
            "vegetable oil",
            "canola oil",
            "vinegar",
            "balsamic",
            "soy sauce",
            "worcestershire",
            "ketchup",
            "mustard",
            "mayonnaise",
            "honey",
            "maple syrup",
            "molasses",
            "vanilla",
            "cinnamon",
            "nutmeg",
            "paprika",
            "cumin",
            "coriander",
            "turmeric",
            "curry",
            "chili powder",
            "cayenne",
            "oregano",
            "thyme",
            "rosemary",
            "bay leaf",
            "clove",
            "allspice",
            "cardamom",
            "saffron",
        ],
        display_rank: 3,
        icon: "🥫",
        color: "amber",
    },
    CategoryDefinition {
        category: Category::GrainsPasta,
        keywords: &[
            "rice",
            "pasta",
            "spaghetti",
            "penne",
            "macaroni",
            "noodle",
            "bread",
            "flour",
            "quinoa",
            "barley",
            "oats",
            "oatmeal",
            "couscous",
            "bulgur",
            "farro",
            "millet",
            "breadcrumbs",
            "panko",
            "cracker",
            "tortilla",
            "wrap",
            "pita",
        ],
        display_rank: 4,
        icon: "🌾",
        color: "yellow",
    },
    CategoryDefinition {
        category: Category::Frozen,
        keywords: &[
            "frozen",
            "ice cream",
            "frozen vegetable",
            "frozen fruit",
            "frozen berry",
            "frozen peas",
            "frozen corn",
            "frozen spinach",
        ],
        display_rank: 5,
        icon: "🧊",
        color: "cyan",
    },
    CategoryDefinition {
        category: Category::Beverages,
        keywords: &[
            "juice",
            "soda",
            "water",
            "coffee",
            "tea",
            "beer",
            "wine",
            "broth",
            "stock",
            "chicken broth",
            "beef broth",
            "vegetable broth",
        ],
        display_rank: 6,
        icon: "🥤",
        color: "purple",
    },
    CategoryDefinition {
        category: Category::Bakery,
        keywords: &["bread", "bagel", "muffin", "croissant", "roll", "bun", "loaf"],
        display_rank: 7,
        icon: "🍞",
        color: "orange",
    },
    CategoryDefinition {
        category: Category::Snacks,
        keywords: &[
            "chip",
            "cracker",
            "cookie",
            "pretzel",
            "nut",
            "almond",
            "walnut",
            "peanut",
            "cashew",
            "pistachio",
            "trail mix",
            "granola",
            "popcorn",
        ],
        display_rank: 8,
        icon: "🍿",
        color: "pink",
    },
    // Terminal fallback, never matched by keyword
    CategoryDefinition {
        category: Category::Other,
        keywords: &[],
        display_rank: 9,
        icon: "📦",
        color: "slate",
    },
];

/// Categorization Service
///
/// Stateless domain service that maps ingredient names to store sections by
/// substring keyword match. Categories are tried in declaration order and the
/// first one with a matching keyword wins, so "chicken broth" lands in
/// Meat & Seafood before Beverages is ever consulted.
pub struct CategorizationService;

impl CategorizationService {
    /// Categorize an ingredient by name. Total: unknown names are `Other`.
    pub fn categorize(ingredient_name: &str) -> Category {
        let normalized = ingredient_name.trim().to_lowercase();

        CATEGORIES
            .iter()
            .find(|d| d.keywords.iter().any(|k| normalized.contains(k)))
            .map(|d| d.category)
            .unwrap_or(Category::Other)
    }

    /// Group items by category, in display order, skipping empty categories.
    /// Items keep their relative order inside a group.
    pub fn group_by_category<'a, I, S>(items: I) -> Vec<(Category, Vec<&'a str>)>
    where
        I: IntoIterator<Item = &'a S>,
        S: AsRef<str> + ?Sized + 'a,
    {
        let mut grouped: BTreeMap<Category, Vec<&'a str>> = BTreeMap::new();

        for item in items {
            let item: &'a str = item.as_ref();
            grouped
                .entry(Self::categorize(item))
                .or_default()
                .push(item);
        }

        grouped.into_iter().collect()
    }
}

/// Shorthand for [`CategorizationService::categorize`]
pub fn categorize(ingredient_name: &str) -> Category {
    CategorizationService::categorize(ingredient_name)
}
