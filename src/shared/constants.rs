/// Separator used when a breadcrumb is rendered as a single string
pub const PATH_SEPARATOR: &str = " / ";

/// Display label for the (empty) breadcrumb of a root category
pub const TOP_LEVEL_LABEL: &str = "Top Level";

/// Maximum length of a category name, matches the `categories.name` column
pub const MAX_NAME_LENGTH: u64 = 255;
