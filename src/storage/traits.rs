use serde::Serialize;

/// A favorite as persisted in the `quotes` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuote {
    pub id: i64,
    pub quote: String,
    pub character: String,
    pub image: String,
    pub character_direction: String,
}

/// Fields of a favorite before the store assigns it an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewQuote {
    pub quote: String,
    pub character: String,
    pub image: String,
    pub character_direction: String,
}

pub trait Storage {
    /// Inserts a row and returns the id the store generated for it.
    fn create_quote(&self, quote: &NewQuote) -> anyhow::Result<i64>;
    fn list_quotes(&self) -> anyhow::Result<Vec<SavedQuote>>;
    fn load_quote(&self, id: i64) -> anyhow::Result<Option<SavedQuote>>;
    /// Replaces the quote text of one row. Returns the number of rows affected (0 or 1).
    fn update_quote(&self, id: i64, quote: &str) -> anyhow::Result<usize>;
    /// Returns the number of rows affected (0 or 1).
    fn delete_quote(&self, id: i64) -> anyhow::Result<usize>;
}
