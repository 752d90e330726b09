use serde::Deserialize;

use crate::storage::NewQuote;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveQuoteForm {
    pub quote: String,
    pub character: String,
    pub image: String,
    pub character_direction: String,
}

impl From<SaveQuoteForm> for NewQuote {
    fn from(form: SaveQuoteForm) -> Self {
        NewQuote {
            quote: form.quote,
            character: form.character,
            image: form.image,
            character_direction: form.character_direction,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateQuoteForm {
    pub quote: String,
}
