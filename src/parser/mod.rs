pub mod card;
pub mod greenhouse;

use crate::model::{ParserError, RawJob};

pub use card::CardText;
pub use greenhouse::GreenhouseParser;

/// Turns one response body into raw job records.
pub trait Parser {
    fn parse(&self, body: &str) -> Result<Vec<RawJob>, ParserError>;
}
