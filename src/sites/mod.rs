pub mod google;
pub mod scroll_board;

pub use google::GoogleCareersScraper;
pub use scroll_board::ScrollBoardScraper;
