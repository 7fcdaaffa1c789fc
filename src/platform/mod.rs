mod model;
pub mod traits;
mod util;

pub use model::*;
pub use util::*;

pub use instagram::{extract_shortcode, process_instagram_username, InstagramError, PlatformInstagram};
pub use traits::MediaScraper;

pub mod instagram;
