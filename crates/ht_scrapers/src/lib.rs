pub mod fetch;
pub mod sources;

pub use sources::{AgileBlogSource, HeadlineSource};

pub mod prelude {
    pub use super::sources::HeadlineSource;
    pub use ht_core::{Error, Headline, Result};
}
