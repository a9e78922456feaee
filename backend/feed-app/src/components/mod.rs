//! Page components
//!
//! Every component renders to a [`Node`](crate::view::Node). Stateful ones
//! take their collaborators (identity, data client, toaster) in `new`.

pub mod composer;
pub mod feed;
pub mod layout;
pub mod loading;
pub mod page;
pub mod post_view;

pub use composer::{PostComposer, SubmitOutcome};
pub use feed::{render_feed, FeedRenderer};
pub use layout::page_layout;
pub use loading::{loading_page, loading_spinner};
pub use page::HomePage;
pub use post_view::post_view;
