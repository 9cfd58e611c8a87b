pub mod browse;
pub mod detail;
pub mod favorites;
pub mod genres;
pub mod widgets;

pub use browse::render_browse_view;
pub use detail::render_detail_view;
pub use favorites::render_favorites_view;
pub use genres::render_genre_picker;
