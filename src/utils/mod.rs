pub mod render;

pub use render::render_page_bar;
