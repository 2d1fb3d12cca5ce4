pub mod about;

pub use about::render_about_window;
