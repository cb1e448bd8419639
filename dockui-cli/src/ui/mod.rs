mod render;
mod theme;

pub use render::draw;
