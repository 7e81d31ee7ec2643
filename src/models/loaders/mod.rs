pub mod toml_loader;

pub use toml_loader::{load_catalog, load_games_from_toml};
