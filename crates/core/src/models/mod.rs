pub mod asset;
pub mod price;
pub mod settings;
pub mod state;
pub mod view;
