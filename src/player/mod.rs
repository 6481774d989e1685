pub mod controller;
pub mod state;

pub use controller::PlayerController;
pub use state::Player;
