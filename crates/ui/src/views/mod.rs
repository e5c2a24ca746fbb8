mod state;

pub use state::ViewError;
